//! Ask command - answers one question from the terminal

use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::domain::session::ThreadId;
use crate::infrastructure::logging::init_logging;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to answer
    pub question: String,

    /// Thread to continue
    #[arg(long)]
    pub thread_id: Option<String>,
}

/// Run one invocation and print the answer on stdout
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging);

    let question = args.question.trim();
    anyhow::ensure!(!question.is_empty(), "question must not be empty");

    let state = crate::build_app_state(&config)?;
    let thread = args
        .thread_id
        .map(ThreadId::new)
        .unwrap_or_else(ThreadId::generate);

    let reply = state.assistant.run_pipeline(question, &thread).await;

    println!("{}", reply.answer);
    Ok(())
}
