//! CLI module for Major Mate
//!
//! Provides subcommands:
//! - `serve`: HTTP API server
//! - `ask`: answer a single question from the terminal

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

/// Major Mate - university information assistant
#[derive(Parser)]
#[command(name = "major-mate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Answer one question and print the reply
    Ask(ask::AskArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_with_thread() {
        let cli = Cli::try_parse_from(["major-mate", "ask", "졸업 요건이 뭐야?", "--thread-id", "t-1"])
            .unwrap();

        match cli.command {
            Command::Ask(args) => {
                assert_eq!(args.question, "졸업 요건이 뭐야?");
                assert_eq!(args.thread_id.as_deref(), Some("t-1"));
            }
            Command::Serve => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["major-mate", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));
    }
}
