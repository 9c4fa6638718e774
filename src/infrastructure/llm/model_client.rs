//! Reusable model client with per-call timeouts and retries

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::domain::llm::StructuredOutput;
use crate::domain::{DomainError, LlmProvider, LlmRequest, LlmResponse, Message};
use crate::infrastructure::observability::{record_llm_request, LlmRequestMetricParams};

const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Construction-time settings of a [`ModelClient`]
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    /// Bound on a single attempt
    pub timeout: Duration,
    /// Retries after the first attempt, for retryable errors only
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub retry_backoff: Duration,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl ModelSettings {
    /// Settings for `model` with default sampling and retry policy
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the per-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many times a retryable failure is retried
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial retry delay
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Delay before retry number `attempt` (0-indexed)
    pub fn delay_for_retry(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.retry_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

/// Injected handle for every model call made by the assistant
#[derive(Debug, Clone)]
pub struct ModelClient {
    provider: Arc<dyn LlmProvider>,
    settings: ModelSettings,
}

impl ModelClient {
    /// Wrap a provider with the given settings
    pub fn new(provider: Arc<dyn LlmProvider>, settings: ModelSettings) -> Self {
        Self { provider, settings }
    }

    /// Free-text completion
    pub async fn invoke_text(&self, messages: Vec<Message>) -> Result<String, DomainError> {
        let request = LlmRequest::builder()
            .messages(messages)
            .temperature(self.settings.temperature)
            .build();

        let response = self.invoke(request).await?;
        Ok(response.content().to_string())
    }

    /// Completion constrained to `T`'s JSON schema, decoded into `T`
    pub async fn invoke_structured<T: StructuredOutput>(
        &self,
        messages: Vec<Message>,
    ) -> Result<T, DomainError> {
        let request = LlmRequest::builder()
            .messages(messages)
            .temperature(self.settings.temperature)
            .json_schema(T::NAME, T::json_schema())
            .build();

        let response = self.invoke(request).await?;
        T::decode(response.content())
    }

    /// Send a request, retrying transient failures
    pub async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let max_attempts = self.settings.max_retries + 1;
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let delay = self.settings.delay_for_retry(attempt - 1);
                tokio::time::sleep(delay).await;
            }

            match self.try_invoke(&request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                    tracing::warn!(
                        provider = self.provider.provider_name(),
                        model = %self.settings.model,
                        attempt = attempt + 1,
                        error = %e,
                        "Model call failed, retrying"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| DomainError::internal("Model call made no attempts")))
    }

    async fn try_invoke(&self, request: &LlmRequest) -> Result<LlmResponse, DomainError> {
        let start = Instant::now();
        let future = self.provider.chat(&self.settings.model, request.clone());

        let result = match timeout(self.settings.timeout, future).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::timeout(
                format!("chat {}", self.settings.model),
                self.settings.timeout.as_millis() as u64,
            )),
        };

        let usage = result.as_ref().ok().and_then(|r| r.usage.as_ref());
        record_llm_request(LlmRequestMetricParams {
            provider: self.provider.provider_name(),
            model: &self.settings.model,
            duration: start.elapsed(),
            success: result.is_ok(),
            input_tokens: usage.map(|u| u.prompt_tokens as u64),
            output_tokens: usage.map(|u| u.completion_tokens as u64),
        });

        result
    }
}
