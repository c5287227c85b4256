// The two external seams the orchestrator is built over. Concrete
// implementations live in the providers and executor crates; tests
// substitute mocks.

use crate::transcript::Turn;
use crate::types::{CommandSpec, ExecutionResult};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

// Hard per-command timeout applied by the runner.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("model channel is not configured: {0}")]
    NotConfigured(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("API error: {0}")]
    Api(String),
}

// Prompt plus ordered history in, JSON-like (possibly fenced) text out.
#[async_trait]
pub trait ModelChannel: Send + Sync {
    async fn send(&self, prompt: &str, history: &[Turn]) -> Result<String, ChannelError>;

    // Callers swallow failures; a suggestion error is never user-visible.
    async fn suggest(
        &self,
        original_prompt: &str,
        summary: &str,
    ) -> Result<Vec<String>, ChannelError>;
}

// Implementations never return an error: spawn failures and timeouts
// become synthetic failed results.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec, timeout: Duration) -> ExecutionResult;
}
