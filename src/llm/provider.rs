use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::CoreError;

/// Boundary to the external generation and embedding capabilities.
///
/// Retries, rate limiting and model selection live behind this trait;
/// the core only issues requests and consumes text/vector results.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g. "openai").
    fn name(&self) -> &str;

    /// Chat completion (non-streaming).
    async fn chat(&self, request: ChatRequest) -> Result<String, CoreError>;

    /// Generate one embedding per input, in input order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, CoreError>;
}
