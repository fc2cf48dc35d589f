use async_trait::async_trait;

use crate::Result;

/// A request/response text-completion surface.
///
/// Implementations are built once at process start and shared by
/// reference (`Arc<dyn LanguageModel>`). They must be safe for concurrent
/// invocation; the serving side is expected to queue or batch requests
/// internally, so callers perform no locking of their own.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Human-readable name of the backing model.
    fn name(&self) -> &str;

    /// One completion call: a system instruction plus a user prompt.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}
