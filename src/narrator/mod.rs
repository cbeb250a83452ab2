//! Narrative generation for the swap feed.

pub mod gemini;
pub mod prompt;

use async_trait::async_trait;

use crate::error::Result;

pub use gemini::GeminiNarrator;

/// Stateless request/response text generator.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Generate a narrative for one prompt. Fails with `RateLimited` when the
    /// service reports exhausted quota, `Service` for anything else; callers
    /// decide the fallback.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
