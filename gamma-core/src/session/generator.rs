//! Seam between the session manager and response generation

use async_trait::async_trait;

/// Produces an assistant reply for a single prompt.
///
/// Implementations live outside this crate; the gateway client in
/// `gamma-providers` is the production one.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generate a reply for `prompt`
    async fn generate(&self, prompt: &str) -> crate::Result<String>;
}
