//! Image provider trait.

use crate::error::Result;
use crate::image::types::{GenerationRequest, GenerationResponse};
use async_trait::async_trait;

/// Trait for image generation providers.
///
/// Implementations issue exactly one remote call per `generate` and never
/// retry; callers decide what a failure means.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Sends the request and returns the provider's candidates.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;

    /// Returns the model identifier used for requests.
    fn model(&self) -> &str;
}

