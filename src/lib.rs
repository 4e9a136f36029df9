#![warn(missing_docs)]
//! herogen - newsletter hero images from a fixed prompt catalog.
//!
//! Each catalog entry is sent to an image provider (Google Gemini by
//! default), the first inline image payload of the response is extracted,
//! and the bytes are written to `<output_dir>/<identifier>.jpg`. Entries are
//! processed one at a time; a failing entry is recorded and the run moves on.
//!
//! # Quick Start
//!
//! ```no_run
//! use herogen::{GeneratorConfig, HeroImageGenerator, PromptCatalog};
//!
//! #[tokio::main]
//! async fn main() -> herogen::Result<()> {
//!     let config = GeneratorConfig::builder()
//!         .output_dir("assets/images")
//!         .build()?;
//!     let generator = HeroImageGenerator::from_config(&config)?;
//!     let summary = generator.run(&PromptCatalog::newsletter_heroes()).await;
//!     println!("Generated: {}/{} images", summary.succeeded, summary.total);
//!     Ok(())
//! }
//! ```
//!
//! # Custom providers
//!
//! Anything implementing [`ImageProvider`] can drive the generator, which is
//! how the tests run without network access.

mod catalog;
mod config;
mod error;
mod generator;
pub mod image;

pub use catalog::{PromptCatalog, PromptCatalogEntry};
pub use config::{
    GeneratorConfig, GeneratorConfigBuilder, DEFAULT_CREDENTIAL_VAR, DEFAULT_ENV_FILE,
    DEFAULT_OUTPUT_DIR,
};
pub use error::{EmptyResponseKind, ErrorCategory, HeroGenError, Result};
pub use generator::{GenerationResult, HeroImageGenerator, Outcome, RunSummary, OUTPUT_EXTENSION};
pub use image::providers::{GeminiModel, GeminiProvider, GeminiProviderBuilder};
pub use image::{GenerationRequest, GenerationResponse, ImageProvider};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{PromptCatalog, PromptCatalogEntry};
    pub use crate::config::GeneratorConfig;
    pub use crate::error::{HeroGenError, Result};
    pub use crate::generator::{HeroImageGenerator, Outcome, RunSummary};
    pub use crate::image::providers::GeminiProvider;
    pub use crate::image::{GenerationRequest, GenerationResponse, ImageProvider};
}
