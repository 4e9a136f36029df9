//! Runs a small catalog through a custom offline provider.
//!
//! Run with: `cargo run --example run_catalog`
//!
//! No API key needed; every prompt gets a tiny JPEG-looking payload.

use async_trait::async_trait;
use herogen::image::Part;
use herogen::{
    GenerationRequest, GenerationResponse, HeroImageGenerator, ImageProvider, PromptCatalog,
    PromptCatalogEntry,
};

struct PlaceholderProvider;

#[async_trait]
impl ImageProvider for PlaceholderProvider {
    async fn generate(&self, request: &GenerationRequest) -> herogen::Result<GenerationResponse> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.extend_from_slice(request.prompt.as_bytes());
        Ok(GenerationResponse::with_parts(vec![
            Part::text("placeholder"),
            Part::inline("image/jpeg", data),
        ]))
    }

    fn name(&self) -> &str {
        "Placeholder"
    }

    fn model(&self) -> &str {
        "offline"
    }
}

#[tokio::main]
async fn main() -> herogen::Result<()> {
    let catalog = PromptCatalog::from_entries([
        PromptCatalogEntry::new("sunrise", "A sunrise over a school campus"),
        PromptCatalogEntry::new("lab", "A bright biology lab"),
    ])?;

    let generator = HeroImageGenerator::new(PlaceholderProvider, "demo-output");
    let summary = generator.run(&catalog).await;

    println!(
        "Generated {}/{} images in {}",
        summary.succeeded,
        summary.total,
        summary.output_dir.display()
    );
    for path in summary.written_paths() {
        println!("  - {}", path.display());
    }

    Ok(())
}
