//! Runs a prompt catalog through an image provider and writes the results.

use crate::catalog::{PromptCatalog, PromptCatalogEntry};
use crate::config::GeneratorConfig;
use crate::error::{ErrorCategory, HeroGenError, Result};
use crate::image::providers::GeminiProvider;
use crate::image::{GenerationRequest, ImageFormat, ImageProvider};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Extension used for every output file, whatever the payload format.
pub const OUTPUT_EXTENSION: &str = "jpg";

const PROMPT_PREVIEW_CHARS: usize = 100;

/// What happened to one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Image written.
    Success {
        /// Bytes written.
        bytes: usize,
        /// File the image was written to.
        path: PathBuf,
    },
    /// No image written.
    Failure {
        /// Error message.
        reason: String,
        /// Error grouping.
        category: ErrorCategory,
    },
}

/// Outcome for a single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    /// Catalog identifier.
    pub id: String,
    /// What happened.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl GenerationResult {
    /// Returns true if the image was written.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }
}

/// Tally of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// One result per catalog entry, in catalog order.
    pub results: Vec<GenerationResult>,
    /// Directory images were written to.
    pub output_dir: PathBuf,
    /// Number of images written.
    pub succeeded: usize,
    /// Number of catalog entries.
    pub total: usize,
}

impl RunSummary {
    fn new(results: Vec<GenerationResult>, output_dir: PathBuf) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let total = results.len();
        Self {
            results,
            output_dir,
            succeeded,
            total,
        }
    }

    /// Returns true if every entry produced an image.
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }

    /// Paths of the images written, in catalog order.
    pub fn written_paths(&self) -> impl Iterator<Item = &Path> {
        self.results.iter().filter_map(|r| match &r.outcome {
            Outcome::Success { path, .. } => Some(path.as_path()),
            Outcome::Failure { .. } => None,
        })
    }
}

/// Generates one image per catalog entry, sequentially.
pub struct HeroImageGenerator<P> {
    provider: P,
    output_dir: PathBuf,
    seed: Option<u64>,
}

impl HeroImageGenerator<GeminiProvider> {
    /// Builds a Gemini-backed generator from a resolved configuration.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        Ok(Self::new(config.gemini_provider()?, config.output_dir()))
    }
}

impl<P: ImageProvider> HeroImageGenerator<P> {
    /// Creates a generator writing into `output_dir`.
    pub fn new(provider: P, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            output_dir: output_dir.into(),
            seed: None,
        }
    }

    /// Sends `seed` with every request.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Directory images are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output path for a catalog identifier.
    pub fn output_path(&self, id: &str) -> PathBuf {
        self.output_dir.join(format!("{id}.{OUTPUT_EXTENSION}"))
    }

    /// Processes every entry in order. Per-entry failures are recorded in
    /// the summary and never stop the run.
    pub async fn run(&self, catalog: &PromptCatalog) -> RunSummary {
        let mut results = Vec::with_capacity(catalog.len());

        // Failure here surfaces again as each entry's write error.
        if let Err(e) = std::fs::create_dir_all(&self.output_dir) {
            tracing::error!(
                path = %self.output_dir.display(),
                error = ?e,
                "[ERROR] cannot create output directory: {e}"
            );
        }

        for entry in catalog {
            tracing::info!(id = entry.id(), "generating");
            tracing::info!(
                id = entry.id(),
                "prompt: {}...",
                entry.prompt_preview(PROMPT_PREVIEW_CHARS)
            );

            let outcome = match self.generate_entry(entry).await {
                Ok((bytes, path)) => {
                    tracing::info!(
                        id = entry.id(),
                        path = %path.display(),
                        bytes,
                        "[SUCCESS] saved {} ({:.1} KB)",
                        path.display(),
                        bytes as f64 / 1024.0
                    );
                    Outcome::Success { bytes, path }
                }
                Err(e) => {
                    match &e {
                        HeroGenError::EmptyResponse(_) => {
                            tracing::warn!(id = entry.id(), "[FAILED] {e}")
                        }
                        _ => tracing::error!(id = entry.id(), error = ?e, "[ERROR] {e}"),
                    }
                    Outcome::Failure {
                        reason: e.to_string(),
                        category: e.category(),
                    }
                }
            };

            results.push(GenerationResult {
                id: entry.id().to_string(),
                outcome,
            });
        }

        let summary = RunSummary::new(results, self.output_dir.clone());
        if !summary.all_succeeded() {
            tracing::warn!(
                succeeded = summary.succeeded,
                total = summary.total,
                "only {}/{} images generated successfully",
                summary.succeeded,
                summary.total
            );
        }
        summary
    }

    async fn generate_entry(&self, entry: &PromptCatalogEntry) -> Result<(usize, PathBuf)> {
        let mut request = GenerationRequest::new(entry.prompt());
        if let Some(seed) = self.seed {
            request = request.with_seed(seed);
        }

        let start = Instant::now();
        let response = self.provider.generate(&request).await?;
        tracing::info!(
            id = entry.id(),
            duration_ms = start.elapsed().as_millis() as u64,
            "response received, checking for image data"
        );

        if let Some(candidate) = response.candidates.first() {
            let parts = candidate.content.as_ref().map_or(&[][..], |c| &c.parts[..]);
            tracing::info!(
                id = entry.id(),
                candidates = response.candidates.len(),
                parts = parts.len(),
                finish_reason = candidate.finish_reason.as_deref().unwrap_or("none"),
                "got candidate"
            );
            for (i, part) in parts.iter().enumerate() {
                tracing::debug!(id = entry.id(), part = i, kind = part.kind(), "inspecting part");
            }
        }

        let inline = response.into_inline_payload()?;

        match inline.format() {
            Some(ImageFormat::Jpeg) => {}
            Some(format) => tracing::debug!(
                id = entry.id(),
                %format,
                "payload is not JPEG, writing with .{OUTPUT_EXTENSION} extension anyway"
            ),
            None => tracing::debug!(
                id = entry.id(),
                mime_type = %inline.mime_type,
                "unrecognized payload format"
            ),
        }

        let path = self.output_path(entry.id());
        inline.save(&path)?;

        Ok((inline.size(), path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmptyResponseKind;
    use crate::image::{Candidate, GenerationResponse, Part};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned behaviour for one prompt.
    #[derive(Clone)]
    enum Scripted {
        Respond(GenerationResponse),
        Fail { status: u16 },
    }

    /// Provider answering from a prompt-keyed script and recording calls.
    struct ScriptedProvider {
        script: HashMap<String, Scripted>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(script: impl IntoIterator<Item = (&'static str, Scripted)>) -> Self {
            Self {
                script: script
                    .into_iter()
                    .map(|(prompt, s)| (prompt.to_string(), s))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn empty() -> Self {
            Self::new(Vec::<(&'static str, Scripted)>::new())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageProvider for ScriptedProvider {
        async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
            self.calls.lock().unwrap().push(request.prompt.clone());
            match self.script.get(&request.prompt) {
                Some(Scripted::Respond(response)) => Ok(response.clone()),
                Some(Scripted::Fail { status }) => Err(HeroGenError::Api {
                    status: *status,
                    message: "scripted failure".into(),
                }),
                None => Ok(GenerationResponse::default()),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }
    }

    fn image(bytes: usize) -> Scripted {
        Scripted::Respond(GenerationResponse::with_parts(vec![Part::inline(
            "image/jpeg",
            vec![0xAB; bytes],
        )]))
    }

    fn no_candidates() -> Scripted {
        Scripted::Respond(GenerationResponse::default())
    }

    fn catalog(ids: &[(&str, &str)]) -> PromptCatalog {
        PromptCatalog::from_entries(
            ids.iter()
                .map(|(id, prompt)| PromptCatalogEntry::new(*id, *prompt)),
        )
        .unwrap()
    }

    fn failure_category(result: &GenerationResult) -> ErrorCategory {
        match &result.outcome {
            Outcome::Failure { category, .. } => *category,
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_partial_success_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::new([("prompt A", image(1024)), ("prompt B", no_candidates())]);
        let generator = HeroImageGenerator::new(provider, dir.path());

        let summary = generator
            .run(&catalog(&[("a", "prompt A"), ("b", "prompt B")]))
            .await;

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert!(!summary.all_succeeded());

        let a = dir.path().join("a.jpg");
        assert_eq!(std::fs::read(&a).unwrap(), vec![0xAB; 1024]);
        assert!(!dir.path().join("b.jpg").exists());

        assert_eq!(
            summary.results[0].outcome,
            Outcome::Success {
                bytes: 1024,
                path: a.clone()
            }
        );
        assert_eq!(failure_category(&summary.results[1]), ErrorCategory::EmptyResponse);
        assert_eq!(summary.written_paths().collect::<Vec<_>>(), vec![a.as_path()]);
    }

    #[tokio::test]
    async fn test_one_result_per_entry_in_catalog_order() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::new([
            ("p1", image(10)),
            ("p2", Scripted::Fail { status: 500 }),
            ("p3", no_candidates()),
            ("p4", image(20)),
        ]);
        let generator = HeroImageGenerator::new(provider, dir.path());

        let summary = generator
            .run(&catalog(&[("one", "p1"), ("two", "p2"), ("three", "p3"), ("four", "p4")]))
            .await;

        let ids: Vec<_> = summary.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["one", "two", "three", "four"]);
        assert_eq!(generator.provider().calls(), vec!["p1", "p2", "p3", "p4"]);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(
            failure_category(&summary.results[1]),
            ErrorCategory::TransportOrRemote
        );
    }

    #[tokio::test]
    async fn test_empty_payload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::new([(
            "p",
            Scripted::Respond(GenerationResponse::with_parts(vec![
                Part::text("here"),
                Part::inline("image/png", vec![]),
            ])),
        )]);
        let generator = HeroImageGenerator::new(provider, dir.path());

        let summary = generator.run(&catalog(&[("empty", "p")])).await;

        match &summary.results[0].outcome {
            Outcome::Failure { reason, category } => {
                assert_eq!(*category, ErrorCategory::EmptyResponse);
                assert_eq!(
                    *reason,
                    HeroGenError::EmptyResponse(EmptyResponseKind::EmptyPayload).to_string()
                );
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!dir.path().join("empty.jpg").exists());
    }

    #[tokio::test]
    async fn test_empty_inline_part_followed_by_image() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::new([(
            "p",
            Scripted::Respond(GenerationResponse::with_parts(vec![
                Part::inline("image/jpeg", vec![]),
                Part::inline("image/jpeg", vec![0xCD; 16]),
            ])),
        )]);
        let generator = HeroImageGenerator::new(provider, dir.path());

        let summary = generator.run(&catalog(&[("second", "p")])).await;

        assert!(summary.all_succeeded());
        assert_eq!(
            std::fs::read(dir.path().join("second.jpg")).unwrap(),
            vec![0xCD; 16]
        );
    }

    #[tokio::test]
    async fn test_candidate_without_content_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ScriptedProvider::new([(
            "p",
            Scripted::Respond(GenerationResponse {
                candidates: vec![Candidate {
                    content: None,
                    finish_reason: Some("IMAGE_SAFETY".into()),
                }],
                model_version: None,
            }),
        )]);
        let generator = HeroImageGenerator::new(provider, dir.path());

        let summary = generator.run(&catalog(&[("blocked", "p")])).await;
        assert_eq!(summary.succeeded, 0);
        assert_eq!(failure_category(&summary.results[0]), ErrorCategory::EmptyResponse);
    }

    #[tokio::test]
    async fn test_png_payload_still_written_as_jpg() {
        let dir = tempfile::tempdir().unwrap();
        let png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];
        let provider = ScriptedProvider::new([(
            "p",
            Scripted::Respond(GenerationResponse::with_parts(vec![Part::inline(
                "image/png",
                png.clone(),
            )])),
        )]);
        let generator = HeroImageGenerator::new(provider, dir.path());

        let summary = generator.run(&catalog(&[("hero", "p")])).await;
        assert!(summary.all_succeeded());
        assert_eq!(std::fs::read(dir.path().join("hero.jpg")).unwrap(), png);
    }

    #[tokio::test]
    async fn test_creates_output_dir_and_overwrites_on_rerun() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("assets").join("images");
        let cat = catalog(&[("a", "big")]);

        let first = HeroImageGenerator::new(ScriptedProvider::new([("big", image(2048))]), &out);
        assert!(first.run(&cat).await.all_succeeded());
        assert_eq!(std::fs::metadata(out.join("a.jpg")).unwrap().len(), 2048);

        let second = HeroImageGenerator::new(ScriptedProvider::new([("big", image(100))]), &out);
        assert!(second.run(&cat).await.all_succeeded());
        assert_eq!(std::fs::read(out.join("a.jpg")).unwrap(), vec![0xAB; 100]);
    }

    #[tokio::test]
    async fn test_output_dir_created_even_when_every_entry_fails() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("assets").join("images");
        let provider = ScriptedProvider::new([("p1", no_candidates()), ("p2", Scripted::Fail { status: 503 })]);
        let generator = HeroImageGenerator::new(provider, &out);

        let summary = generator.run(&catalog(&[("a", "p1"), ("b", "p2")])).await;

        assert_eq!(summary.succeeded, 0);
        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_is_per_entry() {
        let root = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be.
        let blocker = root.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let provider = ScriptedProvider::new([("p1", image(8)), ("p2", image(8))]);
        let generator = HeroImageGenerator::new(provider, &blocker);

        let summary = generator.run(&catalog(&[("a", "p1"), ("b", "p2")])).await;
        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(generator.provider().calls().len(), 2);
        assert!(summary
            .results
            .iter()
            .all(|r| failure_category(r) == ErrorCategory::TransportOrRemote));
    }

    #[tokio::test]
    async fn test_seed_is_forwarded() {
        struct SeedProbe(Mutex<Option<u64>>);

        #[async_trait]
        impl ImageProvider for SeedProbe {
            async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
                *self.0.lock().unwrap() = request.seed;
                Ok(GenerationResponse::default())
            }
            fn name(&self) -> &str {
                "probe"
            }
            fn model(&self) -> &str {
                "probe"
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let generator = HeroImageGenerator::new(SeedProbe(Mutex::new(None)), dir.path()).with_seed(7);
        generator.run(&catalog(&[("a", "p")])).await;
        assert_eq!(*generator.provider().0.lock().unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let generator = HeroImageGenerator::new(ScriptedProvider::empty(), dir.path());
        let summary = generator.run(&PromptCatalog::default()).await;
        assert_eq!(summary.total, 0);
        assert!(summary.all_succeeded());
    }

    #[test]
    fn test_output_path_uses_jpg() {
        let generator = HeroImageGenerator::new(ScriptedProvider::empty(), "/out");
        assert_eq!(generator.output_path("week1-hero"), PathBuf::from("/out/week1-hero.jpg"));
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = RunSummary::new(
            vec![
                GenerationResult {
                    id: "a".into(),
                    outcome: Outcome::Success {
                        bytes: 3,
                        path: PathBuf::from("out/a.jpg"),
                    },
                },
                GenerationResult {
                    id: "b".into(),
                    outcome: Outcome::Failure {
                        reason: "empty response: no candidates in response".into(),
                        category: ErrorCategory::EmptyResponse,
                    },
                },
            ],
            PathBuf::from("out"),
        );
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["succeeded"], 1);
        assert_eq!(json["total"], 2);
        assert_eq!(json["results"][0]["status"], "success");
        assert_eq!(json["results"][0]["bytes"], 3);
        assert_eq!(json["results"][1]["status"], "failure");
        assert_eq!(json["results"][1]["category"], "empty_response");
    }

    #[test]
    fn test_from_config_rejects_missing_key_before_any_call() {
        let result = GeneratorConfig::builder()
            .api_key("")
            .credential_var("HEROGEN_TEST_GENERATOR_UNSET")
            .build();
        assert!(matches!(result, Err(HeroGenError::Config(_))));

        let config = GeneratorConfig::builder()
            .api_key("k")
            .output_dir("/tmp/out")
            .build()
            .unwrap();
        let generator = HeroImageGenerator::from_config(&config).unwrap();
        assert_eq!(generator.output_dir(), Path::new("/tmp/out"));
    }
}
