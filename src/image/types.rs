//! Core types for image generation.

use crate::error::{EmptyResponseKind, HeroGenError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Maps a MIME type to a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A request to generate an image.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Seed for deterministic generation.
    pub seed: Option<u64>,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            seed: None,
        }
    }

    /// Sets the seed for deterministic generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Provider-neutral view of a generation response.
///
/// Only the shape matters to the generator: whether a candidate exists,
/// whether its content has parts, and whether a part carries inline bytes.
#[derive(Debug, Clone, Default)]
pub struct GenerationResponse {
    /// Proposed response variants, in provider order.
    pub candidates: Vec<Candidate>,
    /// Model version reported by the provider, if any.
    pub model_version: Option<String>,
}

/// One proposed response variant.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    /// Content of the candidate; absent when the provider filtered it.
    pub content: Option<Content>,
    /// Provider-specific finish reason (e.g. `STOP`, `IMAGE_SAFETY`).
    pub finish_reason: Option<String>,
}

/// Ordered content parts of a candidate.
#[derive(Debug, Clone, Default)]
pub struct Content {
    /// Fragments of the candidate, in order.
    pub parts: Vec<Part>,
}

/// One fragment of candidate content.
#[derive(Debug, Clone, Default)]
pub struct Part {
    /// Text carried by this part.
    pub text: Option<String>,
    /// Inline binary payload carried by this part.
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// Creates a text-only part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// Creates a part carrying inline bytes.
    pub fn inline(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data,
            }),
        }
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match (&self.inline_data, &self.text) {
            (Some(_), _) => "inline_data",
            (None, Some(_)) => "text",
            (None, None) => "empty",
        }
    }
}

/// Raw binary data embedded in a response part, already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    /// Declared media type, e.g. `image/png`.
    pub mime_type: String,
    /// Decoded payload bytes.
    pub data: Vec<u8>,
}

impl InlineData {
    /// Returns the size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Format declared by the provider, falling back to magic-byte detection.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.mime_type)
            .or_else(|| ImageFormat::from_magic_bytes(&self.data))
    }

    /// Writes the payload verbatim to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

impl GenerationResponse {
    /// Creates a response with a single candidate holding `parts`.
    pub fn with_parts(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content { parts }),
                finish_reason: Some("STOP".into()),
            }],
            model_version: None,
        }
    }

    /// Extracts the first inline payload of the first candidate.
    ///
    /// Parts are scanned in order and the first one carrying non-empty
    /// inline data wins; later parts are ignored. Zero-length payloads are
    /// skipped, and if they were the only inline data the result is
    /// `EmptyPayload` rather than `NoInlineData`.
    pub fn into_inline_payload(self) -> Result<InlineData> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(HeroGenError::EmptyResponse(EmptyResponseKind::NoCandidates))?;

        let parts = candidate
            .content
            .map(|c| c.parts)
            .filter(|parts| !parts.is_empty())
            .ok_or(HeroGenError::EmptyResponse(EmptyResponseKind::NoParts))?;

        let mut saw_inline = false;
        let inline = parts
            .into_iter()
            .filter_map(|p| p.inline_data)
            .inspect(|_| saw_inline = true)
            .find(|d| !d.data.is_empty());

        match inline {
            Some(inline) => Ok(inline),
            None if saw_inline => Err(HeroGenError::EmptyResponse(EmptyResponseKind::EmptyPayload)),
            None => Err(HeroGenError::EmptyResponse(EmptyResponseKind::NoInlineData)),
        }
    }
}
