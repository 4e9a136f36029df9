//! Generator configuration: credential, output directory, model.

use crate::error::{HeroGenError, Result};
use crate::image::providers::{GeminiModel, GeminiProvider};
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key.
pub const DEFAULT_CREDENTIAL_VAR: &str = "GOOGLE_API_KEY";

/// Where images land when no directory is given.
pub const DEFAULT_OUTPUT_DIR: &str = "assets/images";

/// Env file consulted when none is named explicitly.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Resolved settings for a generation run.
#[derive(Clone)]
pub struct GeneratorConfig {
    api_key: String,
    output_dir: PathBuf,
    model: GeminiModel,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"<redacted>")
            .field("output_dir", &self.output_dir)
            .field("model", &self.model)
            .finish()
    }
}

impl GeneratorConfig {
    /// Creates a new `GeneratorConfigBuilder`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }

    /// The API credential.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Directory images are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Gemini model variant.
    pub fn model(&self) -> GeminiModel {
        self.model
    }

    /// Builds the Gemini provider described by this configuration.
    pub fn gemini_provider(&self) -> Result<GeminiProvider> {
        GeminiProvider::builder()
            .api_key(&self.api_key)
            .model(self.model)
            .build()
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug, Clone)]
pub struct GeneratorConfigBuilder {
    api_key: Option<String>,
    output_dir: Option<PathBuf>,
    model: GeminiModel,
    env_file: Option<PathBuf>,
    credential_var: String,
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            output_dir: None,
            model: GeminiModel::default(),
            env_file: None,
            credential_var: DEFAULT_CREDENTIAL_VAR.to_string(),
        }
    }
}

impl GeneratorConfigBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key directly, skipping environment lookup.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the output directory. Defaults to `assets/images`.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Names an env file to read the credential from. It must exist.
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Changes the variable the credential is read from.
    pub fn credential_var(mut self, name: impl Into<String>) -> Self {
        self.credential_var = name.into();
        self
    }

    /// Resolves the credential and builds the configuration.
    ///
    /// Lookup order: explicit key, process environment, env file. The env
    /// file is parsed without touching the process environment.
    pub fn build(self) -> Result<GeneratorConfig> {
        let api_key = match self.api_key.clone() {
            Some(key) => Some(key),
            None => self.lookup_credential()?,
        };

        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                HeroGenError::Config(format!(
                    "{} not found in environment or env file",
                    self.credential_var
                ))
            })?;

        Ok(GeneratorConfig {
            api_key,
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            model: self.model,
        })
    }

    fn lookup_credential(&self) -> Result<Option<String>> {
        if let Some(value) = std::env::var(&self.credential_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
        {
            return Ok(Some(value));
        }

        let path = match &self.env_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(HeroGenError::Config(format!(
                        "env file not found: {}",
                        path.display()
                    )));
                }
                path.clone()
            }
            None => {
                let path = PathBuf::from(DEFAULT_ENV_FILE);
                if !path.is_file() {
                    tracing::debug!("no {} file found, using process environment only", DEFAULT_ENV_FILE);
                    return Ok(None);
                }
                path
            }
        };

        read_env_file_var(&path, &self.credential_var)
    }
}

fn read_env_file_var(path: &Path, name: &str) -> Result<Option<String>> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| {
        HeroGenError::Config(format!("failed to read {}: {e}", path.display()))
    })?;

    for item in iter {
        let (key, value) = item.map_err(|e| {
            HeroGenError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;
        if key == name {
            tracing::debug!(path = %path.display(), "credential loaded from env file");
            return Ok(Some(value));
        }
    }

    Ok(None)
}
