//! Requester configuration, read once at startup.

use crate::{Error, GenerateRequest};
use reqwest::Url;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the Ollama server URL.
pub const OLLAMA_URL_VAR: &str = "OLLAMA_URL";

/// Environment variable that relaxes the `.env` requirement when set to `1` or `true`
/// (any case).
pub const ENV_FILE_OPTIONAL_VAR: &str = "OLLAMA_STREAM_ENV_OPTIONAL";

/// Model used for every request.
pub const DEFAULT_MODEL: &str = "deepseek-r1:14b";

/// Prompt sent with every request.
pub const DEFAULT_PROMPT: &str = "Explain step by step, explicitly stating each assumption and inference: What are the long-term economic effects of quantum computing on cryptography?";

/// Everything the requester needs for one exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RequesterConfig {
    pub base_url: String,
    pub model: String,
    pub prompt: String,
    pub think: bool,
}

impl RequesterConfig {
    /// Create a configuration for `base_url` with the fixed model and prompt.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            think: true,
        }
    }

    /// Create configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(OLLAMA_URL_VAR).ok_or_else(|| {
            Error::config(format!("{OLLAMA_URL_VAR} environment variable is required"))
        })?;

        let config = Self::new(validate_base_url(&raw)?);
        config.validate()?;
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_think(mut self, think: bool) -> Self {
        self.think = think;
        self
    }

    /// Check that the URL, model and prompt are usable.
    pub fn validate(&self) -> Result<(), Error> {
        validate_base_url(&self.base_url)?;

        if self.model.trim().is_empty() {
            return Err(Error::config("Model identifier must not be empty"));
        }
        if self.prompt.trim().is_empty() {
            return Err(Error::config("Prompt must not be empty"));
        }

        Ok(())
    }

    /// The generation request described by this configuration.
    pub fn request(&self) -> GenerateRequest {
        GenerateRequest::new(self.model.clone(), self.prompt.clone()).think(self.think)
    }
}

/// Validate a server URL and return it without trailing slashes.
pub fn validate_base_url(base_url: &str) -> Result<String, Error> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(Error::config(format!("{OLLAMA_URL_VAR} must not be empty")));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| Error::config(format!("{OLLAMA_URL_VAR} '{trimmed}' is not a valid URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config(format!(
            "{OLLAMA_URL_VAR} must use http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(Error::config(format!("{OLLAMA_URL_VAR} '{trimmed}' has no host")));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// What to do when the `.env` file cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvFilePolicy {
    /// A missing file is a configuration error.
    #[default]
    Required,
    /// A missing file is skipped. A malformed file is still an error.
    BestEffort,
}

impl EnvFilePolicy {
    /// Pick the policy from [`ENV_FILE_OPTIONAL_VAR`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(ENV_FILE_OPTIONAL_VAR).as_deref().map(str::trim) {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => EnvFilePolicy::BestEffort,
            _ => EnvFilePolicy::Required,
        }
    }
}

/// Load `.env` from the working directory or one of its parents.
///
/// Variables already set in the process environment are not overridden.
/// Returns the path that was loaded, or `None` if it was skipped.
pub fn load_env_file(policy: EnvFilePolicy) -> Result<Option<PathBuf>, Error> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "Loaded environment file");
            Ok(Some(path))
        }
        Err(e) if e.not_found() && policy == EnvFilePolicy::BestEffort => {
            debug!("No .env file found, continuing with process environment");
            Ok(None)
        }
        Err(e) => Err(Error::config(format!("Error loading .env file: {e}"))),
    }
}

/// Load a specific environment file. Returns whether the file was loaded.
pub fn load_env_file_from(path: impl AsRef<Path>, policy: EnvFilePolicy) -> Result<bool, Error> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded environment file");
            Ok(true)
        }
        Err(e) if e.not_found() && policy == EnvFilePolicy::BestEffort => Ok(false),
        Err(e) => Err(Error::config(format!(
            "Error loading {}: {e}",
            path.display()
        ))),
    }
}
