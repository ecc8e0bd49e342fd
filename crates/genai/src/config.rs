use std::time::Duration;

use loci_core::CoreError;

/// Default service base URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
/// Default model for schema-constrained text generation.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
/// Default model for image generation and editing.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Generative-AI client configuration loaded from environment variables.
///
/// The API key is the only required value; its absence is a
/// [`CoreError::Config`] and is fatal at startup.
#[derive(Clone)]
pub struct GenAiConfig {
    pub api_key: String,
    pub api_url: String,
    pub text_model: String,
    pub image_model: String,
    /// Per-request timeout. `None` means requests may wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl std::fmt::Debug for GenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl GenAiConfig {
    /// Build a config with defaults for everything except the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            request_timeout: None,
        }
    }

    /// Load configuration from the process environment.
    ///
    /// | Env Var                       | Default                                     |
    /// |-------------------------------|---------------------------------------------|
    /// | `GEMINI_API_KEY` / `API_KEY`  | required                                    |
    /// | `GEMINI_API_URL`              | `https://generativelanguage.googleapis.com` |
    /// | `GEMINI_TEXT_MODEL`           | `gemini-2.5-flash`                          |
    /// | `GEMINI_IMAGE_MODEL`          | `gemini-2.5-flash-image-preview`            |
    /// | `GEMINI_REQUEST_TIMEOUT_SECS` | unset (no timeout)                          |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("API_KEY"))
            .ok_or_else(|| {
                CoreError::Config(
                    "GEMINI_API_KEY (or API_KEY) environment variable is required".to_string(),
                )
            })?;

        let request_timeout = non_empty("GEMINI_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| {
                        CoreError::Config(format!(
                            "GEMINI_REQUEST_TIMEOUT_SECS must be a whole number of seconds (got '{raw}')"
                        ))
                    })
            })
            .transpose()?;

        Ok(Self {
            api_key,
            api_url: non_empty("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            text_model: non_empty("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: non_empty("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            request_timeout,
        })
    }
}
