//! The [`GenerativeModel`] seam and its HTTP-backed implementation.
//!
//! The pipeline only ever talks to `dyn GenerativeModel`. [`GeminiClient`]
//! is the production implementation; tests plug in scripted doubles.

use async_trait::async_trait;
use loci_core::{CoreError, DataUrl};

use crate::api::{GeminiApi, GenAiApiError};
use crate::config::GenAiConfig;
use crate::messages::{Content, GenerateContentRequest, GenerationConfig, Part};

/// Errors surfaced by a [`GenerativeModel`].
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    #[error(transparent)]
    Api(#[from] GenAiApiError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// What an image request returned: an inline image, accompanying text,
/// both, or neither.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageResponse {
    pub image: Option<DataUrl>,
    pub text: Option<String>,
}

/// A generative model able to produce schema-constrained JSON text and
/// inline images from mixed text/image input.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate JSON text constrained by `schema`. Returns the raw text;
    /// parsing is the caller's responsibility.
    async fn generate_json(
        &self,
        parts: Vec<Part>,
        schema: serde_json::Value,
    ) -> Result<String, GenAiError>;

    /// Generate or edit an image.
    async fn generate_image(&self, parts: Vec<Part>) -> Result<ImageResponse, GenAiError>;
}

/// [`GenerativeModel`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api: GeminiApi,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(api: GeminiApi, text_model: String, image_model: String) -> Self {
        Self {
            api,
            text_model,
            image_model,
        }
    }

    /// Build a client from configuration, applying the request timeout if
    /// one is configured.
    pub fn from_config(config: &GenAiConfig) -> Result<Self, GenAiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(GenAiApiError::from)?;

        Ok(Self::new(
            GeminiApi::with_client(http, config.api_url.clone(), config.api_key.clone()),
            config.text_model.clone(),
            config.image_model.clone(),
        ))
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    pub fn image_model(&self) -> &str {
        &self.image_model
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_json(
        &self,
        parts: Vec<Part>,
        schema: serde_json::Value,
    ) -> Result<String, GenAiError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(parts)],
            generation_config: Some(GenerationConfig::json_schema(schema)),
        };

        tracing::debug!(model = %self.text_model, "Requesting structured text");
        let response = self.api.generate_content(&self.text_model, &request).await?;

        if let Some(usage) = response.usage_metadata {
            tracing::debug!(
                model = %self.text_model,
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Structured text received",
            );
        }

        response.text().ok_or_else(|| {
            let reason = response
                .block_reason()
                .or(response.finish_reason())
                .unwrap_or("no text parts");
            GenAiError::Core(CoreError::Content(format!(
                "invalid AI response: {reason}"
            )))
        })
    }

    async fn generate_image(&self, parts: Vec<Part>) -> Result<ImageResponse, GenAiError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(parts)],
            generation_config: Some(GenerationConfig::image_output()),
        };

        tracing::debug!(model = %self.image_model, "Requesting image");
        let response = self
            .api
            .generate_content(&self.image_model, &request)
            .await?;

        Ok(ImageResponse {
            image: response.first_inline_image().cloned().map(DataUrl::from),
            text: response.text(),
        })
    }
}
