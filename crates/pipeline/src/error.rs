use loci_core::CoreError;
use loci_genai::GenAiError;

/// Errors from the generation and regeneration workflows.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A domain error: invalid input, malformed data URL, or unusable AI
    /// content.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The generative model call itself failed.
    #[error(transparent)]
    Model(#[from] GenAiError),
}

impl PipelineError {
    /// Whether the failure is a content error (bad JSON, missing image),
    /// regardless of which layer detected it.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Core(CoreError::Content(_))
                | PipelineError::Model(GenAiError::Core(CoreError::Content(_)))
        )
    }
}
