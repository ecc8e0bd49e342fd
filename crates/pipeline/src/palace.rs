//! Top-level generate and regenerate workflows.
//!
//! [`PalaceGenerator`] owns an injected [`GenerativeModel`] handle. Nothing
//! here holds global state, so a test double can stand in for the service.

use std::sync::Arc;

use loci_core::palace::normalize_items;
use loci_core::{Anchor, CoreError, DataUrl, MemoryPalace, PalaceRegeneration};
use loci_genai::GenerativeModel;

use crate::error::PipelineError;
use crate::images::{edit_images, generate_images};
use crate::text::{generate_text_content, regenerate_text_content};

/// Entry point for building and editing memory palaces.
#[derive(Clone)]
pub struct PalaceGenerator {
    model: Arc<dyn GenerativeModel>,
}

impl PalaceGenerator {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Build a palace from scratch.
    ///
    /// Text generation runs first because the image prompt comes out of it;
    /// the four panoramas then run concurrently. The result carries a
    /// single-entry image history.
    pub async fn generate_memory_palace<S: AsRef<str>>(
        &self,
        anchor: &Anchor,
        items: &[S],
    ) -> Result<MemoryPalace, PipelineError> {
        let items = normalize_items(items)?;
        tracing::info!(anchor = %anchor.kind(), items = items.len(), "Generating memory palace");

        let text = generate_text_content(self.model.as_ref(), anchor, &items).await?;
        let images = generate_images(self.model.as_ref(), anchor, &text.image_prompt).await?;

        tracing::info!(title = %text.title, images = images.len(), "Memory palace generated");
        Ok(MemoryPalace::new(text, images))
    }

    /// Edit a previous panorama and re-derive the palace text from it.
    ///
    /// The first edited image is the canonical reference for the new text.
    /// Returns only the new fields; merge them with
    /// [`MemoryPalace::apply_regeneration`].
    pub async fn regenerate_palace<S: AsRef<str>>(
        &self,
        base_image: &DataUrl,
        instruction: &str,
        items: &[S],
    ) -> Result<PalaceRegeneration, PipelineError> {
        let items = normalize_items(items)?;
        tracing::info!(items = items.len(), "Regenerating memory palace");

        let images = edit_images(self.model.as_ref(), base_image, instruction).await?;
        let reference = images.first().cloned().ok_or_else(|| {
            CoreError::Content("Regeneration produced no reference image".to_string())
        })?;

        let text = regenerate_text_content(self.model.as_ref(), &reference, &items).await?;

        tracing::info!(title = %text.title, images = images.len(), "Memory palace regenerated");
        Ok(PalaceRegeneration { text, images })
    }
}
