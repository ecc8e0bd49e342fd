//! Concurrent panorama generation.
//!
//! Every round issues [`IMAGE_VARIANT_COUNT`] identical requests at once
//! and joins them all-or-nothing: the first failure fails the round and
//! the remaining requests are dropped. Results keep submission order.

use futures::future::try_join_all;
use loci_core::prompts::{
    render_template, with_panorama_style, ANCHOR_EDIT_TEMPLATE, PALACE_EDIT_TEMPLATE,
};
use loci_core::{Anchor, CoreError, DataUrl, ImageSet, IMAGE_VARIANT_COUNT};
use loci_genai::{GenerativeModel, Part};

use crate::error::PipelineError;

/// Build the request parts for one panorama variant.
///
/// A photo anchor is edited into a panorama; a description anchor is
/// synthesized from the prompt plus the fixed style suffix.
pub fn panorama_parts(anchor: &Anchor, image_prompt: &str) -> Result<Vec<Part>, PipelineError> {
    let parts = match anchor {
        Anchor::Description(_) => vec![Part::text(with_panorama_style(image_prompt))],
        Anchor::Image(image) => vec![
            Part::anchor_image(image),
            Part::text(render_template(
                ANCHOR_EDIT_TEMPLATE,
                &[("prompt", image_prompt)],
            )?),
        ],
    };
    Ok(parts)
}

/// Build the request parts for editing an existing panorama.
pub fn edit_parts(base_image: &DataUrl, instruction: &str) -> Result<Vec<Part>, PipelineError> {
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(CoreError::Validation("Edit instruction must not be empty".to_string()).into());
    }
    if !base_image.is_image() {
        return Err(CoreError::Format(format!(
            "Base image must be an image data URL, got '{}'",
            base_image.mime_type
        ))
        .into());
    }
    Ok(vec![
        Part::inline(base_image.clone()),
        Part::text(render_template(
            PALACE_EDIT_TEMPLATE,
            &[("instruction", instruction)],
        )?),
    ])
}

/// Generate one round of panoramas for a palace.
pub async fn generate_images(
    model: &dyn GenerativeModel,
    anchor: &Anchor,
    image_prompt: &str,
) -> Result<ImageSet, PipelineError> {
    let parts = panorama_parts(anchor, image_prompt)?;
    tracing::info!(anchor = %anchor.kind(), "Generating panoramas");
    run_round(model, parts).await
}

/// Edit an existing panorama into a new round of variants.
pub async fn edit_images(
    model: &dyn GenerativeModel,
    base_image: &DataUrl,
    instruction: &str,
) -> Result<ImageSet, PipelineError> {
    let parts = edit_parts(base_image, instruction)?;
    tracing::info!("Editing panorama");
    run_round(model, parts).await
}

async fn run_round(
    model: &dyn GenerativeModel,
    parts: Vec<Part>,
) -> Result<ImageSet, PipelineError> {
    let requests = (0..IMAGE_VARIANT_COUNT).map(|index| request_image(model, index, parts.clone()));
    let images = try_join_all(requests).await?;
    Ok(ImageSet::new(images))
}

/// Issue a single image request and insist on an inline image in the reply.
async fn request_image(
    model: &dyn GenerativeModel,
    index: usize,
    parts: Vec<Part>,
) -> Result<DataUrl, PipelineError> {
    let response = model.generate_image(parts).await.map_err(|e| {
        tracing::error!(index, error = %e, "Image request failed");
        e
    })?;

    match response.image {
        Some(image) => {
            tracing::debug!(index, mime_type = %image.mime_type, "Image received");
            Ok(image)
        }
        None => {
            tracing::warn!(
                index,
                text = response.text.as_deref().unwrap_or("<none>"),
                "Image response contained no image data",
            );
            Err(CoreError::Content("AI response contained no image data".to_string()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use loci_core::AnchorImage;

    use super::*;

    #[test]
    fn description_anchor_gets_style_suffix() {
        let anchor = Anchor::description("a lighthouse").unwrap();
        let parts = panorama_parts(&anchor, "a lighthouse with a giant apple").unwrap();

        assert_eq!(parts.len(), 1);
        let prompt = parts[0].text.as_deref().unwrap();
        assert!(prompt.starts_with("a lighthouse with a giant apple"));
        assert!(prompt.contains("equirectangular"));
    }

    #[test]
    fn photo_anchor_is_edited() {
        let anchor = Anchor::Image(AnchorImage {
            mime_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        });
        let parts = panorama_parts(&anchor, "add a dragon").unwrap();

        assert_eq!(parts.len(), 2);
        assert!(parts[0].inline_data.is_some());
        assert!(parts[1].text.as_deref().unwrap().ends_with("add a dragon"));
    }

    #[test]
    fn blank_instruction_rejected() {
        let base = DataUrl::new("image/png", "AAAA");
        assert_matches!(
            edit_parts(&base, "  "),
            Err(PipelineError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn non_image_base_rejected() {
        let base = DataUrl::new("text/plain", "AAAA");
        assert_matches!(
            edit_parts(&base, "make it night"),
            Err(PipelineError::Core(CoreError::Format(_)))
        );
    }
}
