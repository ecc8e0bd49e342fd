//! Schema-constrained text generation.
//!
//! One call per palace: the anchor (text or photo) and the item list go in,
//! a [`PalaceText`] comes out. Unparseable responses are content errors and
//! are never retried.

use loci_core::mnemonic::scenes_missing_highlight;
use loci_core::prompts::{
    numbered_list, render_template, PALACE_TEXT_TEMPLATE, PHOTO_ANCHOR_TEXT,
    REGENERATION_TEXT_TEMPLATE,
};
use loci_core::schema::palace_text_schema;
use loci_core::{Anchor, DataUrl, PalaceText};
use loci_genai::{GenerativeModel, Part};

use crate::error::PipelineError;

/// Build the request parts for a fresh palace.
///
/// A photo anchor is sent as inline data ahead of the prompt.
pub fn palace_text_parts(anchor: &Anchor, items: &[String]) -> Result<Vec<Part>, PipelineError> {
    let list = numbered_list(items);
    let parts = match anchor {
        Anchor::Description(description) => vec![Part::text(render_template(
            PALACE_TEXT_TEMPLATE,
            &[("anchor", description.as_str()), ("items", list.as_str())],
        )?)],
        Anchor::Image(image) => vec![
            Part::anchor_image(image),
            Part::text(render_template(
                PALACE_TEXT_TEMPLATE,
                &[("anchor", PHOTO_ANCHOR_TEXT), ("items", list.as_str())],
            )?),
        ],
    };
    Ok(parts)
}

/// Build the request parts that re-derive palace text from a reference
/// image.
pub fn regeneration_text_parts(
    reference: &DataUrl,
    items: &[String],
) -> Result<Vec<Part>, PipelineError> {
    let list = numbered_list(items);
    Ok(vec![
        Part::inline(reference.clone()),
        Part::text(render_template(
            REGENERATION_TEXT_TEMPLATE,
            &[("items", list.as_str())],
        )?),
    ])
}

/// Generate palace text for an anchor and item list.
pub async fn generate_text_content(
    model: &dyn GenerativeModel,
    anchor: &Anchor,
    items: &[String],
) -> Result<PalaceText, PipelineError> {
    let parts = palace_text_parts(anchor, items)?;
    request_palace_text(model, parts, items.len()).await
}

/// Re-derive palace text from a single reference image.
pub async fn regenerate_text_content(
    model: &dyn GenerativeModel,
    reference: &DataUrl,
    items: &[String],
) -> Result<PalaceText, PipelineError> {
    let parts = regeneration_text_parts(reference, items)?;
    request_palace_text(model, parts, items.len()).await
}

async fn request_palace_text(
    model: &dyn GenerativeModel,
    parts: Vec<Part>,
    expected_items: usize,
) -> Result<PalaceText, PipelineError> {
    let raw = model.generate_json(parts, palace_text_schema()).await?;
    let text = PalaceText::from_json(&raw)?;

    let coverage = text.check_coverage(expected_items);
    if !coverage.is_complete() {
        tracing::warn!(
            expected = coverage.expected,
            scenes = coverage.scenes,
            recap = coverage.recap,
            "AI response does not cover every item",
        );
    }
    let unmarked = scenes_missing_highlight(&text);
    if !unmarked.is_empty() {
        tracing::warn!(scenes = ?unmarked, "Scene descriptions without a bold-marked item");
    }

    tracing::info!(title = %text.title, scenes = text.scenes.len(), "Palace text generated");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use loci_core::AnchorImage;

    use super::*;

    fn items() -> Vec<String> {
        vec!["milk".to_string(), "eggs".to_string()]
    }

    #[test]
    fn description_anchor_is_a_single_text_part() {
        let anchor = Anchor::description("grandma's house").unwrap();
        let parts = palace_text_parts(&anchor, &items()).unwrap();

        assert_eq!(parts.len(), 1);
        let prompt = parts[0].text.as_deref().unwrap();
        assert!(prompt.contains("grandma's house"));
        assert!(prompt.contains("1. milk\n2. eggs"));
    }

    #[test]
    fn photo_anchor_is_sent_inline_before_prompt() {
        let image = AnchorImage {
            mime_type: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8, 0xff],
        };
        let parts = palace_text_parts(&Anchor::Image(image), &items()).unwrap();

        assert_eq!(parts.len(), 2);
        let inline = parts[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/jpeg");
        assert_eq!(inline.data, "/9j/");
        assert!(parts[1].text.as_deref().unwrap().contains(PHOTO_ANCHOR_TEXT));
    }

    #[test]
    fn regeneration_sends_reference_image() {
        let reference = DataUrl::new("image/png", "AAAA");
        let parts = regeneration_text_parts(&reference, &items()).unwrap();

        assert_eq!(parts[0].inline_data.as_ref().unwrap().data, "AAAA");
        assert!(parts[1].text.as_deref().unwrap().contains("2. eggs"));
    }
}
