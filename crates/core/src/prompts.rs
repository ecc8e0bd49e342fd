//! Static prompt templates and placeholder rendering.
//!
//! Templates use `{name}` placeholders. [`render_template`] substitutes
//! every placeholder and refuses to leave any unresolved.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Regex pattern matching `{placeholder}` tokens in prompt templates.
pub const PLACEHOLDER_PATTERN: &str = r"\{([a-z_]+)\}";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Prompt for the schema-constrained text call of a fresh palace.
pub const PALACE_TEXT_TEMPLATE: &str = "\
You are a memory champion who builds vivid memory palaces using the method of loci.

Anchor location: {anchor}

Items to memorize, in order:
{items}

Design a walking route through the anchor location with one distinct locus per item, \
in the same order as the list. For every locus write a short, absurd, multi-sensory \
scene that ties the item to that spot. Wrap the memorized item in **double asterisks** \
inside each scene description. Then write a quick recap pairing each bolded item with \
a short hint about its locus.

Also write a single detailed image prompt describing the whole anchor location as one \
continuous 360-degree equirectangular panorama in which every scene is visible at its \
locus. Give the palace a short evocative title.";

/// Prompt for re-deriving palace text from an edited reference image.
pub const REGENERATION_TEXT_TEMPLATE: &str = "\
You are a memory champion who builds vivid memory palaces using the method of loci.

The attached image is a 360-degree panorama of a memory palace that was just edited. \
Study what is visible in it now.

Items to memorize, in order:
{items}

Rewrite the palace so that it matches the image exactly: choose one locus per item \
from places that are actually visible, in list order, and describe an absurd, \
multi-sensory scene at each one. Wrap the memorized item in **double asterisks** \
inside each scene description. Write a quick recap pairing each bolded item with a \
short hint about its locus, a new short title, and an image prompt that describes \
the panorama as it now appears.";

/// Anchor text used in [`PALACE_TEXT_TEMPLATE`] when the anchor is a photo.
pub const PHOTO_ANCHOR_TEXT: &str = "the place shown in the attached photo";

/// Style suffix appended to prompts that synthesize a panorama from text.
pub const PANORAMA_STYLE_SUFFIX: &str = "\
Render as a seamless 360-degree equirectangular panorama with a 2:1 aspect ratio, \
photorealistic, richly detailed, cinematic lighting, no text or watermarks.";

/// Prompt for turning an uploaded anchor photo into the palace panorama.
pub const ANCHOR_EDIT_TEMPLATE: &str = "\
Transform this photo into a seamless 360-degree equirectangular panorama of the same \
place with a 2:1 aspect ratio, keeping its recognisable layout and features, and add \
the following to it: {prompt}";

/// Prompt for editing an existing palace panorama.
pub const PALACE_EDIT_TEMPLATE: &str = "\
Edit this 360-degree equirectangular panorama according to the following instruction \
while keeping it a seamless 2:1 panorama of the same place: {instruction}";

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Substitute every `{name}` placeholder in `template`.
///
/// Returns a validation error naming the first placeholder that has no
/// value in `values`.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> Result<String, CoreError> {
    let lookup: HashMap<&str, &str> = values.iter().copied().collect();

    if let Some(missing) = PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|name| !lookup.contains_key(name))
    {
        return Err(CoreError::Validation(format!(
            "No value supplied for prompt placeholder '{{{missing}}}'"
        )));
    }

    Ok(PLACEHOLDER_RE
        .replace_all(template, |caps: &regex::Captures<'_>| {
            lookup.get(&caps[1]).copied().unwrap_or_default().to_string()
        })
        .into_owned())
}

/// Render items as a 1-based numbered list, one per line.
pub fn numbered_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Append the panorama style suffix to a free-text image prompt.
pub fn with_panorama_style(prompt: &str) -> String {
    format!("{}\n\n{PANORAMA_STYLE_SUFFIX}", prompt.trim_end())
}
