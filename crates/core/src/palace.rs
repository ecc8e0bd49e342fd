//! Memory palace value types.
//!
//! Everything here is produced wholesale by a single AI call and then
//! treated as immutable, except for [`MemoryPalace::apply_regeneration`]
//! which merges a regeneration round into an existing palace.

use serde::{Deserialize, Serialize};

use crate::data_url::DataUrl;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of image variants produced per generation round.
pub const IMAGE_VARIANT_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Text content
// ---------------------------------------------------------------------------

/// One locus on the route and the mnemonic scene placed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// A named location within the anchor.
    pub locus: String,
    /// Mnemonic text; the memorized phrase is wrapped in `**`.
    pub description: String,
}

/// One line of the quick recap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickRecapItem {
    /// The memorized phrase, bold-marked.
    pub item: String,
    pub locus_hint: String,
}

/// Text content of a palace as returned by the schema-constrained call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalaceText {
    pub title: String,
    pub image_prompt: String,
    pub scenes: Vec<Scene>,
    pub quick_recap: Vec<QuickRecapItem>,
}

/// Whether the AI response covered every item it was asked to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub expected: usize,
    pub scenes: usize,
    pub recap: usize,
}

impl Coverage {
    /// True when scenes, recap and the input list all agree in length.
    pub fn is_complete(&self) -> bool {
        self.scenes == self.expected && self.recap == self.expected
    }
}

impl PalaceText {
    /// Parse the JSON text returned by the AI service.
    ///
    /// Any parse or shape failure is a content error; nothing is retried.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw.trim())
            .map_err(|e| CoreError::Content(format!("invalid AI response: {e}")))
    }

    /// Compare scene and recap counts against the number of input items.
    ///
    /// The AI is asked for one scene per item but nothing forces it to
    /// comply, so this reports rather than rejects.
    pub fn check_coverage(&self, expected: usize) -> Coverage {
        Coverage {
            expected,
            scenes: self.scenes.len(),
            recap: self.quick_recap.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// The images produced by one generation or regeneration round, in
/// submission order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSet(Vec<DataUrl>);

impl ImageSet {
    pub fn new(images: Vec<DataUrl>) -> Self {
        Self(images)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The canonical reference image of the round.
    pub fn first(&self) -> Option<&DataUrl> {
        self.0.first()
    }

    pub fn get(&self, index: usize) -> Option<&DataUrl> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataUrl> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<DataUrl> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ImageSet {
    type Item = &'a DataUrl;
    type IntoIter = std::slice::Iter<'a, DataUrl>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Palace
// ---------------------------------------------------------------------------

/// A complete illustrated memory palace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPalace {
    pub title: String,
    pub image_prompt: String,
    pub scenes: Vec<Scene>,
    pub quick_recap: Vec<QuickRecapItem>,
    /// One image set per generation round, oldest first.
    pub image_generations: Vec<ImageSet>,
}

/// Partial result of a regeneration round: fresh text plus fresh images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalaceRegeneration {
    #[serde(flatten)]
    pub text: PalaceText,
    pub images: ImageSet,
}

impl MemoryPalace {
    /// Assemble a palace from its first generation round.
    pub fn new(text: PalaceText, images: ImageSet) -> Self {
        Self {
            title: text.title,
            image_prompt: text.image_prompt,
            scenes: text.scenes,
            quick_recap: text.quick_recap,
            image_generations: vec![images],
        }
    }

    /// The most recent image set, if any.
    pub fn latest_images(&self) -> Option<&ImageSet> {
        self.image_generations.last()
    }

    /// Merge a regeneration round: text fields are replaced, the image set
    /// is appended to the history.
    pub fn apply_regeneration(&mut self, regeneration: PalaceRegeneration) {
        let PalaceRegeneration { text, images } = regeneration;
        self.title = text.title;
        self.image_prompt = text.image_prompt;
        self.scenes = text.scenes;
        self.quick_recap = text.quick_recap;
        self.image_generations.push(images);
    }
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// Trim the items to memorize and drop blank entries. At least one item
/// must remain.
pub fn normalize_items<S: AsRef<str>>(items: &[S]) -> Result<Vec<String>, CoreError> {
    let items: Vec<String> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        return Err(CoreError::Validation(
            "At least one item to memorize is required".to_string(),
        ));
    }
    Ok(items)
}
