//! Helpers for the `**bold**` markers the AI places around memorized items.

use std::sync::LazyLock;

use regex::Regex;

use crate::palace::PalaceText;

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));

/// Extract every bold-marked phrase, in order of appearance.
pub fn highlighted_phrases(text: &str) -> Vec<&str> {
    BOLD_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .collect()
}

/// Remove the bold markers, keeping the phrase itself.
pub fn strip_markers(text: &str) -> String {
    BOLD_RE.replace_all(text, "$1").into_owned()
}

/// Indices of scenes whose description carries no bold-marked phrase.
pub fn scenes_missing_highlight(text: &PalaceText) -> Vec<usize> {
    text.scenes
        .iter()
        .enumerate()
        .filter(|(_, scene)| !BOLD_RE.is_match(&scene.description))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palace::{QuickRecapItem, Scene};

    #[test]
    fn extracts_phrases_in_order() {
        let text = "A **red apple** rolls into the **milk** jug";
        assert_eq!(highlighted_phrases(text), vec!["red apple", "milk"]);
    }

    #[test]
    fn unmatched_markers_ignored() {
        assert!(highlighted_phrases("a ** lonely marker").is_empty());
    }

    #[test]
    fn strips_markers() {
        assert_eq!(strip_markers("**eggs** on the stove"), "eggs on the stove");
    }

    #[test]
    fn finds_scenes_without_highlight() {
        let text = PalaceText {
            title: "t".into(),
            image_prompt: "p".into(),
            scenes: vec![
                Scene {
                    locus: "Door".into(),
                    description: "A **key** turns".into(),
                },
                Scene {
                    locus: "Sink".into(),
                    description: "Nothing bold here".into(),
                },
            ],
            quick_recap: vec![QuickRecapItem {
                item: "**key**".into(),
                locus_hint: "Door".into(),
            }],
        };
        assert_eq!(scenes_missing_highlight(&text), vec![1]);
    }
}
