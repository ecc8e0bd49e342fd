//! JSON schema constraining the palace text response.
//!
//! Expressed in the OpenAPI subset the generative-AI service accepts for
//! `generationConfig.responseSchema`. Every field is required.

use serde_json::{json, Value};

/// Schema for [`PalaceText`](crate::palace::PalaceText).
pub fn palace_text_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A short, evocative title for the memory palace."
            },
            "imagePrompt": {
                "type": "STRING",
                "description": "A detailed prompt for a 360-degree panorama of the whole palace."
            },
            "scenes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "locus": {
                            "type": "STRING",
                            "description": "A specific named location within the anchor."
                        },
                        "description": {
                            "type": "STRING",
                            "description": "The mnemonic scene, with the item wrapped in **double asterisks**."
                        }
                    },
                    "required": ["locus", "description"]
                }
            },
            "quickRecap": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": {
                            "type": "STRING",
                            "description": "The memorized item wrapped in **double asterisks**."
                        },
                        "locusHint": {
                            "type": "STRING",
                            "description": "A short hint naming where the item lives."
                        }
                    },
                    "required": ["item", "locusHint"]
                }
            }
        },
        "required": ["title", "imagePrompt", "scenes", "quickRecap"]
    })
}
