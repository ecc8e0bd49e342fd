//! Domain types and pure helpers for memory palace generation.
//!
//! - [`palace`]: palace, scene, recap and image-set value types.
//! - [`anchor`]: the description-or-photo anchor sum type.
//! - [`data_url`]: `data:` URL codec used for every image exchange.
//! - [`prompts`] and [`schema`]: static prompt templates and the response
//!   schema sent to the AI service.
//! - [`mnemonic`]: bold-marker helpers.

pub mod anchor;
pub mod data_url;
pub mod error;
pub mod mnemonic;
pub mod palace;
pub mod prompts;
pub mod schema;

pub use anchor::{Anchor, AnchorImage, AnchorKind};
pub use data_url::DataUrl;
pub use error::CoreError;
pub use palace::{
    ImageSet, MemoryPalace, PalaceRegeneration, PalaceText, QuickRecapItem, Scene,
    IMAGE_VARIANT_COUNT,
};
