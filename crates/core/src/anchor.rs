//! The anchor a memory palace is built around.
//!
//! An anchor is either a free-text description of a place or a photo the
//! user uploaded. Downstream code matches on [`Anchor`] exhaustively.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data_url::DataUrl;
use crate::error::CoreError;

/// Maximum size of an uploaded anchor photo in bytes.
pub const MAX_ANCHOR_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// A photo supplied as the palace anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AnchorImage {
    /// Wrap raw image bytes, sniffing the MIME type from the content.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CoreError> {
        if bytes.is_empty() {
            return Err(CoreError::Validation(
                "Anchor image must not be empty".to_string(),
            ));
        }
        if bytes.len() > MAX_ANCHOR_IMAGE_BYTES {
            return Err(CoreError::Validation(format!(
                "Anchor image exceeds maximum size of {MAX_ANCHOR_IMAGE_BYTES} bytes (got {})",
                bytes.len()
            )));
        }
        let format = image::guess_format(&bytes).map_err(|e| {
            CoreError::Validation(format!("Anchor file is not a recognised image: {e}"))
        })?;
        Ok(Self {
            mime_type: format.to_mime_type().to_string(),
            bytes,
        })
    }

    /// Read an uploaded photo from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    /// Decode an image that already travels as a data URL.
    pub fn from_data_url(url: &DataUrl) -> Result<Self, CoreError> {
        if !url.is_image() {
            return Err(CoreError::Format(format!(
                "Expected an image data URL, got '{}'",
                url.mime_type
            )));
        }
        Ok(Self {
            mime_type: url.mime_type.clone(),
            bytes: url.decode()?,
        })
    }

    /// Re-encode the photo as a base64 data URL.
    pub fn to_data_url(&self) -> DataUrl {
        DataUrl::from_bytes(self.mime_type.clone(), &self.bytes)
    }
}

/// The setting of a memory palace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// A free-text description of a place.
    Description(String),
    /// An uploaded photo of a place.
    Image(AnchorImage),
}

impl Anchor {
    /// Build a description anchor, rejecting blank text.
    pub fn description(text: impl Into<String>) -> Result<Self, CoreError> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation(
                "Anchor description must not be empty".to_string(),
            ));
        }
        Ok(Self::Description(trimmed.to_string()))
    }

    /// Which kind of anchor this is, for logging.
    pub fn kind(&self) -> AnchorKind {
        match self {
            Anchor::Description(_) => AnchorKind::Description,
            Anchor::Image(_) => AnchorKind::Image,
        }
    }
}

/// Discriminant of [`Anchor`] without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorKind {
    Description,
    Image,
}

impl std::fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnchorKind::Description => f.write_str("description"),
            AnchorKind::Image => f.write_str("image"),
        }
    }
}
