//! `data:` URL encoding and decoding.
//!
//! Images travel between the AI service, the pipeline and the viewer as
//! `data:<mimeType>;base64,<payload>` strings. [`DataUrl`] is the parsed
//! form: the MIME type plus the still-encoded base64 payload.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Scheme prefix every data URL starts with.
const DATA_SCHEME: &str = "data:";

/// Marker separating the MIME type from the encoding in the header.
const BASE64_MARKER: &str = ";base64";

/// A parsed base64 `data:` URL.
///
/// Serializes as the full URL string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUrl {
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Base64-encoded payload (standard alphabet, padded).
    pub data: String,
}

impl DataUrl {
    /// Build a data URL from an already-encoded base64 payload.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Encode raw bytes into a data URL.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` string.
    ///
    /// Rejects input without the `data:` scheme, without a comma
    /// separator, without a `;base64` MIME header, or with an empty
    /// MIME type or payload.
    pub fn parse(url: &str) -> Result<Self, CoreError> {
        let rest = url
            .strip_prefix(DATA_SCHEME)
            .ok_or_else(|| CoreError::Format("data URL must start with 'data:'".to_string()))?;

        let (header, payload) = rest.split_once(',').ok_or_else(|| {
            CoreError::Format("data URL is missing the ',' payload separator".to_string())
        })?;

        let mime_type = header.strip_suffix(BASE64_MARKER).ok_or_else(|| {
            CoreError::Format(format!("data URL header '{header}' is not base64-encoded"))
        })?;

        if mime_type.is_empty() {
            return Err(CoreError::Format(
                "data URL is missing a MIME type".to_string(),
            ));
        }
        if payload.is_empty() {
            return Err(CoreError::Format(
                "data URL is missing its payload".to_string(),
            ));
        }

        Ok(Self::new(mime_type, payload))
    }

    /// Decode the base64 payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, CoreError> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| CoreError::Format(format!("data URL payload is not valid base64: {e}")))
    }

    /// Whether the MIME type denotes an image.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{DATA_SCHEME}{}{BASE64_MARKER},{}", self.mime_type, self.data)
    }
}

impl FromStr for DataUrl {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DataUrl {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DataUrl> for String {
    fn from(url: DataUrl) -> Self {
        url.to_string()
    }
}

/// Split a data URL into its `(mime_type, base64_payload)` pair.
pub fn data_url_to_base64(url: &str) -> Result<(String, String), CoreError> {
    let parsed = DataUrl::parse(url)?;
    Ok((parsed.mime_type, parsed.data))
}
