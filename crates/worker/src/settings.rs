//! Run settings read from the environment.

use std::path::{Path, PathBuf};

use loci_core::{Anchor, AnchorImage, CoreError};

pub const DEFAULT_OUTPUT_DIR: &str = "./palace";

/// Where the anchor comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorSource {
    Description(String),
    ImageFile(PathBuf),
}

impl AnchorSource {
    /// Load the anchor, reading and sniffing the photo if there is one.
    pub fn load(&self) -> Result<Anchor, CoreError> {
        match self {
            AnchorSource::Description(text) => Anchor::description(text.as_str()),
            AnchorSource::ImageFile(path) => Ok(Anchor::Image(AnchorImage::from_file(path)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub items_path: PathBuf,
    pub anchor: AnchorSource,
    pub output_dir: PathBuf,
    /// Edit instruction for one regeneration round after generation.
    pub edit: Option<String>,
}

impl RunSettings {
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let items_path = non_empty("PALACE_ITEMS").map(PathBuf::from).ok_or_else(|| {
            CoreError::Config("PALACE_ITEMS environment variable is required".to_string())
        })?;

        let anchor = match (non_empty("PALACE_ANCHOR"), non_empty("PALACE_ANCHOR_IMAGE")) {
            (Some(_), Some(_)) => {
                return Err(CoreError::Config(
                    "Set only one of PALACE_ANCHOR and PALACE_ANCHOR_IMAGE".to_string(),
                ))
            }
            (Some(text), None) => AnchorSource::Description(text),
            (None, Some(path)) => AnchorSource::ImageFile(PathBuf::from(path)),
            (None, None) => {
                return Err(CoreError::Config(
                    "PALACE_ANCHOR or PALACE_ANCHOR_IMAGE environment variable is required"
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            items_path,
            anchor,
            output_dir: PathBuf::from(
                non_empty("PALACE_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            edit: non_empty("PALACE_EDIT").map(|v| v.trim().to_string()),
        })
    }
}

/// Read the item list: one item per line, blank lines skipped.
pub fn read_items(path: &Path) -> Result<Vec<String>, CoreError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
