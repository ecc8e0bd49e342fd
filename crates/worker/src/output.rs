//! Writing a finished palace to disk.
//!
//! Layout:
//!
//! ```text
//! <output_dir>/palace.json
//! <output_dir>/images/round-<n>-variant-<m>.<ext>
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use loci_core::{DataUrl, MemoryPalace};

pub const PALACE_FILE: &str = "palace.json";
pub const IMAGES_DIR: &str = "images";

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "bin",
    }
}

fn image_file_name(round: usize, variant: usize, image: &DataUrl) -> String {
    format!(
        "round-{}-variant-{}.{}",
        round + 1,
        variant + 1,
        extension_for(&image.mime_type)
    )
}

/// Write the palace JSON and every generated image. Returns the image
/// paths in history order.
pub fn write_palace(dir: &Path, palace: &MemoryPalace) -> anyhow::Result<Vec<PathBuf>> {
    let images_dir = dir.join(IMAGES_DIR);
    std::fs::create_dir_all(&images_dir)
        .with_context(|| format!("creating {}", images_dir.display()))?;

    let json = serde_json::to_string_pretty(palace).context("serializing palace")?;
    let palace_path = dir.join(PALACE_FILE);
    std::fs::write(&palace_path, json)
        .with_context(|| format!("writing {}", palace_path.display()))?;

    let mut written = Vec::new();
    for (round, set) in palace.image_generations.iter().enumerate() {
        for (variant, image) in set.iter().enumerate() {
            let path = images_dir.join(image_file_name(round, variant, image));
            let bytes = image
                .decode()
                .with_context(|| format!("decoding image for {}", path.display()))?;
            std::fs::write(&path, bytes)
                .with_context(|| format!("writing {}", path.display()))?;
            written.push(path);
        }
    }

    tracing::info!(
        dir = %dir.display(),
        images = written.len(),
        "Palace written",
    );
    Ok(written)
}
