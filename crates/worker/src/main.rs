//! `loci-palace` -- build a memory palace from the command line.
//!
//! Reads an item list and an anchor (a description or a photo), asks the
//! generative-AI service for the palace text and four panoramas, and writes
//! the result to disk. With `PALACE_EDIT` set, one regeneration round edits
//! the first panorama and re-derives the text from it.
//!
//! # Environment variables
//!
//! | Variable                      | Required | Default    | Description                              |
//! |-------------------------------|----------|------------|------------------------------------------|
//! | `GEMINI_API_KEY` / `API_KEY`  | yes      | --         | Generative-AI service key                |
//! | `GEMINI_API_URL`              | no       | Google API | Service base URL                         |
//! | `GEMINI_TEXT_MODEL`           | no       | `gemini-2.5-flash` | Model for structured text        |
//! | `GEMINI_IMAGE_MODEL`          | no       | `gemini-2.5-flash-image-preview` | Model for panoramas |
//! | `GEMINI_REQUEST_TIMEOUT_SECS` | no       | unset      | Per-request timeout                      |
//! | `PALACE_ITEMS`                | yes      | --         | File with one item per line              |
//! | `PALACE_ANCHOR`               | one of   | --         | Free-text anchor location                |
//! | `PALACE_ANCHOR_IMAGE`         | one of   | --         | Path to an anchor photo                  |
//! | `PALACE_OUTPUT_DIR`           | no       | `./palace` | Where `palace.json` and images go        |
//! | `PALACE_EDIT`                 | no       | --         | Edit instruction for a regeneration round |

mod output;
mod settings;

use std::sync::Arc;

use anyhow::Context;
use loci_genai::{GeminiClient, GenAiConfig};
use loci_pipeline::PalaceGenerator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use settings::{read_items, RunSettings};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loci_palace=info,loci_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let genai_config = GenAiConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid generative-AI configuration");
        std::process::exit(1);
    });
    let settings = RunSettings::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid run configuration");
        std::process::exit(1);
    });

    if let Err(e) = run(&genai_config, &settings).await {
        tracing::error!(error = %format!("{e:#}"), "Palace generation failed");
        std::process::exit(1);
    }
}

async fn run(genai_config: &GenAiConfig, settings: &RunSettings) -> anyhow::Result<()> {
    let items = read_items(&settings.items_path).with_context(|| {
        format!("reading items from {}", settings.items_path.display())
    })?;
    let anchor = settings.anchor.load().context("loading anchor")?;

    tracing::info!(
        items = items.len(),
        anchor = %anchor.kind(),
        text_model = %genai_config.text_model,
        image_model = %genai_config.image_model,
        "Starting palace generation",
    );

    let client = GeminiClient::from_config(genai_config).context("building AI client")?;
    let generator = PalaceGenerator::new(Arc::new(client));

    let mut palace = generator
        .generate_memory_palace(&anchor, &items)
        .await
        .context("generating palace")?;
    tracing::info!(title = %palace.title, scenes = palace.scenes.len(), "Palace generated");

    if let Some(instruction) = settings.edit.as_deref() {
        let base = palace
            .latest_images()
            .and_then(|set| set.first())
            .cloned()
            .context("generated palace has no image to edit")?;
        let regeneration = generator
            .regenerate_palace(&base, instruction, &items)
            .await
            .context("regenerating palace")?;
        palace.apply_regeneration(regeneration);
        tracing::info!(
            title = %palace.title,
            rounds = palace.image_generations.len(),
            "Palace regenerated",
        );
    }

    let written = output::write_palace(&settings.output_dir, &palace)
        .with_context(|| format!("writing palace to {}", settings.output_dir.display()))?;
    tracing::info!(images = written.len(), "Done");
    Ok(())
}
