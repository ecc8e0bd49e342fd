//! Generative-AI service client library.
//!
//! Provides typed `generateContent` wire messages, a REST wrapper,
//! environment-driven configuration, and the [`GenerativeModel`] trait the
//! pipeline depends on so that tests can substitute a double.

pub mod api;
pub mod client;
pub mod config;
pub mod messages;

pub use api::{GeminiApi, GenAiApiError};
pub use client::{GeminiClient, GenAiError, GenerativeModel, ImageResponse};
pub use config::GenAiConfig;
pub use messages::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};
