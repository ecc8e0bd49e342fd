//! Memory palace generation workflows.
//!
//! - [`text`]: schema-constrained palace text generation.
//! - [`images`]: the four-way concurrent panorama round.
//! - [`palace`]: [`PalaceGenerator`], the generate and regenerate
//!   orchestration on top of both.

pub mod error;
pub mod images;
pub mod palace;
pub mod text;

pub use error::PipelineError;
pub use palace::PalaceGenerator;
