//! Headless model of the 360° panorama viewer.
//!
//! The viewer owns camera state, an inverted sphere mesh, a decoded texture
//! and a frame loop. Drawing is delegated to a [`Renderer`] backend, and
//! input arrives through [`EventTarget`]s standing in for the window and
//! canvas.

pub mod camera;
pub mod events;
pub mod geometry;
pub mod render;
pub mod scene;
pub mod texture;
pub mod viewer;

pub use camera::OrbitCamera;
pub use events::{EventKind, EventTarget, InputEvent, Key, ListenerId};
pub use geometry::SphereGeometry;
pub use render::{Frame, RenderTask, Renderer, DEFAULT_FRAME_INTERVAL};
pub use scene::ViewerState;
pub use texture::{decode_texture, Texture};
pub use viewer::{PanoramaViewer, ViewerConfig, ViewerSurfaces};
