//! State shared between the viewer's listeners, texture loader and render
//! task.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::camera::{OrbitCamera, DRAG_SENSITIVITY_DEG_PER_PX, KEY_ROTATION_STEP_DEG};
use crate::events::{InputEvent, Key};
use crate::geometry::SphereGeometry;
use crate::texture::Texture;

/// Lifecycle state of a mounted viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    /// Mounted; no texture applied yet (or the last load failed).
    Loading,
    /// The sphere is textured.
    Ready,
    /// Unmounted. Nothing may touch the scene any more.
    Disposed,
}

/// Pointer position and camera orientation captured at drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    x: f64,
    y: f64,
    yaw: f64,
    pitch: f64,
}

/// Everything the viewer mutates after mount.
#[derive(Debug)]
pub struct SceneState {
    pub(crate) state: ViewerState,
    pub(crate) camera: OrbitCamera,
    pub(crate) geometry: Option<SphereGeometry>,
    pub(crate) texture: Option<Texture>,
    /// Viewport size the renderer has not been told about yet.
    pub(crate) pending_resize: Option<(u32, u32)>,
    /// Bumped on every new image so stale loads can be discarded.
    pub(crate) load_generation: u64,
    drag: Option<DragOrigin>,
}

pub type SharedScene = Arc<Mutex<SceneState>>;

/// Lock the shared scene, recovering from a poisoned lock.
pub(crate) fn lock_scene(scene: &SharedScene) -> MutexGuard<'_, SceneState> {
    scene.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SceneState {
    pub(crate) fn new(width: u32, height: u32, geometry: SphereGeometry) -> Self {
        Self {
            state: ViewerState::Loading,
            camera: OrbitCamera::new(width, height),
            geometry: Some(geometry),
            texture: None,
            pending_resize: Some((width, height)),
            load_generation: 0,
            drag: None,
        }
    }

    /// Apply one input event. Only the camera, drag and viewport change;
    /// the lifecycle state never does.
    pub(crate) fn handle_input(&mut self, event: &InputEvent) {
        if self.state == ViewerState::Disposed {
            return;
        }

        match *event {
            InputEvent::PointerDown { x, y } => {
                self.drag = Some(DragOrigin {
                    x,
                    y,
                    yaw: self.camera.yaw(),
                    pitch: self.camera.pitch(),
                });
            }
            InputEvent::PointerMove { x, y } => {
                if let Some(origin) = self.drag {
                    self.camera.set_orientation(
                        (origin.x - x) * DRAG_SENSITIVITY_DEG_PER_PX + origin.yaw,
                        (y - origin.y) * DRAG_SENSITIVITY_DEG_PER_PX + origin.pitch,
                    );
                }
            }
            InputEvent::PointerUp => self.drag = None,
            InputEvent::KeyDown(key) => match key {
                Key::ArrowLeft => self.camera.rotate_by(-KEY_ROTATION_STEP_DEG, 0.0),
                Key::ArrowRight => self.camera.rotate_by(KEY_ROTATION_STEP_DEG, 0.0),
                Key::ArrowUp => self.camera.rotate_by(0.0, KEY_ROTATION_STEP_DEG),
                Key::ArrowDown => self.camera.rotate_by(0.0, -KEY_ROTATION_STEP_DEG),
                Key::Other => {}
            },
            InputEvent::Resize { width, height } => {
                if width > 0 && height > 0 {
                    self.camera.set_viewport(width, height);
                    self.pending_resize = Some((width, height));
                }
            }
        }
    }

    /// Tear down for unmount.
    pub(crate) fn dispose(&mut self) {
        self.state = ViewerState::Disposed;
        self.drag = None;
        self.pending_resize = None;
    }
}
