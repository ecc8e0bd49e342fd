//! The mounted panorama viewer.
//!
//! [`PanoramaViewer::mount`] wires listeners onto the window and canvas
//! targets, builds the inverted sphere and starts the render loop.
//! [`PanoramaViewer::unmount`] undoes all of it. Dropping a viewer without
//! unmounting detaches listeners and cancels background work, but does not
//! call [`Renderer::dispose`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::camera::OrbitCamera;
use crate::events::{EventKind, EventTarget, ListenerId};
use crate::geometry::{
    SphereGeometry, DEFAULT_HEIGHT_SEGMENTS, DEFAULT_RADIUS, DEFAULT_WIDTH_SEGMENTS,
};
use crate::render::{RenderTask, Renderer, DEFAULT_FRAME_INTERVAL};
use crate::scene::{lock_scene, SceneState, SharedScene, ViewerState};
use crate::texture::decode_texture;

const CANVAS_EVENTS: [EventKind; 3] = [
    EventKind::PointerDown,
    EventKind::PointerMove,
    EventKind::PointerUp,
];
const WINDOW_EVENTS: [EventKind; 2] = [EventKind::KeyDown, EventKind::Resize];

/// Mount-time options.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub frame_interval: Duration,
    pub radius: f64,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            radius: DEFAULT_RADIUS,
            width_segments: DEFAULT_WIDTH_SEGMENTS,
            height_segments: DEFAULT_HEIGHT_SEGMENTS,
        }
    }
}

/// The event sources the viewer attaches to.
#[derive(Debug, Clone)]
pub struct ViewerSurfaces {
    pub window: Arc<EventTarget>,
    pub canvas: Arc<EventTarget>,
}

impl ViewerSurfaces {
    pub fn new() -> Self {
        Self {
            window: Arc::new(EventTarget::new("window")),
            canvas: Arc::new(EventTarget::new("canvas")),
        }
    }
}

impl Default for ViewerSurfaces {
    fn default() -> Self {
        Self::new()
    }
}

pub struct PanoramaViewer {
    scene: SharedScene,
    listeners: Vec<(Arc<EventTarget>, ListenerId)>,
    render_task: Option<RenderTask>,
    texture_load: Option<JoinHandle<()>>,
}

impl PanoramaViewer {
    /// Mount a viewer. Must be called inside a tokio runtime.
    pub fn mount(
        config: ViewerConfig,
        surfaces: &ViewerSurfaces,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        let geometry =
            SphereGeometry::new(config.radius, config.width_segments, config.height_segments)
                .inverted();
        let scene: SharedScene = Arc::new(Mutex::new(SceneState::new(
            config.width,
            config.height,
            geometry,
        )));

        let mut listeners = Vec::with_capacity(CANVAS_EVENTS.len() + WINDOW_EVENTS.len());
        for (target, kinds) in [
            (&surfaces.canvas, &CANVAS_EVENTS[..]),
            (&surfaces.window, &WINDOW_EVENTS[..]),
        ] {
            for &kind in kinds {
                let scene = scene.clone();
                let id = target.add_listener(kind, move |event| {
                    lock_scene(&scene).handle_input(event);
                });
                listeners.push((target.clone(), id));
            }
        }

        let render_task = RenderTask::start(scene.clone(), renderer, config.frame_interval);

        tracing::debug!(
            width = config.width,
            height = config.height,
            listeners = listeners.len(),
            "Panorama viewer mounted",
        );

        Self {
            scene,
            listeners,
            render_task: Some(render_task),
            texture_load: None,
        }
    }

    pub fn state(&self) -> ViewerState {
        lock_scene(&self.scene).state
    }

    pub fn camera(&self) -> OrbitCamera {
        lock_scene(&self.scene).camera
    }

    /// Dimensions of the applied texture, if any.
    pub fn texture_size(&self) -> Option<(u32, u32)> {
        lock_scene(&self.scene)
            .texture
            .as_ref()
            .map(|t| (t.width, t.height))
    }

    pub fn is_rendering(&self) -> bool {
        self.render_task.as_ref().is_some_and(RenderTask::is_running)
    }

    /// Start loading a new panorama from a `data:` URL.
    ///
    /// The viewer returns to [`ViewerState::Loading`] immediately. A load
    /// that is superseded by a later call, or finishes after unmount, is
    /// discarded. Failures are logged and leave the sphere untextured.
    pub fn set_image(&mut self, image_url: impl Into<String>) {
        let image_url = image_url.into();
        let generation = {
            let mut scene = lock_scene(&self.scene);
            if scene.state == ViewerState::Disposed {
                return;
            }
            scene.state = ViewerState::Loading;
            scene.texture = None;
            scene.load_generation += 1;
            scene.load_generation
        };

        if let Some(previous) = self.texture_load.take() {
            previous.abort();
        }

        let shared = self.scene.clone();
        self.texture_load = Some(tokio::spawn(async move {
            let decoded = tokio::task::spawn_blocking(move || decode_texture(&image_url)).await;

            let mut scene = lock_scene(&shared);
            if scene.state == ViewerState::Disposed || scene.load_generation != generation {
                tracing::debug!(generation, "Discarding stale panorama texture");
                return;
            }
            match decoded {
                Ok(Ok(texture)) => {
                    tracing::info!(
                        width = texture.width,
                        height = texture.height,
                        "Panorama texture applied",
                    );
                    scene.texture = Some(texture);
                    scene.state = ViewerState::Ready;
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Failed to load panorama texture");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Panorama texture task failed");
                }
            }
        }));
    }

    /// Wait for the in-flight texture load, if any, to settle.
    pub async fn wait_for_texture(&mut self) {
        let Some(handle) = self.texture_load.take() else {
            return;
        };
        if let Err(e) = handle.await {
            if !e.is_cancelled() {
                tracing::warn!(error = %e, "Panorama texture task failed");
            }
        }
    }

    /// Tear the viewer down: stop rendering, remove every listener, abort
    /// any in-flight load and release the renderer and scene resources.
    pub async fn unmount(mut self) {
        self.detach();

        if let Some(task) = self.render_task.take() {
            match task.stop().await {
                Some(mut renderer) => renderer.dispose(),
                None => tracing::warn!("Renderer lost before it could be disposed"),
            }
        }

        let mut scene = lock_scene(&self.scene);
        scene.geometry = None;
        scene.texture = None;
        drop(scene);

        tracing::debug!("Panorama viewer unmounted");
    }

    fn detach(&mut self) {
        lock_scene(&self.scene).dispose();

        for (target, id) in self.listeners.drain(..) {
            if !target.remove_listener(id) {
                tracing::debug!(target = target.name(), "Listener already removed");
            }
        }
        if let Some(load) = self.texture_load.take() {
            load.abort();
        }
    }
}

impl Drop for PanoramaViewer {
    fn drop(&mut self) {
        if self.render_task.is_none() {
            return;
        }
        self.detach();
        if let Some(task) = self.render_task.take() {
            task.cancel();
        }
        tracing::debug!("Panorama viewer dropped without unmount");
    }
}
