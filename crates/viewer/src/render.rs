//! Frame loop driving a [`Renderer`] backend.
//!
//! The loop ticks on a fixed interval, forwards pending viewport changes and
//! renders one frame per tick until it is cancelled or the scene is
//! disposed. Stopping the task hands the renderer back so the caller can
//! release it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::camera::OrbitCamera;
use crate::geometry::SphereGeometry;
use crate::scene::{lock_scene, SceneState, SharedScene, ViewerState};
use crate::texture::Texture;

/// Roughly one display refresh at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Zero-based count of frames rendered by this task.
    pub index: u64,
    pub camera: &'a OrbitCamera,
    pub geometry: &'a SphereGeometry,
    /// `None` until a panorama has been loaded.
    pub texture: Option<&'a Texture>,
}

/// A drawing backend. Implementations own whatever GPU or window resources
/// they need and release them in [`Renderer::dispose`].
pub trait Renderer: Send + 'static {
    fn resize(&mut self, width: u32, height: u32);

    fn render(&mut self, frame: &Frame<'_>);

    fn dispose(&mut self);
}

/// Handle to a running frame loop.
pub struct RenderTask {
    cancel: CancellationToken,
    handle: Option<JoinHandle<Box<dyn Renderer>>>,
}

impl RenderTask {
    /// Spawn the frame loop on the current runtime.
    pub fn start(
        scene: SharedScene,
        mut renderer: Box<dyn Renderer>,
        frame_interval: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut rendered: u64 = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let outcome = render_frame(&mut lock_scene(&scene), renderer.as_mut(), rendered);
                        match outcome {
                            Some(true) => rendered += 1,
                            Some(false) => {}
                            None => break,
                        }
                    }
                }
            }

            tracing::debug!(frames = rendered, "Render loop stopped");
            renderer
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop to stop without waiting for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stop the loop and take the renderer back.
    ///
    /// Returns `None` if the loop panicked.
    pub async fn stop(mut self) -> Option<Box<dyn Renderer>> {
        self.cancel.cancel();
        let handle = self.handle.take()?;
        match handle.await {
            Ok(renderer) => Some(renderer),
            Err(e) => {
                tracing::error!(error = %e, "Render loop terminated abnormally");
                None
            }
        }
    }
}

impl Drop for RenderTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Draw one frame. `None` means the scene is gone and the loop must end;
/// `Some(false)` means there was nothing to draw this tick.
fn render_frame(scene: &mut SceneState, renderer: &mut dyn Renderer, index: u64) -> Option<bool> {
    if scene.state == ViewerState::Disposed {
        return None;
    }
    if let Some((width, height)) = scene.pending_resize.take() {
        renderer.resize(width, height);
    }
    let Some(geometry) = scene.geometry.as_ref() else {
        return Some(false);
    };

    renderer.render(&Frame {
        index,
        camera: &scene.camera,
        geometry,
        texture: scene.texture.as_ref(),
    });
    Some(true)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    struct Recorded {
        frames: Vec<(u64, bool)>,
        resizes: Vec<(u32, u32)>,
        disposed: bool,
    }

    struct RecordingRenderer(Arc<Mutex<Recorded>>);

    impl Renderer for RecordingRenderer {
        fn resize(&mut self, width: u32, height: u32) {
            self.0.lock().unwrap().resizes.push((width, height));
        }

        fn render(&mut self, frame: &Frame<'_>) {
            self.0
                .lock()
                .unwrap()
                .frames
                .push((frame.index, frame.texture.is_some()));
        }

        fn dispose(&mut self) {
            self.0.lock().unwrap().disposed = true;
        }
    }

    fn scene() -> SharedScene {
        Arc::new(Mutex::new(SceneState::new(
            640,
            320,
            SphereGeometry::new(1.0, 4, 2),
        )))
    }

    #[test]
    fn first_frame_applies_initial_size() {
        let scene = scene();
        let log = Arc::new(Mutex::new(Recorded::default()));
        let mut renderer = RecordingRenderer(log.clone());

        assert_eq!(render_frame(&mut lock_scene(&scene), &mut renderer, 0), Some(true));
        assert_eq!(render_frame(&mut lock_scene(&scene), &mut renderer, 1), Some(true));

        let log = log.lock().unwrap();
        assert_eq!(log.resizes, vec![(640, 320)]);
        assert_eq!(log.frames, vec![(0, false), (1, false)]);
    }

    #[test]
    fn disposed_scene_ends_the_loop() {
        let scene = scene();
        lock_scene(&scene).dispose();
        let log = Arc::new(Mutex::new(Recorded::default()));

        let outcome = render_frame(
            &mut lock_scene(&scene),
            &mut RecordingRenderer(log.clone()),
            0,
        );
        assert_eq!(outcome, None);
        assert!(log.lock().unwrap().frames.is_empty());
    }

    #[test]
    fn missing_geometry_skips_drawing() {
        let scene = scene();
        lock_scene(&scene).geometry = None;
        let log = Arc::new(Mutex::new(Recorded::default()));

        let outcome = render_frame(
            &mut lock_scene(&scene),
            &mut RecordingRenderer(log.clone()),
            0,
        );
        assert_eq!(outcome, Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_returns_the_renderer() {
        let scene = scene();
        let log = Arc::new(Mutex::new(Recorded::default()));
        let task = RenderTask::start(
            scene,
            Box::new(RecordingRenderer(log.clone())),
            Duration::from_millis(10),
        );

        tokio::time::sleep(Duration::from_millis(35)).await;
        assert!(task.is_running());

        let mut renderer = task.stop().await.expect("renderer returned");
        renderer.dispose();

        let log = log.lock().unwrap();
        assert!(log.frames.len() >= 3);
        assert!(log.disposed);
    }
}
