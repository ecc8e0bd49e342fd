//! Scripted [`GenerativeModel`] double shared by the pipeline tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use loci_core::{CoreError, DataUrl};
use loci_genai::{GenAiError, GenerativeModel, ImageResponse, Part};

type ImageBehavior = Box<dyn Fn(usize, &[Part]) -> Result<ImageResponse, GenAiError> + Send + Sync>;

/// A model whose replies are fixed up front.
///
/// JSON replies are consumed in order. Image replies come from a closure
/// that receives the zero-based call number and the request parts.
pub struct ScriptedModel {
    json_replies: Mutex<VecDeque<Result<String, GenAiError>>>,
    image_behavior: ImageBehavior,
    image_delay: Option<Duration>,
    image_calls: AtomicUsize,
    pub json_requests: Mutex<Vec<Vec<Part>>>,
    pub image_requests: Mutex<Vec<Vec<Part>>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            json_replies: Mutex::new(VecDeque::new()),
            image_behavior: Box::new(|n: usize, _: &[Part]| Ok(png(&format!("img{n}")))),
            image_delay: None,
            image_calls: AtomicUsize::new(0),
            json_requests: Mutex::new(Vec::new()),
            image_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_json(self, reply: impl Into<String>) -> Self {
        self.json_replies
            .lock()
            .unwrap()
            .push_back(Ok(reply.into()));
        self
    }

    pub fn with_images<F>(mut self, behavior: F) -> Self
    where
        F: Fn(usize, &[Part]) -> Result<ImageResponse, GenAiError> + Send + Sync + 'static,
    {
        self.image_behavior = Box::new(behavior);
        self
    }

    pub fn with_image_delay(mut self, delay: Duration) -> Self {
        self.image_delay = Some(delay);
        self
    }

    pub fn image_call_count(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn json_call_count(&self) -> usize {
        self.json_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_json(
        &self,
        parts: Vec<Part>,
        _schema: serde_json::Value,
    ) -> Result<String, GenAiError> {
        self.json_requests.lock().unwrap().push(parts);
        self.json_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CoreError::Content("no scripted reply left".into()).into()))
    }

    async fn generate_image(&self, parts: Vec<Part>) -> Result<ImageResponse, GenAiError> {
        let call = self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.image_requests.lock().unwrap().push(parts.clone());
        if let Some(delay) = self.image_delay {
            tokio::time::sleep(delay).await;
        }
        (self.image_behavior)(call, &parts)
    }
}

/// An image reply carrying a PNG data URL with the given payload.
pub fn png(payload: &str) -> ImageResponse {
    ImageResponse {
        image: Some(DataUrl::new("image/png", payload)),
        text: None,
    }
}

/// A well-formed palace JSON reply covering `items`, one scene each.
pub fn palace_json(title: &str, items: &[&str]) -> String {
    let scenes: Vec<serde_json::Value> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::json!({
                "locus": format!("{title} locus {i}"),
                "description": format!("At {title} locus {i} a giant **{item}** dances."),
            })
        })
        .collect();
    let recap: Vec<serde_json::Value> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::json!({
                "item": format!("**{item}**"),
                "locusHint": format!("{title} locus {i}"),
            })
        })
        .collect();

    serde_json::json!({
        "title": title,
        "imagePrompt": format!("{title} panorama"),
        "scenes": scenes,
        "quickRecap": recap,
    })
    .to_string()
}

/// Log lines written while a [`LogCapture`] guard is alive on this thread.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct LogCapture {
    pub logs: LogBuffer,
    _guard: tracing::subscriber::DefaultGuard,
}

/// Route `tracing` output on the current thread into a buffer.
///
/// Only sound on the current-thread runtime `#[tokio::test]` uses by
/// default, where every task runs on the test thread.
pub fn capture_logs() -> LogCapture {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    LogCapture {
        logs,
        _guard: tracing::subscriber::set_default(subscriber),
    }
}
