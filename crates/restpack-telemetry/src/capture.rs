//! In-memory log sink.
//!
//! [`LogCapture`] collects JSON log lines in a shared buffer so tests can
//! assert on what a component logged and in which order.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

/// Shared buffer of captured JSON log lines.
///
/// Clones share the same buffer.
///
/// # Example
///
/// ```rust
/// use restpack_telemetry::LogCapture;
///
/// let capture = LogCapture::new();
/// tracing::dispatcher::with_default(&capture.dispatch(), || {
///     tracing::info!(addr = "127.0.0.1:0", "starting server");
/// });
///
/// assert_eq!(capture.messages(), vec!["starting server".to_string()]);
/// assert_eq!(capture.lines()[0]["fields"]["addr"], "127.0.0.1:0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

/// Writer handed out by [`LogCapture`].
#[derive(Debug)]
pub struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buf: Arc::clone(&self.buf),
        }
    }
}

impl LogCapture {
    /// Creates an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher that records every event, at any level, as JSON.
    #[must_use]
    pub fn dispatch(&self) -> Dispatch {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(self.clone())
            .finish();
        Dispatch::new(subscriber)
    }

    /// Raw captured text.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Captured lines parsed as JSON. Lines that are not JSON are skipped.
    #[must_use]
    pub fn lines(&self) -> Vec<Value> {
        self.contents()
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// The `message` field of every captured event, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lines()
            .iter()
            .filter_map(|line| line["fields"]["message"].as_str().map(str::to_string))
            .collect()
    }

    /// Index of the first event whose message equals `message`.
    #[must_use]
    pub fn position(&self, message: &str) -> Option<usize> {
        self.messages().iter().position(|m| m == message)
    }

    /// Returns true if any event carried `message`.
    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.position(message).is_some()
    }

    /// Discards everything captured so far.
    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}
