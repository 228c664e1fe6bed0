//! Request loggers
//!
//! Append-only sinks for [`LogEvent`]s keyed by request id. Recording is
//! best-effort: a failed write is reported through `tracing` and dropped.

use chrono::{SecondsFormat, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::errors::Result;
use crate::logging::events::LogEvent;

/// Default log file name
pub const DEFAULT_LOG_FILE: &str = "api.log";

/// Append-only request log
pub trait RequestLogger: Send + Sync {
    /// Record one event; never fails
    fn record(&self, request_id: Uuid, event: LogEvent);
}

/// Render a log line: `[timestamp] [request id] event`
pub fn format_line(request_id: Uuid, event: &LogEvent) -> String {
    format!(
        "[{}] [{}] {}\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        request_id,
        event
    )
}

/// Logger appending one line per event to a file
#[derive(Debug)]
pub struct FileRequestLogger {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileRequestLogger {
    /// Open `dir/file_name` for appending, creating `dir` if needed
    pub fn new(dir: impl AsRef<Path>, file_name: &str) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(file_name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RequestLogger for FileRequestLogger {
    fn record(&self, request_id: Uuid, event: LogEvent) {
        tracing::debug!(request_id = %request_id, event = event.name(), "{}", event);

        let line = format_line(request_id, &event);
        let result = match self.file.lock() {
            Ok(mut file) => file.write_all(line.as_bytes()),
            Err(_) => {
                tracing::warn!(path = %self.path.display(), "request log lock poisoned");
                return;
            }
        };

        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write request log");
        }
    }
}

/// In-memory logger, mostly for inspection in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryRequestLogger {
    events: Arc<Mutex<Vec<(Uuid, LogEvent)>>>,
}

impl MemoryRequestLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events recorded so far, in call order
    pub fn events(&self) -> Vec<(Uuid, LogEvent)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events of one request, in call order
    pub fn events_for(&self, request_id: Uuid) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|(id, _)| *id == request_id)
            .map(|(_, event)| event)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RequestLogger for MemoryRequestLogger {
    fn record(&self, request_id: Uuid, event: LogEvent) {
        tracing::debug!(request_id = %request_id, event = event.name(), "{}", event);

        if let Ok(mut events) = self.events.lock() {
            events.push((request_id, event));
        }
    }
}
