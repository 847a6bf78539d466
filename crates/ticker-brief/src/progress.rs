//! Progress reporting to the presentation layer
//!
//! Messages are informational; nothing in the pipeline branches on them.

use std::sync::Mutex;

/// Severity of a progress message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLevel {
    Info,
    Success,
    Warning,
}

/// Receives progress messages while a request runs
pub trait ProgressSink: Send + Sync {
    fn notify(&self, level: ProgressLevel, message: &str);

    fn info(&self, message: &str) {
        self.notify(ProgressLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.notify(ProgressLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(ProgressLevel::Warning, message);
    }
}

/// Discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn notify(&self, _level: ProgressLevel, _message: &str) {}
}

/// Keeps every message in memory
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<(ProgressLevel, String)>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, in order
    pub fn events(&self) -> Vec<(ProgressLevel, String)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Messages of one level
    pub fn messages(&self, level: ProgressLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn notify(&self, level: ProgressLevel, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push((level, message.to_string()));
        }
    }
}
