//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let json = match event {
            DeployEvent::Started { beginning } => serde_json::json!({
                "event": "start",
                "command": "deploy",
                "beginning": beginning,
            }),

            DeployEvent::PhaseStarted { phase } => serde_json::json!({
                "event": "phase",
                "command": "deploy",
                "phase": phase,
            }),

            DeployEvent::VersionCreated { name } => serde_json::json!({
                "event": "version_created",
                "command": "deploy",
                "version": name,
            }),

            DeployEvent::Switched { name } => serde_json::json!({
                "event": "switched",
                "command": "deploy",
                "version": name,
            }),

            DeployEvent::FallbackStarted { phase, error } => serde_json::json!({
                "event": "fallback_start",
                "command": "deploy",
                "phase": phase,
                "error": error,
            }),

            DeployEvent::FallbackCompleted { restored } => serde_json::json!({
                "event": "fallback_complete",
                "command": "deploy",
                "restored": restored,
            }),

            DeployEvent::Completed { name } => serde_json::json!({
                "event": "complete",
                "command": "deploy",
                "status": "success",
                "version": name,
            }),

            DeployEvent::Failed { phase, error } => serde_json::json!({
                "event": "complete",
                "command": "deploy",
                "status": "failed",
                "phase": phase,
                "error": error,
            }),
        };

        self.write_event(json);
    }
}
