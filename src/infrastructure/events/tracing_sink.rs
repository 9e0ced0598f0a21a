//! Tracing Event Sink
//!
//! Narrates deploy progress through `tracing`, so it lands on stderr with
//! the rest of the log.

use crate::domain::ports::{DeployEvent, DeployEventSink};

pub struct TracingEventSink;

impl DeployEventSink for TracingEventSink {
    fn on_event(&self, event: DeployEvent) {
        match event {
            DeployEvent::Started { beginning } => {
                tracing::info!(%beginning, "deploy started");
            }
            DeployEvent::PhaseStarted { phase } => {
                tracing::info!(%phase, "entering phase");
            }
            DeployEvent::VersionCreated { name } => {
                tracing::info!(version = %name, "version created");
            }
            DeployEvent::Switched { name } => {
                tracing::info!(version = %name, "codebase switched");
            }
            DeployEvent::FallbackStarted { phase, error } => {
                tracing::warn!(%phase, %error, "falling back to the beginning version");
            }
            DeployEvent::FallbackCompleted { restored } => {
                tracing::warn!(%restored, "fallback completed");
            }
            DeployEvent::Completed { name } => {
                tracing::info!(version = %name, "deploy completed");
            }
            DeployEvent::Failed { phase, error } => {
                tracing::error!(%phase, %error, "deploy failed");
            }
        }
    }
}
