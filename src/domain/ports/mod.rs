//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod clock;
pub mod deploy_events;
pub mod executor;
pub mod probe;

pub use clock::Clock;
pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use executor::{CommandOutput, RemoteExecutor, Shell};
pub use probe::AppProbe;
