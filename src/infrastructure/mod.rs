//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `ssh` - RemoteExecutor over the system ssh binary
//! - `http` - AppProbe over HTTP
//! - `events/` - DeployEventSink implementations (tracing, NDJSON)
//! - `lock` - Local deploy lock
//! - `git_remote` - Branch tip lookup

pub mod clock;
pub mod events;
pub mod git_remote;
pub mod http;
pub mod lock;
pub mod ssh;

// Re-export for convenience
pub use clock::SystemClock;
pub use events::{JsonEventSink, TracingEventSink};
pub use git_remote::resolve_branch_tip;
pub use http::HttpProbe;
pub use lock::{DeployLock, DeployLockGuard};
pub use ssh::SshExecutor;
