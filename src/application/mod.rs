//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (value objects, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - The create → switch → verify → (rollback | commit) protocol
//! - `ChangeVersionUseCase` - Manual switch to an existing version
//! - `VersionsUseCase` - Listing and deletion of versions
//!
//! ## Services
//!
//! - `AppControl` - Maintenance mode, service unit, manage.py, backups
//! - `wait_until_responds` - The app-responds check
//! - `GateRequest` - Front door token parsing

pub mod app_control;
pub mod cancel;
pub mod change_version;
pub mod deploy;
pub mod gate;
pub mod health;
pub mod versions;

pub use app_control::AppControl;
pub use cancel::CancelToken;
pub use change_version::{ChangeVersionOptions, ChangeVersionUseCase};
pub use deploy::{DeployAttempt, DeployOptions, DeployReport, DeployUseCase, PhaseOutcome};
pub use gate::{GateError, GateRequest};
pub use health::{wait_until_responds, HealthPolicy};
pub use versions::{VersionListing, VersionsUseCase};
