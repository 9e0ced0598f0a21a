//! Deploy Module
//!
//! The create → switch → verify → (rollback | commit) protocol.
//!
//! ## Structure
//!
//! - `options` - What to deploy (`DeployOptions`)
//! - `phase` - Phase results and the in-flight attempt record
//! - `use_case` - The orchestrator (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use cutover::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(executor, probe, clock, config);
//! let report = use_case.execute(&DeployOptions::new(code, config_commit))?;
//! ```

mod options;
mod phase;
mod use_case;

pub use options::DeployOptions;
pub use phase::{DeployAttempt, DeployReport, PhaseOutcome};
pub use use_case::DeployUseCase;
