//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Exit code mapping
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `cli` - Argument definitions
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `exit` - Error class to process exit code
//! - `output` - Output rendering

pub mod cli;
pub mod exit;
pub mod factory;
pub mod output;

pub use cli::{Cli, Commands};
pub use output::{OutputFormat, Renderer};
