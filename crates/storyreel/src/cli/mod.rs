//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyreel binary.

mod commands;
mod generate;
mod wav;

pub use commands::{Cli, Commands};
pub use generate::run_generate;
pub use wav::run_wav;
