//! Command-line interface

pub mod commands;
pub mod logging;

pub use commands::Command;
