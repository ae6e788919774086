//! Subcommand implementations.

pub mod config;
pub mod replay;
pub mod run;
