//! Subcommand implementations.

pub mod install;
