// src/cli/mod.rs
//! CLI command definitions and handlers.

pub mod args;
pub mod handlers;

pub use args::{Cli, Commands};
