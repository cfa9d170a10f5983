//! BizTrack CLI library.
//!
//! This crate provides the `bt` command-line interface over the stores.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
