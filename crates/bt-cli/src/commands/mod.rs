//! CLI subcommand implementations.

pub mod activity;
pub mod clock;
pub mod export;
pub mod leave;
pub mod members;
pub mod personnel;
pub mod task;
pub mod util;
pub mod watch;
