use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bt_cli::commands::{activity, clock, export, leave, members, personnel, task, util, watch};
use bt_cli::{Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(bt_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = bt_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // stdout carries tables and JSON
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(cli.config.as_deref())?;
    let actor = cli.actor.as_deref().or(config.actor.as_deref());
    let session = util::resolve_session(&db, actor)?;
    let session = session.as_ref();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Personnel(action) => personnel::run(&mut out, &mut db, session, action, &Local)?,
        Commands::Clock { direction } => {
            clock::run(&mut out, &mut db, session, *direction, &Local)?;
        }
        Commands::Task(args) => task::run(&mut out, &mut db, session, args)?,
        Commands::Activity(args) => activity::run(&mut out, &db, args, &Local)?,
        Commands::Export(args) => {
            export::run(&mut out, &db, args, &config.export_dir(), &Local::now())?;
        }
        Commands::Leave(action) => leave::run(&mut out, &mut db, session, action, &Local)?,
        Commands::Members(action) => members::run(&mut out, &mut db, action)?,
        Commands::Watch(args) => watch::run(&mut out, &db, args, config.watch_interval(), &Local)?,
    }

    out.flush()?;
    Ok(())
}
