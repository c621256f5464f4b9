//! `rdc`: rotary die cutter presets and scratch notes from the terminal.

mod config;
mod db;
mod notes;
mod preset;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use rdc_store::Store;

use config::Config;

#[derive(Parser)]
#[command(name = "rdc", version, about = "Rotary die cutter presets and scratch notes")]
struct Cli {
    /// Config file (default: ~/.config/rdc/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output; repeat for more detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show, edit and check the scratch notes
    #[command(subcommand)]
    Notes(notes::NotesCommand),

    /// Add, find and edit machine-setting presets
    #[command(subcommand)]
    Preset(preset::PresetCommand),

    /// Copy the raw database file in or out
    #[command(subcommand)]
    Db(db::DbCommand),
}

/// Config plus the store, opened on first use so commands that only read
/// a file never create a database.
pub struct Session {
    pub config: Config,
    store: Option<Store>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config, store: None }
    }

    #[cfg(test)]
    pub fn with_store(config: Config, store: Store) -> Self {
        Self {
            config,
            store: Some(store),
        }
    }

    pub fn store(&mut self) -> anyhow::Result<&mut Store> {
        if self.store.is_none() {
            let path = &self.config.data_path;
            let store = Store::open(path).with_context(|| format!("cannot open database {}", path.display()))?;
            self.store = Some(store);
        }
        self.store.as_mut().context("database not open")
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load_from_path(Config::config_path())?,
    };
    log::debug!("database at {}", config.data_path.display());

    let mut session = Session::new(config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Notes(cmd) => notes::run(cmd, &mut session, &mut out)?,
        Command::Preset(cmd) => preset::run(cmd, &mut session, &mut out)?,
        Command::Db(cmd) => db::run(cmd, &mut session, &mut out)?,
    }

    out.flush()?;
    Ok(())
}
