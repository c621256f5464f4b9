//! `rdc db …`

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Subcommand;

use crate::Session;

#[derive(Subcommand)]
pub enum DbCommand {
    /// Write a copy of the database file
    Export { path: PathBuf },

    /// Replace the database with a previously exported file
    Import { path: PathBuf },
}

pub fn run(cmd: DbCommand, session: &mut Session, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = session.store()?;
    match cmd {
        DbCommand::Export { path } => {
            store
                .export_to(&path)
                .with_context(|| format!("export to {} failed", path.display()))?;
            writeln!(out, "exported {} presets to {}", store.presets().len(), path.display())?;
        }
        DbCommand::Import { path } => {
            store
                .import_from(&path)
                .with_context(|| format!("import from {} failed", path.display()))?;
            writeln!(out, "imported {} presets from {}", store.presets().len(), path.display())?;
        }
    }
    Ok(())
}
