//! `rdc notes …`

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Subcommand;
use rdc_core::{FormatConfig, LintDiagnostic, LintSeverity, NotesSession, format_document, lint_source};
use rdc_render::{RenderTheme, render_plain, render_svg};

use crate::Session;

#[derive(Subcommand)]
pub enum NotesCommand {
    /// Render the stored notes
    Show {
        /// Write an SVG image here instead of printing text
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Terminal width for text output
        #[arg(long, default_value_t = 40)]
        width: usize,
    },

    /// Print the stored notes source
    Get,

    /// Replace the stored notes with a file's contents
    Set { file: PathBuf },

    /// Validate a notes file and report lint findings
    Check { file: PathBuf },

    /// Reformat a notes file
    Fmt {
        file: PathBuf,

        /// Rewrite the file instead of printing the result
        #[arg(long)]
        write: bool,
    },
}

pub fn run(cmd: NotesCommand, session: &mut Session, out: &mut dyn Write) -> anyhow::Result<()> {
    match cmd {
        NotesCommand::Show { svg, width } => {
            let layout = session.config.layout();
            let notes = NotesSession::from_text(session.store()?.scratch_notes());
            if let Some(err) = notes.error() {
                log::warn!("stored notes are invalid, showing nothing: {err}");
            }

            match svg {
                Some(path) => {
                    let image = render_svg(notes.document(), &layout, &RenderTheme::default());
                    std::fs::write(&path, image).with_context(|| format!("cannot write {}", path.display()))?;
                    writeln!(out, "wrote {}", path.display())?;
                }
                None => write!(out, "{}", render_plain(notes.document(), width))?,
            }
        }
        NotesCommand::Get => write!(out, "{}", session.store()?.scratch_notes())?,
        NotesCommand::Set { file } => {
            let text = read(&file)?;
            session
                .store()?
                .save_scratch_notes(&text)
                .with_context(|| format!("{} was not saved", file.display()))?;
            writeln!(out, "saved notes from {}", file.display())?;
        }
        NotesCommand::Check { file } => {
            let text = read(&file)?;
            let diags = lint_source(&text).with_context(|| format!("{} is not a valid notes document", file.display()))?;
            if diags.is_empty() {
                writeln!(out, "{}: ok", file.display())?;
            }
            for diag in &diags {
                writeln!(out, "{}", describe(&file, diag))?;
            }
        }
        NotesCommand::Fmt { file, write } => {
            let text = read(&file)?;
            let formatted = format_document(&text, &FormatConfig::default())
                .with_context(|| format!("{} is not a valid notes document", file.display()))?;
            if !write {
                write!(out, "{formatted}")?;
            } else if formatted != text {
                std::fs::write(&file, formatted).with_context(|| format!("cannot write {}", file.display()))?;
                writeln!(out, "formatted {}", file.display())?;
            }
        }
    }
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// `file:path: severity[rule]: message`
fn describe(file: &Path, diag: &LintDiagnostic) -> String {
    let severity = match diag.severity {
        LintSeverity::Warning => "warning",
        LintSeverity::Info => "info",
    };
    format!("{}:{}: {severity}[{}]: {}", file.display(), diag.path, diag.rule, diag.message)
}
