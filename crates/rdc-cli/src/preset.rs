//! `rdc preset …`

use std::io::Write;

use clap::builder::BoolishValueParser;
use clap::{Args, Subcommand, ValueEnum};
use rdc_store::{Preset, PresetFields, PresetId};

use crate::Session;

#[derive(Subcommand)]
pub enum PresetCommand {
    /// Store a new preset
    Add(FieldArgs),

    /// Change some fields of a preset
    Update {
        id: PresetId,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Print one preset and count it as opened
    Show { id: PresetId },

    Delete { id: PresetId },

    /// Find presets by die cut or notes
    Search { query: String },

    /// List presets
    List {
        #[arg(long, value_enum, default_value_t = View::Recent)]
        view: View,

        /// Rows to show (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Zero a preset's open count
    ResetCount { id: PresetId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Most recently opened
    Recent,
    /// Most often opened
    Counts,
    /// Every preset with a die cut, alphabetically
    All,
}

/// Editable preset fields; anything left out keeps its current value.
#[derive(Debug, Default, Args)]
pub struct FieldArgs {
    #[arg(long)]
    die_cut: Option<String>,
    #[arg(long)]
    belt_speed: Option<String>,
    #[arg(long)]
    pull_roll: Option<f64>,
    /// Remove the pull roll setting
    #[arg(long, conflicts_with = "pull_roll")]
    clear_pull_roll: bool,
    #[arg(long)]
    feed_gate: Option<f64>,
    /// Remove the feed gate setting
    #[arg(long, conflicts_with = "feed_gate")]
    clear_feed_gate: bool,
    #[arg(long)]
    time_delay: Option<String>,
    /// Boxes per hour
    #[arg(long)]
    bph: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    additional_notes: Option<String>,
    /// Wheels position
    #[arg(long)]
    wheels: Option<String>,
    #[arg(long, value_parser = BoolishValueParser::new())]
    running_out: Option<bool>,
    #[arg(long, value_parser = BoolishValueParser::new())]
    scissor_lift: Option<bool>,
    #[arg(long, value_parser = BoolishValueParser::new())]
    skip_feed: Option<bool>,
}

impl FieldArgs {
    fn apply_to(self, base: PresetFields) -> PresetFields {
        PresetFields {
            die_cut: self.die_cut.unwrap_or(base.die_cut),
            belt_speed: self.belt_speed.unwrap_or(base.belt_speed),
            pull_roll: if self.clear_pull_roll { None } else { self.pull_roll.or(base.pull_roll) },
            feed_gate: if self.clear_feed_gate { None } else { self.feed_gate.or(base.feed_gate) },
            time_delay: self.time_delay.unwrap_or(base.time_delay),
            boxes_per_hour: self.bph.unwrap_or(base.boxes_per_hour),
            notes: self.notes.unwrap_or(base.notes),
            additional_notes: self.additional_notes.unwrap_or(base.additional_notes),
            wheels_position: self.wheels.unwrap_or(base.wheels_position),
            running_out_mode: self.running_out.unwrap_or(base.running_out_mode),
            scissor_lift: self.scissor_lift.unwrap_or(base.scissor_lift),
            skip_feed: self.skip_feed.unwrap_or(base.skip_feed),
        }
    }
}

pub fn run(cmd: PresetCommand, session: &mut Session, out: &mut dyn Write) -> anyhow::Result<()> {
    let list_limit = session.config.list_limit;
    let store = session.store()?;

    match cmd {
        PresetCommand::Add(fields) => {
            let preset = store.create(fields.apply_to(PresetFields::default()))?;
            writeln!(out, "added preset {}", preset.id)?;
        }
        PresetCommand::Update { id, fields } => {
            let base = store.get(id)?.fields();
            store.update(id, fields.apply_to(base))?;
            writeln!(out, "updated preset {id}")?;
        }
        PresetCommand::Show { id } => {
            let preset = store.record_access(id)?;
            write!(out, "{}", detail(preset))?;
        }
        PresetCommand::Delete { id } => {
            let removed = store.delete(id)?;
            writeln!(out, "deleted preset {} ({})", removed.id, label(&removed))?;
        }
        PresetCommand::Search { query } => {
            for preset in store.search(&query) {
                writeln!(out, "{}", row(preset))?;
            }
        }
        PresetCommand::List { view, limit } => {
            let limit = limit.unwrap_or(list_limit);
            let presets = match view {
                View::Recent => store.recent(limit),
                View::Counts => store.most_accessed(limit),
                View::All => store.all_by_die_cut(),
            };
            for preset in presets {
                match view {
                    View::Counts => writeln!(out, "{}  ({}×)", row(preset), preset.accessed_count)?,
                    View::Recent | View::All => writeln!(out, "{}", row(preset))?,
                }
            }
        }
        PresetCommand::ResetCount { id } => {
            store.reset_access_count(id)?;
            writeln!(out, "reset open count of preset {id}")?;
        }
    }
    Ok(())
}

// ─── Formatting ──────────────────────────────────────────────────────────

fn label(preset: &Preset) -> &str {
    if preset.die_cut.is_empty() { "(no die cut)" } else { &preset.die_cut }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn measurement(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// One line for lists: id, die cut, belt speed.
fn row(preset: &Preset) -> String {
    let speed = preset.belt_speed.lines().next().unwrap_or_default();
    format!("{:>4}  {:<12}  {speed}", preset.id, label(preset)).trim_end().to_string()
}

/// Every field, one per line. Multi-line values are indented under their label.
fn detail(preset: &Preset) -> String {
    let fields: [(&str, String); 12] = [
        ("Die cut", preset.die_cut.clone()),
        ("Belt speed", preset.belt_speed.clone()),
        ("Pull roll", measurement(preset.pull_roll)),
        ("Feed gate", measurement(preset.feed_gate)),
        ("Time delay", preset.time_delay.clone()),
        ("Boxes/hour", preset.boxes_per_hour.clone()),
        ("Wheels", preset.wheels_position.clone()),
        ("Running out", yes_no(preset.running_out_mode).to_string()),
        ("Scissor lift", yes_no(preset.scissor_lift).to_string()),
        ("Skip feed", yes_no(preset.skip_feed).to_string()),
        ("Notes", preset.notes.clone()),
        ("Additional", preset.additional_notes.clone()),
    ];

    let mut out = format!("#{}\n", preset.id);
    for (name, value) in fields {
        let mut lines = value.lines();
        let first = format!("{name:<13}{}", lines.next().unwrap_or_default());
        out.push_str(first.trim_end());
        out.push('\n');
        for line in lines {
            out.push_str(&format!("{:13}{line}\n", ""));
        }
    }
    out
}
