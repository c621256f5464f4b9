//! Machine-setting presets.

use serde::{Deserialize, Serialize};

pub type PresetId = u32;

/// One stored machine setup for a die.
///
/// Every field but `id` has a serde default, so records written by older
/// versions (which lacked the access bookkeeping) still load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    pub id: PresetId,
    pub die_cut: String,
    pub belt_speed: String,
    pub pull_roll: Option<f64>,
    pub feed_gate: Option<f64>,
    pub time_delay: String,
    pub boxes_per_hour: String,
    pub notes: String,
    pub additional_notes: String,
    pub wheels_position: String,
    pub running_out_mode: bool,
    pub scissor_lift: bool,
    pub skip_feed: bool,
    /// Unix seconds of the last time the preset was opened.
    pub last_accessed: Option<i64>,
    pub accessed_count: u32,
}

/// The user-editable part of a preset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetFields {
    pub die_cut: String,
    pub belt_speed: String,
    pub pull_roll: Option<f64>,
    pub feed_gate: Option<f64>,
    pub time_delay: String,
    pub boxes_per_hour: String,
    pub notes: String,
    pub additional_notes: String,
    pub wheels_position: String,
    pub running_out_mode: bool,
    pub scissor_lift: bool,
    pub skip_feed: bool,
}

impl Preset {
    /// A fresh, never-opened preset.
    pub fn new(id: PresetId, fields: PresetFields) -> Self {
        let mut preset = Self {
            id,
            ..Self::default()
        };
        preset.apply(fields);
        preset
    }

    /// Overwrite the editable fields; access bookkeeping is untouched.
    pub fn apply(&mut self, fields: PresetFields) {
        let PresetFields {
            die_cut,
            belt_speed,
            pull_roll,
            feed_gate,
            time_delay,
            boxes_per_hour,
            notes,
            additional_notes,
            wheels_position,
            running_out_mode,
            scissor_lift,
            skip_feed,
        } = fields;
        self.die_cut = die_cut;
        self.belt_speed = belt_speed;
        self.pull_roll = pull_roll;
        self.feed_gate = feed_gate;
        self.time_delay = time_delay;
        self.boxes_per_hour = boxes_per_hour;
        self.notes = notes;
        self.additional_notes = additional_notes;
        self.wheels_position = wheels_position;
        self.running_out_mode = running_out_mode;
        self.scissor_lift = scissor_lift;
        self.skip_feed = skip_feed;
    }

    pub fn fields(&self) -> PresetFields {
        PresetFields {
            die_cut: self.die_cut.clone(),
            belt_speed: self.belt_speed.clone(),
            pull_roll: self.pull_roll,
            feed_gate: self.feed_gate,
            time_delay: self.time_delay.clone(),
            boxes_per_hour: self.boxes_per_hour.clone(),
            notes: self.notes.clone(),
            additional_notes: self.additional_notes.clone(),
            wheels_position: self.wheels_position.clone(),
            running_out_mode: self.running_out_mode,
            scissor_lift: self.scissor_lift,
            skip_feed: self.skip_feed,
        }
    }

    /// ASCII case-insensitive substring match over die cut, notes and
    /// additional notes. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_ascii_lowercase();
        [&self.die_cut, &self.notes, &self.additional_notes]
            .iter()
            .any(|field| field.to_ascii_lowercase().contains(&query))
    }
}
