//! Storage for machine-setting presets and the scratch-notes document.
//!
//! Everything lives in one JSON database file. Every mutation is written
//! back immediately, so a crash never loses more than the call in flight.

pub mod error;
pub mod preset;
pub mod store;

pub use error::StoreError;
pub use preset::{Preset, PresetFields, PresetId};
pub use store::{Database, SCHEMA_VERSION, Store};
