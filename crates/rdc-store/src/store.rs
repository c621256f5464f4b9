//! The JSON database file and the operations over it.

use crate::error::StoreError;
use crate::preset::{Preset, PresetFields, PresetId};
use rdc_core::{DEFAULT_NOTES, parse_document};
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Version written into every saved file. Files without one are treated as
/// version 0 and upgraded on load.
pub const SCHEMA_VERSION: u32 = 1;

// ─── On-disk format ──────────────────────────────────────────────────────

/// Everything the application stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    #[serde(default)]
    pub version: u32,
    pub next_id: PresetId,
    /// Kept in id order.
    pub presets: Vec<Preset>,
    pub scratch_notes: String,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            next_id: 1,
            presets: Vec::new(),
            scratch_notes: DEFAULT_NOTES.to_string(),
        }
    }
}

impl Database {
    /// Decode a database file and bring it up to `SCHEMA_VERSION`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut db: Database = serde_json::from_str(text)?;
        db.migrate()?;
        Ok(db)
    }

    /// Returns true when anything had to change. Two presets sharing an id
    /// make the file unusable.
    fn migrate(&mut self) -> Result<bool, serde_json::Error> {
        let before = (self.version, self.next_id);

        self.presets.sort_by_key(|p| p.id);
        if let Some(pair) = self.presets.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(serde_json::Error::custom(format!("duplicate preset id {}", pair[0].id)));
        }
        let after_last = self.presets.last().map_or(1, |p| p.id + 1);
        self.next_id = self.next_id.max(after_last);

        if self.version < SCHEMA_VERSION {
            log::info!("upgrading database from version {} to {SCHEMA_VERSION}", self.version);
            self.version = SCHEMA_VERSION;
        }

        Ok(before != (self.version, self.next_id))
    }
}

// ─── Store ───────────────────────────────────────────────────────────────

/// A database bound to its file (or to nothing, for tests).
///
/// Every change is made to a copy of the database and only kept once the
/// copy is on disk, so a failed write leaves the store as it was.
#[derive(Debug, Default)]
pub struct Store {
    path: Option<PathBuf>,
    db: Database,
}

impl Store {
    /// Load the database at `path`, creating it with the default scratch
    /// notes if it doesn't exist yet.
    ///
    /// # Errors
    /// `Io` if the file can't be read or created, `Corrupt` if it isn't a
    /// database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("creating database at {}", path.display());
            let db = Database::default();
            write_database(path, &db)?;
            return Ok(Self {
                path: Some(path.to_path_buf()),
                db,
            });
        }

        let text = std::fs::read_to_string(path).map_err(|source| StoreError::io(path, source))?;
        let corrupt = |source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        };
        let mut db: Database = serde_json::from_str(&text).map_err(corrupt)?;
        let upgraded = db.migrate().map_err(corrupt)?;
        log::debug!("loaded {} presets from {}", db.presets.len(), path.display());

        if upgraded {
            write_database(path, &db)?;
        }
        Ok(Self {
            path: Some(path.to_path_buf()),
            db,
        })
    }

    /// A store that never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// All presets in id order.
    pub fn presets(&self) -> &[Preset] {
        &self.db.presets
    }

    // ─── Presets ─────────────────────────────────────────────────────────

    pub fn create(&mut self, fields: PresetFields) -> Result<&Preset, StoreError> {
        let mut next = self.db.clone();
        let id = next.next_id;
        next.next_id += 1;
        next.presets.push(Preset::new(id, fields));
        self.commit(next)?;
        log::info!("created preset {id}");
        self.get(id)
    }

    pub fn get(&self, id: PresetId) -> Result<&Preset, StoreError> {
        let index = self.index_of(id)?;
        Ok(&self.db.presets[index])
    }

    pub fn update(&mut self, id: PresetId, fields: PresetFields) -> Result<&Preset, StoreError> {
        let index = self.index_of(id)?;
        let mut next = self.db.clone();
        next.presets[index].apply(fields);
        self.commit(next)?;
        log::info!("updated preset {id}");
        Ok(&self.db.presets[index])
    }

    pub fn delete(&mut self, id: PresetId) -> Result<Preset, StoreError> {
        let index = self.index_of(id)?;
        let mut next = self.db.clone();
        let removed = next.presets.remove(index);
        self.commit(next)?;
        log::info!("deleted preset {id}");
        Ok(removed)
    }

    /// Presets whose die cut, notes or additional notes contain `query`,
    /// ignoring ASCII case, in id order.
    pub fn search(&self, query: &str) -> Vec<&Preset> {
        self.db.presets.iter().filter(|p| p.matches(query)).collect()
    }

    /// Opened presets, most recently opened first.
    pub fn recent(&self, limit: usize) -> Vec<&Preset> {
        let mut opened: Vec<&Preset> = self.db.presets.iter().filter(|p| p.last_accessed.is_some()).collect();
        opened.sort_by_key(|p| (Reverse(p.last_accessed), p.id));
        opened.truncate(limit);
        opened
    }

    /// Presets by open count, highest first; ties in id order.
    pub fn most_accessed(&self, limit: usize) -> Vec<&Preset> {
        let mut all: Vec<&Preset> = self.db.presets.iter().collect();
        all.sort_by_key(|p| (Reverse(p.accessed_count), p.id));
        all.truncate(limit);
        all
    }

    /// Presets that have a die cut, sorted by it ignoring ASCII case.
    pub fn all_by_die_cut(&self) -> Vec<&Preset> {
        let mut named: Vec<&Preset> = self.db.presets.iter().filter(|p| !p.die_cut.trim().is_empty()).collect();
        named.sort_by_cached_key(|p| p.die_cut.to_ascii_lowercase());
        named
    }

    /// Mark a preset as opened now.
    pub fn record_access(&mut self, id: PresetId) -> Result<&Preset, StoreError> {
        self.record_access_at(id, unix_now())
    }

    pub fn record_access_at(&mut self, id: PresetId, timestamp: i64) -> Result<&Preset, StoreError> {
        let index = self.index_of(id)?;
        let mut next = self.db.clone();
        let preset = &mut next.presets[index];
        preset.last_accessed = Some(timestamp);
        preset.accessed_count = preset.accessed_count.saturating_add(1);
        let count = preset.accessed_count;
        self.commit(next)?;
        log::debug!("preset {id} opened ({count} times)");
        Ok(&self.db.presets[index])
    }

    pub fn reset_access_count(&mut self, id: PresetId) -> Result<&Preset, StoreError> {
        let index = self.index_of(id)?;
        let mut next = self.db.clone();
        next.presets[index].accessed_count = 0;
        self.commit(next)?;
        log::info!("reset open count of preset {id}");
        Ok(&self.db.presets[index])
    }

    // ─── Scratch notes ───────────────────────────────────────────────────

    pub fn scratch_notes(&self) -> &str {
        &self.db.scratch_notes
    }

    /// Replace the scratch notes. Text that doesn't parse is refused and the
    /// stored notes stay as they were.
    pub fn save_scratch_notes(&mut self, text: &str) -> Result<(), StoreError> {
        parse_document(text)?;
        let next = Database {
            scratch_notes: text.to_string(),
            ..self.db.clone()
        };
        self.commit(next)?;
        log::info!("saved scratch notes ({} bytes)", text.len());
        Ok(())
    }

    // ─── Raw file ────────────────────────────────────────────────────────

    /// Write the whole database to `path`.
    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        write_database(path, &self.db)?;
        log::info!("exported {} presets to {}", self.db.presets.len(), path.display());
        Ok(())
    }

    /// Replace the whole database with the one at `path`.
    ///
    /// The file is fully validated first, scratch notes included; on any
    /// error the current database is left alone.
    pub fn import_from(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::io(path, source))?;
        let db = Database::from_json(&text).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
        parse_document(&db.scratch_notes)?;

        let count = db.presets.len();
        self.commit(db)?;
        log::info!("imported {count} presets from {}", path.display());
        Ok(())
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn index_of(&self, id: PresetId) -> Result<usize, StoreError> {
        self.db
            .presets
            .binary_search_by_key(&id, |p| p.id)
            .map_err(|_| StoreError::NotFound(id))
    }

    /// Write `next` to the file, then make it the current database.
    fn commit(&mut self, next: Database) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            write_database(path, &next)?;
        }
        self.db = next;
        Ok(())
    }
}

/// Write through a sibling temp file so a failed write never truncates the
/// existing database.
fn write_database(path: &Path, db: &Database) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StoreError::io(parent, source))?;
    }

    let mut json = serde_json::to_string_pretty(db).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json).map_err(|source| StoreError::io(&tmp, source))?;
    std::fs::rename(&tmp, path).map_err(|source| StoreError::io(path, source))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as i64)
}
