/// Record persistence
///
/// Stores are saved as named JSON records through a [`PersistenceSink`]. The
/// file sink writes one `<name>.json` file per record in the data directory.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

/// Base name of the recipe record
pub const RECIPES_RECORD: &str = "recipes";

/// Base name of the villager trade record
pub const VILLAGER_TRADES_RECORD: &str = "villager_trades";

/// Somewhere named records can be written to and read back from.
pub trait PersistenceSink {
    fn write_record(&mut self, name: &str, bytes: &[u8]) -> io::Result<()>;
    fn read_record(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Records stored as files in a directory
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

impl PersistenceSink for FileSink {
    fn write_record(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Written to a sibling file and renamed into place
        let path = self.path_for(name);
        let tmp = self.dir.join(format!("{}.json.tmp", name));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)
    }

    fn read_record(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(name))
    }
}

/// Records kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: HashMap<String, Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.records.get(name).map(Vec::as_slice)
    }

    pub fn insert(&mut self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.records.insert(name.to_string(), bytes.into());
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PersistenceSink for MemorySink {
    fn write_record(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.records.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read_record(&self, name: &str) -> io::Result<Vec<u8>> {
        self.records
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no record named '{}'", name)))
    }
}

/// Outcome of reading a store back from its record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    /// No record yet
    Missing,
    /// The record exists but is corrupt or of an unsupported version
    Rejected,
}

// Constant pattern, checked by the record name tests
static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\-]").expect("valid pattern"));

/// Record name for `base`, suffixed with the world name unless `global`.
///
/// The world name is sanitised for use as a file name and followed by a
/// CRC32 of the raw name, so worlds that sanitise alike stay apart.
pub fn record_name(base: &str, world: Option<&str>, global: bool) -> String {
    match world.map(str::trim) {
        Some(world) if !global && !world.is_empty() => format!(
            "{}_{}_{:08x}",
            base,
            UNSAFE_CHARS.replace_all(world, "_"),
            crc32fast::hash(world.as_bytes())
        ),
        _ => base.to_string(),
    }
}

/// Serialize `value` as pretty JSON into record `name`
pub fn save_json<T: Serialize>(sink: &mut dyn PersistenceSink, name: &str, value: &T) -> Result<(), PersistenceError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| PersistenceError::Malformed {
        record: name.to_string(),
        source,
    })?;
    sink.write_record(name, &bytes).map_err(|source| PersistenceError::Io {
        record: name.to_string(),
        source,
    })
}

/// Read record `name` and deserialize it from JSON
pub fn load_json<T: DeserializeOwned>(sink: &dyn PersistenceSink, name: &str) -> Result<T, PersistenceError> {
    let bytes = sink.read_record(name).map_err(|source| PersistenceError::Io {
        record: name.to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Malformed {
        record: name.to_string(),
        source,
    })
}
