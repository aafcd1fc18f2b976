//! dgen-save: Seed persistence
//!
//! A dungeon is fully determined by its seed and config, so saving a layout
//! means saving the seed. Records are small JSON files with a versioned
//! header.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current seed file format version
pub const SEED_VERSION: u32 = 1;

/// Seed save/load errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Seed file not found")]
    NotFound,

    #[error("Invalid seed file header")]
    InvalidHeader,

    #[error("Invalid seed label: {0:?}")]
    InvalidLabel(String),

    #[error("Incompatible seed file version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },
}

/// A saved seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRecord {
    /// Magic identifier
    pub magic: String,
    /// File format version
    pub version: u32,
    pub seed: u64,
    pub saved_at: DateTime<Utc>,
    /// Name the seed was saved under
    pub label: String,
}

impl SeedRecord {
    const MAGIC: &'static str = "DGEN";

    pub fn new(seed: u64, label: impl Into<String>) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SEED_VERSION,
            seed,
            saved_at: Utc::now(),
            label: label.into(),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SEED_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SEED_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Write a seed record, creating parent directories as needed
pub fn save_seed(record: &SeedRecord, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, record)?;
    log::info!("saved seed {} as '{}' to {}", record.seed, record.label, path.display());
    Ok(())
}

/// Read and validate a seed record
pub fn load_seed(path: impl AsRef<Path>) -> Result<SeedRecord, SaveError> {
    let file = File::open(path).map_err(open_error)?;
    let reader = BufReader::new(file);
    let record: SeedRecord = serde_json::from_reader(reader)?;
    record.validate()?;
    Ok(record)
}

fn open_error(err: std::io::Error) -> SaveError {
    match err.kind() {
        ErrorKind::NotFound => SaveError::NotFound,
        _ => SaveError::Io(err),
    }
}

/// Check if a seed file exists
pub fn seed_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a seed file
pub fn delete_seed(path: impl AsRef<Path>) -> Result<(), SaveError> {
    std::fs::remove_file(path)?;
    Ok(())
}

fn seeds_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("dungeon-gen");
    path.push("seeds");
    path
}

/// Default location of the seed saved under `label`.
///
/// Labels name a single file inside the seeds directory, so empty labels,
/// `.`/`..` and anything with a path separator are rejected.
pub fn default_seed_path(label: &str) -> Result<PathBuf, SaveError> {
    let invalid = label.is_empty()
        || label == "."
        || label == ".."
        || label.contains(['/', '\\', std::path::MAIN_SEPARATOR])
        || label.contains('\0');
    if invalid {
        return Err(SaveError::InvalidLabel(label.to_string()));
    }
    Ok(seeds_dir().join(format!("{}.json", label)))
}

/// All valid seed records in the default directory, newest first
pub fn list_seeds() -> Result<Vec<(PathBuf, SeedRecord)>, SaveError> {
    list_seeds_in(seeds_dir())
}

/// All valid seed records in `dir`, newest first. Unreadable files are skipped.
pub fn list_seeds_in(dir: impl AsRef<Path>) -> Result<Vec<(PathBuf, SeedRecord)>, SaveError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut seeds = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "json") {
            match load_seed(&path) {
                Ok(record) => seeds.push((path, record)),
                Err(e) => log::warn!("skipping {}: {}", path.display(), e),
            }
        }
    }

    seeds.sort_by(|a, b| b.1.saved_at.cmp(&a.1.saved_at));
    Ok(seeds)
}
