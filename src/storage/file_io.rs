//! File I/O utilities with atomic writes
//!
//! Ledger files and backups are written to a sibling temp file, synced, then
//! renamed over the target so a crash never leaves a half-written file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{VaultError, VaultResult};

/// Read JSON from a file, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> VaultResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    read_json_required(path)
}

/// Read JSON from a file, failing if the file doesn't exist
pub fn read_json_required<T, P>(path: P) -> VaultResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path)
        .map_err(|e| VaultError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| VaultError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> VaultResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    stage_json(path, data)?.commit()
}

/// Serialize `data` next to `path` without replacing it yet
///
/// Several files can be staged and then committed together, so a failure
/// while writing any of them leaves every target untouched.
pub fn stage_json<T, P>(path: P, data: &T) -> VaultResult<StagedWrite>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            VaultError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let staged = StagedWrite {
        temp_path: path.with_extension("json.tmp"),
        path: path.to_path_buf(),
        committed: false,
    };

    let file = File::create(&staged.temp_path).map_err(|e| {
        VaultError::Storage(format!(
            "Failed to create {}: {}",
            staged.temp_path.display(),
            e
        ))
    })?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| VaultError::Storage(format!("Failed to serialize data: {}", e)))?;
    writer
        .flush()
        .map_err(|e| VaultError::Storage(format!("Failed to flush data: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| VaultError::Storage(format!("Failed to sync data: {}", e)))?;

    Ok(staged)
}

/// A fully written temp file waiting to be renamed over its target
///
/// Dropping it without `commit` deletes the temp file.
#[derive(Debug)]
pub struct StagedWrite {
    temp_path: PathBuf,
    path: PathBuf,
    committed: bool,
}

impl StagedWrite {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn commit(mut self) -> VaultResult<()> {
        fs::rename(&self.temp_path, &self.path).map_err(|e| {
            VaultError::Storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}
