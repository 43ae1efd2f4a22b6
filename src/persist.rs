//! Blocking file helpers shared by checkpoints and transition logs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DqnError, Result};

/// Serialize `value` with bincode and move it into place at `path`.
///
/// The bytes go to a sibling `.tmp` file first and are renamed over the
/// target, so a crash mid-write leaves the previous file intact. This is
/// best effort: nothing is fsynced.
pub fn save_bincode<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let bytes = bincode::serialize(value)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| DqnError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    bincode::deserialize(&bytes).map_err(|e| DqnError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
