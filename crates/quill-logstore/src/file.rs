// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable partition files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quill_core::{QuillError, Record};
use tracing::warn;

/// Outcome of reading a partition file.
#[derive(Debug)]
pub enum Loaded {
    Records(Vec<Record>),
    Missing,
    /// The file exists but is not a JSON array of records.
    Corrupt(serde_json::Error),
}

impl Loaded {
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Loaded::Records(records) => records,
            Loaded::Missing | Loaded::Corrupt(_) => Vec::new(),
        }
    }
}

fn storage_err(e: impl std::error::Error + Send + Sync + 'static) -> QuillError {
    QuillError::Storage {
        source: Box::new(e),
    }
}

/// Reads a partition file without modifying it.
pub async fn load(path: &Path) -> Result<Loaded, QuillError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Loaded::Missing),
        Err(e) => return Err(storage_err(e)),
    };
    match serde_json::from_slice(&bytes) {
        Ok(records) => Ok(Loaded::Records(records)),
        Err(e) => Ok(Loaded::Corrupt(e)),
    }
}

/// Path a corrupt partition file is moved to before being replaced.
pub fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

/// Moves an unreadable partition file aside so its bytes survive the rewrite.
pub async fn preserve_corrupt(path: &Path, err: &serde_json::Error) -> Result<(), QuillError> {
    let target = corrupt_path(path);
    warn!(
        path = %path.display(),
        preserved_as = %target.display(),
        error = %err,
        "partition file is corrupt, starting it afresh"
    );
    tokio::fs::rename(path, &target).await.map_err(storage_err)
}

/// Replaces the partition file with `records` through a temp file and rename.
pub async fn write(path: &Path, records: &[Record]) -> Result<(), QuillError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(storage_err)?;
    }
    let json = serde_json::to_vec_pretty(records).map_err(storage_err)?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp, json).await.map_err(storage_err)?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(storage_err(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_path_appends_suffix() {
        let path = Path::new("/logs/chat-2026-03-01.json");
        assert_eq!(
            corrupt_path(path),
            PathBuf::from("/logs/chat-2026-03-01.json.corrupt")
        );
    }

    #[tokio::test]
    async fn missing_file_loads_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("none.json")).await.unwrap();
        assert!(matches!(loaded, Loaded::Missing));
    }

    #[tokio::test]
    async fn write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/chat.json");
        let record = Record {
            message_id: 9,
            date: "2026-03-01T00:00:00.000Z".into(),
            text: Some("hi".into()),
            sender_id: None,
            sender_username: None,
            sender_first_name: None,
            sender_last_name: None,
        };
        write(&path, std::slice::from_ref(&record)).await.unwrap();
        let loaded = load(&path).await.unwrap().into_records();
        assert_eq!(loaded, vec![record]);
        assert!(!dir.path().join("nested/chat.json.tmp").exists());
    }

    #[tokio::test]
    async fn garbage_loads_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load(&path).await.unwrap(), Loaded::Corrupt(_)));
    }
}
