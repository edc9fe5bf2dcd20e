// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The results artifact delivered with an external search reply.

use std::path::Path;

use quill_core::Attachment;

use crate::error::SearchError;
use crate::session::SearchOutcome;

/// Writes the outcome to `path` and returns the same bytes as an attachment.
pub async fn write_results(path: &Path, outcome: &SearchOutcome) -> Result<Attachment, SearchError> {
    let data = outcome.render().into_bytes();
    tokio::fs::write(path, &data)
        .await
        .map_err(|source| SearchError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "search_results.txt".to_string());
    Ok(Attachment { file_name, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_newline_joined_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search_results.txt");
        let outcome = SearchOutcome {
            lines: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let attachment = write_results(&path, &outcome).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"a\nb");
        assert_eq!(attachment.data, b"a\nb");
        assert_eq!(attachment.file_name, "search_results.txt");
    }

    #[tokio::test]
    async fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/dir/out.txt");
        let err = write_results(&path, &SearchOutcome::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::Write { .. }));
    }
}
