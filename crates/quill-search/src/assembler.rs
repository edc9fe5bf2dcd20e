// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reassembles lines from arbitrarily split byte chunks.

/// Splits a chunked byte stream into `\n`-terminated lines.
///
/// Splitting happens on raw bytes, so a multi-byte UTF-8 sequence cut by a
/// chunk boundary is decoded intact once its line completes.
#[derive(Debug, Default)]
pub struct LineAssembler {
    leftover: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and returns every line it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.leftover.extend_from_slice(chunk);
        let Some(last_newline) = self.leftover.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };

        let rest = self.leftover.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.leftover, rest);
        complete[..last_newline]
            .split(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// The unterminated tail, if any bytes remain.
    pub fn finish(&mut self) -> Option<String> {
        if self.leftover.is_empty() {
            return None;
        }
        let tail = std::mem::take(&mut self.leftover);
        Some(String::from_utf8_lossy(&tail).into_owned())
    }

    /// Bytes buffered since the last newline.
    pub fn pending(&self) -> usize {
        self.leftover.len()
    }
}
