// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prefix table and command resolution.

use quill_config::model::CommandsConfig;
use quill_core::{CommandKind, InboundMessage};

/// A command found in a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    /// The trimmed text after the prefix.
    pub argument: String,
    /// Set when the command was inherited from a replied-to bot message.
    pub chained: bool,
}

/// Ordered `(command, prefix)` table. The first matching prefix wins.
#[derive(Debug, Clone)]
pub struct PrefixTable {
    entries: Vec<(CommandKind, String)>,
}

impl PrefixTable {
    pub fn new(entries: Vec<(CommandKind, String)>) -> Self {
        Self { entries }
    }

    pub fn from_config(config: &CommandsConfig) -> Self {
        Self::new(
            config
                .prefixes
                .iter()
                .map(|p| (p.command, p.prefix.clone()))
                .collect(),
        )
    }

    /// The prefix configured for `kind`, if any.
    pub fn prefix_for(&self, kind: CommandKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, p)| p.as_str())
    }

    /// Matches `text` against the table. Prefixes are case-sensitive.
    pub fn parse(&self, text: &str) -> Option<ParsedCommand> {
        self.entries.iter().find_map(|(kind, prefix)| {
            text.strip_prefix(prefix.as_str()).map(|rest| ParsedCommand {
                kind: *kind,
                argument: rest.trim().to_string(),
                chained: false,
            })
        })
    }

    /// Resolves the command for `msg`.
    ///
    /// An unprefixed reply to one of our own prefixed messages inherits that
    /// message's command, with the reply text as the argument. A message
    /// without text never resolves.
    pub fn resolve(&self, msg: &InboundMessage) -> Option<ParsedCommand> {
        let text = msg.text.as_deref()?;
        if let Some(cmd) = self.parse(text) {
            return Some(cmd);
        }
        let reply = msg.reply_to.as_ref().filter(|r| r.from_self)?;
        let inherited = self.parse(reply.text.as_deref()?)?;
        Some(ParsedCommand {
            kind: inherited.kind,
            argument: text.trim().to_string(),
            chained: true,
        })
    }
}
