// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command routing for Quill.
//!
//! Every inbound message is logged, matched against the prefix table (with
//! reply chaining as a fallback) and handed to the handler for its command.
//! Handler failures become replies; they never escape [`CommandRouter::handle`].

mod assist;
mod history;
mod lookup;
pub mod prefix;
pub mod router;

pub use prefix::{ParsedCommand, PrefixTable};
pub use router::CommandRouter;
