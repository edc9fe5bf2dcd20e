// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Quill.
//!
//! - [`MockChannel`]: inject inbound messages, capture outbound ones
//! - [`MockProvider`]: scripted summary, prompt and content responses
//! - [`inbound`]: builder for inbound messages

pub mod fixtures;
pub mod mock_channel;
pub mod mock_provider;

pub use fixtures::inbound;
pub use mock_channel::MockChannel;
pub use mock_provider::{MockProvider, ProviderCall};
