// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parley integration tests.
//!
//! Provides mock collaborators for fast, deterministic tests without a
//! network or a database.
//!
//! # Components
//!
//! - [`MockProvider`] - scripted model responses, records every request
//! - [`MemoryStore`] - in-memory conversation store that counts writes
//! - [`fixtures`] - settings, conversations and knowledge sources

pub mod fixtures;
pub mod memory_store;
pub mod mock_provider;

pub use memory_store::MemoryStore;
pub use mock_provider::MockProvider;
