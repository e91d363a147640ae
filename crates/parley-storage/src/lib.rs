// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite conversation store for the Parley support engine.
//!
//! WAL-mode SQLite with embedded migrations. All statements run on
//! `tokio-rusqlite`'s single background thread, so writes are serialized.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
