// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge-base retrieval decisions for the Parley support engine.
//!
//! Two model-backed classifiers run before the context is assembled:
//! - [`RetrievalGate`] decides whether a question needs the knowledge base at all.
//! - [`SourceSelector`] picks a bounded subset of sources for a question.
//!
//! Neither ever fails the request. The gate falls back to "retrieve", the
//! selector falls back to the first sources in configured order.

pub mod cache;
pub mod gate;
pub mod selector;

mod json;

pub use cache::SelectionCache;
pub use gate::RetrievalGate;
pub use selector::SourceSelector;
