// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading bot settings from disk.

use std::path::Path;

use parley_core::{AppSettings, ParleyError};
use tracing::debug;

/// Read bot settings from a JSON file.
pub fn load_settings(path: &Path) -> Result<AppSettings, ParleyError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ParleyError::Config(format!("cannot read settings {}: {e}", path.display()))
    })?;
    let settings: AppSettings = serde_json::from_str(&raw).map_err(|e| {
        ParleyError::Config(format!("invalid settings {}: {e}", path.display()))
    })?;
    debug!(
        path = %path.display(),
        brand = %settings.appearance.brand_name,
        knowledge = settings.knowledge_base.len(),
        qna = settings.qna.len(),
        "bot settings loaded"
    );
    Ok(settings)
}
