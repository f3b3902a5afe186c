use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::model::Building;

pub const DEFAULT_OUTPUT: &str = "assets/buildings.json";

/// Pretty-printed JSON exactly as written to disk (2-space indent, no
/// trailing newline).
pub fn to_json(buildings: &[Building]) -> Result<String> {
    serde_json::to_string_pretty(buildings).context("Failed to serialize buildings")
}

/// Replace `path` with the serialized directory, creating parent dirs.
pub fn write_directory(path: &Path, buildings: &[Building]) -> Result<()> {
    let json = to_json(buildings)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} buildings to {}", buildings.len(), path.display());
    Ok(())
}

pub fn read_directory(path: &Path) -> Result<Vec<Building>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid building directory {}", path.display()))
}
