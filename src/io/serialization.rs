// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Tour serialization and deserialization.
//!
//! This module handles exporting and importing tour definitions in YAML
//! and JSON formats. Imported tours are validated before they are handed
//! back, so a dangling hotspot target fails here rather than at runtime.

use crate::models::tour::Tour;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Tour file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|s| s.to_str());
        match extension {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => bail!("Unsupported file extension: {:?}", extension),
        }
    }
}

/// Parse and validate a tour from text.
pub fn parse_tour(text: &str, format: Format) -> Result<Tour> {
    let tour: Tour = match format {
        Format::Yaml => serde_yaml::from_str(text)?,
        Format::Json => serde_json::from_str(text)?,
    };
    let tour = tour.into_validated()?;
    Ok(tour)
}

/// Render a tour as text.
pub fn format_tour(tour: &Tour, format: Format) -> Result<String> {
    let text = match format {
        Format::Yaml => serde_yaml::to_string(tour)?,
        Format::Json => serde_json::to_string_pretty(tour)?,
    };
    Ok(text)
}

/// Import a tour from a YAML or JSON file.
pub fn import_tour(path: &Path) -> Result<Tour> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tour {}", path.display()))?;
    let tour = parse_tour(&text, format)
        .with_context(|| format!("Invalid tour {}", path.display()))?;
    log::info!(
        "Imported tour '{}' with {} levels from {}",
        tour.title,
        tour.levels.len(),
        path.display()
    );
    Ok(tour)
}

/// Export a tour to a YAML or JSON file.
pub fn export_tour(tour: &Tour, path: &Path) -> Result<()> {
    let format = Format::from_path(path)?;
    let text = format_tour(tour, format)?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write tour {}", path.display()))?;
    Ok(())
}
