use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Catalog;
use crate::services::assembler::BuildSummary;
use crate::services::output::write_atomic;

/// Write the catalog as pretty-printed JSON (`data.json`)
pub fn write_catalog_json(catalog: &Catalog, path: &Path) -> Result<usize> {
    let bytes = serde_json::to_vec_pretty(catalog).context("Failed to serialize catalog")?;
    write_atomic(path, &bytes)
}

/// Write the build summary next to the catalog
pub fn write_report_json(summary: &BuildSummary, path: &Path) -> Result<usize> {
    let bytes = serde_json::to_vec_pretty(summary).context("Failed to serialize build report")?;
    write_atomic(path, &bytes)
}
