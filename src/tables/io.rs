use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use super::{TableError, TableLayout};

/// Read every row of a CSV table, checking its header against `layout` first
pub fn read_table<T: DeserializeOwned>(path: &Path, layout: &TableLayout) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {:?}", path))?
        .clone();
    layout.check_headers(&headers)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        // Header is line 1
        let row = result.map_err(|e| TableError::Parse {
            table: layout.name,
            line: idx + 2,
            message: e.to_string(),
        })?;
        rows.push(row);
    }

    debug!(table = layout.name, rows = rows.len(), "loaded {:?}", path);
    Ok(rows)
}

/// Like [`read_table`], but a missing file yields `None`
pub fn read_optional_table<T: DeserializeOwned>(
    path: &Path,
    layout: &TableLayout,
) -> Result<Option<Vec<T>>> {
    if !path.exists() {
        debug!(table = layout.name, "no existing table at {:?}", path);
        return Ok(None);
    }
    read_table(path, layout).map(Some)
}

/// Replace `path` with `rows`, writing the layout's columns as the header
pub fn write_table<T: Serialize>(path: &Path, layout: &TableLayout, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    writer
        .write_record(layout.required.iter().map(|c| c.name))
        .context("Failed to write header")?;

    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row to {:?}", path))?;
    }

    writer.flush().with_context(|| format!("Failed to flush {:?}", path))?;
    Ok(())
}
