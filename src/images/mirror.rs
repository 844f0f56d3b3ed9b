use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::ops::AddAssign;
use std::path::Path;
use tracing::{debug, info, warn};

use super::client::{is_remote, ImageFetcher};
use super::convert::{convert_to_webp, file_stem};
use crate::config::ImageSet;
use crate::tables::IMAGE_SOURCES;

/// Per-row result of a mirror pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Success,
    Skipped,
    MissingLocal,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MirrorStats {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
    pub missing_local: usize,
}

impl MirrorStats {
    pub fn record(&mut self, status: RowStatus) {
        match status {
            RowStatus::Success => self.success += 1,
            RowStatus::Skipped => self.skipped += 1,
            RowStatus::MissingLocal => self.missing_local += 1,
            RowStatus::Failed => self.failed += 1,
        }
    }
}

impl AddAssign for MirrorStats {
    fn add_assign(&mut self, other: Self) {
        self.success += other.success;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.missing_local += other.missing_local;
    }
}

/// Mirror every remote `image_src` of one CSV into `set.image_dir` as WebP,
/// then rewrite the CSV in place. Columns other than `image_src` are kept
/// as they were.
pub fn mirror_set(
    set: &ImageSet,
    public_root: &Path,
    fetcher: &impl ImageFetcher,
) -> Result<MirrorStats> {
    fs::create_dir_all(&set.image_dir)
        .with_context(|| format!("Failed to create {:?}", set.image_dir))?;

    // Hand-edited sheets may have short rows; those are kept as they are
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_path(&set.csv)
        .with_context(|| format!("Failed to open {:?}", set.csv))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {:?}", set.csv))?
        .clone();
    IMAGE_SOURCES.check_headers(&headers)?;

    let name_col = column_index(&headers, "name")?;
    let src_col = column_index(&headers, "image_src")?;

    let records = reader
        .records()
        .collect::<Result<Vec<StringRecord>, _>>()
        .with_context(|| format!("Failed to read {:?}", set.csv))?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:30} [{bar:40.cyan/blue}] {pos}/{len}")
            .context("Invalid progress template")?
            .progress_chars("=>-"),
    );
    pb.set_message(set.public_path.clone());

    let mut stats = MirrorStats::default();
    let mut updated = Vec::with_capacity(records.len());

    for record in records {
        let name = record.get(name_col).unwrap_or_default().trim();
        let src = record.get(src_col).unwrap_or_default().trim();

        let (status, new_src) = pb.suspend(|| mirror_row(name, src, set, public_root, fetcher));
        stats.record(status);

        updated.push(match new_src {
            Some(new_src) => replace_field(&record, src_col, &new_src),
            None => record,
        });
        pb.inc(1);
    }

    pb.finish_and_clear();
    write_records(&set.csv, &headers, &updated)?;

    info!(
        csv = ?set.csv,
        success = stats.success,
        skipped = stats.skipped,
        missing_local = stats.missing_local,
        failed = stats.failed,
        "image set processed"
    );
    Ok(stats)
}

/// Handle one row. Returns the status and, when the row now points at a
/// mirrored file, its new `image_src`.
fn mirror_row(
    name: &str,
    src: &str,
    set: &ImageSet,
    public_root: &Path,
    fetcher: &impl ImageFetcher,
) -> (RowStatus, Option<String>) {
    if name.is_empty() || src.is_empty() {
        return (RowStatus::Failed, None);
    }

    if !is_remote(src) {
        if public_root.join(src).exists() {
            return (RowStatus::Skipped, None);
        }
        warn!("Local file missing for {}: {}", name, src);
        return (RowStatus::MissingLocal, None);
    }

    let file_name = format!("{}.webp", file_stem(name));
    let dest = set.image_dir.join(&file_name);
    let public_src = format!("{}/{}", set.public_path.trim_end_matches('/'), file_name);

    if dest.exists() {
        debug!("Skipping {}: already exists", name);
        return (RowStatus::Skipped, Some(public_src));
    }

    info!("Downloading {} from {}", name, src);
    let result = fetcher
        .fetch(src)
        .and_then(|bytes| convert_to_webp(&bytes, &dest));

    match result {
        Ok(()) => {
            info!("Saved {:?}", dest);
            (RowStatus::Success, Some(public_src))
        }
        Err(e) => {
            warn!("Failed to download/convert {} from {}: {:#}", name, src, e);
            (RowStatus::Failed, None)
        }
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("Missing column '{}'", name))
}

fn replace_field(record: &StringRecord, idx: usize, value: &str) -> StringRecord {
    record
        .iter()
        .enumerate()
        .map(|(i, field)| if i == idx { value } else { field })
        .collect()
}

fn write_records(path: &Path, headers: &StringRecord, records: &[StringRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    writer.write_record(headers).context("Failed to write header")?;
    for record in records {
        writer
            .write_record(record)
            .with_context(|| format!("Failed to write row to {:?}", path))?;
    }
    writer.flush().with_context(|| format!("Failed to flush {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_field_keeps_other_columns() {
        let record = StringRecord::from(vec!["Scout", "http://x/a.png", "fast"]);
        let replaced = replace_field(&record, 1, "images/ships/Scout.webp");
        assert_eq!(
            replaced,
            StringRecord::from(vec!["Scout", "images/ships/Scout.webp", "fast"])
        );
    }

    #[test]
    fn test_stats_add_assign() {
        let mut total = MirrorStats {
            success: 1,
            ..Default::default()
        };
        total += MirrorStats {
            success: 2,
            failed: 1,
            skipped: 3,
            missing_local: 0,
        };
        assert_eq!(total.success, 3);
        assert_eq!(total.skipped, 3);
        assert_eq!(total.failed, 1);
    }
}
