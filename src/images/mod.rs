pub mod client;
pub mod convert;
pub mod mirror;

pub use client::*;
pub use convert::*;
pub use mirror::*;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::config::ImageConfig;

/// Run [`mirror_set`] over every configured set, in order
pub fn mirror_images(
    config: &ImageConfig,
    fetcher: &impl ImageFetcher,
) -> Result<Vec<(PathBuf, MirrorStats)>> {
    let mut results = Vec::with_capacity(config.sets.len());
    for set in &config.sets {
        info!(csv = ?set.csv, "processing image set");
        let stats = mirror_set(set, &config.public_root, fetcher)?;
        results.push((set.csv.clone(), stats));
    }
    Ok(results)
}
