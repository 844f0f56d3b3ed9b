//! Image mirroring against a scratch public directory with an in-memory fetcher.

use anyhow::{anyhow, Result};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

use fleet_tables::config::{ImageConfig, ImageSet};
use fleet_tables::images::{mirror_images, mirror_set, ImageFetcher, MirrorStats};

/// Serves canned bytes per URL and records every request
#[derive(Default)]
struct FakeFetcher {
    responses: HashMap<String, Vec<u8>>,
    requested: RefCell<Vec<String>>,
}

impl FakeFetcher {
    fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), bytes);
        self
    }
}

impl ImageFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.requested.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("404 Not Found"))
    }
}

fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([200, 40, 40])))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode fixture");
    bytes
}

struct Scratch {
    dir: TempDir,
}

impl Scratch {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("public/images/ships")).unwrap();
        Self { dir }
    }

    fn set(&self, csv_name: &str, csv: &str) -> ImageSet {
        let csv_path = self.dir.path().join(csv_name);
        fs::write(&csv_path, csv).unwrap();
        ImageSet {
            csv: csv_path,
            image_dir: self.dir.path().join("public/images/ships"),
            public_path: "images/ships".into(),
        }
    }

    fn public_root(&self) -> std::path::PathBuf {
        self.dir.path().join("public")
    }
}

#[test]
fn remote_images_are_mirrored_and_csv_rewritten() {
    let scratch = Scratch::new();
    let set = scratch.set(
        "ships.csv",
        "ship_id,name,image_src,hp\n1,Star Cruiser,https://cdn.test/cruiser.png,300\n",
    );
    let fetcher = FakeFetcher::default().with("https://cdn.test/cruiser.png", png_bytes());

    let stats = mirror_set(&set, &scratch.public_root(), &fetcher).unwrap();

    assert_eq!(
        stats,
        MirrorStats {
            success: 1,
            ..Default::default()
        }
    );
    let dest = set.image_dir.join("Star_Cruiser.webp");
    assert_eq!(
        image::guess_format(&fs::read(&dest).unwrap()).unwrap(),
        ImageFormat::WebP
    );
    assert_eq!(
        fs::read_to_string(&set.csv).unwrap(),
        "ship_id,name,image_src,hp\n1,Star Cruiser,images/ships/Star_Cruiser.webp,300\n"
    );
}

#[test]
fn existing_webp_is_reused_without_fetching() {
    let scratch = Scratch::new();
    let set = scratch.set("ships.csv", "name,image_src\nScout,http://cdn.test/scout.png\n");
    fs::write(set.image_dir.join("Scout.webp"), b"already here").unwrap();
    let fetcher = FakeFetcher::default();

    let stats = mirror_set(&set, &scratch.public_root(), &fetcher).unwrap();

    assert_eq!(stats.skipped, 1);
    assert!(fetcher.requested.borrow().is_empty());
    assert_eq!(
        fs::read_to_string(&set.csv).unwrap(),
        "name,image_src\nScout,images/ships/Scout.webp\n"
    );
}

#[test]
fn local_and_broken_rows_are_left_alone() {
    let scratch = Scratch::new();
    fs::write(scratch.public_root().join("images/ships/Hauler.webp"), b"x").unwrap();
    let csv = "name,image_src\n\
               Hauler,images/ships/Hauler.webp\n\
               Ghost,images/ships/Ghost.webp\n\
               Wreck,https://cdn.test/missing.png\n\
               ,https://cdn.test/anon.png\n\
               Blank,\n";
    let set = scratch.set("ships.csv", csv);
    let fetcher = FakeFetcher::default();

    let stats = mirror_set(&set, &scratch.public_root(), &fetcher).unwrap();

    assert_eq!(
        stats,
        MirrorStats {
            success: 0,
            failed: 3,
            skipped: 1,
            missing_local: 1,
        }
    );
    assert_eq!(
        *fetcher.requested.borrow(),
        vec!["https://cdn.test/missing.png".to_string()]
    );
    assert_eq!(fs::read_to_string(&set.csv).unwrap(), csv);
    assert!(!set.image_dir.join("Wreck.webp").exists());
}

#[test]
fn undecodable_download_counts_as_failed() {
    let scratch = Scratch::new();
    let set = scratch.set("ships.csv", "name,image_src\nDrone,https://cdn.test/drone.png\n");
    let fetcher = FakeFetcher::default().with("https://cdn.test/drone.png", b"<html>".to_vec());

    let stats = mirror_set(&set, &scratch.public_root(), &fetcher).unwrap();

    assert_eq!(stats.failed, 1);
    assert!(!set.image_dir.join("Drone.webp").exists());
}

#[test]
fn short_rows_count_as_failed_and_are_kept() {
    let scratch = Scratch::new();
    let set = scratch.set(
        "ships.csv",
        "name,image_src,hp\nScout\nDrone,https://cdn.test/drone.png,5\n",
    );
    let fetcher = FakeFetcher::default().with("https://cdn.test/drone.png", png_bytes());

    let stats = mirror_set(&set, &scratch.public_root(), &fetcher).unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.success, 1);
    assert_eq!(
        fs::read_to_string(&set.csv).unwrap(),
        "name,image_src,hp\nScout\nDrone,images/ships/Drone.webp,5\n"
    );
}

#[test]
fn missing_image_src_column_is_fatal() {
    let scratch = Scratch::new();
    let set = scratch.set("ships.csv", "name,picture\nScout,x.png\n");

    assert!(mirror_set(&set, &scratch.public_root(), &FakeFetcher::default()).is_err());
}

#[test]
fn every_configured_set_is_processed() {
    let scratch = Scratch::new();
    let ships = scratch.set("ships.csv", "name,image_src\nScout,https://cdn.test/a.png\n");
    let mut bosses = scratch.set("bosses.csv", "name,image_src\nOverlord,https://cdn.test/b.png\n");
    bosses.image_dir = scratch.dir.path().join("public/images/bosses");
    bosses.public_path = "images/bosses".into();

    let config = ImageConfig {
        public_root: scratch.public_root(),
        timeout_secs: 1,
        sets: vec![ships, bosses.clone()],
    };
    let fetcher = FakeFetcher::default()
        .with("https://cdn.test/a.png", png_bytes())
        .with("https://cdn.test/b.png", png_bytes());

    let results = mirror_images(&config, &fetcher).unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|(_, stats)| stats.success == 1));
    assert!(bosses.image_dir.join("Overlord.webp").exists());
    assert_eq!(
        fs::read_to_string(&bosses.csv).unwrap(),
        "name,image_src\nOverlord,images/bosses/Overlord.webp\n"
    );
}
