use anyhow::{Context, Result};
use fleet_tables::{
    cli::{Cli, Commands},
    config::Config,
    images::{mirror_images, HttpFetcher, MirrorStats},
    reconcile::Reconciliation,
    sync::{sync_defenses, sync_weapons, JoinPaths},
};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let (mut config, source) = Config::discover(cli.config.as_deref())?;

    match cli.command {
        Commands::Weapons {
            ships,
            weapons,
            output,
            dry_run,
            json,
        } => {
            let paths = &config.paths;
            let ships = ships.unwrap_or_else(|| paths.ships.clone());
            let weapons = weapons.unwrap_or_else(|| paths.weapons.clone());
            let output = output.unwrap_or_else(|| paths.ship_weapons.clone());

            let result = sync_weapons(
                JoinPaths {
                    ships: &ships,
                    reference: &weapons,
                    output: &output,
                },
                &config.defaults,
                dry_run,
            )?;
            report(&result, &output, dry_run, json)?;
        }

        Commands::Defenses {
            ships,
            defenses,
            output,
            dry_run,
            json,
        } => {
            let paths = &config.paths;
            let ships = ships.unwrap_or_else(|| paths.ships.clone());
            let defenses = defenses.unwrap_or_else(|| paths.defenses.clone());
            let output = output.unwrap_or_else(|| paths.ship_defenses.clone());

            let result = sync_defenses(
                JoinPaths {
                    ships: &ships,
                    reference: &defenses,
                    output: &output,
                },
                dry_run,
            )?;
            report(&result, &output, dry_run, json)?;
        }

        Commands::Images {
            public_root,
            timeout,
        } => {
            let start = Instant::now();
            if let Some(root) = public_root {
                config.images.public_root = root;
            }
            if let Some(secs) = timeout {
                config.images.timeout_secs = secs;
            }

            let fetcher = HttpFetcher::new(Duration::from_secs(config.images.timeout_secs))?;
            let results = mirror_images(&config.images, &fetcher)?;

            let mut total = MirrorStats::default();
            for (_, stats) in &results {
                total += *stats;
            }

            println!("\nFinal results:");
            println!("  Successful downloads: {}", total.success);
            println!("  Skipped (already existed or already local): {}", total.skipped);
            println!("  Missing local files: {}", total.missing_local);
            println!("  Failed downloads: {}", total.failed);
            println!(
                "\nProcessed {} image set(s) in {:.1}s",
                results.len(),
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Config => {
            match source {
                Some(path) => println!("# loaded from {:?}", path),
                None => println!("# built-in defaults"),
            }
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn report<R: Serialize>(
    result: &Reconciliation<R>,
    output: &Path,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(result).context("Failed to serialize report")?;
        println!("{}", text);
        return Ok(());
    }

    for change in &result.changes {
        println!("{}", change);
    }

    if dry_run {
        println!("\nDry run: {:?} not written ({} rows).", output, result.rows.len());
    } else {
        println!("\n{:?} written with {} rows.", output, result.rows.len());
    }
    println!("Summary: {}", result.summary);
    if !result.warnings.is_empty() {
        println!("{} warning(s)", result.warnings.len());
    }

    Ok(())
}
