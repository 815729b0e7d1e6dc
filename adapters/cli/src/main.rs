#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a Tower Arena map headlessly.

mod host;
mod render;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tower_arena_core::GenerationConfig;
use tower_arena_system_generation::Generator;

use crate::{host::RecordingHost, render::ArenaDocument};

/// Output representation of the generated arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// ASCII map followed by a summary.
    Ascii,
    /// JSON document with the grid snapshot and prop requests.
    Json,
}

/// Command-line arguments accepted by the generator.
#[derive(Debug, Parser)]
#[command(author, version, about = "Procedural tower defense arena generator", long_about = None)]
struct Args {
    /// TOML file with generation settings; omitted keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed overriding the configured one
    #[arg(long)]
    seed: Option<u64>,

    /// Grid width in tiles
    #[arg(long)]
    width: Option<u32>,

    /// Grid height in tiles
    #[arg(long)]
    height: Option<u32>,

    /// Number of enemy paths
    #[arg(long)]
    paths: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Ascii)]
    format: Format,
}

impl Args {
    /// Loads the configuration file, if any, and applies command-line overrides.
    fn resolve_config(&self) -> Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let contents = fs::read_to_string(path).with_context(|| {
                    format!("failed to read generation config at {}", path.display())
                })?;
                toml::from_str(&contents).with_context(|| {
                    format!("failed to parse generation config at {}", path.display())
                })?
            }
            None => GenerationConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(paths) = self.paths {
            config.paths.count = paths;
        }
        Ok(config)
    }
}

/// Entry point for the Tower Arena command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    let mut generator = Generator::new();
    let mut host = RecordingHost::default();
    let report = generator
        .regenerate(&config, host.collaborators())
        .context("arena generation rejected the configuration")?;
    let grid = generator.grid();

    match args.format {
        Format::Ascii => {
            print!("{}", render::ascii_map(grid, &host));
            println!();
            print!("{}", render::summary(grid, &report, &host));
        }
        Format::Json => {
            let document = ArenaDocument::new(grid, &report);
            let json = serde_json::to_string_pretty(&document)
                .context("failed to serialise the generated arena")?;
            println!("{json}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let args = Args::parse_from([
            "tower-arena",
            "--seed",
            "17",
            "--width",
            "30",
            "--paths",
            "2",
            "--format",
            "json",
        ]);
        let config = args.resolve_config().expect("no file to read");

        assert_eq!(args.format, Format::Json);
        assert_eq!(config.seed, 17);
        assert_eq!(config.grid.width, 30);
        assert_eq!(config.grid.height, 50);
        assert_eq!(config.paths.count, 2);
    }

    #[test]
    fn missing_config_file_reports_the_path() {
        let args = Args::parse_from(["tower-arena", "--config", "/nonexistent/arena.toml"]);
        let error = args.resolve_config().expect_err("file does not exist");
        assert!(
            error.to_string().contains("/nonexistent/arena.toml"),
            "unexpected error: {error}"
        );
    }

    #[test]
    fn ascii_map_covers_every_row() {
        let mut config = GenerationConfig::default();
        config.grid.width = 20;
        config.grid.height = 12;
        config.paths.count = 1;
        config.paths.min_spawn_distance = 4.0;
        config.paths.max_spawn_distance = 5.0;

        let mut generator = Generator::new();
        let mut host = RecordingHost::default();
        let report = generator
            .regenerate(&config, host.collaborators())
            .expect("valid configuration");

        let map = render::ascii_map(generator.grid(), &host);
        let rows: Vec<&str> = map.lines().collect();
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|row| row.chars().count() == 20));
        assert_eq!(map.matches('T').count(), 1);
        assert_eq!(map.matches('S').count(), 1);

        let summary = render::summary(generator.grid(), &report, &host);
        assert!(summary.contains("registered 1 of 1 spawners"), "{summary}");

        let json = serde_json::to_string(&ArenaDocument::new(generator.grid(), &report))
            .expect("document serialises");
        assert!(json.contains("\"registered_spawners\":1"));
    }
}
