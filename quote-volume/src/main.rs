//! # Print and save the daily summary table
//! quote-volume summary --option ashr --data data/quotes
//!
//! # Export the date-ordered volume series for plotting
//! quote-volume series --option ASHR --data data/quotes --output ashr.json
//!
//! # List the quote files that belong to an option
//! quote-volume files --option ASHR --data data/quotes
//!
//! # Write the effective configuration as a starting point
//! quote-volume init --data data/quotes --output quote-volume.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use quote_volume::report::{write_table, SeriesFormat, VolumeSeries};
use quote_volume::{DataLoader, Dataset, QuoteConfig};

#[derive(Parser)]
#[command(name = "quote-volume")]
#[command(about = "Daily call/put volume summaries from options quote files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the daily summary and write it to the table file
    Summary {
        /// Option symbol (case-insensitive)
        #[arg(short, long)]
        option: String,

        /// Path to data directory
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Output file for the summary table
        #[arg(long)]
        output: Option<PathBuf>,

        /// Skip files that fail to parse instead of aborting
        #[arg(long)]
        skip_invalid: bool,

        /// Print the dataset as JSON instead of the text table
        #[arg(long)]
        json: bool,
    },

    /// Write call/put totals ordered by date
    Series {
        /// Option symbol (case-insensitive)
        #[arg(short, long)]
        option: String,

        /// Path to data directory
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Output file for the series
        #[arg(long)]
        output: Option<PathBuf>,

        /// Series format: csv or json (default: from the output extension)
        #[arg(short, long)]
        format: Option<String>,

        /// Skip files that fail to parse instead of aborting
        #[arg(long)]
        skip_invalid: bool,
    },

    /// List the quote files that belong to an option
    Files {
        /// Option symbol (case-insensitive)
        #[arg(short, long)]
        option: String,

        /// Path to data directory
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Write the effective configuration to a TOML file
    Init {
        /// Path to data directory
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Destination of the configuration file
        #[arg(long, default_value = "quote-volume.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quote_volume=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => QuoteConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => QuoteConfig::default(),
    };

    match cli.command {
        Commands::Summary {
            option,
            data,
            output,
            skip_invalid,
            json,
        } => {
            apply_overrides(&mut config, data, skip_invalid);
            if let Some(output) = output {
                config.table_output = output;
            }
            cmd_summary(&config, &option, json)?;
        }
        Commands::Series {
            option,
            data,
            output,
            format,
            skip_invalid,
        } => {
            apply_overrides(&mut config, data, skip_invalid);
            if let Some(output) = output {
                config.series_output = output;
            }
            let format = match format {
                Some(f) => f.parse::<SeriesFormat>()?,
                None => SeriesFormat::from_path(&config.series_output),
            };
            cmd_series(&config, &option, format)?;
        }
        Commands::Files { option, data } => {
            apply_overrides(&mut config, data, false);
            cmd_files(&config, &option)?;
        }
        Commands::Init {
            data,
            output,
            force,
        } => {
            apply_overrides(&mut config, data, false);
            cmd_init(&config, &output, force)?;
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut QuoteConfig, data: Option<PathBuf>, skip_invalid: bool) {
    if let Some(data) = data {
        config.data_dir = data;
    }
    config.skip_invalid_files |= skip_invalid;
}

/// Option symbols in quote files are upper case.
fn normalize_option(raw: &str) -> Result<String> {
    let option = raw.trim().to_uppercase();
    anyhow::ensure!(!option.is_empty(), "Option name must not be empty");
    Ok(option)
}

fn load_dataset(config: &QuoteConfig, option: &str) -> Result<Dataset> {
    let option = normalize_option(option)?;
    let loader = DataLoader::from_config(config);
    let dataset = loader
        .load(&config.data_dir, &option)
        .with_context(|| format!("Failed to load quote data for {}", option))?;

    for skipped in dataset.skipped() {
        warn!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    Ok(dataset)
}

fn cmd_summary(config: &QuoteConfig, option: &str, json: bool) -> Result<()> {
    let dataset = load_dataset(config, option)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
    } else {
        print!("{}", dataset);
    }

    write_table(&config.table_output, dataset.days()).with_context(|| {
        format!("Failed to write table {}", config.table_output.display())
    })?;
    info!(
        "Wrote {} trading days to {}",
        dataset.len(),
        config.table_output.display()
    );
    Ok(())
}

fn cmd_series(config: &QuoteConfig, option: &str, format: SeriesFormat) -> Result<()> {
    let dataset = load_dataset(config, option)?;
    let series = VolumeSeries::from_days(dataset.option(), dataset.days())?;

    series
        .save(&config.series_output, format)
        .with_context(|| format!("Failed to write series {}", config.series_output.display()))?;

    if let Some((first, last)) = series.date_range() {
        info!(
            "Wrote {} points ({} to {}) to {}",
            series.len(),
            first,
            last,
            config.series_output.display()
        );
    }
    Ok(())
}

fn cmd_files(config: &QuoteConfig, option: &str) -> Result<()> {
    let option = normalize_option(option)?;
    let loader = DataLoader::from_config(config);
    let files = loader.matching_files(&config.data_dir, &option)?;

    for path in &files {
        println!("{}", path.display());
    }
    info!("{} quote files for {}", files.len(), option);
    Ok(())
}

fn cmd_init(config: &QuoteConfig, output: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !output.exists(),
        "{} already exists (use --force to overwrite)",
        output.display()
    );
    config
        .save(output)
        .with_context(|| format!("Failed to write config {}", output.display()))?;
    info!("Wrote configuration to {}", output.display());
    Ok(())
}
