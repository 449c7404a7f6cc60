use crate::archive::{self, LoadedBackup};
use crate::config::{self, ToolConfig};
use crate::convert::convert_with_report;
use crate::format::BackupFormat;
use crate::logging::{self, LoggingOptions};
use crate::merge::merge_with_summary;
use crate::stats::LibraryStats;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Convert and merge Tachiyomi-fork manga backups (.tachibk)
#[derive(Parser)]
#[clap(name = "tachibk", version, about = "Convert and merge SY / Mihon / Neko / J2K backups")]
pub struct Cli {
    /// Config file, defaults to ~/.tachibk/config.json
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print library statistics of a backup
    Info {
        path: PathBuf,
        /// Read the file as this format instead of detecting it
        #[clap(long)]
        format: Option<BackupFormat>,
        /// Print the statistics as JSON
        #[clap(long)]
        json: bool,
    },
    /// Convert a backup to another format
    Convert {
        input: PathBuf,
        /// sy, mihon, neko or j2k
        target: BackupFormat,
        #[clap(short, long)]
        output: Option<PathBuf>,
        #[clap(long)]
        format: Option<BackupFormat>,
    },
    /// Merge backups into one SY backup
    Merge {
        #[clap(required = true)]
        inputs: Vec<PathBuf>,
        #[clap(short, long)]
        output: Option<PathBuf>,
        /// Read every input as this format instead of detecting it
        #[clap(long)]
        format: Option<BackupFormat>,
    },
}

/// Load config, set up logging and execute the command
pub fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };

    logging::init_logging(&LoggingOptions {
        level: config.log_level.clone(),
        file: config.log_file.clone(),
    })
    .context("Failed to initialize logging")?;

    let fallback = config.fallback_format()?;

    match cli.command {
        Commands::Info { path, format, json } => info(&path, format, fallback, json),
        Commands::Convert {
            input,
            target,
            output,
            format,
        } => convert(&config, &input, target, output, format, fallback),
        Commands::Merge {
            inputs,
            output,
            format,
        } => merge(&config, &inputs, output, format, fallback),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn info(path: &Path, format: Option<BackupFormat>, fallback: BackupFormat, json: bool) -> Result<()> {
    let loaded = archive::load_backup(path, format, fallback)?;
    let stats = LibraryStats::from_backup(&loaded.backup, loaded.format)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("File: {}", file_name(path));
        print!("{}", stats);
    }
    Ok(())
}

/// Default name for converted output, e.g. `converted_MIHON_library_sy.tachibk`
pub fn default_convert_name(target: BackupFormat, input: &Path) -> String {
    format!("converted_{}_{}", target.name(), file_name(input))
}

/// Default name for merged output, timestamped to the second
pub fn default_merge_name(now: chrono::DateTime<chrono::Local>) -> String {
    format!("merged_backup_{}.tachibk", now.format("%Y%m%d_%H%M%S"))
}

fn convert(
    config: &ToolConfig,
    input: &Path,
    target: BackupFormat,
    output: Option<PathBuf>,
    format: Option<BackupFormat>,
    fallback: BackupFormat,
) -> Result<()> {
    let loaded = archive::load_backup(input, format, fallback)?;
    tracing::info!("Converting {} -> {}...", loaded.format, target);

    let report = convert_with_report(&loaded.backup, loaded.format, target)?;

    let out_path =
        output.unwrap_or_else(|| config.output_path(&default_convert_name(target, input)));
    archive::save_backup(&report.backup, &out_path)?;

    let summary = report.summary();
    println!(
        "Converted {} manga {} -> {} ({} field(s) dropped), saved to {}",
        summary.manga,
        summary.source,
        summary.target,
        summary.dropped_fields,
        out_path.display()
    );
    Ok(())
}

fn merge(
    config: &ToolConfig,
    paths: &[PathBuf],
    output: Option<PathBuf>,
    format: Option<BackupFormat>,
    fallback: BackupFormat,
) -> Result<()> {
    let mut loaded: Vec<LoadedBackup> = Vec::new();
    for path in paths {
        match archive::load_backup(path, format, fallback) {
            Ok(backup) => loaded.push(backup),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "Skipping unreadable backup"),
        }
    }

    let (merged, summary) = loop {
        if loaded.is_empty() {
            bail!("No valid backups loaded");
        }

        tracing::info!("Merging {} backups...", loaded.len());
        let inputs = loaded
            .iter()
            .map(|l| (l.backup.clone(), l.format))
            .collect();

        match merge_with_summary(inputs) {
            Ok(result) => break result,
            Err(e) => match e.merge_input_index() {
                Some(index) if index < loaded.len() => {
                    let dropped = loaded.remove(index);
                    tracing::warn!(
                        path = %dropped.path.display(),
                        error = %e,
                        "Dropping backup that failed to merge"
                    );
                }
                _ => return Err(e.into()),
            },
        }
    };

    let out_path =
        output.unwrap_or_else(|| config.output_path(&default_merge_name(chrono::Local::now())));
    archive::save_backup(&merged, &out_path)?;

    println!(
        "Merged {} backups into {} manga ({} favorite upgrades), saved to {}",
        summary.inputs,
        summary.unique_manga,
        summary.favorite_upgrades,
        out_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_convert_name() {
        let name = default_convert_name(BackupFormat::Mihon, Path::new("/tmp/library_sy.tachibk"));
        assert_eq!(name, "converted_MIHON_library_sy.tachibk");
    }

    #[test]
    fn test_default_merge_name() {
        let now = chrono::Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(default_merge_name(now), "merged_backup_20240309_070501.tachibk");
    }

    #[test]
    fn test_cli_parses_formats() {
        let cli = Cli::try_parse_from(["tachibk", "convert", "a.tachibk", "J2K", "-o", "b.tachibk"])
            .unwrap();
        match cli.command {
            Commands::Convert { target, output, .. } => {
                assert_eq!(target, BackupFormat::J2k);
                assert_eq!(output, Some(PathBuf::from("b.tachibk")));
            }
            _ => panic!("expected convert"),
        }

        assert!(Cli::try_parse_from(["tachibk", "convert", "a.tachibk", "komikku"]).is_err());
        assert!(Cli::try_parse_from(["tachibk", "merge"]).is_err());
    }
}
