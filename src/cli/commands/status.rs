//! Status command implementation
//!
//! This module implements the `status` command, which lists the files each
//! recipe produces together with their size, record count and checksum.

use crate::config::{load_config, RecipeConfig, RecipeKind};
use crate::core::output::checksum_bytes;
use crate::core::recipe::substitute;
use crate::domain::bracket::load_brackets;
use crate::domain::FixtureFormat;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// Characters of the SHA-256 shown in the table
const SHORT_CHECKSUM_LEN: usize = 12;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only show these recipes (comma-separated names)
    #[arg(long, value_delimiter = ',')]
    pub recipe: Vec<String>,
}

/// Something a recipe writes
#[derive(Debug, Clone, PartialEq)]
enum OutputTarget {
    File(PathBuf, FixtureFormat),
    Directory(PathBuf),
}

/// What is on disk for one output file
#[derive(Debug, Clone, PartialEq)]
struct FileStatus {
    bytes: u64,
    records: Option<usize>,
    checksum: String,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking fixture status");

        println!("📊 Fixture Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let recipes = match config.select_recipes(&self.recipe) {
            Ok(r) => r,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };

        if recipes.is_empty() {
            println!("No recipes configured.");
            println!("Add a [[recipes]] entry to {config_path} and run 'courtside export'.");
            return Ok(0);
        }

        println!(
            "{:<22} {:<56} {:>10} {:>8} {:<14}",
            "Recipe", "Output", "Size", "Records", "SHA-256"
        );
        println!("{}", "-".repeat(114));

        for recipe in recipes {
            for target in output_targets(recipe) {
                match target {
                    OutputTarget::File(path, format) => print_file(&recipe.name, &path, format),
                    OutputTarget::Directory(path) => print_directory(&recipe.name, &path),
                }
            }
        }

        println!();
        Ok(0)
    }
}

/// Files and directories a recipe writes, with `{season}` resolved
fn output_targets(recipe: &RecipeConfig) -> Vec<OutputTarget> {
    match &recipe.kind {
        RecipeKind::PlayoffBrackets(brackets) => {
            let seasons = if brackets.seasons.is_empty() {
                match load_brackets(&brackets.input) {
                    Ok(all) => all.into_iter().map(|b| b.season).collect(),
                    Err(e) => {
                        tracing::warn!(recipe = %recipe.name, error = %e, "Cannot list bracket seasons");
                        Vec::new()
                    }
                }
            } else {
                brackets.seasons.clone()
            };
            seasons
                .iter()
                .map(|s| {
                    OutputTarget::File(PathBuf::from(recipe.output_path(Some(s))), recipe.format())
                })
                .collect()
        }
        RecipeKind::Logos(_) => vec![OutputTarget::Directory(PathBuf::from(&recipe.output))],
        RecipeKind::TeamSchedules(schedule) => {
            let mut targets = vec![OutputTarget::File(
                PathBuf::from(recipe.output_path(None)),
                recipe.format(),
            )];
            if let Some(csv_output) = &schedule.csv_output {
                targets.push(OutputTarget::File(
                    PathBuf::from(substitute(csv_output, recipe.season.as_ref(), None)),
                    FixtureFormat::Csv,
                ));
            }
            targets
        }
        _ => vec![OutputTarget::File(
            PathBuf::from(recipe.output_path(None)),
            recipe.format(),
        )],
    }
}

fn file_status(path: &Path, format: FixtureFormat) -> Option<FileStatus> {
    let bytes = fs::read(path).ok()?;
    Some(FileStatus {
        bytes: bytes.len() as u64,
        records: format.count_records(&bytes).ok(),
        checksum: checksum_bytes(&bytes),
    })
}

fn print_file(recipe: &str, path: &Path, format: FixtureFormat) {
    match file_status(path, format) {
        Some(status) => println!(
            "{:<22} {:<56} {:>10} {:>8} {:<14}",
            recipe,
            path.display(),
            status.bytes,
            status
                .records
                .map(|r| r.to_string())
                .unwrap_or_else(|| "?".to_string()),
            &status.checksum[..SHORT_CHECKSUM_LEN]
        ),
        None => println!(
            "{:<22} {:<56} {:>10} {:>8} {:<14}",
            recipe,
            path.display(),
            "-",
            "-",
            "❌ missing"
        ),
    }
}

fn print_directory(recipe: &str, dir: &Path) {
    let logos = count_logos(dir);
    let label = format!("{}/", dir.display());
    if dir.is_dir() {
        println!(
            "{:<22} {:<56} {:>10} {:>8} {:<14}",
            recipe, label, "-", logos, "(logo files)"
        );
    } else {
        println!(
            "{:<22} {:<56} {:>10} {:>8} {:<14}",
            recipe, label, "-", "-", "❌ missing"
        );
    }
}

/// Number of `*_logo.svg` files in a directory
fn count_logos(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().ends_with("_logo.svg"))
                .count()
        })
        .unwrap_or(0)
}
