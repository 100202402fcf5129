//! User-stats command implementation.
//!
//! Aggregates a compacted edge list into per-panelist browsing totals
//! and writes them as a small CSV for dashboards.

use crate::compactor::calculate_user_stats;
use crate::output::{read_edges, write_user_stats};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the user-stats command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct UserStatsArgs {
    /// Path to the compacted edge list
    pub edges: PathBuf,

    /// Output path for the statistics CSV
    pub output: PathBuf,

    /// Panelists to report on, in output order; empty selects every
    /// panelist in the edge list
    pub users: Vec<String>,
}

impl Default for UserStatsArgs {
    fn default() -> Self {
        Self {
            edges: PathBuf::new(),
            output: PathBuf::from("user_stats.csv"),
            users: Vec::new(),
        }
    }
}

/// Execute the user-stats command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Edge list read or parse errors
/// * File write errors
pub fn execute_user_stats(args: UserStatsArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Computing panelist statistics from: {}", args.edges.display());

    // Step 1: Load the edge list
    info!("Step 1/2: Reading edge list...");
    let file = read_edges(&args.edges)
        .context(format!("Failed to read edge list {}", args.edges.display()))?;

    // Step 2: Aggregate and write
    info!("Step 2/2: Aggregating per-panelist totals...");
    let stats = calculate_user_stats(&file.edges, &args.users);

    write_user_stats(&stats, &args.output).context("Failed to write statistics")?;
    info!("✓ Statistics for {} panelists written to: {}", stats.len(), args.output.display());

    let elapsed = start_time.elapsed();
    info!("User statistics completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate user-stats arguments
///
/// **Public** - can be called before execute_user_stats for early validation
pub fn validate_args(args: &UserStatsArgs) -> Result<()> {
    if args.edges.as_os_str().is_empty() {
        anyhow::bail!("Edge list path cannot be empty");
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    Ok(())
}
