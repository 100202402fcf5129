//! Compact command implementation.
//!
//! The compact command:
//! 1. Reads the raw clickstream CSV
//! 2. Groups visits into per-panelist timelines
//! 3. Sorts each timeline by timestamp
//! 4. Collapses timelines into domain-transition edges
//! 5. Writes the edge list, the domain inventory, and optionally a report

use crate::compactor::{
    build_report, calculate_dwell_summary, calculate_top_transitions, collect_domains,
    compact_all, group_by_panelist, sort_timelines,
};
use crate::output::{write_domains, write_edges, write_report};
use crate::parser::parse_clickstream;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the compact command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CompactArgs {
    /// Path to the raw clickstream CSV
    pub input: PathBuf,

    /// Output path for the edge list CSV
    pub output_edges: PathBuf,

    /// Output path for the domain inventory
    pub output_domains: PathBuf,

    /// Output path for the JSON run report (optional)
    pub output_report: Option<PathBuf>,

    /// Number of top transitions to include in the report
    pub top_transitions: usize,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for CompactArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_edges: PathBuf::from("edges.csv"),
            output_domains: PathBuf::from("domain_set.txt"),
            output_report: None,
            top_transitions: 20,
            print_summary: false,
        }
    }
}

/// Execute the compact command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Compact command arguments
///
/// # Returns
/// Ok if compaction succeeds, Err with context if any step fails
///
/// # Errors
/// * Input read or parse errors
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = CompactArgs {
///     input: PathBuf::from("browsing.csv"),
///     ..Default::default()
/// };
///
/// execute_compact(args)?;
/// ```
pub fn execute_compact(args: CompactArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting compaction of: {}", args.input.display());

    // Step 1: Read the raw clickstream
    info!("Step 1/5: Reading clickstream rows...");
    let file = File::open(&args.input)
        .context(format!("Failed to open input file {}", args.input.display()))?;
    let visits = parse_clickstream(BufReader::new(file))
        .context("Failed to parse clickstream input")?;
    let visit_count = visits.len() as u64;

    debug!("Read {} visits", visit_count);

    // Step 2: Collect domains and group into timelines
    info!("Step 2/5: Grouping visits by panelist...");
    let domains = collect_domains(&visits);
    let mut timelines = group_by_panelist(visits);
    let panelist_count = timelines.len() as u64;

    debug!(
        "{} panelists, {} distinct domains",
        panelist_count,
        domains.len()
    );

    // Step 3: Sort timelines
    info!("Step 3/5: Sorting timelines by timestamp...");
    sort_timelines(&mut timelines);

    // Step 4: Compact
    info!("Step 4/5: Collapsing timelines into edges...");
    let edges = compact_all(&timelines);

    let dwell = calculate_dwell_summary(&edges);
    info!("Dwell distribution: {}", dwell.summary());
    if dwell.is_heavy_tailed() {
        debug!("Dwell time concentrates in a small share of edges");
    }

    // Step 5: Write outputs
    info!("Step 5/5: Writing output files...");

    write_edges(&edges, &args.output_edges).context("Failed to write edge list")?;
    info!("✓ Edge list written to: {}", args.output_edges.display());

    write_domains(&domains, &args.output_domains).context("Failed to write domain list")?;
    info!("✓ Domain list written to: {}", args.output_domains.display());

    if let Some(report_path) = &args.output_report {
        let report = build_report(
            &args.input.display().to_string(),
            visit_count,
            panelist_count,
            domains.len() as u64,
            &edges,
            args.top_transitions,
        );
        write_report(&report, report_path).context("Failed to write report")?;
        info!("✓ Report written to: {}", report_path.display());
    }

    // Print text summary (if requested)
    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("COMPACTION SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Input:     {}", args.input.display());
        println!("Visits:    {}", visit_count);
        println!("Panelists: {}", panelist_count);
        println!("Edges:     {}", edges.len());
        println!("Domains:   {}", domains.len());
        println!("\nDwell: {}", dwell.summary());

        let busiest = calculate_top_transitions(&edges, 10);
        if !busiest.is_empty() {
            println!("\nTop transitions:");
            for transition in &busiest {
                println!(
                    "  {:>6}x ({:>5.1}%)  {} -> {}",
                    transition.traversals,
                    transition.percentage,
                    transition.origin,
                    transition.target
                );
            }
        }
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Compaction completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate compact arguments
///
/// **Public** - can be called before execute_compact for early validation
///
/// # Arguments
/// * `args` - Arguments to validate
///
/// # Returns
/// Ok if arguments are valid, Err with message if not
pub fn validate_args(args: &CompactArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.top_transitions == 0 {
        anyhow::bail!("top_transitions must be greater than 0");
    }

    if args.top_transitions > 1000 {
        anyhow::bail!("top_transitions is too large (max 1000)");
    }

    Ok(())
}

/// Quick compaction with defaults (convenience function)
///
/// **Public** - simplified API for common use case
///
/// # Arguments
/// * `input` - path to the raw clickstream CSV
///
/// # Returns
/// Paths to generated files (edges, domains)
pub fn quick_compact(input: &str) -> Result<(PathBuf, PathBuf)> {
    let args = CompactArgs {
        input: PathBuf::from(input),
        ..Default::default()
    };

    execute_compact(args.clone())?;

    Ok((args.output_edges, args.output_domains))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_valid() {
        let args = CompactArgs {
            input: PathBuf::from("browsing.csv"),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        let args = CompactArgs::default();

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_transitions_zero() {
        let args = CompactArgs {
            input: PathBuf::from("browsing.csv"),
            top_transitions: 0,
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_transitions_too_large() {
        let args = CompactArgs {
            input: PathBuf::from("browsing.csv"),
            top_transitions: 2000,
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }
}
