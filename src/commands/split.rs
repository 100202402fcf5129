//! Split command implementation.
//!
//! Splits a compacted edge list into equally sized part files so that
//! downstream loaders can ingest them in parallel. Every part repeats
//! the source file's header; the last part absorbs the remainder.

use crate::output::{read_edges, write_edge_slice};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the split command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SplitArgs {
    /// Path to the edge list CSV to split
    pub input: PathBuf,

    /// Directory the part files are written into
    pub output_dir: PathBuf,

    /// Number of part files to produce
    pub parts: usize,

    /// Part file name prefix; defaults to the input file stem
    pub prefix: Option<String>,
}

impl Default for SplitArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: PathBuf::from("chunks"),
            parts: crate::utils::config::DEFAULT_SPLIT_PARTS,
            prefix: None,
        }
    }
}

/// Execute the split command
///
/// **Public** - main entry point called from main.rs
///
/// Rows divide evenly across parts; when the count does not divide, the
/// last part takes the leftover rows. Parts can come out empty when
/// there are fewer rows than parts, which keeps file numbering stable
/// for loaders that expect a fixed fan-out.
///
/// # Errors
/// * Input read or parse errors
/// * File write errors
pub fn execute_split(args: SplitArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Splitting edge list: {}", args.input.display());

    // Step 1: Load the edge list
    info!("Step 1/2: Reading edge list...");
    let file = read_edges(&args.input)
        .context(format!("Failed to read edge list {}", args.input.display()))?;

    let total = file.edges.len();
    let chunk = total / args.parts;
    let header: Vec<&str> = file.header.iter().map(String::as_str).collect();

    let prefix = match &args.prefix {
        Some(prefix) => prefix.clone(),
        None => args
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "part".to_string()),
    };

    // Step 2: Write the parts
    info!(
        "Step 2/2: Writing {} parts of {} edges each...",
        args.parts, chunk
    );

    for index in 0..args.parts {
        let start = index * chunk;
        let end = if index == args.parts - 1 {
            total
        } else {
            start + chunk
        };

        let part_path = args
            .output_dir
            .join(format!("{}_{}.csv", prefix, index + 1));

        write_edge_slice(&header, &file.edges[start..end], &part_path)
            .context(format!("Failed to write part {}", index + 1))?;

        info!(
            "✓ Part {}/{}: {} edges -> {}",
            index + 1,
            args.parts,
            end - start,
            part_path.display()
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        "Split {} edges into {} parts in {:.2}s",
        total,
        args.parts,
        elapsed.as_secs_f64()
    );

    Ok(())
}

/// Validate split arguments
///
/// **Public** - can be called before execute_split for early validation
pub fn validate_args(args: &SplitArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.parts == 0 {
        anyhow::bail!("parts must be greater than 0");
    }

    if args.parts > 10_000 {
        anyhow::bail!("parts is too large (max 10000)");
    }

    Ok(())
}
