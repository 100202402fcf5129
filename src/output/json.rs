//! JSON writers for run reports and node statistics.
//!
//! Reports are pretty-printed so they stay diffable in version control.

use crate::parser::schema::{CompactionReport, NodeStats};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::{file_size, prepare_parent_dirs, validate_output_path};

/// Write a compaction report to a JSON file
///
/// **Public** - main entry point for report output
///
/// # Arguments
/// * `report` - report data to write
/// * `output_path` - path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - path cannot be created or is invalid
pub fn write_report(
    report: &CompactionReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;
    prepare_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!(
        "Report written successfully ({} bytes)",
        file_size(output_path)
    );

    Ok(())
}

/// Read a compaction report from a JSON file
///
/// **Public** - useful for tooling and tests
pub fn read_report(input_path: impl AsRef<Path>) -> Result<CompactionReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: CompactionReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} edges",
        report.version, report.edge_count
    );

    Ok(report)
}

/// Write node statistics to a JSON file
///
/// **Public** - file output of the node-stats subcommand
pub fn write_node_stats(
    stats: &NodeStats,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing node statistics to: {}", output_path.display());

    validate_output_path(output_path)?;
    prepare_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, stats).map_err(OutputError::SerializationFailed)?;

    Ok(())
}
