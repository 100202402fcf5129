//! CSV and plain-text writers for compaction outputs.
//!
//! Edge lists travel as CSV with a fixed eight-column header. The domain
//! inventory is one domain per line. Reading an edge list back is also
//! here, since split and the stats subcommands consume what compact
//! wrote.

use crate::parser::csv::{write_record, CsvReader, Record};
use crate::parser::schema::{Edge, UserStats};
use crate::utils::config::{EDGE_CSV_HEADER, USER_STATS_CSV_HEADER};
use crate::utils::error::{OutputError, ParseError};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::{file_size, prepare_parent_dirs, validate_output_path};

/// Write an edge list as CSV under the standard header
///
/// **Public** - main edge output path
///
/// # Arguments
/// * `edges` - edges in emission order
/// * `output_path` - path to the output CSV file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - path cannot be created or is invalid
pub fn write_edges(edges: &[Edge], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    write_edge_slice(EDGE_CSV_HEADER, edges, output_path)
}

/// Write an edge list under a caller-supplied header
///
/// **Public** - split re-emits the source file's own header
pub fn write_edge_slice(
    header: &[&str],
    edges: &[Edge],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} edges to: {}", edges.len(), output_path.display());

    validate_output_path(output_path)?;
    prepare_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    write_record(&mut writer, header).map_err(OutputError::WriteFailed)?;

    for edge in edges {
        let id = edge.id.to_string();
        let order = edge.order.to_string();
        let time_active = edge.time_active.to_string();

        write_record(
            &mut writer,
            &[
                id.as_str(),
                edge.origin.as_str(),
                edge.target.as_str(),
                edge.user.as_str(),
                order.as_str(),
                edge.origin_start.as_str(),
                time_active.as_str(),
                edge.switch_time.as_str(),
            ],
        )
        .map_err(OutputError::WriteFailed)?;
    }

    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Edge list written successfully ({} bytes)",
        file_size(output_path)
    );

    Ok(())
}

/// Write the domain inventory, one domain per line
///
/// **Public** - companion output of every compaction run
pub fn write_domains(
    domains: &BTreeSet<String>,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!(
        "Writing {} domains to: {}",
        domains.len(),
        output_path.display()
    );

    validate_output_path(output_path)?;
    prepare_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    for domain in domains {
        writeln!(writer, "{}", domain).map_err(OutputError::WriteFailed)?;
    }

    writer.flush().map_err(OutputError::WriteFailed)
}

/// Write per-panelist statistics as CSV
///
/// **Public** - output of the user-stats subcommand
pub fn write_user_stats(
    stats: &[UserStats],
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!(
        "Writing statistics for {} panelists to: {}",
        stats.len(),
        output_path.display()
    );

    validate_output_path(output_path)?;
    prepare_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    write_record(&mut writer, USER_STATS_CSV_HEADER).map_err(OutputError::WriteFailed)?;

    for row in stats {
        let visited = row.total_websites_visited.to_string();
        let seconds = row.total_seconds_spent.to_string();
        let hours = format!("{:.2}", row.average_hours_spent_per_day);

        write_record(
            &mut writer,
            &[
                row.user_id.as_str(),
                visited.as_str(),
                seconds.as_str(),
                hours.as_str(),
            ],
        )
        .map_err(OutputError::WriteFailed)?;
    }

    writer.flush().map_err(OutputError::WriteFailed)
}

/// An edge list loaded back from disk
///
/// **Public** - input of split, verify, and the stats subcommands
#[derive(Debug, Clone)]
pub struct EdgeFile {
    /// Header row exactly as found in the file
    pub header: Vec<String>,

    /// Data rows in file order
    pub edges: Vec<Edge>,
}

/// Read an edge list CSV back into memory
///
/// **Public** - used by every subcommand that consumes compact output
///
/// An unexpected header is only a warning here; verify reports it as an
/// error.
///
/// # Errors
/// * `ParseError::MissingHeader` - the file is empty
/// * `ParseError::FieldCount` - a row does not have eight columns
/// * `ParseError::InvalidField` - a numeric column fails to parse
pub fn read_edges(input_path: impl AsRef<Path>) -> Result<EdgeFile, ParseError> {
    let input_path = input_path.as_ref();

    debug!("Reading edge list from: {}", input_path.display());

    let file = File::open(input_path)?;
    read_edge_records(BufReader::new(file))
}

/// Read an edge list from any buffered input
///
/// **Public** - the file-backed variant wraps this
pub fn read_edge_records<R: BufRead>(input: R) -> Result<EdgeFile, ParseError> {
    let mut reader = CsvReader::new(input);

    let header = match reader.next_record() {
        Some(record) => record?.fields,
        None => return Err(ParseError::MissingHeader),
    };

    if header != EDGE_CSV_HEADER {
        warn!("Unexpected edge list header: {:?}", header);
    }

    let mut edges = Vec::new();
    while let Some(record) = reader.next_record() {
        edges.push(parse_edge_row(&record?)?);
    }

    debug!("Loaded {} edges", edges.len());

    Ok(EdgeFile { header, edges })
}

/// Parse one edge list data row
///
/// **Private** - internal helper for `read_edge_records`
fn parse_edge_row(record: &Record) -> Result<Edge, ParseError> {
    let fields = &record.fields;

    if fields.len() != EDGE_CSV_HEADER.len() {
        return Err(ParseError::FieldCount {
            line: record.line,
            expected: EDGE_CSV_HEADER.len(),
            found: fields.len(),
        });
    }

    Ok(Edge {
        id: parse_number(record.line, "id", &fields[0])?,
        origin: fields[1].clone(),
        target: fields[2].clone(),
        user: fields[3].clone(),
        order: parse_number(record.line, "order", &fields[4])?,
        origin_start: fields[5].clone(),
        time_active: parse_number(record.line, "time_active", &fields[6])?,
        switch_time: fields[7].clone(),
    })
}

/// Parse a numeric field, reporting the line and column name on failure
///
/// **Private** - internal helper for `parse_edge_row`
fn parse_number<T: std::str::FromStr>(
    line: usize,
    field: &'static str,
    value: &str,
) -> Result<T, ParseError> {
    value.trim().parse::<T>().map_err(|_| ParseError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}
