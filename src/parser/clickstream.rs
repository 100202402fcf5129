//! Raw clickstream row parsing.
//!
//! Panel exports are wide CSVs whose leading columns vary by vendor. The
//! columns we need sit at fixed offsets: the panelist id third from the
//! left, and timestamp / active seconds / subdomain / domain as the last
//! four columns. Everything in between is ignored.

use crate::parser::csv::{CsvReader, Record};
use crate::utils::config::{
    ACTIVE_SECONDS_FROM_END, DOMAIN_FROM_END, MIN_VISIT_FIELDS, PROGRESS_INTERVAL,
    SUBDOMAIN_FROM_END, TIMESTAMP_FROM_END, USER_COLUMN,
};
use crate::utils::error::ParseError;
use log::{debug, info};
use std::io::BufRead;

/// One website visit by one panelist
///
/// **Public** - the unit record everything downstream consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    /// Panelist identifier
    pub user: String,

    /// Full site domain, subdomain included
    pub domain: String,

    /// Visit start timestamp, kept verbatim from the export
    pub timestamp: String,

    /// Seconds of active engagement during the visit
    pub active_seconds: i64,
}

/// Parse a full clickstream export into visit records
///
/// The first record is the column header and is skipped. Every following
/// record must parse; one malformed row aborts the run so that partial
/// edge lists never reach disk.
///
/// # Arguments
/// * `input` - buffered reader over the raw CSV
///
/// # Returns
/// * `Result<Vec<Visit>, ParseError>` - visits in file order
///
/// # Errors
/// * `ParseError::MissingHeader` - the input is empty
/// * `ParseError::RowTooShort` - a row has fewer than four columns
/// * `ParseError::InvalidField` - active seconds is not an integer
pub fn parse_clickstream<R: BufRead>(input: R) -> Result<Vec<Visit>, ParseError> {
    let mut reader = CsvReader::new(input);

    let header = match reader.next_record() {
        Some(record) => record?,
        None => return Err(ParseError::MissingHeader),
    };
    debug!("Skipped header with {} columns", header.fields.len());

    let mut visits = Vec::new();
    let mut rows: u64 = 0;

    while let Some(record) = reader.next_record() {
        visits.push(parse_visit(&record?)?);
        rows += 1;
        if rows % PROGRESS_INTERVAL == 0 {
            info!("Processed {} rows", rows);
        }
    }

    Ok(visits)
}

/// Parse one data row into a visit
///
/// **Private** - internal helper for `parse_clickstream`
fn parse_visit(record: &Record) -> Result<Visit, ParseError> {
    let fields = &record.fields;

    if fields.len() < MIN_VISIT_FIELDS {
        return Err(ParseError::RowTooShort {
            line: record.line,
            expected: MIN_VISIT_FIELDS,
            found: fields.len(),
        });
    }

    let user = fields[USER_COLUMN].clone();
    let timestamp = fields[fields.len() - TIMESTAMP_FROM_END].clone();
    let raw_seconds = &fields[fields.len() - ACTIVE_SECONDS_FROM_END];
    let subdomain = &fields[fields.len() - SUBDOMAIN_FROM_END];
    let domain = &fields[fields.len() - DOMAIN_FROM_END];

    let active_seconds =
        raw_seconds
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidField {
                line: record.line,
                field: "active_seconds",
                value: raw_seconds.clone(),
            })?;

    Ok(Visit {
        user,
        domain: site_domain(domain, subdomain),
        timestamp,
        active_seconds,
    })
}

/// Assemble the full site domain from the export's two domain columns
///
/// The export splits a site into registrable domain and subdomain; the
/// canonical key joins them with the domain column first.
pub fn site_domain(domain: &str, subdomain: &str) -> String {
    format!("{}{}", domain, subdomain)
}
