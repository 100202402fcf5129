//! Verify command implementation.
//!
//! Re-checks the structural invariants a compacted edge list is supposed
//! to hold: the standard header, edge ids sequential from 1, no
//! self-loops, and strictly increasing order values per panelist. Useful
//! before shipping an edge list to a downstream loader.

use crate::output::read_edges;
use crate::parser::schema::Edge;
use crate::utils::config::EDGE_CSV_HEADER;
use crate::utils::error::VerifyError;
use anyhow::{Context, Result};
use log::info;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Arguments for the verify command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct VerifyArgs {
    /// Path to the edge list CSV to verify
    pub file: PathBuf,
}

/// Execute the verify command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Edge list read or parse errors
/// * Any invariant violation, reported as a `VerifyError`
pub fn execute_verify(args: VerifyArgs) -> Result<()> {
    info!("Verifying edge list: {}", args.file.display());

    let file = read_edges(&args.file)
        .context(format!("Failed to read edge list {}", args.file.display()))?;

    check_header(&file.header)?;
    verify_edges(&file.edges)?;

    let panelists: HashSet<&str> = file.edges.iter().map(|edge| edge.user.as_str()).collect();
    let domains: HashSet<&str> = file
        .edges
        .iter()
        .flat_map(|edge| [edge.origin.as_str(), edge.target.as_str()])
        .collect();

    println!("✓ Valid edge list: {}", args.file.display());
    println!("  Edges:     {}", file.edges.len());
    println!("  Panelists: {}", panelists.len());
    println!("  Domains:   {}", domains.len());

    Ok(())
}

/// Check that the file carries the standard edge list header
///
/// **Private** - internal helper for `execute_verify`
fn check_header(header: &[String]) -> Result<(), VerifyError> {
    if header != EDGE_CSV_HEADER {
        return Err(VerifyError::HeaderMismatch {
            expected: EDGE_CSV_HEADER.join(","),
            found: header.join(","),
        });
    }
    Ok(())
}

/// Check the structural invariants of an edge list
///
/// **Public** - also usable as a library-level sanity check
///
/// # Arguments
/// * `edges` - edges in file order
///
/// # Returns
/// Ok when ids run 1..n, no edge is a self-loop, and every panelist's
/// order values strictly increase
pub fn verify_edges(edges: &[Edge]) -> Result<(), VerifyError> {
    let mut last_order: HashMap<&str, u64> = HashMap::new();

    for (index, edge) in edges.iter().enumerate() {
        let row = index + 1;
        let expected = index as u64 + 1;

        if edge.id != expected {
            return Err(VerifyError::IdOutOfSequence {
                row,
                expected,
                found: edge.id,
            });
        }

        if edge.origin == edge.target {
            return Err(VerifyError::SelfLoop {
                row,
                domain: edge.origin.clone(),
            });
        }

        if let Some(&previous) = last_order.get(edge.user.as_str()) {
            if edge.order <= previous {
                return Err(VerifyError::OrderNotIncreasing {
                    row,
                    user: edge.user.clone(),
                    previous,
                    found: edge.order,
                });
            }
        }
        last_order.insert(edge.user.as_str(), edge.order);
    }

    Ok(())
}

/// Validate verify arguments
///
/// **Public** - can be called before execute_verify for early validation
pub fn validate_args(args: &VerifyArgs) -> Result<()> {
    if args.file.as_os_str().is_empty() {
        anyhow::bail!("File path cannot be empty");
    }

    Ok(())
}
