//! Node-stats command implementation.
//!
//! Answers "how much traffic flows through this domain" over a
//! compacted edge list, matching either the origin or the target side.
//! Prints JSON to stdout unless an output path is given.

use crate::compactor::calculate_node_stats;
use crate::output::{read_edges, write_node_stats};
use crate::parser::schema::NodeRole;
use anyhow::{anyhow, Context, Result};
use log::info;
use std::path::PathBuf;

/// Arguments for the node-stats command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct NodeStatsArgs {
    /// Path to the compacted edge list
    pub edges: PathBuf,

    /// Domain to report on
    pub node: String,

    /// Edge side to match: "origin" or "target"
    pub mode: String,

    /// Panelists to include; empty includes all
    pub users: Vec<String>,

    /// Output path for JSON; None prints to stdout
    pub output: Option<PathBuf>,
}

impl Default for NodeStatsArgs {
    fn default() -> Self {
        Self {
            edges: PathBuf::new(),
            node: String::new(),
            mode: "origin".to_string(),
            users: Vec::new(),
            output: None,
        }
    }
}

/// Execute the node-stats command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid mode string
/// * Edge list read or parse errors
/// * No edges matching the node in the requested mode
pub fn execute_node_stats(args: NodeStatsArgs) -> Result<()> {
    let role = NodeRole::parse(&args.mode)
        .ok_or_else(|| anyhow!("Mode must be 'origin' or 'target'"))?;

    info!(
        "Computing {} statistics for node '{}' from: {}",
        role.as_str(),
        args.node,
        args.edges.display()
    );

    let file = read_edges(&args.edges)
        .context(format!("Failed to read edge list {}", args.edges.display()))?;

    let stats = calculate_node_stats(&file.edges, &args.node, role, &args.users);

    if stats.visit_count == 0 {
        anyhow::bail!(
            "No edges found for node '{}' in mode '{}'.",
            args.node,
            role.as_str()
        );
    }

    match &args.output {
        Some(path) => {
            write_node_stats(&stats, path).context("Failed to write node statistics")?;
            info!("✓ Node statistics written to: {}", path.display());
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}

/// Validate node-stats arguments
///
/// **Public** - can be called before execute_node_stats for early validation
pub fn validate_args(args: &NodeStatsArgs) -> Result<()> {
    if args.edges.as_os_str().is_empty() {
        anyhow::bail!("Edge list path cannot be empty");
    }

    if args.node.is_empty() {
        anyhow::bail!("Node cannot be empty");
    }

    if NodeRole::parse(&args.mode).is_none() {
        anyhow::bail!("Mode must be 'origin' or 'target'");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_args() -> NodeStatsArgs {
        NodeStatsArgs {
            edges: PathBuf::from("edges.csv"),
            node: "example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&valid_args()).is_ok());
    }

    #[test]
    fn test_validate_args_target_mode() {
        let args = NodeStatsArgs {
            mode: "target".to_string(),
            ..valid_args()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_edges() {
        let args = NodeStatsArgs {
            edges: PathBuf::new(),
            ..valid_args()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_node() {
        let args = NodeStatsArgs {
            node: String::new(),
            ..valid_args()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_bad_mode() {
        let args = NodeStatsArgs {
            mode: "both".to_string(),
            ..valid_args()
        };

        assert!(validate_args(&args).is_err());
    }
}
