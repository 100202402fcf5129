//! Core data structures for compacted browsing graphs.
//!
//! An `Edge` is one domain-to-domain transition in a panelist's timeline.
//! The report types summarize a compaction run and serialize to JSON; the
//! edge itself only ever travels as CSV.

use serde::{Deserialize, Serialize};

/// One transition between two distinct domains in a panelist timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Sequential id across the whole edge list, starting at 1
    pub id: u64,

    /// Domain the panelist navigated away from
    pub origin: String,

    /// Domain the panelist landed on
    pub target: String,

    /// Panelist identifier
    pub user: String,

    /// Position of the target visit within the panelist's sorted
    /// timeline, minus one. Gaps mark collapsed same-domain runs.
    pub order: u64,

    /// Timestamp of the first visit in the origin's run
    pub origin_start: String,

    /// Active seconds of the first visit in the origin's run
    pub time_active: i64,

    /// Timestamp of the visit that caused the switch
    pub switch_time: String,
}

/// Aggregate dwell-time figures over an edge list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DwellSummary {
    /// Sum of active seconds across all edges
    pub total_active_seconds: i64,

    /// Mean active seconds per edge
    pub mean_seconds_per_edge: i64,

    /// Median active seconds per edge
    pub median_seconds_per_edge: i64,

    /// Active seconds held by the top tenth of edges
    pub top_decile_seconds: i64,

    /// Share of total dwell held by the top tenth, in percent
    pub top_decile_percentage: f64,
}

impl DwellSummary {
    /// One-line human summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{}s total dwell, mean {}s / median {}s per edge, top decile holds {:.1}%",
            self.total_active_seconds,
            self.mean_seconds_per_edge,
            self.median_seconds_per_edge,
            self.top_decile_percentage
        )
    }

    /// True when a small set of edges dominates overall dwell time
    pub fn is_heavy_tailed(&self) -> bool {
        self.top_decile_percentage > 80.0
    }
}

/// One origin-target pair with its traversal count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionCount {
    pub origin: String,
    pub target: String,

    /// Number of edges with this origin-target pair
    pub traversals: u64,

    /// Share of all edges, in percent
    pub percentage: f64,
}

/// JSON report describing one compaction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompactionReport {
    /// Report schema version
    pub version: String,

    /// Path of the raw clickstream that was compacted
    pub input: String,

    /// Data rows read from the input
    pub visit_count: u64,

    /// Distinct panelists seen
    pub panelist_count: u64,

    /// Edges emitted
    pub edge_count: u64,

    /// Distinct domains seen across all visits
    pub unique_domains: u64,

    /// Dwell-time aggregates
    pub dwell: DwellSummary,

    /// Most-traversed origin-target pairs, busiest first
    pub top_transitions: Vec<TransitionCount>,

    /// RFC 3339 timestamp of report generation
    pub generated_at: String,
}

/// Which side of an edge a node query matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Origin,
    Target,
}

impl NodeRole {
    /// Parse a role name as given on the command line
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "origin" => Some(NodeRole::Origin),
            "target" => Some(NodeRole::Target),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Origin => "origin",
            NodeRole::Target => "target",
        }
    }
}

/// Aggregate statistics for one domain in one role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStats {
    /// Domain the query matched
    pub node: String,

    /// Side of the edge that was matched
    pub mode: NodeRole,

    /// Edges matching the node in that role
    pub visit_count: u64,

    /// Sum of active seconds across matching edges
    pub total_time_spent: i64,

    /// Mean active seconds per matching edge, rounded to 2 decimals
    pub avg_time_per_visit: f64,
}

/// Aggregate browsing statistics for one panelist
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    /// Panelist identifier
    pub user_id: String,

    /// Edges attributed to the panelist
    pub total_websites_visited: u64,

    /// Sum of active seconds across the panelist's edges
    pub total_seconds_spent: i64,

    /// Active hours divided by distinct calendar days, rounded to 2 decimals
    pub average_hours_spent_per_day: f64,
}
