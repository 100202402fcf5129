//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Column header of the edge CSV, in output order
pub const EDGE_CSV_HEADER: &[&str] = &[
    "id",
    "origin",
    "target",
    "user",
    "order",
    "origin_start",
    "time_active",
    "switch_time",
];

/// Column header of the per-panelist statistics CSV
pub const USER_STATS_CSV_HEADER: &[&str] = &[
    "user_id",
    "total_websites_visited",
    "total_seconds_spent",
    "average_hours_spent_per_day",
];

// Raw clickstream column layout. Panel exports prepend a varying set of
// bookkeeping columns, so the visit fields are addressed from the end of
// each row; only the panelist id sits at a fixed absolute position.
pub const USER_COLUMN: usize = 2;
pub const TIMESTAMP_FROM_END: usize = 4;
pub const ACTIVE_SECONDS_FROM_END: usize = 3;
pub const SUBDOMAIN_FROM_END: usize = 2;
pub const DOMAIN_FROM_END: usize = 1;

/// Fewest fields a visit row can carry and still reach every column above
pub const MIN_VISIT_FIELDS: usize = 4;

/// Log a progress line every this many input rows
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// Default part count for the `split` command
pub const DEFAULT_SPLIT_PARTS: usize = 20;
