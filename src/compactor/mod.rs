//! Compaction pipeline: timeline grouping plus derived statistics.

pub mod metrics;
pub mod timeline;

pub use metrics::{
    build_report, calculate_dwell_summary, calculate_node_stats, calculate_top_transitions,
    calculate_user_stats, collect_domains,
};
pub use timeline::{compact_all, group_by_panelist, sort_timelines, PanelistTimelines};
