//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod compact;
pub mod node_stats;
pub mod split;
pub mod user_stats;
pub mod verify;

// Re-export main command functions; validate_args stays module-qualified
// because every command defines its own
pub use compact::{execute_compact, quick_compact, CompactArgs};
pub use node_stats::{execute_node_stats, NodeStatsArgs};
pub use split::{execute_split, SplitArgs};
pub use user_stats::{execute_user_stats, UserStatsArgs};
pub use verify::{execute_verify, verify_edges, VerifyArgs};
