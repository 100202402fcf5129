//! Input parsing: CSV records, clickstream rows, and the shared schema.

pub mod clickstream;
pub mod csv;
pub mod schema;

pub use clickstream::{parse_clickstream, site_domain, Visit};
pub use schema::{
    CompactionReport, DwellSummary, Edge, NodeRole, NodeStats, TransitionCount, UserStats,
};
