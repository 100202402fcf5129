//! Atlas Clickstream
//!
//! Edge compaction and browsing-graph preprocessing for
//! panel clickstream exports.
//!
//! This crate provides the core implementation for the
//! `atlas-edges` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install atlas-clickstream
//! atlas-edges --help
//! ```
//!
//! Raw per-visit CSVs go in; a compacted domain-transition edge list
//! and a domain inventory come out.

pub mod commands;
pub mod compactor;
pub mod output;
pub mod parser;
pub mod utils;
