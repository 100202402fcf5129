//! Atlas Clickstream CLI
//!
//! Compacts raw panel clickstream CSVs into domain-transition edge
//! lists for the Internet Atlas browsing graph.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use atlas_clickstream::commands::{
    compact, node_stats, split, user_stats, verify, CompactArgs, NodeStatsArgs, SplitArgs,
    UserStatsArgs, VerifyArgs,
};
use atlas_clickstream::utils::config::SCHEMA_VERSION;

/// Atlas Clickstream - browsing-graph preprocessing for panel data
#[derive(Parser, Debug)]
#[command(name = "atlas-edges")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compact a raw clickstream CSV into an edge list
    Compact {
        /// Path to the raw clickstream CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the edge list CSV
        #[arg(short, long, default_value = "edges.csv")]
        output: PathBuf,

        /// Output path for the domain inventory
        #[arg(short, long, default_value = "domain_set.txt")]
        domains: PathBuf,

        /// Output path for the JSON run report (optional)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Number of top transitions to include in the report
        #[arg(long, default_value = "20")]
        top_transitions: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Split an edge list into part files for parallel loading
    Split {
        /// Path to the edge list CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the part files
        #[arg(short, long, default_value = "chunks")]
        output_dir: PathBuf,

        /// Number of part files
        #[arg(short, long, default_value = "20")]
        parts: usize,

        /// Part file name prefix (defaults to the input file stem)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Aggregate per-panelist browsing statistics from an edge list
    UserStats {
        /// Path to the compacted edge list
        #[arg(short, long)]
        edges: PathBuf,

        /// Output path for the statistics CSV
        #[arg(short, long, default_value = "user_stats.csv")]
        output: PathBuf,

        /// Panelists to report on (comma separated; defaults to all)
        #[arg(long, value_delimiter = ',')]
        users: Vec<String>,
    },

    /// Aggregate traffic statistics for one domain
    NodeStats {
        /// Path to the compacted edge list
        #[arg(short, long)]
        edges: PathBuf,

        /// Domain to report on
        #[arg(short, long)]
        node: String,

        /// Edge side to match: origin or target
        #[arg(short, long, default_value = "origin")]
        mode: String,

        /// Panelists to include (comma separated; defaults to all)
        #[arg(long, value_delimiter = ',')]
        users: Vec<String>,

        /// Output path for JSON (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify the structural invariants of an edge list
    Verify {
        /// Path to the edge list CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Compact {
            input,
            output,
            domains,
            report,
            top_transitions,
            summary,
        } => {
            let args = CompactArgs {
                input,
                output_edges: output,
                output_domains: domains,
                output_report: report,
                top_transitions,
                print_summary: summary,
            };

            compact::validate_args(&args)?;
            compact::execute_compact(args)?;
        }

        Commands::Split {
            input,
            output_dir,
            parts,
            prefix,
        } => {
            let args = SplitArgs {
                input,
                output_dir,
                parts,
                prefix,
            };

            split::validate_args(&args)?;
            split::execute_split(args)?;
        }

        Commands::UserStats {
            edges,
            output,
            users,
        } => {
            let args = UserStatsArgs {
                edges,
                output,
                users,
            };

            user_stats::validate_args(&args)?;
            user_stats::execute_user_stats(args)?;
        }

        Commands::NodeStats {
            edges,
            node,
            mode,
            users,
            output,
        } => {
            let args = NodeStatsArgs {
                edges,
                node,
                mode,
                users,
                output,
            };

            node_stats::validate_args(&args)?;
            node_stats::execute_node_stats(args)?;
        }

        Commands::Verify { file } => {
            let args = VerifyArgs { file };

            verify::validate_args(&args)?;
            verify::execute_verify(args)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("Atlas Clickstream Edge Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Edge List Columns:");
        println!("  id: number           - Sequential edge id, starting at 1");
        println!("  origin: string       - Domain navigated away from");
        println!("  target: string       - Domain landed on");
        println!("  user: string         - Panelist identifier");
        println!("  order: number        - Target position in the sorted timeline, minus one");
        println!("  origin_start: string - Timestamp of the first visit in the origin run");
        println!("  time_active: number  - Active seconds of that first visit");
        println!("  switch_time: string  - Timestamp of the visit that caused the switch");
        println!();
        println!("Domain List: one domain per line, sorted lexicographically");
        println!();
        println!("Report Structure:");
        println!("  version: string        - Schema version (e.g., '1.0.0')");
        println!("  input: string          - Path of the compacted input");
        println!("  visit_count: number    - Data rows read");
        println!("  panelist_count: number - Distinct panelists");
        println!("  edge_count: number     - Edges emitted");
        println!("  unique_domains: number - Distinct domains across all visits");
        println!("  dwell: object          - Dwell-time aggregates");
        println!("  top_transitions: array - Busiest origin-target pairs");
        println!("  generated_at: string   - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Atlas Clickstream v{}", env!("CARGO_PKG_VERSION"));
    println!("Edge Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Browsing-graph preprocessing for panel clickstream exports.");
    println!("https://github.com/internet-atlas/atlas-clickstream");
}
