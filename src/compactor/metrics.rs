//! Summary statistics over visits and compacted edge lists.
//!
//! Everything here is derived data: the domain inventory, dwell-time
//! aggregates for the run report, and the per-panelist and per-domain
//! statistics served by the stats subcommands.

use crate::parser::schema::{
    CompactionReport, DwellSummary, Edge, NodeRole, NodeStats, TransitionCount, UserStats,
};
use crate::parser::Visit;
use crate::utils::config::SCHEMA_VERSION;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Collect the distinct domains across all visits, sorted
///
/// **Public** - feeds the domain list output
pub fn collect_domains(visits: &[Visit]) -> BTreeSet<String> {
    visits.iter().map(|visit| visit.domain.clone()).collect()
}

/// Count traversals per origin-target pair and keep the busiest
///
/// **Public** - feeds the run report
///
/// # Arguments
/// * `edges` - compacted edge list
/// * `top_n` - number of pairs to return
///
/// # Returns
/// Pairs sorted by traversals descending, then alphabetically
pub fn calculate_top_transitions(edges: &[Edge], top_n: usize) -> Vec<TransitionCount> {
    debug!("Counting transitions across {} edges", edges.len());

    let mut counts: HashMap<(String, String), u64> = HashMap::new();
    for edge in edges {
        *counts
            .entry((edge.origin.clone(), edge.target.clone()))
            .or_insert(0) += 1;
    }

    let total = edges.len() as u64;
    let mut transitions: Vec<TransitionCount> = counts
        .into_iter()
        .map(|((origin, target), traversals)| {
            let percentage = if total > 0 {
                (traversals as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            TransitionCount {
                origin,
                target,
                traversals,
                percentage,
            }
        })
        .collect();

    // Alphabetical tie-break keeps the report deterministic
    transitions.sort_by(|a, b| {
        b.traversals
            .cmp(&a.traversals)
            .then_with(|| a.origin.cmp(&b.origin))
            .then_with(|| a.target.cmp(&b.target))
    });
    transitions.truncate(top_n);

    transitions
}

/// Calculate dwell-time aggregates over an edge list
///
/// **Public** - feeds the run report and the post-run summary log
pub fn calculate_dwell_summary(edges: &[Edge]) -> DwellSummary {
    if edges.is_empty() {
        return DwellSummary {
            total_active_seconds: 0,
            mean_seconds_per_edge: 0,
            median_seconds_per_edge: 0,
            top_decile_seconds: 0,
            top_decile_percentage: 0.0,
        };
    }

    let count = edges.len();
    let total: i64 = edges.iter().map(|edge| edge.time_active).sum();
    let mean = total / count as i64;

    let mut dwells: Vec<i64> = edges.iter().map(|edge| edge.time_active).collect();
    dwells.sort_unstable();
    let median = dwells[count / 2];

    // Top 10% of edges by dwell
    let top_decile_count = (count as f64 * 0.1).ceil() as usize;
    let top_decile_seconds: i64 = dwells.iter().rev().take(top_decile_count).sum();
    let top_decile_percentage = if total > 0 {
        (top_decile_seconds as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    DwellSummary {
        total_active_seconds: total,
        mean_seconds_per_edge: mean,
        median_seconds_per_edge: median,
        top_decile_seconds,
        top_decile_percentage,
    }
}

/// Assemble the JSON run report
///
/// **Public** - called after compaction when a report path is given
///
/// # Arguments
/// * `input` - path of the raw clickstream
/// * `visit_count` - data rows read
/// * `panelist_count` - distinct panelists
/// * `unique_domains` - distinct domains across all visits
/// * `edges` - compacted edge list
/// * `top_n` - transition pairs to include
pub fn build_report(
    input: &str,
    visit_count: u64,
    panelist_count: u64,
    unique_domains: u64,
    edges: &[Edge],
    top_n: usize,
) -> CompactionReport {
    CompactionReport {
        version: SCHEMA_VERSION.to_string(),
        input: input.to_string(),
        visit_count,
        panelist_count,
        edge_count: edges.len() as u64,
        unique_domains,
        dwell: calculate_dwell_summary(edges),
        top_transitions: calculate_top_transitions(edges, top_n),
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Calculate per-panelist browsing statistics from an edge list
///
/// **Public** - backs the user-stats subcommand
///
/// Edges with an empty or unparseable origin_start contribute nothing,
/// neither to the visit count nor to the seconds total.
///
/// # Arguments
/// * `edges` - compacted edge list
/// * `users` - panelists to report on, in output order; empty selects
///   every panelist in the edge list in first-seen order
///
/// # Returns
/// One row per selected panelist; panelists absent from the edge list
/// get all-zero rows
pub fn calculate_user_stats(edges: &[Edge], users: &[String]) -> Vec<UserStats> {
    let mut valid_edges: HashMap<&str, u64> = HashMap::new();
    let mut seconds: HashMap<&str, i64> = HashMap::new();
    let mut days: HashMap<&str, HashSet<NaiveDate>> = HashMap::new();

    for edge in edges {
        if edge.origin_start.is_empty() {
            continue;
        }

        let date = match parse_timestamp_date(&edge.origin_start) {
            Some(date) => date,
            None => {
                warn!(
                    "Skipping edge {} with bad origin_start timestamp: {:?}",
                    edge.id, edge.origin_start
                );
                continue;
            }
        };

        *valid_edges.entry(&edge.user).or_insert(0) += 1;
        *seconds.entry(&edge.user).or_insert(0) += edge.time_active;
        days.entry(&edge.user).or_default().insert(date);
    }

    let selected: Vec<String> = if users.is_empty() {
        first_seen_users(edges)
    } else {
        users.to_vec()
    };

    selected
        .into_iter()
        .map(|user_id| {
            let total_websites_visited = valid_edges.get(user_id.as_str()).copied().unwrap_or(0);
            let total_seconds_spent = seconds.get(user_id.as_str()).copied().unwrap_or(0);
            let unique_days = days.get(user_id.as_str()).map_or(0, |set| set.len());

            let average_hours_spent_per_day = if unique_days == 0 {
                0.0
            } else {
                round2((total_seconds_spent as f64 / 3600.0) / unique_days as f64)
            };

            UserStats {
                user_id,
                total_websites_visited,
                total_seconds_spent,
                average_hours_spent_per_day,
            }
        })
        .collect()
}

/// Calculate aggregate statistics for one domain in one role
///
/// **Public** - backs the node-stats subcommand
///
/// # Arguments
/// * `edges` - compacted edge list
/// * `node` - domain to match
/// * `role` - edge side to match against
/// * `users` - panelists to include; empty includes all
pub fn calculate_node_stats(
    edges: &[Edge],
    node: &str,
    role: NodeRole,
    users: &[String],
) -> NodeStats {
    let matching = edges.iter().filter(|edge| {
        let side = match role {
            NodeRole::Origin => &edge.origin,
            NodeRole::Target => &edge.target,
        };
        side == node && (users.is_empty() || users.contains(&edge.user))
    });

    let mut visit_count: u64 = 0;
    let mut total_time_spent: i64 = 0;
    for edge in matching {
        visit_count += 1;
        total_time_spent += edge.time_active;
    }

    let avg_time_per_visit = if visit_count > 0 {
        round2(total_time_spent as f64 / visit_count as f64)
    } else {
        0.0
    };

    NodeStats {
        node: node.to_string(),
        mode: role,
        visit_count,
        total_time_spent,
        avg_time_per_visit,
    }
}

/// Panelists in the order they first appear in the edge list
///
/// **Private** - internal helper for `calculate_user_stats`
fn first_seen_users(edges: &[Edge]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut users = Vec::new();
    for edge in edges {
        if seen.insert(&edge.user) {
            users.push(edge.user.clone());
        }
    }
    users
}

/// Parse the calendar date out of an export timestamp
///
/// **Private** - accepts the timestamp shapes seen in panel exports
fn parse_timestamp_date(value: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.date());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Round to two decimal places
///
/// **Private** - stats values are reported at 2-decimal precision
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(user: &str, domain: &str) -> Visit {
        Visit {
            user: user.to_string(),
            domain: domain.to_string(),
            timestamp: "2023-01-01 10:00:00".to_string(),
            active_seconds: 1,
        }
    }

    fn edge(id: u64, origin: &str, target: &str, user: &str, start: &str, active: i64) -> Edge {
        Edge {
            id,
            origin: origin.to_string(),
            target: target.to_string(),
            user: user.to_string(),
            order: id,
            origin_start: start.to_string(),
            time_active: active,
            switch_time: start.to_string(),
        }
    }

    #[test]
    fn test_collect_domains_dedupes_and_sorts() {
        let visits = vec![
            visit("u1", "b.com"),
            visit("u1", "a.com"),
            visit("u2", "b.com"),
        ];
        let domains = collect_domains(&visits);
        let listed: Vec<&String> = domains.iter().collect();
        assert_eq!(listed, vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_top_transitions_order_and_percentage() {
        let edges = vec![
            edge(1, "a.com", "b.com", "u1", "2023-01-01 10:00:00", 10),
            edge(2, "a.com", "b.com", "u1", "2023-01-01 10:05:00", 10),
            edge(3, "b.com", "c.com", "u1", "2023-01-01 10:10:00", 10),
            edge(4, "a.com", "b.com", "u2", "2023-01-01 11:00:00", 10),
        ];

        let transitions = calculate_top_transitions(&edges, 10);
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].origin, "a.com");
        assert_eq!(transitions[0].traversals, 3);
        assert_eq!(transitions[0].percentage, 75.0);
        assert_eq!(transitions[1].origin, "b.com");
        assert_eq!(transitions[1].traversals, 1);
    }

    #[test]
    fn test_top_transitions_tie_break_is_alphabetical() {
        let edges = vec![
            edge(1, "z.com", "a.com", "u1", "2023-01-01 10:00:00", 1),
            edge(2, "a.com", "z.com", "u1", "2023-01-01 10:01:00", 1),
        ];

        let transitions = calculate_top_transitions(&edges, 10);
        assert_eq!(transitions[0].origin, "a.com");
        assert_eq!(transitions[1].origin, "z.com");
    }

    #[test]
    fn test_top_transitions_truncates() {
        let edges = vec![
            edge(1, "a.com", "b.com", "u1", "2023-01-01 10:00:00", 1),
            edge(2, "b.com", "c.com", "u1", "2023-01-01 10:01:00", 1),
            edge(3, "c.com", "d.com", "u1", "2023-01-01 10:02:00", 1),
        ];
        assert_eq!(calculate_top_transitions(&edges, 2).len(), 2);
    }

    #[test]
    fn test_dwell_summary_basics() {
        let edges = vec![
            edge(1, "a.com", "b.com", "u1", "2023-01-01 10:00:00", 10),
            edge(2, "b.com", "c.com", "u1", "2023-01-01 10:01:00", 20),
            edge(3, "c.com", "d.com", "u1", "2023-01-01 10:02:00", 90),
        ];

        let dwell = calculate_dwell_summary(&edges);
        assert_eq!(dwell.total_active_seconds, 120);
        assert_eq!(dwell.mean_seconds_per_edge, 40);
        assert_eq!(dwell.median_seconds_per_edge, 20);
        // ceil(3 * 0.1) = 1 edge in the top decile
        assert_eq!(dwell.top_decile_seconds, 90);
        assert_eq!(dwell.top_decile_percentage, 75.0);
    }

    #[test]
    fn test_dwell_summary_empty() {
        let dwell = calculate_dwell_summary(&[]);
        assert_eq!(dwell.total_active_seconds, 0);
        assert_eq!(dwell.top_decile_percentage, 0.0);
    }

    #[test]
    fn test_user_stats_averages_over_unique_days() {
        // 7200 seconds across two calendar days: 1.00 hour per day
        let edges = vec![
            edge(1, "a.com", "b.com", "u1", "2023-01-01 10:00:00", 3600),
            edge(2, "b.com", "c.com", "u1", "2023-01-02 10:00:00", 1800),
            edge(3, "c.com", "d.com", "u1", "2023-01-02 11:00:00", 1800),
        ];

        let stats = calculate_user_stats(&edges, &[]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].user_id, "u1");
        assert_eq!(stats[0].total_websites_visited, 3);
        assert_eq!(stats[0].total_seconds_spent, 7200);
        assert_eq!(stats[0].average_hours_spent_per_day, 1.0);
    }

    #[test]
    fn test_user_stats_skips_bad_timestamps_entirely() {
        let edges = vec![
            edge(1, "a.com", "b.com", "u1", "2023-01-01 10:00:00", 100),
            edge(2, "b.com", "c.com", "u1", "not a timestamp", 999),
            edge(3, "c.com", "d.com", "u1", "", 999),
        ];

        let stats = calculate_user_stats(&edges, &[]);
        // The bad rows drop out of both the count and the seconds
        assert_eq!(stats[0].total_websites_visited, 1);
        assert_eq!(stats[0].total_seconds_spent, 100);
    }

    #[test]
    fn test_user_stats_requested_absent_user_gets_zero_row() {
        let edges = vec![edge(1, "a.com", "b.com", "u1", "2023-01-01 10:00:00", 10)];
        let users = vec!["ghost".to_string(), "u1".to_string()];

        let stats = calculate_user_stats(&edges, &users);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].user_id, "ghost");
        assert_eq!(stats[0].total_websites_visited, 0);
        assert_eq!(stats[0].total_seconds_spent, 0);
        assert_eq!(stats[0].average_hours_spent_per_day, 0.0);
        assert_eq!(stats[1].user_id, "u1");
    }

    #[test]
    fn test_user_stats_default_selection_is_first_seen() {
        let edges = vec![
            edge(1, "a.com", "b.com", "u2", "2023-01-01 10:00:00", 10),
            edge(2, "a.com", "b.com", "u1", "2023-01-01 09:00:00", 10),
            edge(3, "b.com", "c.com", "u2", "2023-01-01 11:00:00", 10),
        ];

        let stats = calculate_user_stats(&edges, &[]);
        let ids: Vec<&str> = stats.iter().map(|row| row.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u1"]);
    }

    #[test]
    fn test_timestamp_shapes() {
        for value in [
            "2023-01-05 10:00:00",
            "2023-01-05T10:00:00",
            "2023-01-05 10:00:00.250",
            "2023-01-05T10:00:00+02:00",
            "2023-01-05",
        ] {
            let date = parse_timestamp_date(value);
            assert_eq!(
                date,
                NaiveDate::from_ymd_opt(2023, 1, 5),
                "failed on {:?}",
                value
            );
        }
        assert!(parse_timestamp_date("yesterday").is_none());
    }

    #[test]
    fn test_node_stats_matches_one_side() {
        let edges = vec![
            edge(1, "a.com", "b.com", "u1", "2023-01-01 10:00:00", 10),
            edge(2, "b.com", "a.com", "u1", "2023-01-01 10:01:00", 20),
            edge(3, "a.com", "c.com", "u2", "2023-01-01 10:02:00", 30),
        ];

        let origin_stats = calculate_node_stats(&edges, "a.com", NodeRole::Origin, &[]);
        assert_eq!(origin_stats.visit_count, 2);
        assert_eq!(origin_stats.total_time_spent, 40);
        assert_eq!(origin_stats.avg_time_per_visit, 20.0);

        let target_stats = calculate_node_stats(&edges, "a.com", NodeRole::Target, &[]);
        assert_eq!(target_stats.visit_count, 1);
        assert_eq!(target_stats.total_time_spent, 20);
    }

    #[test]
    fn test_node_stats_user_filter() {
        let edges = vec![
            edge(1, "a.com", "b.com", "u1", "2023-01-01 10:00:00", 10),
            edge(2, "a.com", "c.com", "u2", "2023-01-01 10:01:00", 30),
        ];

        let users = vec!["u2".to_string()];
        let stats = calculate_node_stats(&edges, "a.com", NodeRole::Origin, &users);
        assert_eq!(stats.visit_count, 1);
        assert_eq!(stats.total_time_spent, 30);
    }

    #[test]
    fn test_node_stats_no_matches() {
        let stats = calculate_node_stats(&[], "a.com", NodeRole::Origin, &[]);
        assert_eq!(stats.visit_count, 0);
        assert_eq!(stats.avg_time_per_visit, 0.0);
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        let edges = vec![
            edge(1, "a.com", "b.com", "u1", "2023-01-01 10:00:00", 10),
            edge(2, "a.com", "b.com", "u1", "2023-01-01 10:01:00", 11),
            edge(3, "a.com", "b.com", "u1", "2023-01-01 10:02:00", 11),
        ];

        let stats = calculate_node_stats(&edges, "a.com", NodeRole::Origin, &[]);
        // 32 / 3 = 10.666..., reported as 10.67
        assert_eq!(stats.avg_time_per_visit, 10.67);
    }
}
