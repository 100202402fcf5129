//! Group visits per panelist and collapse timelines into edges.
//!
//! A panelist's sorted timeline walks with a current-domain pointer:
//! visits on the current domain extend the stay, a visit on a different
//! domain emits an edge and moves the pointer. Reloads and in-site
//! navigation therefore never produce self-loops.

use crate::parser::schema::Edge;
use crate::parser::Visit;
use log::debug;
use std::collections::HashMap;

/// Per-panelist visit timelines, keyed by panelist id
///
/// **Public** - built by group_by_panelist, consumed by compact_all
#[derive(Debug, Default)]
pub struct PanelistTimelines {
    /// Panelists in the order they first appear in the input
    order: Vec<String>,

    /// Each panelist's visits, in input order until sorted
    visits: HashMap<String, Vec<Visit>>,
}

impl PanelistTimelines {
    /// Number of distinct panelists
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// One panelist's timeline, if present
    pub fn timeline(&self, user: &str) -> Option<&[Visit]> {
        self.visits.get(user).map(|timeline| timeline.as_slice())
    }

    /// Iterate timelines in first-seen panelist order
    ///
    /// The stable ordering is what makes repeated runs over the same
    /// input emit byte-identical edge lists.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Visit])> + '_ {
        self.order.iter().filter_map(|user| {
            self.visits
                .get(user)
                .map(|timeline| (user.as_str(), timeline.as_slice()))
        })
    }
}

/// Group a visit stream into per-panelist timelines
///
/// **Public** - first stage of compaction
///
/// # Arguments
/// * `visits` - visits in input file order
///
/// # Returns
/// Timelines keyed by panelist, ordered by first appearance
pub fn group_by_panelist(visits: Vec<Visit>) -> PanelistTimelines {
    let mut timelines = PanelistTimelines::default();

    for visit in visits {
        match timelines.visits.get_mut(&visit.user) {
            Some(timeline) => timeline.push(visit),
            None => {
                timelines.order.push(visit.user.clone());
                timelines.visits.insert(visit.user.clone(), vec![visit]);
            }
        }
    }

    debug!("Grouped visits into {} panelist timelines", timelines.len());
    timelines
}

/// Sort every timeline by visit timestamp
///
/// **Public** - second stage of compaction
///
/// Timestamps compare as strings; the export's timestamp format is
/// lexicographically ordered. The sort is stable, so visits sharing a
/// timestamp keep their input order.
pub fn sort_timelines(timelines: &mut PanelistTimelines) {
    for timeline in timelines.visits.values_mut() {
        timeline.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    }
}

/// Compact every timeline into edges with sequential ids from 1
///
/// **Public** - final stage of compaction
///
/// # Arguments
/// * `timelines` - grouped and sorted timelines
///
/// # Returns
/// All edges, grouped by panelist in first-seen order
pub fn compact_all(timelines: &PanelistTimelines) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut next_id: u64 = 1;

    for (user, timeline) in timelines.iter() {
        compact_timeline(user, timeline, &mut next_id, &mut edges);
    }

    debug!(
        "Compacted {} timelines into {} edges",
        timelines.len(),
        edges.len()
    );
    edges
}

/// Walk one sorted timeline and emit its domain transitions
///
/// **Private** - internal helper for `compact_all`
///
/// The edge's order field is the target visit's position in the sorted
/// timeline minus one, so collapsed runs leave visible gaps.
fn compact_timeline(user: &str, timeline: &[Visit], next_id: &mut u64, edges: &mut Vec<Edge>) {
    let mut current = match timeline.first() {
        Some(visit) => visit,
        None => return,
    };

    for (position, visit) in timeline.iter().enumerate().skip(1) {
        if visit.domain == current.domain {
            continue;
        }

        edges.push(Edge {
            id: *next_id,
            origin: current.domain.clone(),
            target: visit.domain.clone(),
            user: user.to_string(),
            order: (position - 1) as u64,
            origin_start: current.timestamp.clone(),
            time_active: current.active_seconds,
            switch_time: visit.timestamp.clone(),
        });
        *next_id += 1;
        current = visit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(user: &str, domain: &str, timestamp: &str, active_seconds: i64) -> Visit {
        Visit {
            user: user.to_string(),
            domain: domain.to_string(),
            timestamp: timestamp.to_string(),
            active_seconds,
        }
    }

    fn compact(visits: Vec<Visit>) -> Vec<Edge> {
        let mut timelines = group_by_panelist(visits);
        sort_timelines(&mut timelines);
        compact_all(&timelines)
    }

    #[test]
    fn test_runs_collapse_to_transitions() {
        // a, a, b, b, c has exactly two domain switches
        let edges = compact(vec![
            visit("u1", "a.com", "2023-01-01 10:00:00", 10),
            visit("u1", "a.com", "2023-01-01 10:01:00", 20),
            visit("u1", "b.com", "2023-01-01 10:02:00", 30),
            visit("u1", "b.com", "2023-01-01 10:03:00", 40),
            visit("u1", "c.com", "2023-01-01 10:04:00", 50),
        ]);

        assert_eq!(edges.len(), 2);

        assert_eq!(edges[0].origin, "a.com");
        assert_eq!(edges[0].target, "b.com");
        assert_eq!(edges[0].order, 1);
        // Origin fields come from the first visit of the run
        assert_eq!(edges[0].origin_start, "2023-01-01 10:00:00");
        assert_eq!(edges[0].time_active, 10);
        assert_eq!(edges[0].switch_time, "2023-01-01 10:02:00");

        assert_eq!(edges[1].origin, "b.com");
        assert_eq!(edges[1].target, "c.com");
        assert_eq!(edges[1].order, 3);
        assert_eq!(edges[1].origin_start, "2023-01-01 10:02:00");
        assert_eq!(edges[1].time_active, 30);
        assert_eq!(edges[1].switch_time, "2023-01-01 10:04:00");
    }

    #[test]
    fn test_ids_are_sequential_across_panelists() {
        let edges = compact(vec![
            visit("u1", "a.com", "2023-01-01 10:00:00", 10),
            visit("u1", "b.com", "2023-01-01 10:01:00", 20),
            visit("u2", "c.com", "2023-01-01 09:00:00", 30),
            visit("u2", "d.com", "2023-01-01 09:01:00", 40),
        ]);

        let ids: Vec<u64> = edges.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_single_visit_emits_nothing() {
        let edges = compact(vec![visit("u1", "a.com", "2023-01-01 10:00:00", 10)]);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_constant_domain_emits_nothing() {
        let edges = compact(vec![
            visit("u1", "a.com", "2023-01-01 10:00:00", 10),
            visit("u1", "a.com", "2023-01-01 10:01:00", 20),
            visit("u1", "a.com", "2023-01-01 10:02:00", 30),
        ]);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_no_self_loops() {
        let edges = compact(vec![
            visit("u1", "a.com", "2023-01-01 10:00:00", 5),
            visit("u1", "b.com", "2023-01-01 10:01:00", 5),
            visit("u1", "b.com", "2023-01-01 10:02:00", 5),
            visit("u1", "a.com", "2023-01-01 10:03:00", 5),
        ]);

        assert_eq!(edges.len(), 2);
        for edge in &edges {
            assert_ne!(edge.origin, edge.target);
        }
    }

    #[test]
    fn test_panelists_keep_first_seen_order() {
        let edges = compact(vec![
            visit("late", "a.com", "2023-01-01 10:00:00", 5),
            visit("early", "b.com", "2023-01-01 08:00:00", 5),
            visit("late", "c.com", "2023-01-01 10:01:00", 5),
            visit("early", "d.com", "2023-01-01 08:01:00", 5),
        ]);

        // "late" appears first in the input, so its edge comes first
        // even though "early" browsed earlier in the day
        assert_eq!(edges[0].user, "late");
        assert_eq!(edges[1].user, "early");
    }

    #[test]
    fn test_sort_is_by_timestamp_within_panelist() {
        let edges = compact(vec![
            visit("u1", "b.com", "2023-01-01 11:00:00", 20),
            visit("u1", "a.com", "2023-01-01 10:00:00", 10),
        ]);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].origin, "a.com");
        assert_eq!(edges[0].target, "b.com");
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let edges = compact(vec![
            visit("u1", "first.com", "2023-01-01 10:00:00", 1),
            visit("u1", "second.com", "2023-01-01 10:00:00", 2),
        ]);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].origin, "first.com");
        assert_eq!(edges[0].target, "second.com");
    }

    #[test]
    fn test_grouping_keeps_per_panelist_input_order() {
        let timelines = group_by_panelist(vec![
            visit("u1", "a.com", "t3", 1),
            visit("u2", "x.com", "t1", 1),
            visit("u1", "b.com", "t2", 1),
        ]);

        assert_eq!(timelines.len(), 2);
        let u1 = timelines.timeline("u1").unwrap();
        assert_eq!(u1[0].domain, "a.com");
        assert_eq!(u1[1].domain, "b.com");
        assert!(timelines.timeline("missing").is_none());
    }
}
