//! Lane assignment for overlapping events within a day column.
//!
//! Greedy interval colouring: events are visited in start order and each takes
//! the first lane whose previous occupant has already ended. For intervals sorted
//! by start this uses the minimum number of lanes (the maximum overlap depth).
//!
//! Events are then grouped into connected overlap clusters. Every event in a
//! cluster shares the same `lanes_in_group`, so two events linked only through a
//! third one still shrink to the same width.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clipper::ClippedEvent;

/// How events starting in the same slot are ordered before lanes are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Longer events first, so they claim the leftmost lanes.
    #[default]
    LongestFirst,
    ShortestFirst,
    /// Keep the caller's order.
    InputOrder,
}

/// Lane assignment policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanePolicy {
    /// Upper bound on lanes per column. Once reached, further overlapping events
    /// share the last lane. Values below 1 are treated as 1.
    pub max_lanes: usize,
    pub tie_break: TieBreak,
}

impl Default for LanePolicy {
    fn default() -> Self {
        Self {
            max_lanes: 3,
            tie_break: TieBreak::default(),
        }
    }
}

impl LanePolicy {
    /// A policy that never caps the lane count.
    pub fn unbounded() -> Self {
        Self {
            max_lanes: usize::MAX,
            ..Self::default()
        }
    }
}

/// The lane an event was placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneAssignment {
    pub event_id: String,
    pub lane: usize,
    /// Width divisor shared by every event in the same overlap cluster. Always >= 1.
    pub lanes_in_group: usize,
}

/// Assign lanes with the default policy (3 lanes, longest first).
pub fn assign_lanes(clipped: &[ClippedEvent]) -> Vec<LaneAssignment> {
    assign_lanes_with(clipped, &LanePolicy::default())
}

/// Assign lanes, column by column. The result is parallel to `clipped`.
pub fn assign_lanes_with(clipped: &[ClippedEvent], policy: &LanePolicy) -> Vec<LaneAssignment> {
    let max_lanes = policy.max_lanes.max(1);
    let mut lanes = vec![0usize; clipped.len()];
    let mut groups = vec![1usize; clipped.len()];

    for (column, mut order) in indices_by_column(clipped) {
        sort_for_placement(clipped, &mut order, policy.tie_break);

        let used = place(clipped, &order, max_lanes, &mut lanes);
        log::trace!(
            "column {}: {} events in {} lanes",
            column,
            order.len(),
            used
        );

        for cluster in clusters_in_start_order(clipped, &order) {
            let width = cluster.iter().map(|&i| lanes[i]).max().unwrap_or(0) + 1;
            for &i in &cluster {
                groups[i] = width;
            }
        }
    }

    clipped
        .iter()
        .zip(lanes.iter().zip(groups.iter()))
        .map(|(event, (&lane, &lanes_in_group))| LaneAssignment {
            event_id: event.event_id.clone(),
            lane,
            lanes_in_group,
        })
        .collect()
}

/// Connected overlap clusters, as indices into `clipped`.
///
/// Clusters are ordered by column, then by start slot; indices inside a cluster
/// are in start order. Events sharing no slot with anything form their own
/// single-element cluster.
pub fn overlap_clusters(clipped: &[ClippedEvent]) -> Vec<Vec<usize>> {
    indices_by_column(clipped)
        .into_values()
        .flat_map(|mut order| {
            sort_for_placement(clipped, &mut order, TieBreak::LongestFirst);
            clusters_in_start_order(clipped, &order)
        })
        .collect()
}

fn indices_by_column(clipped: &[ClippedEvent]) -> BTreeMap<usize, Vec<usize>> {
    let mut columns: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, event) in clipped.iter().enumerate() {
        columns.entry(event.column).or_default().push(i);
    }
    columns
}

/// Start slot ascending, then the tie-break, then event id, then input position.
fn sort_for_placement(clipped: &[ClippedEvent], order: &mut [usize], tie_break: TieBreak) {
    order.sort_by(|&a, &b| {
        let (ea, eb) = (&clipped[a], &clipped[b]);
        ea.start_slot
            .cmp(&eb.start_slot)
            .then_with(|| match tie_break {
                TieBreak::LongestFirst => eb.slot_span().cmp(&ea.slot_span()),
                TieBreak::ShortestFirst => ea.slot_span().cmp(&eb.slot_span()),
                TieBreak::InputOrder => a.cmp(&b),
            })
            .then_with(|| ea.event_id.cmp(&eb.event_id))
            .then_with(|| a.cmp(&b))
    });
}

/// First-fit placement over `order`. Returns the number of lanes opened.
fn place(
    clipped: &[ClippedEvent],
    order: &[usize],
    max_lanes: usize,
    lanes: &mut [usize],
) -> usize {
    // End slot of the event currently occupying each lane.
    let mut lane_ends: Vec<usize> = Vec::new();

    for &i in order {
        let event = &clipped[i];
        let lane = match lane_ends.iter().position(|&end| end <= event.start_slot) {
            Some(free) => free,
            None if lane_ends.len() < max_lanes => {
                lane_ends.push(0);
                lane_ends.len() - 1
            }
            None => {
                log::debug!(
                    "lane cap {} reached in column {}; event {} shares the last lane",
                    max_lanes,
                    event.column,
                    event.event_id
                );
                lane_ends.len() - 1
            }
        };
        lane_ends[lane] = lane_ends[lane].max(event.end_slot);
        lanes[i] = lane;
    }

    lane_ends.len()
}

/// Split a start-ordered column into transitively overlapping runs.
fn clusters_in_start_order(clipped: &[ClippedEvent], order: &[usize]) -> Vec<Vec<usize>> {
    let mut clusters = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut reach = 0;

    for &i in order {
        let event = &clipped[i];
        if !current.is_empty() && event.start_slot >= reach {
            clusters.push(std::mem::take(&mut current));
        }
        reach = if current.is_empty() {
            event.end_slot
        } else {
            reach.max(event.end_slot)
        };
        current.push(i);
    }
    if !current.is_empty() {
        clusters.push(current);
    }

    clusters
}
