//! Map event instants onto slot ranges of a [`TimeAxis`].
//!
//! Instants are read as wall-clock minutes in the axis time zone. Events that miss
//! the window entirely are dropped; events that straddle an edge are truncated at
//! it. An event that touches the window always keeps at least one slot.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::EventRecord;
use crate::time_axis::TimeAxis;

/// An event's visible slot range within one column.
///
/// Invariant: `0 <= start_slot < end_slot <= slot_count`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClippedEvent {
    pub event_id: String,
    pub column: usize,
    pub start_slot: usize,
    /// Exclusive.
    pub end_slot: usize,
}

impl ClippedEvent {
    pub fn slot_span(&self) -> usize {
        self.end_slot - self.start_slot
    }

    /// Two ranges overlap iff `a.start < b.end && b.start < a.end`.
    /// Ranges that merely touch do not.
    pub fn overlaps(&self, other: &ClippedEvent) -> bool {
        self.column == other.column
            && self.start_slot < other.end_slot
            && other.start_slot < self.end_slot
    }
}

/// Minute-of-day of `start` and `end` in the axis time zone.
///
/// Both are measured from the local midnight that starts the event's day, so an
/// event ending at the following midnight reports 1440 rather than 0.
fn local_minutes(start: DateTime<Utc>, end: DateTime<Utc>, axis: &TimeAxis) -> (i64, i64) {
    let tz = axis.timezone();
    let local_start = start.with_timezone(&tz).naive_local();
    let local_end = end.with_timezone(&tz).naive_local();
    let midnight = local_start.date().and_time(NaiveTime::MIN);

    let start_minute = (local_start - midnight).num_minutes();
    let end_minute = (local_end - midnight).num_minutes();
    (start_minute, end_minute)
}

/// Clip one event against the axis.
///
/// Returns `None` when `[start, end)` does not intersect
/// `[axis.start_minute, axis.end_minute_inclusive]`. Zero or negative durations
/// are treated as a one-minute event at `start` for this test, and the result is
/// promoted to a single slot.
///
/// The start slot is floored to the slot containing `start`; the end slot is
/// rounded up so a partially-covered trailing slot stays visible.
pub fn clip(event: &EventRecord, axis: &TimeAxis) -> Option<ClippedEvent> {
    let (start_minute, end_minute) = local_minutes(event.start, event.end, axis);
    let end_minute = end_minute.max(start_minute + 1);

    if start_minute > axis.end_minute_inclusive() as i64 || end_minute <= axis.start_minute() as i64
    {
        return None;
    }

    let slot_count = axis.slot_count() as i64;
    let computed_start = axis.slot_floor(start_minute);
    let computed_end = axis.slot_ceil(end_minute);
    if computed_start >= slot_count || computed_end <= 0 {
        return None;
    }

    let start_slot = computed_start.max(0);
    let mut end_slot = computed_end.min(slot_count);
    if end_slot <= start_slot {
        end_slot = start_slot + 1;
    }

    Some(ClippedEvent {
        event_id: event.id.clone(),
        column: event.column,
        start_slot: start_slot as usize,
        end_slot: end_slot as usize,
    })
}

/// Clip every event, dropping those outside the window.
pub fn clip_all(events: &[EventRecord], axis: &TimeAxis) -> Vec<ClippedEvent> {
    events
        .iter()
        .filter_map(|event| {
            let clipped = clip(event, axis);
            if clipped.is_none() {
                log::debug!(
                    "event {} ({} .. {}) is outside the visible window",
                    event.id,
                    event.start,
                    event.end
                );
            }
            clipped
        })
        .collect()
}
