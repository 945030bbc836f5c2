//! Time-slot discretization of the visible day.
//!
//! A window `[start_minute, end_minute_inclusive]` is cut into slots of a fixed
//! granularity. The last slot is emitted as long as its start is still inside the
//! window, so the slots may extend past `end_minute_inclusive` when the window is
//! not a multiple of the granularity.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Minutes in a calendar day; the upper bound of any window.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// One discrete row of the time grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub index: usize,
    /// Minute of day (0..=1440) at which this slot starts.
    pub start_minute: u32,
}

/// Build the ordered slots covering a window.
///
/// # Errors
/// Returns `LayoutError::InvalidRange` if `granularity_minutes` is zero, if
/// `end_minute_inclusive < start_minute`, or if the window runs past midnight.
pub fn build_slots(
    start_minute: u32,
    end_minute_inclusive: u32,
    granularity_minutes: u32,
) -> Result<Vec<TimeSlot>> {
    validate_window(start_minute, end_minute_inclusive, granularity_minutes)?;

    let count = ((end_minute_inclusive - start_minute) / granularity_minutes) as usize + 1;
    Ok((0..count)
        .map(|index| TimeSlot {
            index,
            start_minute: start_minute + index as u32 * granularity_minutes,
        })
        .collect())
}

fn validate_window(start: u32, end_inclusive: u32, granularity: u32) -> Result<()> {
    if granularity == 0 {
        return Err(LayoutError::InvalidRange(
            "slot granularity must be positive".to_string(),
        ));
    }
    if end_inclusive < start {
        return Err(LayoutError::InvalidRange(format!(
            "window end {} is before window start {}",
            end_inclusive, start
        )));
    }
    if end_inclusive > MINUTES_PER_DAY {
        return Err(LayoutError::InvalidRange(format!(
            "window end {} is past midnight ({})",
            end_inclusive, MINUTES_PER_DAY
        )));
    }
    Ok(())
}

/// The slots of one rendering window, plus the time zone in which event
/// instants are read as wall-clock minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    start_minute: u32,
    end_minute_inclusive: u32,
    granularity: u32,
    timezone: Tz,
    slots: Vec<TimeSlot>,
}

impl TimeAxis {
    /// Build an axis in UTC. See [`build_slots`] for the error conditions.
    pub fn new(
        start_minute: u32,
        end_minute_inclusive: u32,
        granularity_minutes: u32,
    ) -> Result<Self> {
        let slots = build_slots(start_minute, end_minute_inclusive, granularity_minutes)?;
        Ok(Self {
            start_minute,
            end_minute_inclusive,
            granularity: granularity_minutes,
            timezone: Tz::UTC,
            slots,
        })
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn start_minute(&self) -> u32 {
        self.start_minute
    }

    pub fn end_minute_inclusive(&self) -> u32 {
        self.end_minute_inclusive
    }

    pub fn granularity(&self) -> u32 {
        self.granularity
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Signed index of the slot containing `minute` (floor division).
    pub fn slot_floor(&self, minute: i64) -> i64 {
        (minute - self.start_minute as i64).div_euclid(self.granularity as i64)
    }

    /// Signed index of the first slot boundary at or after `minute`.
    pub fn slot_ceil(&self, minute: i64) -> i64 {
        let offset = minute - self.start_minute as i64;
        let g = self.granularity as i64;
        offset.div_euclid(g) + i64::from(offset.rem_euclid(g) != 0)
    }
}
