//! Cut events that cross local midnight into one record per visible day.
//!
//! The clipper reads each record as a single day, so multi-day events must be
//! split before layout. Each piece keeps the original id, title and metadata and
//! gets the column of its day.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::event::EventRecord;

/// Split `event` at local midnights in `tz`, keeping the pieces that fall on
/// `first_day .. first_day + day_count`.
///
/// The input `column` is ignored; each piece's column is its day offset from
/// `first_day`. A zero-length event yields at most one piece.
pub fn split_by_day(
    event: &EventRecord,
    first_day: NaiveDate,
    day_count: usize,
    tz: Tz,
) -> Vec<EventRecord> {
    let mut pieces = Vec::new();

    if event.end <= event.start {
        let day = event.start.with_timezone(&tz).date_naive();
        if let Some(column) = column_of(day, first_day, day_count) {
            pieces.push(piece(event, event.start, event.end, column));
        }
        return pieces;
    }

    // Bound the walk to the visible days.
    let window_start = local_midnight(first_day, tz);
    // Counts too large for a date leave the window open-ended.
    let window_end = i64::try_from(day_count)
        .ok()
        .and_then(Duration::try_days)
        .and_then(|days| first_day.checked_add_signed(days))
        .and_then(|d| local_midnight(d, tz));

    let mut cursor = match window_start {
        Some(ws) => event.start.max(ws),
        None => event.start,
    };
    let end = match window_end {
        Some(we) => event.end.min(we),
        None => event.end,
    };

    while cursor < end {
        let day = cursor.with_timezone(&tz).date_naive();
        let piece_end = day
            .succ_opt()
            .and_then(|next| local_midnight(next, tz))
            .filter(|midnight| *midnight > cursor)
            .map_or(end, |midnight| midnight.min(end));

        if let Some(column) = column_of(day, first_day, day_count) {
            pieces.push(piece(event, cursor, piece_end, column));
        }
        cursor = piece_end;
    }

    pieces
}

/// First instant of `date` in `tz`. Zones that skip midnight on a DST change
/// start that day at 01:00.
fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

fn column_of(day: NaiveDate, first_day: NaiveDate, day_count: usize) -> Option<usize> {
    let offset = (day - first_day).num_days();
    if offset >= 0 && (offset as usize) < day_count {
        Some(offset as usize)
    } else {
        None
    }
}

fn piece(
    event: &EventRecord,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    column: usize,
) -> EventRecord {
    EventRecord {
        start,
        end,
        column,
        ..event.clone()
    }
}
