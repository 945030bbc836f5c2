//! The caller-owned event record the engine lays out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single event to place on the grid.
///
/// The engine never mutates records; every derived value (slot range, lane,
/// box, fitted title, category) is recomputed from them on each pass.
///
/// Records are expected to lie within a single local day. Multi-day events
/// should be cut with [`crate::split_by_day`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Day column index within the rendering window (0 = first visible day).
    #[serde(default)]
    pub column: usize,
    /// Where the event came from (e.g., "simplepractice", "google").
    #[serde(default)]
    pub source_tag: String,
    #[serde(default)]
    pub title: String,
    /// Identifier of the external calendar the event was imported from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
}

impl EventRecord {
    pub fn new(
        id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        column: usize,
    ) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            column,
            source_tag: String::new(),
            title: String::new(),
            calendar_id: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_source(mut self, source_tag: impl Into<String>) -> Self {
        self.source_tag = source_tag.into();
        self
    }

    pub fn with_calendar(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }
}
