//! # planner-layout
//!
//! Deterministic event-to-grid layout for calendar day and week views.
//!
//! Given a set of time-stamped events and a discretized time axis, the engine
//! computes each event's column, vertical span and horizontal lane so that
//! overlapping events sit side by side instead of on top of each other, then
//! fits each title into the resulting box. It has no opinion on how boxes are
//! drawn: a browser renderer and a PDF generator feed the same engine their own
//! units and their own text measurement function.
//!
//! ## Modules
//!
//! - [`event`] — the caller-owned `EventRecord`
//! - [`time_axis`] — visible window → ordered list of fixed-size time slots
//! - [`clipper`] — event instants → slot ranges, clipped to the window
//! - [`lanes`] — per-column lane assignment for overlapping events
//! - [`geometry`] — slot/lane records → boxes in caller-supplied units
//! - [`text_fit`] — word wrap and ellipsis truncation with a measure callback
//! - [`classify`] — event metadata → style category
//! - [`split`] — cut multi-day events into one record per visible day
//! - [`pipeline`] — the full layout pass and its configuration
//! - [`error`] — Error types

pub mod classify;
pub mod clipper;
pub mod error;
pub mod event;
pub mod geometry;
pub mod lanes;
pub mod pipeline;
pub mod split;
pub mod text_fit;
pub mod time_axis;

pub use classify::{
    classify, CalendarRule, ClassifierRules, EventCategory, KeywordRule, SourceRule,
};
pub use clipper::{clip, clip_all, ClippedEvent};
pub use error::LayoutError;
pub use event::EventRecord;
pub use geometry::{to_box, GridGeometry, LayoutBox};
pub use lanes::{
    assign_lanes, assign_lanes_with, overlap_clusters, LaneAssignment, LanePolicy, TieBreak,
};
pub use pipeline::{layout, LaidOutEvent, LayoutConfig, TextOptions};
pub use split::split_by_day;
pub use text_fit::{fit, monospace, FittedText, ELLIPSIS};
pub use time_axis::{build_slots, TimeAxis, TimeSlot, MINUTES_PER_DAY};
