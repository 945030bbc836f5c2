//! Convert slot/lane records into boxes in the caller's unit system.
//!
//! The same records produce pixel boxes for a browser and point boxes for a PDF
//! page; only the [`GridGeometry`] differs.

use serde::{Deserialize, Serialize};

use crate::clipper::ClippedEvent;
use crate::error::{LayoutError, Result};
use crate::lanes::LaneAssignment;

/// Grid dimensions supplied by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridGeometry {
    /// Horizontal position of column 0.
    pub origin_x: f64,
    /// Vertical position of slot 0 (e.g., below a header row).
    pub origin_y: f64,
    pub column_width: f64,
    /// Space between consecutive columns when origins are derived.
    pub column_gap: f64,
    pub slot_height: f64,
    /// Space subtracted from the right edge of every lane.
    pub lane_gutter: f64,
    /// Boxes shorter than this are stretched to it.
    pub min_box_height: f64,
    /// Explicit left edge per column. Overrides `origin_x`/`column_gap` for
    /// the columns it covers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_offsets: Option<Vec<f64>>,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            column_width: 120.0,
            column_gap: 0.0,
            slot_height: 20.0,
            lane_gutter: 2.0,
            min_box_height: 0.0,
            column_offsets: None,
        }
    }
}

impl GridGeometry {
    pub fn new(column_width: f64, slot_height: f64) -> Self {
        Self {
            column_width,
            slot_height,
            ..Self::default()
        }
    }

    /// Left edge of `column`.
    pub fn column_origin(&self, column: usize) -> f64 {
        if let Some(offset) = self.column_offsets.as_ref().and_then(|o| o.get(column)) {
            return *offset;
        }
        self.origin_x + column as f64 * (self.column_width + self.column_gap)
    }

    /// # Errors
    /// Returns `LayoutError::InvalidGeometry` for non-finite values, a
    /// non-positive column width or slot height, or a negative gutter, gap, or
    /// minimum height.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("origin_x", self.origin_x),
            ("origin_y", self.origin_y),
            ("column_width", self.column_width),
            ("column_gap", self.column_gap),
            ("slot_height", self.slot_height),
            ("lane_gutter", self.lane_gutter),
            ("min_box_height", self.min_box_height),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LayoutError::InvalidGeometry(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        if self.column_width <= 0.0 || self.slot_height <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "column_width and slot_height must be positive, got {} x {}",
                self.column_width, self.slot_height
            )));
        }
        if self.lane_gutter < 0.0 || self.column_gap < 0.0 || self.min_box_height < 0.0 {
            return Err(LayoutError::InvalidGeometry(
                "lane_gutter, column_gap and min_box_height must not be negative".to_string(),
            ));
        }
        if let Some(offsets) = &self.column_offsets {
            if offsets.iter().any(|o| !o.is_finite()) {
                return Err(LayoutError::InvalidGeometry(
                    "column_offsets must be finite".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// A renderer-agnostic event rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    pub event_id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Place one event.
///
/// ```text
/// lane_width = column_width / lanes_in_group
/// x          = column_origin(column) + lane * lane_width
/// width      = lane_width - lane_gutter            (never negative)
/// y          = origin_y + start_slot * slot_height
/// height     = max(slot span * slot_height, min_box_height)
/// ```
pub fn to_box(clipped: &ClippedEvent, lane: &LaneAssignment, geometry: &GridGeometry) -> LayoutBox {
    let lanes_in_group = lane.lanes_in_group.max(1) as f64;
    let lane_width = geometry.column_width / lanes_in_group;

    let x = geometry.column_origin(clipped.column) + lane.lane as f64 * lane_width;
    let width = (lane_width - geometry.lane_gutter).max(0.0);
    let y = geometry.origin_y + clipped.start_slot as f64 * geometry.slot_height;
    let height = (clipped.slot_span() as f64 * geometry.slot_height)
        .max(geometry.min_box_height)
        .max(0.0);

    LayoutBox {
        event_id: clipped.event_id.clone(),
        x,
        y,
        width,
        height,
    }
}
