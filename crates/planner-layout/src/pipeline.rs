//! The full layout pass: axis → clip → lanes → boxes → text → category.
//!
//! The window is validated once up front; after that no event can make the pass
//! fail. Out-of-window events are dropped, short ones stretched, long titles cut.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::classify::{ClassifierRules, EventCategory};
use crate::clipper::{clip, ClippedEvent};
use crate::error::{LayoutError, Result};
use crate::event::EventRecord;
use crate::geometry::{to_box, GridGeometry, LayoutBox};
use crate::lanes::{assign_lanes_with, LanePolicy};
use crate::text_fit::{fit, FittedText};
use crate::time_axis::TimeAxis;

/// How titles are fitted inside each box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    pub line_height: f64,
    /// Inset on every side of the box before fitting.
    pub padding: f64,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            line_height: 14.0,
            padding: 2.0,
        }
    }
}

/// Everything a renderer supplies besides the events and the measure function.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// First visible minute of the day.
    pub start_minute: u32,
    /// Last minute at which a slot may still start.
    pub end_minute_inclusive: u32,
    pub granularity_minutes: u32,
    /// IANA zone in which event instants are read (e.g., "America/New_York").
    pub timezone: String,
    pub lanes: LanePolicy,
    pub geometry: GridGeometry,
    pub text: TextOptions,
    pub classifier: ClassifierRules,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_minute: 6 * 60,
            end_minute_inclusive: 23 * 60 + 30,
            granularity_minutes: 30,
            timezone: "UTC".to_string(),
            lanes: LanePolicy::default(),
            geometry: GridGeometry::default(),
            text: TextOptions::default(),
            classifier: ClassifierRules::default(),
        }
    }
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| LayoutError::InvalidTimezone(self.timezone.clone()))
    }

    /// Build the axis for this window. Fails on a malformed window or zone.
    pub fn time_axis(&self) -> Result<TimeAxis> {
        let tz = self.timezone()?;
        Ok(TimeAxis::new(
            self.start_minute,
            self.end_minute_inclusive,
            self.granularity_minutes,
        )?
        .with_timezone(tz))
    }

    /// Check the whole config without building anything that outlives the call.
    pub fn validate(&self) -> Result<()> {
        self.time_axis()?;
        self.geometry.validate()?;
        if !self.text.line_height.is_finite() || self.text.line_height <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "line_height must be positive, got {}",
                self.text.line_height
            )));
        }
        if !self.text.padding.is_finite() || self.text.padding < 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "padding must not be negative, got {}",
                self.text.padding
            )));
        }
        Ok(())
    }
}

/// One event as a renderer should draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidOutEvent<'a> {
    pub event: &'a EventRecord,
    pub layout_box: LayoutBox,
    pub text: FittedText,
    pub category: EventCategory,
}

/// Run a full layout pass.
///
/// Results follow the input order, minus events outside the window. The pass is
/// pure: identical inputs give identical output.
///
/// # Errors
/// Returns `LayoutError::InvalidRange`, `InvalidTimezone` or `InvalidGeometry`
/// if `config` fails [`LayoutConfig::validate`]. No partial result is produced.
pub fn layout<'a, F>(
    events: &'a [EventRecord],
    config: &LayoutConfig,
    measure: F,
) -> Result<Vec<LaidOutEvent<'a>>>
where
    F: Fn(&str) -> f64,
{
    config.validate()?;
    let axis = config.time_axis()?;

    let (visible, clipped): (Vec<&EventRecord>, Vec<ClippedEvent>) = events
        .iter()
        .filter_map(|event| clip(event, &axis).map(|c| (event, c)))
        .unzip();

    if visible.len() < events.len() {
        log::debug!(
            "{} of {} events fall outside {}..={} and were dropped",
            events.len() - visible.len(),
            events.len(),
            config.start_minute,
            config.end_minute_inclusive
        );
    }

    let lanes = assign_lanes_with(&clipped, &config.lanes);
    let padding = config.text.padding;

    let laid_out: Vec<LaidOutEvent<'a>> = visible
        .into_iter()
        .zip(clipped.iter().zip(lanes.iter()))
        .map(|(event, (clipped, lane))| {
            let layout_box = to_box(clipped, lane, &config.geometry);
            let text = fit(
                &event.title,
                (layout_box.width - 2.0 * padding).max(0.0),
                (layout_box.height - 2.0 * padding).max(0.0),
                config.text.line_height,
                &measure,
            );
            LaidOutEvent {
                event,
                layout_box,
                text,
                category: config.classifier.classify(event),
            }
        })
        .collect();

    log::trace!(
        "layout pass: {} slots, {} boxes",
        axis.slot_count(),
        laid_out.len()
    );

    Ok(laid_out)
}
