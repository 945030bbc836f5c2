//! WASM bindings for planner-layout.
//!
//! Exposes slot generation, the full layout pass, multi-day splitting and
//! classification to the browser renderer via `wasm-bindgen`. All complex types
//! are passed as JSON strings.
//!
//! Text is measured by an optional JS callback (for example one wrapping canvas
//! `measureText`), called synchronously for each candidate line. Without one,
//! every character is `char_width` wide.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p planner-layout-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/planner-layout-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/planner_layout_wasm.wasm
//! ```

use std::cell::RefCell;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use planner_layout::{
    build_slots, layout, monospace, split_by_day, ClassifierRules, EventRecord, LaidOutEvent,
    LayoutConfig,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Input format for events passed from JavaScript.
#[derive(Deserialize)]
struct EventInput {
    id: String,
    start: String,
    end: String,
    #[serde(default)]
    column: usize,
    #[serde(default)]
    source_tag: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    calendar_id: Option<String>,
}

#[derive(Serialize)]
struct EventOutput {
    id: String,
    start: String,
    end: String,
    column: usize,
    source_tag: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    calendar_id: Option<String>,
}

impl From<&EventRecord> for EventOutput {
    fn from(e: &EventRecord) -> Self {
        Self {
            id: e.id.clone(),
            start: e.start.to_rfc3339(),
            end: e.end.to_rfc3339(),
            column: e.column,
            source_tag: e.source_tag.clone(),
            title: e.title.clone(),
            calendar_id: e.calendar_id.clone(),
        }
    }
}

#[derive(Serialize)]
struct LaidOutDto {
    id: String,
    column: usize,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    lines: Vec<String>,
    truncated: bool,
    category: &'static str,
}

impl From<&LaidOutEvent<'_>> for LaidOutDto {
    fn from(l: &LaidOutEvent<'_>) -> Self {
        Self {
            id: l.event.id.clone(),
            column: l.event.column,
            x: l.layout_box.x,
            y: l.layout_box.y,
            width: l.layout_box.width,
            height: l.layout_box.height,
            lines: l.text.lines.clone(),
            truncated: l.text.truncated,
            category: l.category.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers: parsing
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with timezone offset, e.g., "2026-02-17T14:00:00+00:00")
/// and naive local time (e.g., "2026-02-17T14:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn to_record(input: EventInput) -> Result<EventRecord, String> {
    Ok(EventRecord {
        start: parse_datetime(&input.start)?,
        end: parse_datetime(&input.end)?,
        id: input.id,
        column: input.column,
        source_tag: input.source_tag,
        title: input.title,
        calendar_id: input.calendar_id,
    })
}

/// Convert a JSON array of event objects into `Vec<EventRecord>`.
fn parse_events_json(json: &str) -> Result<Vec<EventRecord>, String> {
    let inputs: Vec<EventInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid events JSON: {}", e))?;
    inputs.into_iter().map(to_record).collect()
}

fn parse_config_json(json: &str) -> Result<LayoutConfig, String> {
    if json.trim().is_empty() {
        return Ok(LayoutConfig::default());
    }
    LayoutConfig::from_json(json).map_err(|e| e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Boundary-independent implementations
// ---------------------------------------------------------------------------

fn slots_json(start: u32, end_inclusive: u32, granularity: u32) -> Result<String, String> {
    let slots = build_slots(start, end_inclusive, granularity).map_err(|e| e.to_string())?;
    to_json(&slots)
}

fn layout_json(events_json: &str, config_json: &str, char_width: f64) -> Result<String, String> {
    if !(char_width.is_finite() && char_width > 0.0) {
        return Err(format!("char_width must be positive, got {}", char_width));
    }
    let measure = monospace(char_width);
    layout_json_with(events_json, config_json, |s: &str| Ok(measure(s)))
}

/// Layout with a fallible measure. The first measure error aborts the pass.
fn layout_json_with<M>(events_json: &str, config_json: &str, measure: M) -> Result<String, String>
where
    M: Fn(&str) -> Result<f64, String>,
{
    let events = parse_events_json(events_json)?;
    let config = parse_config_json(config_json)?;

    let failure: RefCell<Option<String>> = RefCell::new(None);
    let laid_out = layout(&events, &config, |s: &str| match measure(s) {
        Ok(width) => width,
        Err(e) => {
            failure.borrow_mut().get_or_insert(e);
            0.0
        }
    })
    .map_err(|e| e.to_string())?;

    if let Some(e) = failure.into_inner() {
        return Err(e);
    }

    let dtos: Vec<LaidOutDto> = laid_out.iter().map(LaidOutDto::from).collect();
    to_json(&dtos)
}

/// Call a JS `(text) => width` function.
fn js_measure(measure: &js_sys::Function, text: &str) -> Result<f64, String> {
    let value = measure
        .call1(&JsValue::NULL, &JsValue::from_str(text))
        .map_err(|e| format!("measure function threw: {:?}", e))?;
    check_width(value.as_f64(), text)
}

fn check_width(width: Option<f64>, text: &str) -> Result<f64, String> {
    match width {
        Some(w) if w.is_finite() && w >= 0.0 => Ok(w),
        _ => Err(format!(
            "measure function must return a non-negative number for '{}'",
            text
        )),
    }
}

fn split_json(
    events_json: &str,
    first_day: &str,
    day_count: usize,
    timezone: &str,
) -> Result<String, String> {
    let events = parse_events_json(events_json)?;
    let first_day = NaiveDate::parse_from_str(first_day, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", first_day, e))?;
    let tz: Tz = timezone
        .parse()
        .map_err(|_| format!("Invalid timezone: {}", timezone))?;

    let pieces: Vec<EventOutput> = events
        .iter()
        .flat_map(|e| split_by_day(e, first_day, day_count, tz))
        .map(|e| EventOutput::from(&e))
        .collect();
    to_json(&pieces)
}

fn classify_json(event_json: &str, rules_json: Option<&str>) -> Result<String, String> {
    let input: EventInput =
        serde_json::from_str(event_json).map_err(|e| format!("Invalid event JSON: {}", e))?;
    let event = to_record(input)?;
    let rules: ClassifierRules = match rules_json {
        Some(json) if !json.trim().is_empty() => {
            serde_json::from_str(json).map_err(|e| format!("Invalid rules JSON: {}", e))?
        }
        _ => ClassifierRules::default(),
    };
    Ok(rules.classify(&event).as_str().to_string())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Build the slots of a window. Returns a JSON array of `{index, start_minute}`.
#[wasm_bindgen(js_name = "buildSlots")]
pub fn build_slots_js(
    start_minute: u32,
    end_minute_inclusive: u32,
    granularity_minutes: u32,
) -> Result<String, JsValue> {
    slots_json(start_minute, end_minute_inclusive, granularity_minutes)
        .map_err(|e| JsValue::from_str(&e))
}

/// Run a full layout pass.
///
/// `events_json` is a JSON array of `{id, start, end, column, source_tag, title,
/// calendar_id}` objects with ISO 8601 instants. `config_json` is a (possibly
/// partial or empty) `LayoutConfig`. Returns a JSON array of
/// `{id, column, x, y, width, height, lines, truncated, category}`.
///
/// `measure`, when given, is called as `measure(text)` and must return the
/// rendered width in the same units as the geometry. A throw or a non-number
/// fails the whole pass. Without it, text is measured as `char_width` per
/// character.
#[wasm_bindgen(js_name = "layoutEvents")]
pub fn layout_events(
    events_json: &str,
    config_json: &str,
    char_width: f64,
    measure: Option<js_sys::Function>,
) -> Result<String, JsValue> {
    let result = match measure {
        Some(f) => layout_json_with(events_json, config_json, |s: &str| js_measure(&f, s)),
        None => layout_json(events_json, config_json, char_width),
    };
    result.map_err(|e| JsValue::from_str(&e))
}

/// Split multi-day events into per-day records for a window of `day_count`
/// days starting at `first_day` ("YYYY-MM-DD") in `timezone`.
#[wasm_bindgen(js_name = "splitByDay")]
pub fn split_events_by_day(
    events_json: &str,
    first_day: &str,
    day_count: usize,
    timezone: &str,
) -> Result<String, JsValue> {
    split_json(events_json, first_day, day_count, timezone).map_err(|e| JsValue::from_str(&e))
}

/// Classify a single event. `rules_json` defaults to the built-in rules.
/// Returns one of `"primary"`, `"secondary"`, `"allday"`, `"default"`.
#[wasm_bindgen(js_name = "classifyEvent")]
pub fn classify_event(event_json: &str, rules_json: Option<String>) -> Result<String, JsValue> {
    classify_json(event_json, rules_json.as_deref()).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIR: &str = r#"[
        {"id": "A", "start": "2026-03-02T10:00:00Z", "end": "2026-03-02T12:00:00Z", "title": "Intake"},
        {"id": "B", "start": "2026-03-02T11:00:00", "end": "2026-03-02T13:00:00", "source_tag": "google"}
    ]"#;

    #[test]
    fn layout_json_returns_boxes() {
        let config = r#"{"start_minute": 480, "end_minute_inclusive": 1050,
            "geometry": {"column_width": 100.0, "slot_height": 10.0, "lane_gutter": 0.0}}"#;

        let out = layout_json(PAIR, config, 6.0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value[0]["width"], 50.0);
        assert_eq!(value[1]["x"], 50.0);
        assert_eq!(value[1]["category"], "secondary");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let out = layout_json(PAIR, "", 6.0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn bad_datetime_reported() {
        let err = layout_json(r#"[{"id": "x", "start": "noon", "end": "1pm"}]"#, "", 6.0)
            .unwrap_err();
        assert!(err.contains("Invalid datetime"), "{}", err);
    }

    #[test]
    fn char_width_must_be_positive() {
        for bad in [0.0, -6.0, f64::NAN, f64::INFINITY] {
            let err = layout_json(PAIR, "", bad).unwrap_err();
            assert!(err.contains("char_width"), "{}", err);
        }
    }

    #[test]
    fn custom_measure_drives_fitting() {
        let config = r#"{"start_minute": 480, "end_minute_inclusive": 1050,
            "geometry": {"column_width": 100.0, "slot_height": 10.0, "lane_gutter": 0.0},
            "text": {"line_height": 20.0, "padding": 0.0}}"#;
        let events = r#"[{"id": "A", "start": "2026-03-02T10:00:00Z",
            "end": "2026-03-02T10:30:00Z", "title": "Intake"}]"#;

        // Every string is wider than the box except the empty one.
        let out = layout_json_with(events, config, |s: &str| {
            Ok(if s.is_empty() { 0.0 } else { 1000.0 })
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["lines"][0], "");
        assert_eq!(value[0]["truncated"], true);

        let out = layout_json_with(events, config, |s: &str| Ok(s.len() as f64)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["lines"][0], "Intake");
    }

    #[test]
    fn measure_error_fails_the_pass() {
        let err = layout_json_with(PAIR, "", |s: &str| check_width(None, s)).unwrap_err();
        assert!(err.contains("non-negative number"), "{}", err);
    }

    #[test]
    fn check_width_rejects_non_numbers() {
        assert_eq!(check_width(Some(12.5), "x"), Ok(12.5));
        assert!(check_width(Some(f64::NAN), "x").is_err());
        assert!(check_width(Some(-1.0), "x").is_err());
        assert!(check_width(None, "x").is_err());
    }

    #[test]
    fn slots_json_rejects_zero_granularity() {
        assert!(slots_json(480, 1050, 0).is_err());
        assert!(slots_json(480, 540, 30).unwrap().contains("\"start_minute\":510"));
    }

    #[test]
    fn split_json_cuts_overnight_event() {
        let events = r#"[{"id": "n", "start": "2026-03-03T22:00:00Z", "end": "2026-03-04T02:00:00Z"}]"#;
        let out = split_json(events, "2026-03-02", 7, "UTC").unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["column"], 1);
        assert_eq!(value[1]["column"], 2);
    }

    #[test]
    fn classify_json_uses_default_rules() {
        let event = r#"{"id": "e", "start": "2026-03-02T09:00:00Z", "end": "2026-03-02T10:00:00Z",
            "source_tag": "simplepractice"}"#;
        assert_eq!(classify_json(event, None).unwrap(), "primary");
    }
}
