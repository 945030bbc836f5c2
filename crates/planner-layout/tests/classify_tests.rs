//! Tests for event classification.

use chrono::{TimeZone, Utc};
use planner_layout::{
    classify, CalendarRule, ClassifierRules, EventCategory, EventRecord, KeywordRule, SourceRule,
};

fn record(title: &str, source_tag: &str) -> EventRecord {
    EventRecord::new(
        "e1",
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
        0,
    )
    .with_title(title)
    .with_source(source_tag)
}

#[test]
fn practice_management_source_is_primary() {
    assert_eq!(
        classify(&record("Jane D.", "simplepractice")),
        EventCategory::Primary
    );
}

#[test]
fn google_source_is_secondary() {
    assert_eq!(classify(&record("Dentist", "google")), EventCategory::Secondary);
}

#[test]
fn source_match_ignores_case() {
    assert_eq!(classify(&record("Dentist", "Google")), EventCategory::Secondary);
}

#[test]
fn unmatched_event_is_default() {
    assert_eq!(classify(&record("Dentist", "outlook")), EventCategory::Default);
}

#[test]
fn holiday_calendar_id_wins_over_everything() {
    // Title says appointment and source says google, but the calendar id is checked first.
    let event = record("Appointment-free day", "google")
        .with_calendar("en.usa#holiday@group.v.calendar.google.com");
    assert_eq!(classify(&event), EventCategory::AllDay);
}

#[test]
fn title_keyword_beats_source_tag() {
    // A Google event whose title marks it out of office.
    let event = record("Out of Office - conference", "google");
    assert_eq!(classify(&event), EventCategory::AllDay);
}

#[test]
fn keyword_match_is_case_insensitive_substring() {
    let event = record("Follow-up APPOINTMENT", "google");
    assert_eq!(classify(&event), EventCategory::Primary);
}

#[test]
fn unknown_calendar_id_falls_through() {
    let event = record("Dentist", "google").with_calendar("family@example.com");
    assert_eq!(classify(&event), EventCategory::Secondary);
}

#[test]
fn exact_calendar_id_beats_earlier_suffix_rule() {
    let rules = ClassifierRules {
        calendars: vec![
            CalendarRule {
                calendar_id: "example.com".to_string(),
                category: EventCategory::Secondary,
            },
            CalendarRule {
                calendar_id: "team@example.com".to_string(),
                category: EventCategory::Primary,
            },
        ],
        keywords: vec![],
        sources: vec![],
    };

    let team = record("Standup", "x").with_calendar("team@example.com");
    let other = record("Standup", "x").with_calendar("ops@example.com");

    assert_eq!(rules.classify(&team), EventCategory::Primary);
    assert_eq!(rules.classify(&other), EventCategory::Secondary);
}

#[test]
fn custom_rules_replace_defaults() {
    let rules = ClassifierRules {
        calendars: vec![],
        keywords: vec![KeywordRule {
            keyword: "supervision".to_string(),
            category: EventCategory::Secondary,
        }],
        sources: vec![SourceRule {
            source_tag: "outlook".to_string(),
            category: EventCategory::Primary,
        }],
    };

    assert_eq!(
        rules.classify(&record("Group supervision", "outlook")),
        EventCategory::Secondary
    );
    assert_eq!(rules.classify(&record("Intake", "outlook")), EventCategory::Primary);
    assert_eq!(rules.classify(&record("Intake", "simplepractice")), EventCategory::Default);
}

#[test]
fn rules_deserialize_from_json() {
    let json = r#"{
        "keywords": [{"keyword": "lunch", "category": "allday"}],
        "sources": []
    }"#;
    let rules: ClassifierRules = serde_json::from_str(json).unwrap();

    assert_eq!(rules.classify(&record("Lunch", "x")), EventCategory::AllDay);
    // Omitted tiers keep their defaults.
    assert!(!rules.calendars.is_empty());
}

#[test]
fn category_names_are_stable() {
    assert_eq!(EventCategory::AllDay.as_str(), "allday");
    assert_eq!(
        serde_json::to_string(&EventCategory::Primary).unwrap(),
        "\"primary\""
    );
}
