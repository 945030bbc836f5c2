//! Map event metadata to a style category.
//!
//! Rules are checked in a fixed priority order and the first match wins:
//!
//! 1. external calendar identifier (exact `calendar_id`, then suffix match)
//! 2. title keyword (case-insensitive substring)
//! 3. source tag (case-insensitive equality)
//!
//! Anything unmatched is [`EventCategory::Default`].

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::event::EventRecord;

/// Closed set of style keys handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Primary,
    Secondary,
    AllDay,
    #[default]
    Default,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Primary => "primary",
            EventCategory::Secondary => "secondary",
            EventCategory::AllDay => "allday",
            EventCategory::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRule {
    /// Matches any `calendar_id` ending with this string. Exact matches are tried
    /// across all rules before any suffix match.
    pub calendar_id: String,
    pub category: EventCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub category: EventCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRule {
    pub source_tag: String,
    pub category: EventCategory,
}

/// The classification table. Within each tier, rules are tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    pub calendars: Vec<CalendarRule>,
    pub keywords: Vec<KeywordRule>,
    pub sources: Vec<SourceRule>,
}

impl Default for ClassifierRules {
    /// Practice-management appointments are primary, Google Calendar events are
    /// secondary, public-holiday calendars and out-of-office style titles are
    /// all-day.
    fn default() -> Self {
        let calendar = |id: &str, category| CalendarRule {
            calendar_id: id.to_string(),
            category,
        };
        let keyword = |k: &str, category| KeywordRule {
            keyword: k.to_string(),
            category,
        };
        let source = |s: &str, category| SourceRule {
            source_tag: s.to_string(),
            category,
        };

        Self {
            calendars: vec![calendar(
                "#holiday@group.v.calendar.google.com",
                EventCategory::AllDay,
            )],
            keywords: vec![
                keyword("appointment", EventCategory::Primary),
                keyword("all day", EventCategory::AllDay),
                keyword("all-day", EventCategory::AllDay),
                keyword("holiday", EventCategory::AllDay),
                keyword("vacation", EventCategory::AllDay),
                keyword("out of office", EventCategory::AllDay),
            ],
            sources: vec![
                source("simplepractice", EventCategory::Primary),
                source("google", EventCategory::Secondary),
                source("holiday", EventCategory::AllDay),
            ],
        }
    }
}

impl ClassifierRules {
    pub fn classify(&self, event: &EventRecord) -> EventCategory {
        if let Some(calendar_id) = event.calendar_id.as_deref() {
            // Exact ids win over suffixes regardless of rule order.
            let hit = self
                .calendars
                .iter()
                .find(|r| r.calendar_id == calendar_id)
                .or_else(|| {
                    self.calendars.iter().find(|r| {
                        !r.calendar_id.is_empty() && calendar_id.ends_with(&r.calendar_id)
                    })
                });
            if let Some(rule) = hit {
                return rule.category;
            }
        }

        let title = event.title.to_lowercase();
        let hit = self
            .keywords
            .iter()
            .find(|r| !r.keyword.is_empty() && title.contains(&r.keyword.to_lowercase()));
        if let Some(rule) = hit {
            return rule.category;
        }

        self.sources
            .iter()
            .find(|r| r.source_tag.eq_ignore_ascii_case(&event.source_tag))
            .map(|r| r.category)
            .unwrap_or_default()
    }
}

/// Classify with [`ClassifierRules::default`].
pub fn classify(event: &EventRecord) -> EventCategory {
    static DEFAULT_RULES: OnceLock<ClassifierRules> = OnceLock::new();
    DEFAULT_RULES
        .get_or_init(ClassifierRules::default)
        .classify(event)
}
