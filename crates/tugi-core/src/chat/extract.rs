//! Lexical Filter Extractor: substring keyword scan over the lower-cased message.

use crate::restaurant::Filter;

/// Which filter field a keyword sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Location,
    Kind,
}

/// One row of the keyword table: if `keyword` occurs, `field` takes `value`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub keyword: &'static str,
    pub field: FilterField,
    pub value: &'static str,
}

const fn rule(keyword: &'static str, field: FilterField) -> KeywordRule {
    KeywordRule { keyword, field, value: keyword }
}

/// Keyword table in priority order per field. The first matching row for a field wins.
pub const FILTER_RULES: &[KeywordRule] = &[
    rule("해운대", FilterField::Location),
    rule("영도", FilterField::Location),
    rule("서면", FilterField::Location),
    rule("남포동", FilterField::Location),
    rule("돼지국밥", FilterField::Kind),
    rule("카페", FilterField::Kind),
    rule("낙곱새", FilterField::Kind),
    rule("밀면", FilterField::Kind),
    rule("횟집", FilterField::Kind),
];

/// "Good restaurant" / "recommend".
pub const RECOMMEND_KEYWORDS: &[&str] = &["맛집", "추천"];
pub const GREETING_KEYWORDS: &[&str] = &["안녕", "반가워"];
pub const GRATITUDE_KEYWORDS: &[&str] = &["고마워", "감사"];
/// "What are you doing" / "what are you saying".
pub const IDLE_KEYWORDS: &[&str] = &["뭐해", "뭐라노"];

/// Extracts a [`Filter`] from raw text. Pure; absence of keywords yields an empty filter.
pub fn extract_filter(message: &str) -> Filter {
    filter_from_lower(&message.to_lowercase())
}

fn filter_from_lower(lower: &str) -> Filter {
    let mut filter = Filter::default();
    for rule in FILTER_RULES {
        let slot = match rule.field {
            FilterField::Location => &mut filter.location,
            FilterField::Kind => &mut filter.kind,
        };
        if slot.is_none() && lower.contains(rule.keyword) {
            *slot = Some(rule.value.to_string());
        }
    }
    filter
}

fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| lower.contains(k))
}

/// Everything the pipeline reads off one message, computed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSignals {
    pub filter: Filter,
    /// The message contains a recommendation word.
    pub asks_recommendation: bool,
    pub greeting: bool,
    pub gratitude: bool,
    pub idle_chatter: bool,
}

impl MessageSignals {
    pub fn scan(message: &str) -> Self {
        let lower = message.to_lowercase();
        Self {
            filter: filter_from_lower(&lower),
            asks_recommendation: contains_any(&lower, RECOMMEND_KEYWORDS),
            greeting: contains_any(&lower, GREETING_KEYWORDS),
            gratitude: contains_any(&lower, GRATITUDE_KEYWORDS),
            idle_chatter: contains_any(&lower, IDLE_KEYWORDS),
        }
    }

    /// Recommendation intent: an explicit word or any extracted filter field.
    pub fn recommendation_intent(&self) -> bool {
        self.asks_recommendation || !self.filter.is_empty()
    }
}
