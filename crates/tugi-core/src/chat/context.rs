//! Conversation Context Builder: caller history plus one new user turn.

use crate::restaurant::{LookupOutcome, RestaurantRecord};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const USER_ROLE: &str = "user";
pub const MODEL_ROLE: &str = "model";

/// Appended when a recommendation was asked for but nothing matched.
pub const NO_MATCH_ANNOTATION: &str =
    "\n\n[참고: 현재 데이터베이스에 맛집 정보가 없거나, 요청하신 조건에 맞는 맛집이 없습니다.]\n";

/// One text segment of a turn, as the core builds and reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPart {
    #[serde(default)]
    pub text: String,
}

/// A single exchange in the conversation.
///
/// Caller-supplied turns are kept as raw JSON and forwarded unchanged, unknown fields
/// included. Only turns built with [`ConversationTurn::user`] or
/// [`ConversationTurn::model`] have a known shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationTurn(Value);

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(USER_ROLE, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role(MODEL_ROLE, text)
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self(json!({ "role": role, "parts": [{ "text": text }] }))
    }

    /// The `role` field, when the turn has a string one.
    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(Value::as_str)
    }

    /// Text of every part that carries one, joined without separators.
    pub fn text(&self) -> String {
        self.0
            .get("parts")
            .and_then(Value::as_array)
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.get("text").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

/// Reference block describing the selected restaurant for the model.
pub fn restaurant_annotation(record: &RestaurantRecord) -> String {
    format!(
        "\n\n[참고할 맛집 정보]:\n- 이름: {}, 위치: {}, 종류: {}, 특징: {}\n",
        record.name, record.location, record.kind, record.desc
    )
}

/// Annotation appended to the user's message: the selected record, a no-match note
/// after a miss, or nothing.
pub fn annotation_for(lookup: &LookupOutcome, selected: Option<&RestaurantRecord>) -> String {
    match selected {
        Some(record) => restaurant_annotation(record),
        None if lookup.is_miss() => NO_MATCH_ANNOTATION.to_string(),
        None => String::new(),
    }
}

/// Appends exactly one user turn (`message + annotation`) to the history.
/// No reordering, deduplication, or truncation.
pub fn build_contents(
    mut history: Vec<ConversationTurn>,
    message: &str,
    annotation: &str,
) -> Vec<ConversationTurn> {
    history.push(ConversationTurn::user(format!("{}{}", message, annotation)));
    history
}
