//! Response Assembler: reply text, optional restaurant summary, mood image.

use super::mood::MoodToken;
use crate::persona::{GENERATION_APOLOGY, MISSING_MESSAGE};
use crate::restaurant::{RestaurantRecord, RestaurantSummary};
use serde::{Deserialize, Serialize};

/// Successful chat reply. `restaurant` serializes as `null` when nothing was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPayload {
    pub reply: String,
    pub restaurant: Option<RestaurantSummary>,
    pub mood_image_url: String,
}

impl ReplyPayload {
    pub fn assemble(reply: String, selected: Option<&RestaurantRecord>, mood: MoodToken) -> Self {
        Self {
            reply,
            restaurant: selected.map(RestaurantSummary::from),
            mood_image_url: mood.image_url().to_string(),
        }
    }
}

/// Body of a failed chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_image_url: Option<String>,
}

impl ErrorPayload {
    /// Client error: no message to answer.
    pub fn missing_message() -> Self {
        Self {
            error: MISSING_MESSAGE.to_string(),
            mood_image_url: None,
        }
    }

    /// Server error: fixed apology with the `error` mood.
    pub fn generation_failure() -> Self {
        Self {
            error: GENERATION_APOLOGY.to_string(),
            mood_image_url: Some(MoodToken::Error.image_url().to_string()),
        }
    }
}
