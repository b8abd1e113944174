//! Mood Classifier: maps request state to one avatar mood and its image.

use super::extract::MessageSignals;
use crate::restaurant::LookupOutcome;
use serde::{Deserialize, Serialize};

/// Avatar image per mood, indexed by [`MoodToken`] discriminant.
const MOOD_IMAGE_URLS: [&str; 6] = [
    "https://firebasestorage.googleapis.com/v0/b/ddugidata.firebasestorage.app/o/Untitled%20(2)%20(1).png?alt=media&token=b3754220-4e08-4925-852b-1bb862b9fca5",
    "https://firebasestorage.googleapis.com/v0/b/ddugidata.firebasestorage.app/o/Untitled%20(4).png?alt=media&token=b113ec37-7c12-4b93-96fd-1818ed093f97",
    "https://firebasestorage.googleapis.com/v0/b/ddugidata.firebasestorage.app/o/Untitled%20(Copy).png?alt=media&token=8bef4637-6651-47c0-b5a6-177d810cf9bf",
    "https://placehold.co/100x100/B2F5EA/343A40?text=뚜기_인사",
    "https://placehold.co/100x100/C3F7D2/343A40?text=뚜기_긍정",
    "https://placehold.co/100x100/FF9999/343A40?text=뚜기_에러",
];

/// Closed set of avatar moods. Exactly one is chosen per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodToken {
    Default = 0,
    Recommend = 1,
    Thinking = 2,
    Greeting = 3,
    Positive = 4,
    /// Terminal state for failed requests; never produced by [`classify`].
    Error = 5,
}

impl MoodToken {
    #[inline]
    pub fn image_url(self) -> &'static str {
        MOOD_IMAGE_URLS[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoodToken::Default => "default",
            MoodToken::Recommend => "recommend",
            MoodToken::Thinking => "thinking",
            MoodToken::Greeting => "greeting",
            MoodToken::Positive => "positive",
            MoodToken::Error => "error",
        }
    }

    pub fn all() -> [Self; 6] {
        [
            Self::Default,
            Self::Recommend,
            Self::Thinking,
            Self::Greeting,
            Self::Positive,
            Self::Error,
        ]
    }
}

/// Decision table, first match wins:
/// record found -> recommend; lookup ran and missed -> thinking; greeting; gratitude;
/// idle chatter -> thinking; otherwise default.
pub fn classify(signals: &MessageSignals, lookup: &LookupOutcome) -> MoodToken {
    if !lookup.records().is_empty() {
        MoodToken::Recommend
    } else if lookup.is_miss() {
        MoodToken::Thinking
    } else if signals.greeting {
        MoodToken::Greeting
    } else if signals.gratitude {
        MoodToken::Positive
    } else if signals.idle_chatter {
        MoodToken::Thinking
    } else {
        MoodToken::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant::RestaurantRecord;

    fn found() -> LookupOutcome {
        LookupOutcome::Performed(vec![RestaurantRecord::default()])
    }

    #[test]
    fn found_record_beats_every_keyword() {
        let signals = MessageSignals::scan("안녕 고마워 뭐해 맛집");
        assert_eq!(classify(&signals, &found()), MoodToken::Recommend);
    }

    #[test]
    fn miss_is_thinking_even_with_greeting() {
        let signals = MessageSignals::scan("안녕 맛집 추천");
        assert_eq!(classify(&signals, &LookupOutcome::Performed(Vec::new())), MoodToken::Thinking);
    }

    #[test]
    fn keyword_rows_in_priority_order() {
        let none = LookupOutcome::NotPerformed;
        assert_eq!(classify(&MessageSignals::scan("안녕 고마워"), &none), MoodToken::Greeting);
        assert_eq!(classify(&MessageSignals::scan("감사 뭐해"), &none), MoodToken::Positive);
        assert_eq!(classify(&MessageSignals::scan("뭐해"), &none), MoodToken::Thinking);
        assert_eq!(classify(&MessageSignals::scan("배고프다"), &none), MoodToken::Default);
    }

    #[test]
    fn every_mood_has_a_distinct_image() {
        let urls: std::collections::HashSet<_> = MoodToken::all().iter().map(|m| m.image_url()).collect();
        assert_eq!(urls.len(), 6);
        assert!(MoodToken::Error.image_url().contains("FF9999"));
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_value(MoodToken::Recommend).unwrap(), "recommend");
        for mood in MoodToken::all() {
            assert_eq!(serde_json::to_value(mood).unwrap(), mood.as_str());
        }
    }
}
