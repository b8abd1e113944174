//! Message enrichment and reply assembly.

pub mod context;
pub mod extract;
pub mod mood;
pub mod reply;

pub use context::{build_contents, ConversationTurn, TurnPart};
pub use extract::{extract_filter, MessageSignals};
pub use mood::{classify, MoodToken};
pub use reply::{ErrorPayload, ReplyPayload};
