//! Chat pipeline: extract -> lookup -> mood + context -> generate -> assemble.
//!
//! Store and model clients are injected already constructed; the pipeline holds no
//! mutable state and can serve concurrent requests through a shared `Arc`.

use crate::chat::{self, ConversationTurn, MessageSignals, ReplyPayload};
use crate::persona::TUGI_PERSONA;
use crate::restaurant::{LookupGateway, RestaurantSource};
use std::sync::Arc;

/// Failure of the generative model collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("model API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model API error: {0}")]
    Api(String),
    #[error("model returned no usable text")]
    EmptyReply,
    #[error("no API key configured for live mode")]
    MissingApiKey,
}

/// Why a chat turn could not be answered.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("generation failed: {0}")]
    Generation(#[from] ModelError),
}

/// Text generation capability: persona + ordered turns -> reply text.
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model or mode label for logs and status.
    fn name(&self) -> &str;

    async fn generate(&self, persona: &str, contents: &[ConversationTurn]) -> Result<String, ModelError>;
}

/// Handles one chat turn end to end. Single sequential pipeline per request.
pub struct ChatPipeline {
    lookup: LookupGateway,
    model: Arc<dyn GenerativeModel>,
}

impl ChatPipeline {
    pub fn new(source: Arc<dyn RestaurantSource>, model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            lookup: LookupGateway::new(source),
            model,
        }
    }

    pub fn store_name(&self) -> &str {
        self.lookup.source_name()
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Answers `message` given the caller's prior turns.
    ///
    /// An empty message is rejected before any external call; whitespace is a valid turn.
    /// Store failures are absorbed by the lookup gateway; model failures abort the turn.
    pub async fn handle_turn(
        &self,
        message: &str,
        history: Vec<ConversationTurn>,
    ) -> Result<ReplyPayload, ChatError> {
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let signals = MessageSignals::scan(message);
        let lookup = self
            .lookup
            .lookup(&signals.filter, signals.asks_recommendation)
            .await;
        let selected = lookup.choose().cloned();
        let mood = chat::classify(&signals, &lookup);
        let annotation = chat::context::annotation_for(&lookup, selected.as_ref());
        let contents = chat::build_contents(history, message, &annotation);

        tracing::info!(
            target: "tugi::chat",
            filter = ?signals.filter,
            lookup_performed = lookup.is_performed(),
            matches = lookup.records().len(),
            selected = selected.as_ref().map(|r| r.name.as_str()),
            mood = mood.as_str(),
            turns = contents.len(),
            "Chat turn enriched"
        );

        let reply = self.model.generate(TUGI_PERSONA, &contents).await?;
        if reply.trim().is_empty() {
            return Err(ModelError::EmptyReply.into());
        }

        Ok(ReplyPayload::assemble(reply, selected.as_ref(), mood))
    }
}
