//! tugi-core: restaurant-aware chat pipeline for the Tugi persona.
//!
//! Keyword filter extraction, fail-open restaurant lookup, mood classification,
//! conversation context assembly and reply payloads. External clients (document
//! store, generative model) plug in through [`RestaurantSource`] and [`GenerativeModel`].

pub mod chat;
mod orchestrator;
pub mod persona;
pub mod restaurant;
mod shared;

pub use shared::{CoreConfig, FirestoreConfig, StoreBackend, DEFAULT_ALLOWED_ORIGIN, DEFAULT_GEMINI_API_BASE};

pub use chat::{
    build_contents, classify, extract_filter, ConversationTurn, ErrorPayload, MessageSignals, MoodToken,
    ReplyPayload, TurnPart,
};

pub use restaurant::{
    Filter, LookupGateway, LookupOutcome, RestaurantRecord, RestaurantSource, RestaurantStore,
    RestaurantSummary, StoreError,
};

pub use orchestrator::{ChatError, ChatPipeline, GenerativeModel, ModelError};
