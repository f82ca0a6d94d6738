//! nepali_nlp: client for hosted Nepali NLP models
//!
//! This library provides:
//! - A typed client for the inference service (generation, lemmatizer, NER, stemmer, aspect)
//! - Normalization of each endpoint's reply into chat messages
//! - BIO grouping of NER tokens into whole entities
//! - Latin-to-Devanagari substitution for generation prompts
//! - Chat sessions with a guarded busy flag
//!
//! # Example
//!
//! ```no_run
//! use nepali_nlp::{ChatSession, InferenceClient, ModelKind};
//!
//! #[tokio::main]
//! async fn main() -> nepali_nlp::Result<()> {
//!     let client = InferenceClient::from_env()?;
//!     let kind = ModelKind::from_slug("named-entity-recognition")?;
//!     let mut session = ChatSession::new(kind, client);
//!
//!     session.submit("राम शर्मा काठमाडौं विश्वविद्यालयमा पढ्छन्।").await;
//!     for message in session.messages() {
//!         println!("{}: {}", message.sender().label(), message.text());
//!     }
//!     Ok(())
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Core functionality
pub mod chat;
pub mod model;
pub mod ner;
pub mod report;
pub mod transliterate;

// Re-export commonly used types and functions
pub use error::{ClientError, Result};

// Config re-exports
pub use config::{
    resolve_base_url, ApiBase, ApiConfig, Endpoint, GenerationParams, API_CONFIG, APOLOGY,
    PRODUCTION_BASE_URL,
};

// Model re-exports
pub use model::{
    display_name_from_slug, slugify, HealthStatus, InferenceBackend, InferenceClient,
    InferenceRequest, InferenceResponse, ModelInfo, ModelKind, PreparedRequest,
};

// Chat re-exports
pub use chat::{BusyHandle, BusyState, ChatMessage, ChatSession, MessageId, Sender, SubmitOutcome};

pub use ner::{group_entities, GroupedEntity, RawEntity};
pub use report::{pos_label, BotReply};
pub use transliterate::{transliterate, Transliteration};
