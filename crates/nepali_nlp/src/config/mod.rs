//! Configuration module for nepali_nlp
//!
//! This module contains:
//! - `api`: Base URL resolution, endpoint table and client settings
//! - `messages`: Fixed chat strings (welcome, apology, fallbacks)

mod api;
mod messages;

pub use api::{
    resolve_base_url, ApiBase, ApiConfig, Endpoint, GenerationParams, API_CONFIG, ENV_API_URL,
    ENV_DEV_PROXY, ENV_TIMEOUT_SECS, PRODUCTION_BASE_URL,
};
pub use messages::{
    transliteration_notice, welcome_message, APOLOGY, GENERATION_FALLBACK, LEMMATIZER_FALLBACK,
    NO_ENTITIES, WELCOME_MESSAGES,
};
