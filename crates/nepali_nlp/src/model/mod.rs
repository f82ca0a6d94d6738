//! Model module for remote inference
//!
//! This module provides:
//! - `kind`: The model discriminator with per-model dispatch and normalization
//! - `types`: Wire request/response shapes
//! - `client`: Backend trait and the reqwest client

mod client;
mod kind;
mod types;

pub use client::{InferenceBackend, InferenceClient};
pub use kind::{display_name_from_slug, slugify, ModelKind, PreparedRequest};
pub use types::{
    AspectPrediction, AspectResponse, AspectStatistics, GenerateRequest, GenerateResponse,
    HealthStatus, InferenceRequest, InferenceResponse, LemmatizeResponse, ModelInfo, NerResponse,
    ServiceEnvelope, StemmedWord, StemmerResponse, StemmerStatistics, TextRequest, WordAnalysis,
};
