//! Request and response shapes for the inference endpoints

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{Endpoint, GenerationParams};
use crate::ner::RawEntity;

/// Body for `/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub max_length: u32,
    pub temperature: f32,
    pub do_sample: bool,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            prompt: prompt.into(),
            max_length: params.max_length,
            temperature: params.temperature,
            do_sample: params.do_sample,
        }
    }
}

/// Body for the text-analysis endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// A request bound to the endpoint that serves it
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceRequest {
    Generate(GenerateRequest),
    Lemmatize(TextRequest),
    Ner(TextRequest),
    Stem(TextRequest),
    Aspect(TextRequest),
}

impl InferenceRequest {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Generate(_) => Endpoint::Generate,
            Self::Lemmatize(_) => Endpoint::Lemmatize,
            Self::Ner(_) => Endpoint::Ner,
            Self::Stem(_) => Endpoint::Stemmer,
            Self::Aspect(_) => Endpoint::Aspect,
        }
    }

    /// JSON body sent on the wire
    pub fn body(&self) -> Value {
        let body = match self {
            Self::Generate(req) => serde_json::to_value(req),
            Self::Lemmatize(req) | Self::Ner(req) | Self::Stem(req) | Self::Aspect(req) => {
                serde_json::to_value(req)
            }
        };
        // Plain structs of strings and numbers always serialize
        body.unwrap_or(Value::Null)
    }
}

/// Fields every endpoint may use to report failure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServiceEnvelope {
    /// Only an explicit `success: false` counts as failure
    pub fn failed(&self) -> bool {
        self.success == Some(false)
    }

    pub fn reason(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "request failed".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LemmatizeResponse {
    #[serde(default)]
    pub lemmatized_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct NerResponse {
    #[serde(default)]
    pub entities: Vec<RawEntity>,
    #[serde(default)]
    pub entity_count: Option<usize>,
}

/// One candidate analysis of a word from `/stemmer`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WordAnalysis {
    /// `Root Word`, `Root + Suffix` or `Unknown`
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub rule: Option<String>,
}

impl WordAnalysis {
    pub fn is_unknown(&self) -> bool {
        self.kind.eq_ignore_ascii_case("unknown") || self.root.as_deref().unwrap_or("").is_empty()
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StemmedWord {
    pub word: String,
    #[serde(default)]
    pub is_root: Option<bool>,
    #[serde(default)]
    pub analyses: Vec<WordAnalysis>,
}

impl StemmedWord {
    /// First analysis that found a root
    pub fn best_analysis(&self) -> Option<&WordAnalysis> {
        self.analyses.iter().find(|a| !a.is_unknown())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct StemmerStatistics {
    #[serde(default)]
    pub total_words: usize,
    #[serde(default)]
    pub analyzed_words: usize,
    #[serde(default)]
    pub root_words: usize,
    #[serde(default)]
    pub unknown_words: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StemmerResponse {
    #[serde(default)]
    pub words: Vec<StemmedWord>,
    #[serde(default)]
    pub statistics: Option<StemmerStatistics>,
}

impl StemmerResponse {
    /// Statistics as reported, or counted from the words when the service left them out
    pub fn statistics(&self) -> StemmerStatistics {
        if let Some(stats) = self.statistics {
            return stats;
        }
        let analyzed = self.words.iter().filter(|w| w.best_analysis().is_some()).count();
        StemmerStatistics {
            total_words: self.words.len(),
            analyzed_words: analyzed,
            root_words: self
                .words
                .iter()
                .filter(|w| w.best_analysis().map_or(false, |a| a.suffix().is_none()))
                .count(),
            unknown_words: self.words.len() - analyzed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AspectPrediction {
    pub sentence: String,
    #[serde(default)]
    pub aspects: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct AspectStatistics {
    #[serde(default)]
    pub sentences_analyzed: usize,
    #[serde(default)]
    pub total_aspects_found: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AspectResponse {
    #[serde(default)]
    pub predictions: Vec<AspectPrediction>,
    #[serde(default)]
    pub statistics: Option<AspectStatistics>,
}

/// Decoded reply from one of the model endpoints
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceResponse {
    Generate(GenerateResponse),
    Lemmatize(LemmatizeResponse),
    Ner(NerResponse),
    Stem(StemmerResponse),
    Aspect(AspectResponse),
}

/// Reply from `/health`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model_loaded: Option<bool>,
    #[serde(default)]
    pub stemmer_loaded: Option<bool>,
    #[serde(default)]
    pub aspect_loaded: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// Reply from `/model-info`; fields beyond the common ones are kept in `extra`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model_loaded: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
