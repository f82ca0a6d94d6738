//! The closed set of hosted models and per-model dispatch

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{welcome_message, Endpoint, GenerationParams};
use crate::error::{ClientError, Result};
use crate::model::types::{GenerateRequest, InferenceRequest, InferenceResponse, TextRequest};
use crate::report::{
    format_aspects, format_generation, format_lemmatization, format_ner, format_stemming, BotReply,
};
use crate::transliterate::{transliterate, Transliteration};

/// Which hosted model a chat talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Generation,
    Lemmatization,
    Ner,
    Stemming,
    Aspect,
}

/// Request ready to send, plus the transliteration applied to build it (generation only)
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub request: InferenceRequest,
    pub transliteration: Option<Transliteration>,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        Self::Generation,
        Self::Lemmatization,
        Self::Ner,
        Self::Stemming,
        Self::Aspect,
    ];

    /// Parse a route slug such as `named-entity-recognition`
    pub fn from_slug(slug: &str) -> Result<Self> {
        let slug = slug.trim().trim_matches('/').to_lowercase();

        if let Some(kind) = Self::ALL.iter().find(|k| k.slug() == slug) {
            return Ok(*kind);
        }

        let segments: Vec<&str> = slug.split(|c: char| !c.is_alphanumeric()).collect();
        let has = |pred: fn(&str) -> bool| segments.iter().any(|s| pred(s));

        if has(|s| s.starts_with("lemma")) {
            Ok(Self::Lemmatization)
        } else if has(|s| s == "ner" || s == "entity" || s == "entities") {
            Ok(Self::Ner)
        } else if has(|s| s.starts_with("stem") || s.starts_with("morph")) {
            Ok(Self::Stemming)
        } else if has(|s| s == "aspect" || s == "absa" || s == "sentiment") {
            Ok(Self::Aspect)
        } else if has(|s| s.contains("gpt") || s.starts_with("generat")) {
            Ok(Self::Generation)
        } else {
            Err(ClientError::UnknownModel(slug))
        }
    }

    /// Canonical route slug
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Generation => "nepaligpt",
            Self::Lemmatization => "nepali-lemmatizer",
            Self::Ner => "named-entity-recognition",
            Self::Stemming => "morphological-analyzer",
            Self::Aspect => "aspect-based-sentiment-analysis",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Generation => "NepaliGPT",
            Self::Lemmatization => "Nepali Lemmatizer",
            Self::Ner => "Named Entity Recognition",
            Self::Stemming => "Morphological Analyzer",
            Self::Aspect => "Aspect-Based Sentiment Analysis",
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Generation => Endpoint::Generate,
            Self::Lemmatization => Endpoint::Lemmatize,
            Self::Ner => Endpoint::Ner,
            Self::Stemming => Endpoint::Stemmer,
            Self::Aspect => Endpoint::Aspect,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Lemmatization => "lemmatization",
            Self::Ner => "ner",
            Self::Stemming => "stemming",
            Self::Aspect => "aspect",
        }
    }

    pub fn welcome_message(&self) -> String {
        welcome_message(self.message_key(), self.display_name())
    }

    /// Example inputs to get a user started
    pub fn sample_inputs(&self) -> &'static [&'static str] {
        match self {
            Self::Generation => &[
                "नमस्ते, तपाईं कस्तो हुनुहुन्छ?",
                "काठमाडौं बारे बताउनुहोस्",
                "नेपालको संस्कृति के छ?",
                "हिमालयको बारेमा केही भन्नुहोस्",
                "दशैं तिहारको बारेमा भन्नुहोस्",
            ],
            Self::Lemmatization => &["खेल्दै", "गरिरहेका", "म घरमा किताब पढ्दैछु।"],
            Self::Ner => &[
                "राम शर्मा काठमाडौं विश्वविद्यालयमा पढ्छन्।",
                "सगरमाथा नेपालको सबैभन्दा अग्लो हिमाल हो।",
                "गौतम बुद्ध लुम्बिनीमा जन्मेका थिए।",
                "प्रधानमन्त्री ओली सिंहदरबारमा बसेर काम गर्छन्।",
            ],
            Self::Stemming => &["घरहरू", "पढ्छु", "घरहरू राम्रोलाई पढ्छु", "घर किताब राम्रो"],
            Self::Aspect => &["यो नेताको कुरा राम्रो लाग्यो।", "सरकारको काम बिग्रिएको छ।"],
        }
    }

    /// Build the one request this model sends for `text`.
    ///
    /// Generation prompts go through transliteration first; the other models send the text as is.
    pub fn build_request(&self, text: &str, params: GenerationParams) -> PreparedRequest {
        let body = || TextRequest {
            text: text.to_string(),
        };

        match self {
            Self::Generation => {
                let transliteration = transliterate(text);
                let request = InferenceRequest::Generate(GenerateRequest::new(
                    transliteration.converted.clone(),
                    params,
                ));
                PreparedRequest {
                    request,
                    transliteration: Some(transliteration),
                }
            }
            Self::Lemmatization => PreparedRequest {
                request: InferenceRequest::Lemmatize(body()),
                transliteration: None,
            },
            Self::Ner => PreparedRequest {
                request: InferenceRequest::Ner(body()),
                transliteration: None,
            },
            Self::Stemming => PreparedRequest {
                request: InferenceRequest::Stem(body()),
                transliteration: None,
            },
            Self::Aspect => PreparedRequest {
                request: InferenceRequest::Aspect(body()),
                transliteration: None,
            },
        }
    }

    /// Turn a decoded reply into display text.
    ///
    /// A reply shaped for a different model is reported as a service error.
    pub fn normalize(&self, response: &InferenceResponse, original_text: &str) -> Result<BotReply> {
        match (self, response) {
            (Self::Generation, InferenceResponse::Generate(r)) => Ok(format_generation(r)),
            (Self::Lemmatization, InferenceResponse::Lemmatize(r)) => Ok(format_lemmatization(r)),
            (Self::Ner, InferenceResponse::Ner(r)) => Ok(format_ner(r, original_text)),
            (Self::Stemming, InferenceResponse::Stem(r)) => Ok(format_stemming(r)),
            (Self::Aspect, InferenceResponse::Aspect(r)) => Ok(format_aspects(r)),
            (kind, other) => Err(ClientError::Service(format!(
                "{} received a mismatched response: {:?}",
                kind, other
            ))),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slug(s)
    }
}

/// URL slug for a display name: lowercase, runs of other characters collapsed to `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Display name for a slug: dashes become spaces and each word is capitalised
pub fn display_name_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
