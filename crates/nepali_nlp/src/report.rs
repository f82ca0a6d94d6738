//! Text formatting for model replies

use phf::phf_map;

use crate::config::{GENERATION_FALLBACK, LEMMATIZER_FALLBACK, NO_ENTITIES};
use crate::model::{
    AspectResponse, GenerateResponse, LemmatizeResponse, NerResponse, StemmerResponse,
};
use crate::ner::{group_entities, GroupedEntity};

/// Part-of-speech codes used by the morphological analyzer
pub static POS_NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "NN" => "Noun",
    "NNP" => "Proper Noun",
    "VF" => "Verb",
    "VI" => "Verb (infinitive)",
    "ADJ" => "Adjective",
    "ADR" => "Adverb",
    "PN" => "Pronoun",
    "PPG" => "Postposition",
    "CCON" => "Conjunction",
    "INTJ" => "Interjection",
    "NUM" => "Numeral",
};

/// `NN (Noun)` for known codes, the bare code otherwise, `Unknown` when missing
pub fn pos_label(code: Option<&str>) -> String {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => match POS_NAMES.get(code.to_uppercase().as_str()) {
            Some(name) => format!("{} ({})", code, name),
            None => code.to_string(),
        },
        None => "Unknown".to_string(),
    }
}

/// Normalized bot reply: display text plus any entities behind it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BotReply {
    pub text: String,
    pub entities: Vec<GroupedEntity>,
}

impl BotReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entities: Vec::new(),
        }
    }
}

pub fn format_generation(resp: &GenerateResponse) -> BotReply {
    let text = resp
        .response
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(GENERATION_FALLBACK);
    BotReply::text(text)
}

pub fn format_lemmatization(resp: &LemmatizeResponse) -> BotReply {
    let text = resp
        .lemmatized_text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(LEMMATIZER_FALLBACK);
    BotReply::text(text)
}

/// Group the raw entities and summarize them, one numbered line per mention
pub fn format_ner(resp: &NerResponse, original_text: &str) -> BotReply {
    let entities = group_entities(&resp.entities, original_text);
    if entities.is_empty() {
        return BotReply::text(NO_ENTITIES);
    }

    let mut text = format!("Found {} entities:\n\n", entities.len());
    for (i, entity) in entities.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} ({}) - Confidence: {}\n",
            i + 1,
            entity.word,
            entity.entity,
            entity.confidence_percent()
        ));
    }

    BotReply {
        text: text.trim_end().to_string(),
        entities,
    }
}

pub fn format_stemming(resp: &StemmerResponse) -> BotReply {
    let mut blocks = Vec::with_capacity(resp.words.len());

    for (i, word) in resp.words.iter().enumerate() {
        let mut block = format!("{}. {}", i + 1, word.word);
        match word.best_analysis() {
            Some(analysis) => {
                block.push_str(&format!(
                    "\n   Root: {}",
                    analysis.root.as_deref().unwrap_or_default()
                ));
                if let Some(suffix) = analysis.suffix() {
                    block.push_str(&format!("\n   Suffix: {}", suffix));
                }
                block.push_str(&format!("\n   POS: {}", pos_label(analysis.pos.as_deref())));
                let is_root = word.is_root.unwrap_or(analysis.suffix().is_none());
                block.push_str(if is_root {
                    "\n   Form: root word"
                } else {
                    "\n   Form: inflected"
                });
            }
            None => block.push_str("\n   Unknown word"),
        }
        blocks.push(block);
    }

    let stats = resp.statistics();
    let summary = format!(
        "Total: {} | Analyzed: {} | Root: {} | Unknown: {}",
        stats.total_words, stats.analyzed_words, stats.root_words, stats.unknown_words
    );

    let text = if blocks.is_empty() {
        summary
    } else {
        format!("{}\n\n{}", blocks.join("\n"), summary)
    };
    BotReply::text(text)
}

pub fn format_aspects(resp: &AspectResponse) -> BotReply {
    let lines: Vec<String> = resp
        .predictions
        .iter()
        .map(|p| {
            let aspects = if p.aspects.is_empty() {
                "none".to_string()
            } else {
                p.aspects.join(", ")
            };
            format!("{} → Aspects: {}", p.sentence.trim(), aspects)
        })
        .collect();
    BotReply::text(lines.join("\n"))
}
