//! Grouping of BIO-tagged NER tokens into whole entities

use serde::{Deserialize, Serialize};

const BEGIN_PREFIX: &str = "B-";
const INSIDE_PREFIX: &str = "I-";

/// One token-level entity as returned by the `/ner` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    pub word: String,
    /// Tag, usually BIO-prefixed (`B-PERSON`, `I-PERSON`)
    pub entity: String,
    pub confidence: f64,
    /// Character offsets into the submitted text
    pub start: usize,
    pub end: usize,
}

/// A contiguous run of raw entities merged into one mention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedEntity {
    pub word: String,
    /// Entity type with the BIO prefix stripped
    pub entity: String,
    /// Mean of the constituent confidences
    pub confidence: f64,
    pub start: usize,
    pub end: usize,
    pub word_count: usize,
}

impl GroupedEntity {
    /// Confidence as a percentage with one decimal, e.g. `85.0%`
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Begin,
    Inside,
    Bare,
}

fn split_tag(tag: &str) -> (Marker, &str) {
    if let Some(kind) = tag.strip_prefix(BEGIN_PREFIX) {
        (Marker::Begin, kind)
    } else if let Some(kind) = tag.strip_prefix(INSIDE_PREFIX) {
        (Marker::Inside, kind)
    } else {
        (Marker::Bare, tag)
    }
}

/// Accumulator for the group currently being built
struct OpenGroup {
    entity: String,
    start: usize,
    end: usize,
    words: Vec<String>,
    confidences: Vec<f64>,
}

impl OpenGroup {
    fn open(entity: &str, raw: &RawEntity) -> Self {
        Self {
            entity: entity.to_string(),
            start: raw.start,
            end: raw.end.max(raw.start),
            words: vec![raw.word.clone()],
            confidences: vec![raw.confidence],
        }
    }

    fn push(&mut self, raw: &RawEntity) {
        self.end = self.end.max(raw.end);
        self.words.push(raw.word.clone());
        self.confidences.push(raw.confidence);
    }

    fn close(self, text: &str) -> GroupedEntity {
        let sliced = slice_chars(text, self.start, self.end);
        let word = if sliced.is_empty() {
            self.words.join(" ")
        } else {
            sliced
        };
        let confidence = self.confidences.iter().sum::<f64>() / self.confidences.len() as f64;

        GroupedEntity {
            word,
            entity: self.entity,
            confidence,
            start: self.start,
            end: self.end,
            word_count: self.confidences.len(),
        }
    }
}

/// Characters `[start, end)` of `text`; empty when the range falls outside it
fn slice_chars(text: &str, start: usize, end: usize) -> String {
    if end <= start {
        return String::new();
    }
    text.chars().skip(start).take(end - start).collect()
}

/// Merge BIO-tagged tokens into entity mentions.
///
/// An `I-` tag only extends the open group when its type matches; otherwise it opens a group of
/// its own, as does every `B-` tag and every unprefixed tag. Surface text is taken from
/// `text` by character offsets, falling back to the space-joined token words when that slice
/// is empty.
pub fn group_entities(raw: &[RawEntity], text: &str) -> Vec<GroupedEntity> {
    let mut groups = Vec::new();
    let mut current: Option<OpenGroup> = None;

    for entity in raw {
        let (marker, kind) = split_tag(&entity.entity);

        if marker == Marker::Inside {
            if let Some(open) = current.as_mut().filter(|g| g.entity == kind) {
                open.push(entity);
                continue;
            }
        }

        if let Some(done) = current.take() {
            groups.push(done.close(text));
        }
        current = Some(OpenGroup::open(kind, entity));
    }

    if let Some(done) = current {
        groups.push(done.close(text));
    }

    tracing::debug!(raw = raw.len(), grouped = groups.len(), "Grouped NER entities");
    groups
}
