//! Fixed user-facing strings shown in chat sessions
use phf::phf_map;

/// Shown whenever a call fails, whatever the cause
pub const APOLOGY: &str = "Sorry, I'm having trouble connecting to the server. Please make sure the backend is running and try again.";

pub const GENERATION_FALLBACK: &str = "I'm sorry, I couldn't generate a response.";

pub const LEMMATIZER_FALLBACK: &str = "I couldn't find a lemmatized form for that text.";

pub const NO_ENTITIES: &str = "No named entities found in the provided text.";

/// Welcome text per model slug; `{name}` is replaced by the display name
pub static WELCOME_MESSAGES: phf::Map<&'static str, &'static str> = phf_map! {
    "generation" => "नमस्ते! I'm {name}, a Nepali language model. I can help you generate text in Nepali. Feel free to ask me questions in Nepali or English.",
    "lemmatization" => "नमस्ते! I'm the {name} model. Send me Nepali text and I'll convert the words to their root forms (lemmas).",
    "ner" => "नमस्ते! I'm the {name} model. I can identify named entities (people, places, organizations) in Nepali text.",
    "stemming" => "नमस्ते! I'm the {name}. Send me Nepali words and I'll split them into root, suffix and part of speech.",
    "aspect" => "नमस्ते! I'm the {name} model. Send me Nepali sentences and I'll tell you which aspects they touch on.",
};

/// Look up a welcome message by key, substituting the model's display name
pub fn welcome_message(key: &str, display_name: &str) -> String {
    WELCOME_MESSAGES
        .get(key)
        .copied()
        .unwrap_or("नमस्ते! I'm {name}.")
        .replace("{name}", display_name)
}

/// Notice appended when a generation prompt was transliterated before sending
pub fn transliteration_notice(before: &str, after: &str) -> String {
    format!("✨ Auto-converted: \"{}\" → \"{}\"", before, after)
}
