//! Latin-script to Devanagari substitution for common words in generation prompts

use lazy_static::lazy_static;
use phf::phf_map;
use regex::{Captures, Regex};

/// Common Latin spellings and their Devanagari forms. Keys are lowercase.
pub static TRANSLITERATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "namaste" => "नमस्ते",
    "kathmandu" => "काठमाडौं",
    "nepal" => "नेपाल",
    "himalaya" => "हिमालय",
    "dashain" => "दशैं",
    "tihar" => "तिहार",
    "momo" => "मोमो",
    "dal bhat" => "दाल भात",
    "everest" => "सगरमाथा",
};

lazy_static! {
    static ref WORD_PATTERN: Regex = {
        let mut keys: Vec<&str> = TRANSLITERATIONS.keys().copied().collect();
        // Longest first so multi-word keys win over their parts
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternatives: Vec<String> = keys
            .iter()
            .map(|k| {
                k.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect();
        // ASCII boundaries: a Devanagari suffix right after a Latin word still ends the word
        Regex::new(&format!(r"(?i)(?-u:\b)(?:{})(?-u:\b)", alternatives.join("|")))
            .expect("transliteration pattern is valid")
    };
}

/// Outcome of running the substitution table over a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transliteration {
    pub original: String,
    pub converted: String,
}

impl Transliteration {
    /// Whether any word was substituted
    pub fn changed(&self) -> bool {
        self.original != self.converted
    }
}

/// Replace known Latin words with their Devanagari forms.
///
/// Matching is case-insensitive and whole-word only. Text around the matches is kept as typed.
pub fn transliterate(text: &str) -> Transliteration {
    let converted = WORD_PATTERN.replace_all(text, |caps: &Captures| {
        let key = caps[0]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        TRANSLITERATIONS
            .get(key.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });

    Transliteration {
        original: text.to_string(),
        converted: converted.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_every_whole_word_case_insensitively() {
        let result = transliterate("Namaste Nepal");
        assert_eq!(result.converted, "नमस्ते नेपाल");
        assert!(result.changed());
    }

    #[test]
    fn test_partial_word_untouched() {
        let result = transliterate("renamaste");
        assert_eq!(result.converted, "renamaste");
        assert!(!result.changed());
    }

    #[test]
    fn test_keeps_surrounding_text() {
        let result = transliterate("Tell me about EVEREST, please");
        assert_eq!(result.converted, "Tell me about सगरमाथा, please");
    }

    #[test]
    fn test_multi_word_entry() {
        let result = transliterate("I love Dal  Bhat and momo");
        assert_eq!(result.converted, "I love दाल भात and मोमो");
    }

    #[test]
    fn test_latin_word_with_devanagari_suffix() {
        let result = transliterate("nepalको राजधानी");
        assert_eq!(result.converted, "नेपालको राजधानी");
        assert!(result.changed());

        let result = transliterate("Kathmanduमा जाऊँ");
        assert_eq!(result.converted, "काठमाडौंमा जाऊँ");
    }

    #[test]
    fn test_native_script_unchanged() {
        let result = transliterate("काठमाडौं बारे बताउनुहोस्");
        assert!(!result.changed());
    }
}
