//! Language utilities
//!
//! The pipeline works with language display names ("English", "French").
//! Users may type ISO 639-1 or ISO 639-2 codes instead; these helpers map
//! them to the English display name.

use anyhow::{Result, anyhow};
use isolang::Language;

/// Languages offered by the web form
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["English", "French"];

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        // ISO 639-2/B codes that differ from ISO 639-2/T
        let part2t = match normalized_code.as_str() {
            "fre" => Some("fra"),
            "ger" => Some("deu"),
            "dut" => Some("nld"),
            "gre" => Some("ell"),
            "chi" => Some("zho"),
            "cze" => Some("ces"),
            "per" => Some("fas"),
            "rum" => Some("ron"),
            "slo" => Some("slk"),
            "wel" => Some("cym"),
            _ => None,
        };
        if let Some(part2t) = part2t {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Resolve user input (ISO code or English name, any case) to a display name
pub fn resolve_language_name(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Language cannot be empty"));
    }

    if trimmed.len() <= 3 {
        if let Ok(name) = get_language_name(trimmed) {
            return Ok(name);
        }
    }

    let capitalized = capitalize(trimmed);
    Language::from_name(trimmed)
        .or_else(|| Language::from_name(&capitalized))
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language: {}", input))
}

fn capitalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Source/target pair chosen on the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    /// Language of the input text
    pub source: String,
    /// Language to translate into
    pub target: String,
}

impl LanguagePair {
    /// Create a pair from two languages
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Pair whose target is the other supported language
    pub fn from_source(source: &str) -> Option<Self> {
        let source = SUPPORTED_LANGUAGES
            .iter()
            .find(|lang| lang.eq_ignore_ascii_case(source.trim()))?;
        let target = SUPPORTED_LANGUAGES.iter().find(|lang| *lang != source)?;
        Some(Self::new(*source, *target))
    }

    /// The same pair in the opposite direction
    pub fn swapped(&self) -> Self {
        Self::new(self.target.clone(), self.source.clone())
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self::new(SUPPORTED_LANGUAGES[0], SUPPORTED_LANGUAGES[1])
    }
}
