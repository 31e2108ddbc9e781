//! Module implementing the sarcasm scoring heuristic.

use regex::{Regex, RegexBuilder};

use crate::model::{Indicator, SarcasmResult};


/// Minimum length (in characters) of an all-caps text to count as "shouting".
const MIN_SHOUTING_LENGTH: usize = 5;
/// Number of exclamation marks that makes the punctuation excessive.
const EXCESSIVE_EXCLAMATIONS: usize = 3;

lazy_static! {
    /// Phrases that are commonly used sarcastically.
    static ref SARCASM_PATTERNS: Vec<Regex> = [
        r"yeah[,.]? right",
        r"sure[,.]? (buddy|pal|friend)",
        r"what could go wrong",
        r"oh great",
        r"brilliant",
        r"wonderful",
        r"fantastic idea",
    ].iter().map(|p| {
        RegexBuilder::new(p).case_insensitive(true).build().unwrap()
    }).collect();
}


/// Score the text for sarcasm.
///
/// Every heuristic contributes its weight at most once, in a fixed order.
/// The result is capped at 1 and rounded to two decimal places.
pub fn score(text: &str) -> SarcasmResult {
    if text.is_empty() {
        return SarcasmResult::default();
    }

    let mut indicators = vec![];
    if text == text.to_uppercase() && text.chars().count() > MIN_SHOUTING_LENGTH {
        indicators.push(Indicator::AllCaps);
    }
    if text.matches('!').count() >= EXCESSIVE_EXCLAMATIONS {
        indicators.push(Indicator::ExcessivePunctuation);
    }
    if SARCASM_PATTERNS.iter().any(|p| p.is_match(text)) {
        indicators.push(Indicator::SarcasmPattern);
    }
    if text.contains('?') && (text.contains("why") || text.contains("how")) {
        indicators.push(Indicator::RhetoricalQuestion);
    }

    let total: f64 = indicators.iter().map(Indicator::weight).sum();
    let confidence = (total.min(1.0) * 100.0).round() / 100.0;
    trace!("Sarcasm score of {:?}: {} {:?}", text, confidence, indicators);
    SarcasmResult{confidence, indicators}
}
