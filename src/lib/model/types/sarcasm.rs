//! Module defining the result of sarcasm scoring.

use std::fmt;


/// Outcome of scoring a piece of text for sarcasm.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SarcasmResult {
    /// Score in the [0, 1] range, rounded to two decimal places.
    pub confidence: f64,
    /// Heuristics that fired, in the order they were checked.
    pub indicators: Vec<Indicator>,
}

impl SarcasmResult {
    /// Whether none of the heuristics fired.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}


/// Tag naming a sarcasm heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indicator {
    AllCaps,
    ExcessivePunctuation,
    SarcasmPattern,
    RhetoricalQuestion,
}

impl Indicator {
    /// How much this indicator adds to the confidence score.
    #[inline]
    pub fn weight(&self) -> f64 {
        match *self {
            Indicator::AllCaps => 0.25,
            Indicator::ExcessivePunctuation => 0.20,
            Indicator::SarcasmPattern => 0.30,
            Indicator::RhetoricalQuestion => 0.10,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(match *self {
            Indicator::AllCaps => "ALL_CAPS",
            Indicator::ExcessivePunctuation => "EXCESSIVE_PUNCTUATION",
            Indicator::SarcasmPattern => "SARCASM_PATTERN",
            Indicator::RhetoricalQuestion => "RHETORICAL_QUESTION",
        })
    }
}
