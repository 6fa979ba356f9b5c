use regex::Regex;
use std::sync::OnceLock;

pub const MIN_PITCH_FACTOR: f64 = 0.7;
pub const MAX_PITCH_FACTOR: f64 = 1.3;
pub const NEUTRAL_PITCH_FACTOR: f64 = 1.0;

const QUESTION_PITCH_FACTOR: f64 = 1.05;
const EXCLAMATION_PITCH_FACTOR: f64 = 1.10;
const LONG_TEXT_PITCH_FACTOR: f64 = 0.95;

/// Texts with more characters than this are read slightly lower
pub const LONG_TEXT_THRESHOLD: usize = 200;

/// System prompt used when the language model picks the pitch
pub const PITCH_CLASSIFICATION_PROMPT: &str = "You choose the pitch for a text-to-speech voice. \
Reply with a single number between 0.7 and 1.3 and nothing else. \
Use 1.0 for neutral statements, higher values for questions and excitement, \
lower values for calm or serious text.";

/// Pick the pitch factor for `text`.
///
/// An explicit override wins unchanged; request validation guarantees it is
/// inside `[MIN_PITCH_FACTOR, MAX_PITCH_FACTOR]`. Otherwise the text is
/// classified by its final punctuation, then by its length.
pub fn select_pitch(text: &str, override_factor: Option<f64>) -> f64 {
    if let Some(factor) = override_factor {
        return factor;
    }

    let trimmed = text.trim_end();
    if trimmed.ends_with('?') {
        QUESTION_PITCH_FACTOR
    } else if trimmed.ends_with('!') {
        EXCLAMATION_PITCH_FACTOR
    } else if trimmed.chars().count() > LONG_TEXT_THRESHOLD {
        LONG_TEXT_PITCH_FACTOR
    } else {
        NEUTRAL_PITCH_FACTOR
    }
}

pub fn is_valid_pitch_factor(factor: f64) -> bool {
    factor.is_finite() && (MIN_PITCH_FACTOR..=MAX_PITCH_FACTOR).contains(&factor)
}

/// Read the pitch factor out of a language-model reply.
/// Takes the first number found and clamps it to the supported range.
pub fn parse_pitch_classification(reply: &str) -> Option<f64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let pattern = NUMBER.get_or_init(|| {
        Regex::new(r"\d+(?:[.,]\d+)?").expect("pitch number pattern is valid")
    });

    let raw = pattern.find(reply)?.as_str().replace(',', ".");
    let factor: f64 = raw.parse().ok()?;
    if !factor.is_finite() {
        return None;
    }
    Some(factor.clamp(MIN_PITCH_FACTOR, MAX_PITCH_FACTOR))
}
