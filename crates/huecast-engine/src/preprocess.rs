//! Text preprocessing for the predict pipeline.
//!
//! The vectorizer was trained on cleaned text, so inference must apply the
//! same cleanup: lower-case, strip non-alphanumerics, normalize whitespace,
//! and drop tokens that start with a digit (quantities like "5km" carry no
//! color signal).

use std::sync::OnceLock;

use regex::Regex;

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9\s]+").unwrap())
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn digit_led_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d+[a-zA-Z]*\b").unwrap())
}

/// Lower-cases the text, replaces runs of non-alphanumeric characters with
/// spaces, and collapses whitespace.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = non_alphanumeric().replace_all(lowered.trim(), " ");
    whitespace().replace_all(&stripped, " ").trim().to_string()
}

/// Removes tokens that start with a digit ("5km", "3", "10th") and
/// re-collapses whitespace.
#[must_use]
pub fn strip_quantities(text: &str) -> String {
    let stripped = digit_led_token().replace_all(text, " ");
    whitespace().replace_all(&stripped, " ").trim().to_string()
}

/// Runs the full cleanup pipeline the vectorizer was trained against.
#[must_use]
pub fn preprocess(text: &str) -> String {
    strip_quantities(&clean_text(text))
}
