use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating ISO 639-1 language codes
/// and resolving the display names used inside translation prompts.
/// Validate that a language code is a known ISO 639-1 (2-letter) code
pub fn validate_language_code(code: &str) -> Result<()> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 && Language::from_639_1(&normalized_code).is_some() {
        return Ok(());
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Get the English name of a language from its ISO 639-1 code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    Language::from_639_1(&normalized_code)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Resolve the language name used in prompts sent to the provider.
///
/// Most codes map straight to their English name; Chinese is pinned to the
/// Traditional Chinese (Taiwan) variant the dashboard content uses.
pub fn prompt_language_name(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.as_str() {
        "zh" => Ok("Traditional Chinese (Taiwan)".to_string()),
        other => get_language_name(other),
    }
}

/// Check whether two ISO 639-1 codes refer to the same language
pub fn language_codes_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
