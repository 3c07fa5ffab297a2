/*!
 * Defensive parsing of provider output.
 *
 * The completion provider is asked for raw JSON but is not contractually
 * guaranteed to return it. Replies are cleaned of markdown code fences,
 * parsed, and validated against the required target keys; a balanced-brace
 * scan recovers objects embedded in surrounding prose.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::TranslationError;
use crate::store::FieldPlan;

/// Leading code fence, optionally tagged (```json, ```JSON, ```)
static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```[a-z]*\s*").expect("invalid leading fence regex"));

/// Trailing code fence
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```$").expect("invalid trailing fence regex"));

/// Translated field values for one record
#[derive(Debug, Clone, PartialEq)]
pub struct TargetFields {
    /// Translated title (required)
    pub title: String,
    /// Translated secondary text (best-effort)
    pub secondary: Option<String>,
}

impl TargetFields {
    /// Convert to a column -> value update map for the record sink
    pub fn into_updates(
        self,
        plan: &FieldPlan,
    ) -> std::collections::BTreeMap<String, String> {
        let mut updates = std::collections::BTreeMap::new();
        updates.insert(plan.target_title_column(), self.title);
        if let Some(secondary) = self.secondary {
            updates.insert(plan.target_secondary_column(), secondary);
        }
        updates
    }
}

/// Strip leading/trailing markdown code fences from a provider reply
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_leading = LEADING_FENCE.replace(trimmed, "");
    let without_trailing = TRAILING_FENCE.replace(&without_leading, "");
    without_trailing.trim().to_string()
}

/// Find the first balanced `{...}` substring in a text.
///
/// Brace depth is tracked outside JSON string literals so prose around the
/// object (or braces inside translated text) does not break extraction.
pub fn extract_braced_object(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    let start = raw.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse a raw provider reply into validated target fields.
///
/// Tries the fence-stripped text first, then falls back to brace extraction
/// over the raw reply. The target title key is required and must be
/// non-blank; the secondary key is included only when present and non-blank.
pub fn parse_target_fields(
    raw: &str,
    plan: &FieldPlan,
) -> Result<TargetFields, TranslationError> {
    let cleaned = strip_code_fences(raw);

    let parsed: Value = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) if value.is_object() => value,
        _ => {
            let candidate = extract_braced_object(raw).ok_or_else(|| {
                TranslationError::UnparsableResponse(preview(raw))
            })?;
            serde_json::from_str::<Value>(candidate)
                .map_err(|_| TranslationError::UnparsableResponse(preview(raw)))?
        }
    };

    let title_key = plan.target_title_column();
    let title = parsed
        .get(&title_key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(TranslationError::IncompleteResponse(title_key))?
        .to_string();

    let secondary = parsed
        .get(&plan.target_secondary_column())
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    Ok(TargetFields { title, secondary })
}

/// Shorten a raw reply for error messages
fn preview(raw: &str) -> String {
    const MAX: usize = 120;
    let trimmed = raw.trim();
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX).collect();
        format!("{}…", cut)
    }
}
