/*!
 * Prompt templates for the translation and chat surfaces.
 *
 * Templates keep the instruction wording in one place; call sites render
 * them with the language names and payloads for a specific job.
 */

use serde_json::json;

use crate::store::FieldPlan;

use super::core::SourceFields;

/// Instruction template for record translation.
///
/// The reply must be a bare JSON object restricted to the target keys;
/// fencing and source-language echoes are forbidden explicitly because the
/// provider ignores softer phrasing often enough to matter.
const RECORD_TRANSLATOR: &str = r#"Translate the following {source_language} text to {target_language}. Return JSON: { {expected_keys} }.

Input: {input_json}

Constraint: The output MUST be in {target_language}. Do NOT return {source_language}. Do NOT return the original {source_language} text.

Return ONLY a valid JSON object with the keys {expected_keys}. No markdown, no code blocks, no explanations."#;

/// Instruction template for ad-hoc text translation
const TEXT_TRANSLATOR: &str = r#"Translate the following sentence from {source_language} to {style}{target_language}. Output ONLY the translated text. Do not include any explanations, notes, or additional text. Just the {target_language} translation.

Input: {text}"#;

/// System prompt for the itinerary-aware chat assistant
const TOUR_GUIDE: &str = r#"Role: You are a Korean local tour guide with 10+ years of experience, guiding a visiting team through their trip.

Context: Here is their current itinerary:
{itinerary_summary}

Task: Answer user questions about:
- Their schedule and timing
- Food recommendations near locations in their itinerary
- Shopping recommendations
- Transportation tips between locations
- Cultural tips and etiquette
- Weather-appropriate activities

Personality: Professional, enthusiastic, and helpful.

Language: Reply in the SAME language as the user.

Guidelines:
- Be specific and actionable
- Reference actual locations from their itinerary when relevant
- Keep answers concise but informative
- If the user asks about something not in the itinerary, use your general knowledge of Korea to help"#;

/// Build the record-translation prompt for a field plan and source bundle
pub fn build_record_prompt(
    plan: &FieldPlan,
    source: &SourceFields,
    source_language: &str,
    target_language: &str,
) -> String {
    let mut input = json!({ "title": source.title });
    if let Some(secondary) = &source.secondary {
        input[plan.kind.secondary_column()] = json!(secondary);
    }

    let expected_keys = if source.secondary.is_some() {
        format!(
            "{}, {}",
            plan.target_title_column(),
            plan.target_secondary_column()
        )
    } else {
        plan.target_title_column()
    };

    RECORD_TRANSLATOR
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
        .replace("{expected_keys}", &expected_keys)
        .replace("{input_json}", &input.to_string())
}

/// Build the ad-hoc text-translation prompt
pub fn build_text_prompt(
    text: &str,
    source_language: &str,
    target_language: &str,
    polite: bool,
) -> String {
    let style = if polite { "natural, polite " } else { "" };

    TEXT_TRANSLATOR
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
        .replace("{style}", style)
        .replace("{text}", text)
}

/// Build the full chat prompt from an itinerary summary and a user message
pub fn build_chat_prompt(itinerary_summary: &str, message: &str) -> String {
    let summary = if itinerary_summary.trim().is_empty() {
        "No itinerary data available yet."
    } else {
        itinerary_summary
    };

    let system = TOUR_GUIDE.replace("{itinerary_summary}", summary);
    format!("{}\n\nUser message: {}", system, message.trim())
}
