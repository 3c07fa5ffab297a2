/*!
 * Tests for defensive parsing of provider output, exercised through the
 * public API the pipeline uses.
 */

use tripdash::errors::TranslationError;
use tripdash::store::{FieldPlan, RecordKind};
use tripdash::translation::response::{
    extract_braced_object, parse_target_fields, strip_code_fences,
};

fn schedule_plan() -> FieldPlan {
    FieldPlan::new(RecordKind::Schedule, "vi", "zh").expect("Failed to build plan")
}

#[test]
fn test_stripCodeFences_withTaggedFence_shouldMatchUnwrapped() {
    let fenced = "```json\n{\"title_zh\":\"韓國之旅\"}\n```";
    let unwrapped = "{\"title_zh\":\"韓國之旅\"}";

    assert_eq!(strip_code_fences(fenced), unwrapped);
    assert_eq!(strip_code_fences(unwrapped), unwrapped);
}

#[test]
fn test_parseTargetFields_fencedAndUnwrapped_shouldYieldSameResult() {
    let plan = schedule_plan();
    let fenced = "```json\n{\"title_zh\":\"韓國之旅\"}\n```";
    let unwrapped = "{\"title_zh\":\"韓國之旅\"}";

    let from_fenced = parse_target_fields(fenced, &plan).expect("fenced parse failed");
    let from_unwrapped = parse_target_fields(unwrapped, &plan).expect("unwrapped parse failed");

    assert_eq!(from_fenced, from_unwrapped);
    assert_eq!(from_fenced.title, "韓國之旅");
}

#[test]
fn test_parseTargetFields_withChattyReply_shouldRecoverEmbeddedObject() {
    let plan = schedule_plan();
    let raw = r#"Here is the result: {"title_zh":"韓國之旅","description_zh":"首爾"} Thanks!"#;

    let fields = parse_target_fields(raw, &plan).expect("extraction failed");
    assert_eq!(fields.title, "韓國之旅");
    assert_eq!(fields.secondary.as_deref(), Some("首爾"));
}

#[test]
fn test_parseTargetFields_withMissingTitleKey_shouldFailIncomplete() {
    let plan = schedule_plan();
    let raw = r#"{"description_zh":"首爾"}"#;

    match parse_target_fields(raw, &plan) {
        Err(TranslationError::IncompleteResponse(key)) => assert_eq!(key, "title_zh"),
        other => panic!("Expected IncompleteResponse, got {:?}", other),
    }
}

#[test]
fn test_parseTargetFields_withPlainProse_shouldFailUnparsable() {
    let plan = schedule_plan();

    assert!(matches!(
        parse_target_fields("Sorry, I cannot help with that.", &plan),
        Err(TranslationError::UnparsableResponse(_))
    ));
}

#[test]
fn test_parseTargetFields_forNoteKind_shouldUseContentKey() {
    let plan = FieldPlan::new(RecordKind::Note, "vi", "zh").expect("Failed to build plan");
    let raw = r#"{"title_zh":"車站","content_zh":"明洞站"}"#;

    let fields = parse_target_fields(raw, &plan).expect("parse failed");
    assert_eq!(fields.secondary.as_deref(), Some("明洞站"));
}

#[test]
fn test_extractBracedObject_shouldReturnFirstBalancedObject() {
    let raw = r#"noise {"a":1} and {"b":2}"#;
    assert_eq!(extract_braced_object(raw), Some(r#"{"a":1}"#));
}
