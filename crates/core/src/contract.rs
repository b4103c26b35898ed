//! The single enforcement point for the model-output contract.
//!
//! The language model is an untrusted, best-effort text generator; nothing
//! downstream touches its output except through `parse_analysis`. Models
//! routinely wrap the requested JSON in prose or markdown fences, so known
//! wrappers are stripped before the strict parse. Anything that is not a
//! JSON object after unwrapping is rejected.

use crate::domain::analysis::AnalysisResult;
use crate::errors::PipelineError;

/// Interpret raw model text as an [`AnalysisResult`].
///
/// Missing keys default to empty values. A present key with the wrong type,
/// a non-object value (bare string, array, number), or unparseable text is a
/// contract violation.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, PipelineError> {
    let unwrapped = strip_wrappers(raw);

    let value: serde_json::Value = serde_json::from_str(unwrapped)
        .map_err(|err| PipelineError::Contract(format!("model output is not valid JSON: {err}")))?;

    if !value.is_object() {
        return Err(PipelineError::Contract(format!(
            "expected a JSON object with summary/bullets/actions/narration, got {}",
            json_type_name(&value)
        )));
    }

    serde_json::from_value(value).map_err(|err| {
        PipelineError::Contract(format!("analysis fields have the wrong shape: {err}"))
    })
}

/// Strip surrounding whitespace and the first markdown code fence, with or
/// without a `json` language tag. Prose before or after the fence is
/// discarded. Returns the input trimmed when no complete fence is found.
fn strip_wrappers(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(open) = trimmed.find("```") {
        let after_fence = &trimmed[open + 3..];
        let after_tag = after_fence.strip_prefix("json").unwrap_or(after_fence);
        if let Some(close) = after_tag.find("```") {
            return after_tag[..close].trim();
        }
    }

    trimmed
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::PipelineError;

    use super::parse_analysis;

    const WELL_FORMED: &str = r#"{
        "summary": "Approvals dominate cycle time.",
        "bullets": ["Approve PO waits 54h", "Rework loops add 18%"],
        "actions": ["Add SLA alerts", "Auto-route small POs", "Review vendor onboarding"],
        "narration": "This week the process slowed in approvals."
    }"#;

    #[test]
    fn well_formed_object_round_trips_exactly() {
        let result = parse_analysis(WELL_FORMED).expect("well-formed output");

        assert_eq!(result.summary, "Approvals dominate cycle time.");
        assert_eq!(result.bullets.len(), 2);
        assert_eq!(result.actions.len(), 3);
        assert_eq!(result.narration, "This week the process slowed in approvals.");
    }

    #[test]
    fn fenced_output_is_unwrapped() {
        let fenced = format!("```json\n{WELL_FORMED}\n```");
        let result = parse_analysis(&fenced).expect("fenced output");
        assert_eq!(result.summary, "Approvals dominate cycle time.");
    }

    #[test]
    fn fence_without_language_tag_is_unwrapped() {
        let fenced = format!("```\n{WELL_FORMED}\n```");
        let result = parse_analysis(&fenced).expect("untagged fence");
        assert_eq!(result.bullets.len(), 2);
    }

    #[test]
    fn prose_around_a_fence_is_discarded() {
        let wrapped = format!("Here is the analysis you asked for:\n```json\n{WELL_FORMED}\n```\nLet me know if you need more.");
        let result = parse_analysis(&wrapped).expect("prose-wrapped fence");
        assert_eq!(result.actions.len(), 3);
    }

    #[test]
    fn missing_narration_defaults_to_empty_string() {
        let raw = r#"{"summary": "s", "bullets": [], "actions": []}"#;
        let result = parse_analysis(raw).expect("object without narration");
        assert_eq!(result.narration, "");
    }

    #[test]
    fn missing_list_fields_default_to_empty() {
        let result = parse_analysis(r#"{"summary": "s"}"#).expect("sparse object");
        assert!(result.bullets.is_empty());
        assert!(result.actions.is_empty());
    }

    #[test]
    fn plain_prose_is_a_contract_violation() {
        let error = parse_analysis("hello").expect_err("prose must be rejected");
        assert!(matches!(error, PipelineError::Contract(_)));
    }

    #[test]
    fn unterminated_json_is_a_contract_violation() {
        let error = parse_analysis(r#"{"summary": "s""#).expect_err("truncated output");
        assert!(matches!(error, PipelineError::Contract(_)));
    }

    #[test]
    fn bare_array_is_a_contract_violation() {
        let error = parse_analysis(r#"["a", "b"]"#).expect_err("array is not an object");
        assert!(matches!(error, PipelineError::Contract(ref message) if message.contains("array")));
    }

    #[test]
    fn bare_json_string_is_a_contract_violation() {
        let error = parse_analysis(r#""just a string""#).expect_err("string is not an object");
        assert!(matches!(error, PipelineError::Contract(ref message) if message.contains("string")));
    }

    #[test]
    fn wrong_typed_field_is_a_contract_violation() {
        let error = parse_analysis(r#"{"summary": "s", "bullets": "not a list"}"#)
            .expect_err("bullets must be a list");
        assert!(matches!(error, PipelineError::Contract(_)));
    }

    #[test]
    fn unknown_extra_fields_are_tolerated() {
        let raw = r#"{"summary": "s", "confidence": 0.9}"#;
        let result = parse_analysis(raw).expect("extra fields ignored");
        assert_eq!(result.summary, "s");
    }
}
