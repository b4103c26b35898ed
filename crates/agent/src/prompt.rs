//! The fixed analyst prompt.
//!
//! The system instruction is versioned: any wording change that could shift
//! the model's output shape bumps `PROMPT_VERSION` so runs are attributable
//! to a prompt revision.

use crate::llm::ChatMessage;

pub const PROMPT_VERSION: &str = "v1";

const SYSTEM_PROMPT: &str = r#"You are a Process Intelligence Analyst Agent.
You receive structured process telemetry (KPIs, bottlenecks, variants).
Your job:
1) Summarize in 3-5 crisp bullet points for executives.
2) Recommend 3 actionable fixes (who should do what & why).
3) Provide a short narrator script (60-120 words) suitable for TTS.
Output strictly in JSON with keys:
{
  "summary": "...",
  "bullets": ["...", "...", "..."],
  "actions": ["...", "...", "..."],
  "narration": "..."
}"#;

/// Assemble the two-message prompt for one analysis request.
pub fn analysis_messages(query: &str, context: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("User query: {query}\n\nDATA:\n{context}")),
    ]
}

#[cfg(test)]
mod tests {
    use super::analysis_messages;

    #[test]
    fn prompt_is_system_then_user() {
        let messages = analysis_messages("Show weekly bottlenecks", "Process: Procure-to-Pay");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn user_message_embeds_query_and_context() {
        let messages = analysis_messages("Show weekly bottlenecks", "Process: Procure-to-Pay");

        assert!(messages[1].content.contains("User query: Show weekly bottlenecks"));
        assert!(messages[1].content.contains("DATA:\nProcess: Procure-to-Pay"));
    }

    #[test]
    fn system_instruction_demands_the_json_contract() {
        let messages = analysis_messages("q", "c");

        for key in ["\"summary\"", "\"bullets\"", "\"actions\"", "\"narration\""] {
            assert!(messages[0].content.contains(key), "system prompt should name {key}");
        }
    }
}
