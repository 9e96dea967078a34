use serde_json::Value;

use crate::domain::{ChatError, ChatMessage, MessageRole, SimilarityMatch};

/// Fixed system instruction sent with every request. Versioned as domain
/// configuration, not derived from the request.
pub const SYSTEM_PROMPT: &str = "\
You are an AI assistant for a RateMyProfessor-style service that helps \
students find professors based on their queries. For each question, use the \
retrieved professor records to rank and present the top 3 most suitable \
professors, with a brief explanation for each suggestion. Maintain a helpful \
and student-focused tone, provide accurate information while respecting \
privacy and avoiding bias, and if you do not have enough information to make \
a recommendation, say so and ask for more details to refine the search.";

/// Text emitted instead of an empty context block so the model is told
/// explicitly that retrieval found nothing.
pub const NO_RESULTS_TEXT: &str = "\n\nNo matching professor records were found.\n";

/// Metadata fields rendered first, in this order; any remaining fields
/// follow in sorted key order so the output is deterministic.
const KNOWN_FIELDS: [(&str, &str); 2] = [("subject", "Subject"), ("stars", "Stars")];

/// Renders ranked matches into the context block appended to the user's
/// query. Pure function: same matches, same text.
pub fn format_matches(matches: &[SimilarityMatch]) -> String {
    if matches.is_empty() {
        return NO_RESULTS_TEXT.to_string();
    }

    let mut out = String::from("\n\nReturned results:\n");
    for m in matches {
        out.push_str("---\n");
        out.push_str(&format!("Professor: {}\n", m.id));

        for (key, label) in KNOWN_FIELDS {
            if let Some(value) = m.metadata.get(key) {
                out.push_str(&format!("{}: {}\n", label, render_value(value)));
            }
        }

        let mut extra: Vec<(&String, &Value)> = m
            .metadata
            .iter()
            .filter(|(key, _)| KNOWN_FIELDS.iter().all(|(known, _)| *known != key.as_str()))
            .collect();
        extra.sort_by(|a, b| a.0.cmp(b.0));

        for (key, value) in extra {
            out.push_str(&format!("{}: {}\n", key, render_value(value)));
        }
    }
    out.push_str("---\n");
    out
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds the outbound message list: system instruction, prior turns
/// unchanged, final turn with the retrieved context appended. The input
/// history is read-only; a new list is always returned.
pub fn compose_prompt(
    history: &[ChatMessage],
    context: &str,
) -> Result<Vec<ChatMessage>, ChatError> {
    let (last, prior) = history
        .split_last()
        .ok_or_else(|| ChatError::invalid_history("conversation history is empty"))?;

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::new(MessageRole::System, SYSTEM_PROMPT));
    messages.extend_from_slice(prior);
    messages.push(ChatMessage::new(
        last.role,
        format!("{}{}", last.content, context),
    ));

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_with_fields() -> SimilarityMatch {
        SimilarityMatch::new("Dr. Smith", 0.92)
            .with_field("subject", "CS")
            .with_field("stars", 4.8)
    }

    #[test]
    fn format_is_deterministic() {
        let matches = vec![match_with_fields(), SimilarityMatch::new("Dr. Jones", 0.7)];
        assert_eq!(format_matches(&matches), format_matches(&matches));
    }

    #[test]
    fn format_renders_id_and_fields_in_rank_order() {
        let matches = vec![
            match_with_fields(),
            SimilarityMatch::new("Dr. Jones", 0.7).with_field("subject", "Math"),
        ];
        let text = format_matches(&matches);

        let smith = text.find("Professor: Dr. Smith").unwrap();
        let jones = text.find("Professor: Dr. Jones").unwrap();
        assert!(smith < jones);
        assert!(text.contains("Subject: CS"));
        assert!(text.contains("Stars: 4.8"));
    }

    #[test]
    fn format_omits_absent_fields() {
        let text = format_matches(&[SimilarityMatch::new("Dr. Jones", 0.7)]);
        assert!(text.contains("Professor: Dr. Jones"));
        assert!(!text.contains("Subject:"));
        assert!(!text.contains("Stars:"));
    }

    #[test]
    fn format_unknown_fields_sorted_by_key() {
        let m = SimilarityMatch::new("Dr. Lee", 0.8)
            .with_field("office", "B-210")
            .with_field("department", "EE");
        let text = format_matches(&[m]);

        let department = text.find("department: EE").unwrap();
        let office = text.find("office: B-210").unwrap();
        assert!(department < office);
    }

    #[test]
    fn empty_matches_yield_no_results_text() {
        let text = format_matches(&[]);
        assert_eq!(text, NO_RESULTS_TEXT);
        assert!(!text.is_empty());
    }

    #[test]
    fn compose_prepends_system_and_appends_context() {
        let history = vec![
            ChatMessage::user("Who teaches algorithms well?"),
            ChatMessage::assistant("Let me look."),
            ChatMessage::user("Please do."),
        ];
        let out = compose_prompt(&history, "\n\nCTX").unwrap();

        assert_eq!(out.len(), history.len() + 1);
        assert_eq!(out[0].role, MessageRole::System);
        assert_eq!(out[0].content, SYSTEM_PROMPT);
        assert_eq!(out[1], history[0]);
        assert_eq!(out[2], history[1]);
        assert_eq!(out[3].role, MessageRole::User);
        assert_eq!(out[3].content, "Please do.\n\nCTX");
    }

    #[test]
    fn compose_does_not_mutate_input() {
        let history = vec![ChatMessage::user("hi")];
        let snapshot = history.clone();
        let _ = compose_prompt(&history, " extra").unwrap();
        assert_eq!(history, snapshot);
    }

    #[test]
    fn compose_rejects_empty_history() {
        let err = compose_prompt(&[], "ctx").unwrap_err();
        assert!(matches!(err, ChatError::InvalidHistory(_)));
    }

    #[test]
    fn final_message_is_exact_concatenation() {
        let history = vec![ChatMessage::user("query")];
        let context = format_matches(&[match_with_fields()]);
        let out = compose_prompt(&history, &context).unwrap();
        assert_eq!(out[1].content, format!("query{context}"));
    }
}
