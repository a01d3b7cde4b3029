//! Decides whether a completed message is secretly a structured payload.
//!
//! Most responses are prose, so every failure path here is an expected,
//! quiet one: the message simply stays plain text and renders through the
//! markdown pipeline. Nothing in this module returns an error.

use serde_json::Value;

use crate::models::content::RichContent;
use crate::models::message::MessageContent;

/// Classifies the full, final text of a message. Called exactly once, when
/// the stream completes; a JSON envelope is syntactically invalid until
/// fully received, so running this on a partial buffer would misclassify.
pub fn classify(text: &str) -> MessageContent {
    match try_rich(text) {
        Some(content) => MessageContent::rich(content),
        None => MessageContent::plain_text(text),
    }
}

fn try_rich(text: &str) -> Option<RichContent> {
    let envelope = carve_envelope(text)?;
    let mut value: Value = match serde_json::from_str(envelope) {
        Ok(value) => value,
        Err(error) => {
            tracing::debug!(%error, "carved span is not JSON");
            return None;
        }
    };
    promote_kind_tag(&mut value);
    let content: RichContent = match serde_json::from_value(value) {
        Ok(content) => content,
        Err(error) => {
            tracing::debug!(%error, "envelope matches no known variant");
            return None;
        }
    };
    if let Err(error) = content.validate() {
        tracing::debug!(%error, kind = %content.kind(), "envelope failed validation");
        return None;
    }
    Some(content)
}

/// The candidate envelope spans the first `{` through the last `}`; prose
/// before and after is tolerated and ignored.
fn carve_envelope(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    if open < close {
        Some(&text[open..=close])
    } else {
        None
    }
}

/// `kind` is accepted as a synonym for the `type` discriminant.
fn promote_kind_tag(value: &mut Value) {
    if let Value::Object(map) = value {
        if !map.contains_key("type") {
            if let Some(kind) = map.remove("kind") {
                map.insert("type".to_string(), kind);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::RichContentKind;

    fn kind_of(content: &MessageContent) -> Option<RichContentKind> {
        content.as_rich().map(RichContent::kind)
    }

    #[test]
    fn bare_table_envelope_classifies_rich() {
        let content = classify(r#"{"type":"table","title":"T","data":[["a"]]}"#);
        assert_eq!(kind_of(&content), Some(RichContentKind::Table));
    }

    #[test]
    fn envelope_with_surrounding_prose_classifies_rich() {
        let content = classify(
            r#"Sure, here it is: {"type":"table","title":"T","data":[["a"]]} Hope that helps!"#,
        );
        assert_eq!(kind_of(&content), Some(RichContentKind::Table));
    }

    #[test]
    fn kind_tag_is_a_synonym_for_type() {
        let content = classify(r#"{"kind":"table","title":"T","data":[["a"]]}"#);
        assert_eq!(kind_of(&content), Some(RichContentKind::Table));
    }

    #[test]
    fn news_report_envelope_classifies_rich() {
        let content = classify(
            r#"{"type":"news_report","headline":"Markets","summary":"Up.","articles":[{"title":"Rally","source":"Wire","summary":"Stocks rose."}]}"#,
        );
        assert_eq!(kind_of(&content), Some(RichContentKind::NewsReport));
    }

    #[test]
    fn study_explanation_envelope_classifies_rich() {
        // keyPoints is optional and defaults to empty
        let content = classify(
            r#"{"type":"study_explanation","topic":"Osmosis","explanation":"Water crosses a membrane."}"#,
        );
        assert_eq!(kind_of(&content), Some(RichContentKind::StudyExplanation));
    }

    #[test]
    fn study_review_envelope_classifies_rich() {
        let content = classify(
            r#"{"type":"study_review","topic":"Verbs","flashcards":[{"front":"ir","back":"to go"}]}"#,
        );
        assert_eq!(kind_of(&content), Some(RichContentKind::StudyReview));
    }

    #[test]
    fn truncated_envelope_stays_plain() {
        let text = r#"Here is data: {"type":"table""#;
        let content = classify(text);
        assert_eq!(content.as_plain_text(), Some(text));
    }

    #[test]
    fn unknown_discriminant_stays_plain() {
        let content = classify(r#"{"type":"unknown_kind","title":"?"}"#);
        assert!(!content.is_rich());
    }

    #[test]
    fn failed_validation_stays_plain_with_full_text() {
        let text = r#"{"type":"chart","title":"S","chartType":"bar","labels":["a"],"values":[]}"#;
        let content = classify(text);
        assert_eq!(content.as_plain_text(), Some(text));
    }

    #[test]
    fn out_of_range_quiz_answer_stays_plain() {
        let content = classify(
            r#"{"type":"study_quiz","topic":"G","quiz":[{"type":"multiple_choice","question":"Q?","options":["a","b","c"],"correctAnswer":5}]}"#,
        );
        assert!(!content.is_rich());
    }

    #[test]
    fn close_brace_before_open_brace_stays_plain() {
        assert!(!classify("} oops {").is_rich());
    }

    #[test]
    fn plain_prose_stays_plain() {
        let content = classify("Just a normal sentence.");
        assert_eq!(content.as_plain_text(), Some("Just a normal sentence."));
    }
}
