//! Request payloads and the builder that assembles them.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::page::PageContext;
use crate::selection::SelectionTracker;

/// Default follow-up used when a selection is quoted into an empty input.
pub const DEFAULT_SELECTION_PROMPT: &str = "Can you explain this?";

/// Body of a conversational query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_text: Option<String>,
}

/// Body of a skill invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

/// Builds payloads from user input and the shared selection.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    selection: SelectionTracker,
}

impl RequestBuilder {
    pub fn new(selection: SelectionTracker) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Build a chat payload.
    ///
    /// Refuses whitespace-only input without touching the selection. Otherwise
    /// the selection is consumed here, before any network call is made.
    pub fn build_chat(&self, input: &str) -> Result<ChatRequest, InputError> {
        if input.trim().is_empty() {
            return Err(InputError::EmptyText);
        }
        Ok(ChatRequest {
            question: input.to_string(),
            selected_text: self.selection.consume(),
        })
    }

    /// Quote the current selection into the input text.
    ///
    /// Returns `None` when there is no selection. The selection stays tracked
    /// until the composed message is sent.
    pub fn compose_with_selection(&self, input: &str) -> Option<String> {
        let selection = self.selection.current()?;
        let follow_up = if input.is_empty() {
            DEFAULT_SELECTION_PROMPT
        } else {
            input
        };
        Some(format!("Regarding: \"{selection}\". {follow_up}"))
    }
}

/// Build a payload for the named skill. `with_question` repeats the content
/// as `question`.
pub fn build_skill(
    skill: &str,
    content: &str,
    page: &PageContext,
    with_question: bool,
) -> Result<SkillRequest, InputError> {
    if content.trim().is_empty() {
        return Err(InputError::EmptyContent {
            skill: skill.to_string(),
        });
    }
    Ok(SkillRequest {
        content: content.to_string(),
        context: page.chapter().map(str::to_string),
        question: with_question.then(|| content.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(SelectionTracker::mounted())
    }

    #[test]
    fn chat_without_selection_omits_field() {
        let req = builder().build_chat("What is ROS?").unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"question": "What is ROS?"})
        );
    }

    #[test]
    fn chat_consumes_selection() {
        let b = builder();
        b.selection().on_pointer_release(Some("inverse kinematics"));

        let first = b.build_chat("Explain").unwrap();
        assert_eq!(first.selected_text.as_deref(), Some("inverse kinematics"));

        let second = b.build_chat("And again?").unwrap();
        assert_eq!(second.selected_text, None);
    }

    #[test]
    fn empty_input_refused_and_selection_kept() {
        let b = builder();
        b.selection().on_pointer_release(Some("torque"));
        assert_eq!(b.build_chat("  \n\t"), Err(InputError::EmptyText));
        assert_eq!(b.selection().current().as_deref(), Some("torque"));
    }

    #[test]
    fn compose_quotes_selection_without_consuming() {
        let b = builder();
        b.selection().on_pointer_release(Some("inverse kinematics"));

        let composed = b.compose_with_selection("").unwrap();
        assert_eq!(
            composed,
            "Regarding: \"inverse kinematics\". Can you explain this?"
        );
        assert!(b.selection().is_present());

        let composed = b.compose_with_selection("How is it solved?").unwrap();
        assert_eq!(
            composed,
            "Regarding: \"inverse kinematics\". How is it solved?"
        );
    }

    #[test]
    fn compose_without_selection_is_none() {
        assert!(builder().compose_with_selection("hi").is_none());
    }

    #[test]
    fn skill_payload_carries_context_and_question() {
        let page = PageContext::with_chapter("kinematics");
        let req = build_skill("tutor", "joint angles", &page, true).unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"content": "joint angles", "context": "kinematics", "question": "joint angles"})
        );

        let req = build_skill("glossary", "joint angles", &PageContext::default(), false).unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"content": "joint angles"})
        );
    }

    #[test]
    fn skill_payload_refuses_blank_content() {
        assert_eq!(
            build_skill("summarize", "   ", &PageContext::default(), false),
            Err(InputError::EmptyContent {
                skill: "summarize".into()
            })
        );
    }
}
