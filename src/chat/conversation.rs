//! Conversation state machine.
//!
//! ```text
//!   Idle --submit--> AwaitingResponse --answer/failure--> Idle
//! ```
//!
//! A submission is split in three so the widget can render between steps:
//! [`Conversation::begin_submit`] appends the user message and hands back a
//! [`PendingChat`], [`PendingChat::send`] is the only suspension point, and
//! [`Conversation::complete`] appends the assistant reply. While a request is
//! pending, further submissions are refused.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::message::Message;
use crate::config::AssistConfig;
use crate::error::{GatewayError, InputError};
use crate::gateway::{self, Gateway};
use crate::request::{ChatRequest, RequestBuilder};
use crate::selection::SelectionTracker;

/// Assistant reply appended when a request fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

const PLACEHOLDER_DEFAULT: &str = "Ask about the content...";
const PLACEHOLDER_WITH_SELECTION: &str = "Ask about selected text...";

/// Success body of the conversational endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Request status of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatStatus {
    /// Accepting input.
    #[default]
    Idle,
    /// Exactly one request is in flight.
    AwaitingResponse,
}

impl ChatStatus {
    pub fn can_transition_to(&self, target: ChatStatus) -> bool {
        use ChatStatus::*;
        matches!((self, target), (Idle, AwaitingResponse) | (AwaitingResponse, Idle))
    }
}

impl std::fmt::Display for ChatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::AwaitingResponse => "awaiting_response",
        };
        write!(f, "{s}")
    }
}

/// A key press delivered to the input box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Enter { shift: bool },
    Char(char),
}

/// What a key press does to the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    Insert(char),
}

impl KeyInput {
    /// Plain Enter submits; Shift+Enter inserts a line break.
    pub fn action(self) -> KeyAction {
        match self {
            Self::Enter { shift: false } => KeyAction::Submit,
            Self::Enter { shift: true } => KeyAction::Insert('\n'),
            Self::Char(c) => KeyAction::Insert(c),
        }
    }
}

/// A chat request that has been committed to the log but not yet sent.
pub struct PendingChat {
    gateway: Arc<dyn Gateway>,
    endpoint: String,
    request: ChatRequest,
}

impl PendingChat {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Perform the single network attempt.
    pub async fn send(self) -> Result<ChatResponse, GatewayError> {
        gateway::call(self.gateway.as_ref(), &self.endpoint, &self.request).await
    }
}

/// The conversational widget's state.
pub struct Conversation {
    gateway: Arc<dyn Gateway>,
    endpoint: String,
    builder: RequestBuilder,
    log: Vec<Message>,
    status: ChatStatus,
    input: String,
    open: bool,
    focus_requested: bool,
}

impl Conversation {
    /// Start a conversation seeded with the configured greeting.
    pub fn new(
        config: &AssistConfig,
        gateway: Arc<dyn Gateway>,
        selection: SelectionTracker,
    ) -> Self {
        Self {
            gateway,
            endpoint: config.chat_endpoint(),
            builder: RequestBuilder::new(selection),
            log: vec![Message::assistant(config.greeting.clone())],
            status: ChatStatus::Idle,
            input: String::new(),
            open: false,
            focus_requested: false,
        }
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    pub fn status(&self) -> ChatStatus {
        self.status
    }

    /// Whether the typing indicator should be shown.
    pub fn is_typing(&self) -> bool {
        self.status == ChatStatus::AwaitingResponse
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Mirrors the enabled state of the send control.
    pub fn can_send(&self) -> bool {
        self.status == ChatStatus::Idle && !self.input.trim().is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.focus_requested = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.focus_requested = false;
    }

    /// Returns `true` once after the input should regain focus.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    pub fn selection(&self) -> &SelectionTracker {
        self.builder.selection()
    }

    pub fn placeholder(&self) -> &'static str {
        if self.selection().is_present() {
            PLACEHOLDER_WITH_SELECTION
        } else {
            PLACEHOLDER_DEFAULT
        }
    }

    /// Quote the current selection into the input ("Use in question").
    ///
    /// Returns `false` when there is nothing selected.
    pub fn use_selection(&mut self) -> bool {
        match self.builder.compose_with_selection(&self.input) {
            Some(composed) => {
                self.input = composed;
                self.focus_requested = true;
                true
            }
            None => false,
        }
    }

    /// Commit the current input and move to `AwaitingResponse`.
    ///
    /// The user message is appended and the input cleared before any network
    /// activity. Refused while a request is in flight or when the input is blank.
    pub fn begin_submit(&mut self) -> Result<PendingChat, InputError> {
        if self.status != ChatStatus::Idle {
            return Err(InputError::Busy {
                component: "chat".to_string(),
            });
        }
        let request = self.builder.build_chat(&self.input)?;

        let text = std::mem::take(&mut self.input);
        self.log.push(Message::user(text));
        self.transition(ChatStatus::AwaitingResponse);

        info!(
            with_selection = request.selected_text.is_some(),
            messages = self.log.len(),
            "Chat request dispatched"
        );

        Ok(PendingChat {
            gateway: Arc::clone(&self.gateway),
            endpoint: self.endpoint.clone(),
            request,
        })
    }

    /// Apply the outcome of a pending request and return to `Idle`.
    ///
    /// Returns the appended assistant message, or `None` if no request was
    /// pending.
    pub fn complete(&mut self, outcome: Result<ChatResponse, GatewayError>) -> Option<&Message> {
        if self.status != ChatStatus::AwaitingResponse {
            warn!(status = %self.status, "Ignoring chat outcome with no request pending");
            return None;
        }

        let reply = match outcome {
            Ok(resp) => resp.answer,
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                FALLBACK_REPLY.to_string()
            }
        };
        self.log.push(Message::assistant(reply));

        self.transition(ChatStatus::Idle);
        self.selection().clear();
        if self.open {
            self.focus_requested = true;
        }
        self.log.last()
    }

    /// Run one full round-trip: commit, send, complete.
    pub async fn submit(&mut self) -> Result<&Message, InputError> {
        let pending = self.begin_submit()?;
        let outcome = pending.send().await;
        // begin_submit left us awaiting, so complete always appends.
        self.complete(outcome).ok_or(InputError::Busy {
            component: "chat".to_string(),
        })
    }

    /// Handle a key press in the input box.
    ///
    /// Returns the assistant reply when the key submitted the message.
    pub async fn on_key(&mut self, key: KeyInput) -> Result<Option<&Message>, InputError> {
        match key.action() {
            KeyAction::Submit => self.submit().await.map(Some),
            KeyAction::Insert(c) => {
                self.input.push(c);
                Ok(None)
            }
        }
    }

    fn transition(&mut self, target: ChatStatus) {
        debug_assert!(self.status.can_transition_to(target));
        debug!(from = %self.status, to = %target, "Chat status transition");
        self.status = target;
    }
}
