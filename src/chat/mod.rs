//! Conversational widget: message log and request state machine.

pub mod conversation;
pub mod message;

pub use conversation::{
    ChatResponse, ChatStatus, Conversation, FALLBACK_REPLY, KeyAction, KeyInput, PendingChat,
};
pub use message::{Message, Sender};
