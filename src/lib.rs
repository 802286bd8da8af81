//! Docs Assist: client orchestration for an in-page documentation assistant.

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod page;
pub mod preferences;
pub mod request;
pub mod selection;
pub mod skills;
pub mod translation;
