//! Sessions module: learning sessions and tutor chat
//!
//! A session is the ownership root for every other resource. Chat turns are
//! persisted here and relayed to the hosted tutor through
//! `llm::ConversationalAgent`.

pub mod handler;
pub mod service;
pub mod store;
pub mod types;

pub use handler::{sessions_router, SessionsState};
pub use service::ChatService;
pub use store::{ChatMessageStore, SessionStore};
