//! Hosted LLM adapters
//!
//! Traits at the seams (`AssistantApi`, `RetrievalStore`, `ImageGenerator`)
//! with one OpenAI-backed implementation of all three.

pub mod assistant;
pub mod client;
pub mod conversation;
pub mod image;
pub mod types;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use assistant::{parse_json_reply, AssistantApi, AssistantRunner};
pub use client::OpenAiClient;
pub use conversation::ConversationalAgent;
pub use image::ImageGenerator;
pub use types::{AssistantSpec, ResponseFormat, Run, RunStatus, ThreadMessage};
pub use vector_store::{session_store, session_store_name, upload_document, RetrievalStore};
