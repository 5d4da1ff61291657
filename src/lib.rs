//! Study Assistant - AI tutor backend
//!
//! Learners organize their study into sessions. Each session owns uploaded
//! materials (indexed in a hosted retrieval store), a tutor chat, generated
//! homework with automated grading, mind maps and lesson progress.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        HTTP API (axum)                        │
//! │  sessions · materials · homework · mind_maps · lessons        │
//! └──────────────┬──────────────────────────────┬────────────────┘
//!                │                              │
//! ┌──────────────▼──────────────┐  ┌────────────▼────────────────┐
//! │        Services              │  │        llm                   │
//! │  ownership checks            │  │  AssistantRunner (transient) │
//! │  homework state machine      │──▶  ConversationalAgent (chat)  │
//! │  grading transaction         │  │  RetrievalStore · images     │
//! └──────────────┬──────────────┘  └────────────┬────────────────┘
//!                │                              │
//! ┌──────────────▼──────────────┐  ┌────────────▼────────────────┐
//! │   Relational store (SeaORM)  │  │   Hosted LLM provider        │
//! └─────────────────────────────┘  └─────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`]: router assembly and service wiring
//! - [`sessions`]: sessions and tutor chat
//! - [`materials`]: material upload into the session retrieval store
//! - [`homework`]: generation, upload, submission and grading
//! - [`mind_maps`]: image mind maps of a session's materials
//! - [`lessons`]: read-only lesson progress
//! - [`llm`]: hosted assistant, retrieval and image adapters
//! - [`db`] / [`entity`]: schema, migrations and models
//! - [`config`]: configuration management

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod extract;
pub mod homework;
pub mod lessons;
pub mod llm;
pub mod materials;
pub mod mind_maps;
pub mod sessions;
pub mod upload;

pub use api::{build_app, AppServices, Backends};
pub use config::StudyAssistantConfig;
pub use error::{Error, Result};
