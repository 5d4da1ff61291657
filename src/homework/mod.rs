//! Homework module: generation, solution upload, submission and grading

pub mod handler;
pub mod prompt;
pub mod service;
pub mod store;
pub mod types;

pub use handler::{homework_router, HomeworkState};
pub use service::HomeworkService;
pub use store::{HomeworkDetail, HomeworkStore};
