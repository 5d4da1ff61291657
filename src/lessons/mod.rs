//! Lessons module: read-only lesson progress per session

pub mod handler;
pub mod store;
pub mod types;

pub use handler::{lessons_router, LessonsState};
pub use store::LessonStore;
