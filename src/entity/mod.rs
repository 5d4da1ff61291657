//! Sea-ORM entity models
//!
//! One module per table. Ownership runs user → session → everything else;
//! relations below mirror the foreign keys created by the migration.

pub mod chat_message;
pub mod homework;
pub mod homework_review;
pub mod homework_task;
pub mod homework_task_review;
pub mod lesson;
pub mod material;
pub mod mind_map;
pub mod session;
pub mod user;

pub use chat_message::MessageRole;
pub use homework::HomeworkStatus;
pub use homework_review::Grade;
pub use lesson::LessonStatus;
pub use material::FileType;
