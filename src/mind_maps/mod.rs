//! Mind maps module: image summaries of a session's materials

pub mod handler;
pub mod service;
pub mod store;
pub mod types;

pub use handler::{mind_maps_router, MindMapsState};
pub use service::MindMapService;
pub use store::MindMapStore;
