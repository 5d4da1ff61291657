//! Materials module: learning files indexed per session

pub mod handler;
pub mod service;
pub mod store;
pub mod types;

pub use handler::{materials_router, MaterialsState};
pub use service::MaterialService;
pub use store::MaterialStore;
