pub mod model;
pub mod service;

pub use model::{GpuStats, SystemSnapshot};
pub use service::StatusService;
