pub mod model;
pub mod resource;
pub mod service;

pub use model::{RenderPhase, RenderedVideo};
pub use resource::{ResourceStore, ResultManager, VideoInfo};
pub use service::RenderController;
