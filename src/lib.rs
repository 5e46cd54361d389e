pub mod app;
pub mod common;
pub mod config;
pub mod infrastructure;
pub mod modules;
pub mod state;
pub mod workers;

pub use app::{create_session, Session};
pub use state::AppState;
