pub mod credentials;
pub mod input;
pub mod render;
pub mod status;
pub mod submission;
