pub mod error;
pub mod notice;
pub mod upload;
