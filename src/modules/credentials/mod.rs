pub mod dto;
pub mod model;
pub mod service;

pub use model::{CheckingFlags, CredentialStatus, Provider};
pub use service::CredentialValidator;
