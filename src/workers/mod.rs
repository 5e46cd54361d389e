pub mod key_validator;
pub mod status_poller;

pub use key_validator::KeyValidationWorker;
pub use status_poller::StatusPoller;
