pub mod client;

pub use client::{Endpoint, ServiceClient};
