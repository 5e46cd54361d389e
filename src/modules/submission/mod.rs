pub mod builder;

pub use builder::{build, field, FieldValue, FormField, RenderSubmission};
