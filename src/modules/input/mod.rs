pub mod model;

pub use model::{AspectRatio, Credentials, Genre, InputModel, VoiceName};
