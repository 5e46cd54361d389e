use super::model::Provider;
use crate::modules::input::Credentials;

pub const API_KEY_GEMINI: &str = "api_key_gemini";
pub const API_ENDPOINT_GEMINI: &str = "api_endpoint_gemini";
pub const API_KEY_PEXELS: &str = "api_key_pexels";
pub const API_KEY_PIXABAY: &str = "api_key_pixabay";

/// Text fields of a `/validate-keys` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateKeysRequest {
    pub fields: Vec<(&'static str, String)>,
}

impl ValidateKeysRequest {
    /// Debounced check of every provider at once.
    pub fn batch(credentials: &Credentials) -> Self {
        Self {
            fields: vec![
                (API_KEY_GEMINI, credentials.gemini.clone()),
                (API_ENDPOINT_GEMINI, credentials.gemini_endpoint.clone()),
                (API_KEY_PEXELS, credentials.pexels.clone()),
                (API_KEY_PIXABAY, credentials.pixabay.clone()),
            ],
        }
    }

    /// Explicit check scoped to one provider's fields.
    pub fn single(provider: Provider, credentials: &Credentials) -> Self {
        let fields = match provider {
            Provider::Pexels => vec![(API_KEY_PEXELS, credentials.pexels.clone())],
            Provider::Pixabay => vec![(API_KEY_PIXABAY, credentials.pixabay.clone())],
            Provider::Gemini => vec![
                (API_KEY_GEMINI, credentials.gemini.clone()),
                (API_ENDPOINT_GEMINI, credentials.gemini_endpoint.clone()),
            ],
        };
        Self { fields }
    }
}
