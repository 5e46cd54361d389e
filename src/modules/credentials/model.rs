use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Pexels,
    Pixabay,
    Gemini,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Pexels, Provider::Pixabay, Provider::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Pexels => "pexels",
            Provider::Pixabay => "pixabay",
            Provider::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Pexels => "Pexels",
            Provider::Pixabay => "Pixabay",
            Provider::Gemini => "Gemini",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Provider::Pexels => 0,
            Provider::Pixabay => 1,
            Provider::Gemini => 2,
        }
    }
}

/// Activation state per provider. Also the body of a `/validate-keys`
/// response; providers the service leaves out decode as inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CredentialStatus {
    #[serde(default)]
    pub pexels: bool,
    #[serde(default)]
    pub pixabay: bool,
    #[serde(default)]
    pub gemini: bool,
}

impl CredentialStatus {
    pub fn get(&self, provider: Provider) -> bool {
        match provider {
            Provider::Pexels => self.pexels,
            Provider::Pixabay => self.pixabay,
            Provider::Gemini => self.gemini,
        }
    }

    pub fn set(&mut self, provider: Provider, active: bool) {
        match provider {
            Provider::Pexels => self.pexels = active,
            Provider::Pixabay => self.pixabay = active,
            Provider::Gemini => self.gemini = active,
        }
    }

    /// Either stock-media provider is enough to source footage.
    pub fn stock_ready(&self) -> bool {
        self.pexels || self.pixabay
    }

    pub fn gemini_badge(&self) -> &'static str {
        if self.gemini { "ACTIVE" } else { "INACTIVE" }
    }

    pub fn stock_badge(&self) -> &'static str {
        if self.stock_ready() { "READY" } else { "MISSING" }
    }
}

/// Which explicit checks are outstanding; drives the disabled state of the
/// per-provider "Check" controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckingFlags {
    pub pexels: bool,
    pub pixabay: bool,
    pub gemini: bool,
}

impl CheckingFlags {
    pub fn get(&self, provider: Provider) -> bool {
        match provider {
            Provider::Pexels => self.pexels,
            Provider::Pixabay => self.pixabay,
            Provider::Gemini => self.gemini,
        }
    }

    pub fn set(&mut self, provider: Provider, checking: bool) {
        match provider {
            Provider::Pexels => self.pexels = checking,
            Provider::Pixabay => self.pixabay = checking,
            Provider::Gemini => self.gemini = checking,
        }
    }

    pub fn any(&self) -> bool {
        self.pexels || self.pixabay || self.gemini
    }
}
