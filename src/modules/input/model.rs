use std::str::FromStr;

use validator::Validate;

use crate::common::error::ValidationError;
use crate::common::upload::UploadFile;

pub const DEFAULT_BG_MUSIC_VOLUME: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Genre {
    #[default]
    Documentary,
    FinancialTech,
    Storytime,
    Vlog,
    Cartoon,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Documentary,
        Genre::FinancialTech,
        Genre::Storytime,
        Genre::Vlog,
        Genre::Cartoon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Documentary => "Documentary",
            Genre::FinancialTech => "Financial/Tech",
            Genre::Storytime => "Storytime",
            Genre::Vlog => "Vlog",
            Genre::Cartoon => "Cartoon",
        }
    }
}

impl FromStr for Genre {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidInput(format!("unknown genre: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AspectRatio {
    #[default]
    Landscape,
    Vertical,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 2] = [AspectRatio::Landscape, AspectRatio::Vertical];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Vertical => "9:16",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "Landscape (16:9) - YouTube",
            AspectRatio::Vertical => "Vertical (9:16) - Reels/Shorts",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Vertical),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown aspect ratio: {other}"
            ))),
        }
    }
}

/// Synthetic voice presets offered when no voiceover is uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VoiceName {
    MaleDefault,
    #[default]
    FemaleDefault,
    IslamicMale,
    IslamicFemale,
    DeepMale,
}

impl VoiceName {
    pub const ALL: [VoiceName; 5] = [
        VoiceName::MaleDefault,
        VoiceName::FemaleDefault,
        VoiceName::IslamicMale,
        VoiceName::IslamicFemale,
        VoiceName::DeepMale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceName::MaleDefault => "Male (Default)",
            VoiceName::FemaleDefault => "Female (Default)",
            VoiceName::IslamicMale => "Islamic (Male)",
            VoiceName::IslamicFemale => "Islamic (Female)",
            VoiceName::DeepMale => "Deep (Male)",
        }
    }
}

impl FromStr for VoiceName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VoiceName::ALL
            .into_iter()
            .find(|voice| voice.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidInput(format!("unknown voice: {s}")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub pexels: String,
    pub pixabay: String,
    pub gemini: String,
    pub gemini_endpoint: String,
}

impl Credentials {
    /// The endpoint alone never warrants a validation round-trip.
    pub fn is_blank(&self) -> bool {
        self.pexels.is_empty() && self.pixabay.is_empty() && self.gemini.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct InputModel {
    pub script_file: Option<UploadFile>,
    pub voice_file: Option<UploadFile>,
    pub background_music_file: Option<UploadFile>,
    #[validate(custom(function = "unit_volume"))]
    pub background_music_volume: f32,
    pub genre: Genre,
    pub competitor_url: String,
    pub aspect_ratio: AspectRatio,
    pub voice_name: VoiceName,
    pub credentials: Credentials,
}

impl Default for InputModel {
    fn default() -> Self {
        Self {
            script_file: None,
            voice_file: None,
            background_music_file: None,
            background_music_volume: DEFAULT_BG_MUSIC_VOLUME,
            genre: Genre::default(),
            competitor_url: String::new(),
            aspect_ratio: AspectRatio::default(),
            voice_name: VoiceName::default(),
            credentials: Credentials::default(),
        }
    }
}

/// Rejects NaN as well as anything outside 0..=1.
fn unit_volume(volume: f32) -> Result<(), validator::ValidationError> {
    if (0.0..=1.0).contains(&volume) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("volume_out_of_range"))
    }
}

impl InputModel {
    /// The synthetic voice picker is hidden once a voiceover is uploaded.
    pub fn uses_synthetic_voice(&self) -> bool {
        self.voice_file.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form_initial_state() {
        let input = InputModel::default();
        assert_eq!(input.genre.as_str(), "Documentary");
        assert_eq!(input.aspect_ratio.as_str(), "16:9");
        assert_eq!(input.voice_name.as_str(), "Female (Default)");
        assert_eq!(input.background_music_volume, 0.1);
        assert!(input.credentials.is_blank());
        assert!(input.uses_synthetic_voice());
    }

    #[test]
    fn option_labels_parse_back() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>().unwrap(), genre);
        }
        for voice in VoiceName::ALL {
            assert_eq!(voice.as_str().parse::<VoiceName>().unwrap(), voice);
        }
        assert_eq!("9:16".parse::<AspectRatio>().unwrap(), AspectRatio::Vertical);
        assert!("4:3".parse::<AspectRatio>().is_err());
        assert!("Horror".parse::<Genre>().is_err());
    }

    #[test]
    fn endpoint_alone_is_blank() {
        let credentials = Credentials {
            gemini_endpoint: "https://proxy.example.com".into(),
            ..Credentials::default()
        };
        assert!(credentials.is_blank());

        let credentials = Credentials {
            pixabay: "px".into(),
            ..Credentials::default()
        };
        assert!(!credentials.is_blank());
    }

    #[test]
    fn volume_outside_unit_range_fails_validation() {
        let mut input = InputModel::default();
        assert!(input.validate().is_ok());

        input.background_music_volume = 1.5;
        assert!(input.validate().is_err());
    }
}
