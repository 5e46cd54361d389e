use validator::Validate;

use crate::common::error::ValidationError;
use crate::common::upload::UploadFile;
use crate::modules::input::InputModel;

/// Multipart field names expected by `/generate-video`.
pub mod field {
    pub const SCRIPT: &str = "script";
    pub const VOICEOVER: &str = "voiceover";
    pub const COMPETITOR_URL: &str = "competitor_url";
    pub const BASE_GENRE: &str = "base_genre";
    pub const API_KEY_PEXELS: &str = "api_key_pexels";
    pub const API_KEY_PIXABAY: &str = "api_key_pixabay";
    pub const API_KEY_GEMINI: &str = "api_key_gemini";
    pub const API_ENDPOINT_GEMINI: &str = "api_endpoint_gemini";
    pub const ASPECT_RATIO: &str = "aspect_ratio";
    pub const VOICE_NAME: &str = "voice_name";
    pub const BACKGROUND_MUSIC: &str = "background_music";
    pub const BG_MUSIC_VOLUME: &str = "bg_music_volume";
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File(UploadFile),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub value: FieldValue,
}

/// Canonical field set for one render. Each name appears at most once and
/// the order never depends on anything but the input.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSubmission {
    fields: Vec<FormField>,
}

impl RenderSubmission {
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<FormField> {
        self.fields
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Text(value) => Some(value),
            FieldValue::File(_) => None,
        }
    }

    pub fn file(&self, name: &str) -> Option<&UploadFile> {
        match self.get(name)? {
            FieldValue::File(file) => Some(file),
            FieldValue::Text(_) => None,
        }
    }
}

struct FieldSet(Vec<FormField>);

impl FieldSet {
    fn text(&mut self, name: &'static str, value: impl Into<String>) {
        self.0.push(FormField {
            name,
            value: FieldValue::Text(value.into()),
        });
    }

    fn file(&mut self, name: &'static str, file: &UploadFile) {
        self.0.push(FormField {
            name,
            value: FieldValue::File(file.clone()),
        });
    }
}

pub fn build(input: &InputModel) -> Result<RenderSubmission, ValidationError> {
    let script = input
        .script_file
        .as_ref()
        .ok_or(ValidationError::MissingScript)?;
    input.validate()?;

    let credentials = &input.credentials;
    let mut set = FieldSet(Vec::with_capacity(12));

    set.file(field::SCRIPT, script);
    if let Some(voice) = &input.voice_file {
        set.file(field::VOICEOVER, voice);
    }
    set.text(field::COMPETITOR_URL, input.competitor_url.as_str());
    set.text(field::BASE_GENRE, input.genre.as_str());
    set.text(field::API_KEY_PEXELS, credentials.pexels.as_str());
    set.text(field::API_KEY_PIXABAY, credentials.pixabay.as_str());
    set.text(field::API_KEY_GEMINI, credentials.gemini.as_str());
    set.text(field::API_ENDPOINT_GEMINI, credentials.gemini_endpoint.as_str());
    set.text(field::ASPECT_RATIO, input.aspect_ratio.as_str());
    set.text(field::VOICE_NAME, input.voice_name.as_str());
    if let Some(music) = &input.background_music_file {
        set.file(field::BACKGROUND_MUSIC, music);
        set.text(field::BG_MUSIC_VOLUME, input.background_music_volume.to_string());
    }

    Ok(RenderSubmission { fields: set.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::input::{AspectRatio, Credentials, Genre, VoiceName};

    fn script() -> UploadFile {
        UploadFile::guessed("script.txt", "Scene one.")
    }

    fn music() -> UploadFile {
        UploadFile::guessed("nasheed.mp3", vec![7u8; 16])
    }

    #[test]
    fn vlog_vertical_scenario_emits_exact_fields() {
        let input = InputModel {
            script_file: Some(script()),
            genre: Genre::Vlog,
            aspect_ratio: AspectRatio::Vertical,
            voice_name: VoiceName::FemaleDefault,
            ..InputModel::default()
        };

        let submission = build(&input).unwrap();
        assert_eq!(
            submission.names(),
            vec![
                "script",
                "competitor_url",
                "base_genre",
                "api_key_pexels",
                "api_key_pixabay",
                "api_key_gemini",
                "api_endpoint_gemini",
                "aspect_ratio",
                "voice_name",
            ]
        );
        assert_eq!(submission.file("script").unwrap().file_name, "script.txt");
        assert_eq!(submission.text("competitor_url"), Some(""));
        assert_eq!(submission.text("base_genre"), Some("Vlog"));
        assert_eq!(submission.text("api_key_pexels"), Some(""));
        assert_eq!(submission.text("api_key_pixabay"), Some(""));
        assert_eq!(submission.text("api_key_gemini"), Some(""));
        assert_eq!(submission.text("api_endpoint_gemini"), Some(""));
        assert_eq!(submission.text("aspect_ratio"), Some("9:16"));
        assert_eq!(submission.text("voice_name"), Some("Female (Default)"));
        assert!(!submission.contains("voiceover"));
        assert!(!submission.contains("background_music"));
        assert!(!submission.contains("bg_music_volume"));
    }

    #[test]
    fn missing_script_is_rejected_for_any_combination() {
        let with_everything_else = InputModel {
            voice_file: Some(UploadFile::guessed("voice.mp3", vec![1u8])),
            background_music_file: Some(music()),
            competitor_url: "https://youtube.com/watch?v=x".into(),
            credentials: Credentials {
                pexels: "a".into(),
                pixabay: "b".into(),
                gemini: "c".into(),
                gemini_endpoint: "d".into(),
            },
            ..InputModel::default()
        };

        for input in [InputModel::default(), with_everything_else] {
            assert_eq!(build(&input), Err(ValidationError::MissingScript));
        }
    }

    #[test]
    fn volume_travels_only_with_background_music() {
        let mut input = InputModel {
            script_file: Some(script()),
            background_music_volume: 0.35,
            ..InputModel::default()
        };

        for music_file in [None, Some(music())] {
            input.background_music_file = music_file;
            let submission = build(&input).unwrap();
            assert_eq!(
                submission.contains(field::BG_MUSIC_VOLUME),
                submission.contains(field::BACKGROUND_MUSIC)
            );
        }

        let submission = build(&input).unwrap();
        assert_eq!(submission.text(field::BG_MUSIC_VOLUME), Some("0.35"));
        assert_eq!(
            submission.file(field::BACKGROUND_MUSIC).unwrap().file_name,
            "nasheed.mp3"
        );
    }

    #[test]
    fn uploaded_voiceover_is_sent_alongside_preset_label() {
        let input = InputModel {
            script_file: Some(script()),
            voice_file: Some(UploadFile::guessed("voice.mp3", vec![1u8, 2, 3])),
            ..InputModel::default()
        };

        let submission = build(&input).unwrap();
        assert_eq!(submission.names()[1], field::VOICEOVER);
        assert_eq!(submission.text(field::VOICE_NAME), Some("Female (Default)"));
    }

    #[test]
    fn every_field_name_is_unique() {
        let input = InputModel {
            script_file: Some(script()),
            voice_file: Some(UploadFile::guessed("voice.mp3", vec![1u8])),
            background_music_file: Some(music()),
            ..InputModel::default()
        };

        let mut names = build(&input).unwrap().names();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 12);
    }

    #[test]
    fn same_input_builds_same_submission() {
        let input = InputModel {
            script_file: Some(script()),
            background_music_file: Some(music()),
            ..InputModel::default()
        };
        assert_eq!(build(&input).unwrap(), build(&input).unwrap());
    }

    #[test]
    fn out_of_range_volume_is_rejected() {
        for volume in [-0.2, 1.01, f32::NAN, f32::INFINITY] {
            let input = InputModel {
                script_file: Some(script()),
                background_music_file: Some(music()),
                background_music_volume: volume,
                ..InputModel::default()
            };
            assert!(
                matches!(build(&input), Err(ValidationError::InvalidInput(_))),
                "volume {volume} accepted"
            );
        }
    }
}
