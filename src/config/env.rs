use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServiceUrl,
    PollIntervalMs,
    DebounceMs,
    RequestTimeoutSecs,
    DownloadDir,
    ScriptFile,
    VoiceoverFile,
    BackgroundMusicFile,
    BackgroundMusicVolume,
    Genre,
    AspectRatio,
    VoiceName,
    CompetitorUrl,
    PexelsKey,
    PixabayKey,
    GeminiKey,
    GeminiEndpoint,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServiceUrl => "AUTOVIDEO_SERVICE_URL",
            EnvKey::PollIntervalMs => "AUTOVIDEO_POLL_INTERVAL_MS",
            EnvKey::DebounceMs => "AUTOVIDEO_DEBOUNCE_MS",
            EnvKey::RequestTimeoutSecs => "AUTOVIDEO_REQUEST_TIMEOUT_SECS",
            EnvKey::DownloadDir => "AUTOVIDEO_DOWNLOAD_DIR",
            EnvKey::ScriptFile => "AUTOVIDEO_SCRIPT",
            EnvKey::VoiceoverFile => "AUTOVIDEO_VOICEOVER",
            EnvKey::BackgroundMusicFile => "AUTOVIDEO_BACKGROUND_MUSIC",
            EnvKey::BackgroundMusicVolume => "AUTOVIDEO_BG_MUSIC_VOLUME",
            EnvKey::Genre => "AUTOVIDEO_GENRE",
            EnvKey::AspectRatio => "AUTOVIDEO_ASPECT_RATIO",
            EnvKey::VoiceName => "AUTOVIDEO_VOICE_NAME",
            EnvKey::CompetitorUrl => "AUTOVIDEO_COMPETITOR_URL",
            EnvKey::PexelsKey => "PEXELS_API_KEY",
            EnvKey::PixabayKey => "PIXABAY_API_KEY",
            EnvKey::GeminiKey => "GEMINI_API_KEY",
            EnvKey::GeminiEndpoint => "GEMINI_API_ENDPOINT",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    get(key).ok().filter(|value| !value.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
