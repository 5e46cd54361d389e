use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use autovideo_client::common::notice::Notice;
use autovideo_client::common::upload::UploadFile;
use autovideo_client::config::env::{self, EnvKey};
use autovideo_client::config::settings::AppConfig;
use autovideo_client::modules::input::{AspectRatio, Genre, VoiceName};
use autovideo_client::{create_session, AppState, Session};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::new().context("Invalid configuration")?;
    let state = AppState::new(config).context("Failed to build http client")?;
    let (mut session, mut notices) = create_session(state);

    load_form(&mut session).await?;
    session.activate();

    let mut snapshots = session.subscribe_status();
    let mut credentials = session.subscribe_credentials();

    if session.input().script_file.is_some() {
        match session.render() {
            Ok(_) => info!("Rendering video..."),
            Err(e) => warn!("Render not started: {}", e),
        }
    } else {
        info!("No {} set, watching service status only", EnvKey::ScriptFile.as_str());
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Ok(()) = snapshots.changed() => {
                let snapshot = snapshots.borrow_and_update().clone();
                info!(
                    "{} | CPU {}% | GPU {}% | MEM {}%",
                    snapshot.device, snapshot.cpu_usage_pct, snapshot.gpu.load_pct, snapshot.memory_usage_pct
                );
            }
            Ok(()) = credentials.changed() => {
                let status = *credentials.borrow_and_update();
                info!("Gemini {} | Stock APIs {}", status.gemini_badge(), status.stock_badge());
            }
            Some(notice) = notices.recv() => {
                match &notice {
                    Notice::VideoReady { .. } => match session.download().await {
                        Ok(path) => info!("Download saved to {}", path.display()),
                        Err(e) => error!("Download failed: {}", e),
                    },
                    other if other.is_error() => error!("{}", other.message()),
                    _ => {}
                }
            }
        }
    }

    session.deactivate().await;
    Ok(())
}

async fn load_form(session: &mut Session) -> Result<()> {
    if let Some(path) = env::get_opt(EnvKey::ScriptFile) {
        let file = UploadFile::from_path(&path).await.with_context(|| format!("Failed to read {}", path))?;
        session.set_script_file(Some(file));
    }
    if let Some(path) = env::get_opt(EnvKey::VoiceoverFile) {
        let file = UploadFile::from_path(&path).await.with_context(|| format!("Failed to read {}", path))?;
        session.set_voice_file(Some(file));
    }
    if let Some(path) = env::get_opt(EnvKey::BackgroundMusicFile) {
        let file = UploadFile::from_path(&path).await.with_context(|| format!("Failed to read {}", path))?;
        session.set_background_music_file(Some(file));
    }

    if let Some(volume) = env::get_opt(EnvKey::BackgroundMusicVolume) {
        let volume: f32 = volume.trim().parse().context("Invalid background music volume")?;
        session.set_background_music_volume(volume)?;
    }
    if let Some(genre) = env::get_opt(EnvKey::Genre) {
        session.set_genre(genre.parse::<Genre>()?);
    }
    if let Some(ratio) = env::get_opt(EnvKey::AspectRatio) {
        session.set_aspect_ratio(ratio.parse::<AspectRatio>()?);
    }
    if let Some(voice) = env::get_opt(EnvKey::VoiceName) {
        session.set_voice_name(voice.parse::<VoiceName>()?);
    }

    session.set_competitor_url(env::get_or(EnvKey::CompetitorUrl, ""));
    session.set_pexels_key(env::get_or(EnvKey::PexelsKey, ""));
    session.set_pixabay_key(env::get_or(EnvKey::PixabayKey, ""));
    session.set_gemini_key(env::get_or(EnvKey::GeminiKey, ""));
    session.set_gemini_endpoint(env::get_or(EnvKey::GeminiEndpoint, ""));

    Ok(())
}
