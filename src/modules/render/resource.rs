use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use mime::Mime;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use super::model::RenderedVideo;
use crate::common::error::ResourceError;

pub const DOWNLOAD_NAME: &str = "autovideo.mp4";
const BLOB_SCHEME: &str = "blob:autovideo/";

fn default_video_mime() -> Mime {
    "video/mp4".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

/// Session-local registry of addressable video blobs. A URI resolves for as
/// long as its [`VideoHandle`] is alive.
#[derive(Clone, Default)]
pub struct ResourceStore {
    entries: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl ResourceStore {
    pub fn create(&self, data: Bytes, content_type: Mime) -> VideoHandle {
        let uri = format!("{}{}", BLOB_SCHEME, Uuid::new_v4());
        let size = data.len();
        self.entries.lock().insert(uri.clone(), data);

        debug!("Created {} ({} bytes)", uri, size);
        VideoHandle {
            uri,
            size,
            content_type,
            store: self.clone(),
        }
    }

    pub fn resolve(&self, uri: &str) -> Option<Bytes> {
        self.entries.lock().get(uri).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.entries.lock().len()
    }

    fn revoke(&self, uri: &str) {
        if self.entries.lock().remove(uri).is_some() {
            debug!("Revoked {}", uri);
        }
    }
}

/// Owning reference to one blob; dropping it revokes the URI.
pub struct VideoHandle {
    uri: String,
    size: usize,
    content_type: Mime,
    store: ResourceStore,
}

impl VideoHandle {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn info(&self) -> VideoInfo {
        VideoInfo {
            uri: self.uri.clone(),
            size: self.size,
            content_type: self.content_type.clone(),
        }
    }
}

impl Drop for VideoHandle {
    fn drop(&mut self) {
        self.store.revoke(&self.uri);
    }
}

/// What the player and download link need to render the current result.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub uri: String,
    pub size: usize,
    pub content_type: Mime,
}

impl VideoInfo {
    pub fn download_name(&self) -> &'static str {
        DOWNLOAD_NAME
    }
}

/// Holds exactly one current video. Publishing a new one releases the
/// previous handle; [`ResultManager::release`] clears it on teardown.
#[derive(Clone)]
pub struct ResultManager {
    inner: Arc<ResultInner>,
}

struct ResultInner {
    store: ResourceStore,
    current: Mutex<Option<VideoHandle>>,
    published: watch::Sender<Option<VideoInfo>>,
}

impl ResultManager {
    pub fn new(store: ResourceStore) -> Self {
        let (published, _) = watch::channel(None);
        Self {
            inner: Arc::new(ResultInner {
                store,
                current: Mutex::new(None),
                published,
            }),
        }
    }

    pub fn current(&self) -> Option<VideoInfo> {
        self.inner.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<VideoInfo>> {
        self.inner.published.subscribe()
    }

    /// Makes `video` the current result. Returns `None` without creating a
    /// resource once `cancel` has fired; the check and the swap happen under
    /// the same lock as [`ResultManager::release`].
    pub fn publish(&self, video: RenderedVideo, cancel: &CancellationToken) -> Option<VideoInfo> {
        let content_type = video
            .content_type
            .filter(|mime| mime.type_() == mime::VIDEO)
            .unwrap_or_else(default_video_mime);

        let mut current = self.inner.current.lock();
        if cancel.is_cancelled() {
            debug!("Rendered video arrived after teardown, dropped");
            return None;
        }

        let handle = self.inner.store.create(video.data, content_type);
        let info = handle.info();
        let previous = current.replace(handle);
        self.inner.published.send_replace(Some(info.clone()));
        drop(previous);
        drop(current);

        info!("🎬 Video ready at {}", info.uri);
        Some(info)
    }

    /// Bytes behind the current video, for playback.
    pub fn current_bytes(&self) -> Option<Bytes> {
        let current = self.inner.current.lock();
        current.as_ref().and_then(|handle| self.inner.store.resolve(handle.uri()))
    }

    /// Writes the current video to `dir` under its download name.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf, ResourceError> {
        let data = self.current_bytes().ok_or(ResourceError::NoVideo)?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(DOWNLOAD_NAME);
        tokio::fs::write(&path, &data).await?;

        info!("Saved {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }

    pub fn release(&self) {
        let mut current = self.inner.current.lock();
        if let Some(previous) = current.take() {
            drop(previous);
            self.inner.published.send_replace(None);
        }
    }
}
