//! A [`ShareHost`] backed by the desktop: the system clipboard, the default
//! URL handler and an HTTP client for downloads. It has no share sheet of its
//! own; the Tauri binding layers one on top where the OS provides it.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ShareConfig;
use crate::download::save_bytes;
use crate::error::HostError;
use crate::host::ShareHost;
use crate::models::{Capabilities, DownloadRequest, NativeShareRequest};

#[derive(Debug, Clone)]
pub struct SystemHost {
    client: reqwest::Client,
    download_dir: PathBuf,
}

impl SystemHost {
    pub fn new(config: &ShareConfig) -> Self {
        let download_dir = config
            .download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(std::env::temp_dir);
        Self {
            client: reqwest::Client::new(),
            download_dir,
        }
    }

    pub fn download_dir(&self) -> &PathBuf {
        &self.download_dir
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new(&ShareConfig::default())
    }
}

/// Web URLs go to the browser without waiting. Anything else waits for the
/// launcher's exit status, so an app scheme with no registered handler
/// reports an error and the caller can fall back.
fn waits_for_launcher(url: &str) -> bool {
    let scheme = url.split(':').next().unwrap_or_default();
    !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https")
}

/// Flags the save as abandoned when the download future is dropped, e.g. by
/// the dispatch timeout.
struct AbandonOnDrop(Arc<AtomicBool>);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        HostError::Network(err.to_string())
    }
}

#[async_trait]
impl ShareHost for SystemHost {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_native_share: false,
        }
    }

    fn open_url(&self, url: &str) -> Result<(), HostError> {
        let launched = if waits_for_launcher(url) {
            open::that(url)
        } else {
            open::that_detached(url)
        };
        launched.map_err(|err| {
            log::debug!("no handler for {url}: {err}");
            HostError::Unavailable
        })
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), HostError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard =
                arboard::Clipboard::new().map_err(|e| HostError::Denied(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| HostError::Denied(e.to_string()))
        })
        .await
        .map_err(|e| HostError::Io(e.to_string()))?
    }

    async fn native_share(&self, _request: &NativeShareRequest) -> Result<(), HostError> {
        Err(HostError::Unavailable)
    }

    async fn download(&self, request: &DownloadRequest) -> Result<PathBuf, HostError> {
        let response = self
            .client
            .get(&request.url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        let dir = self.download_dir.clone();
        let filename = request.filename.clone();
        let abandoned = AbandonOnDrop(Arc::new(AtomicBool::new(false)));
        let flag = abandoned.0.clone();
        tokio::task::spawn_blocking(move || save_bytes(&dir, &filename, &bytes, &flag))
            .await
            .map_err(|e| HostError::Io(e.to_string()))?
            .map_err(HostError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_download_dir_wins() {
        let dir = tempfile::tempdir().unwrap();
        let host = SystemHost::new(&ShareConfig {
            download_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        });
        assert_eq!(host.download_dir(), dir.path());
        assert!(!host.capabilities().supports_native_share);
    }

    #[test]
    fn only_non_web_urls_wait_for_the_launcher() {
        assert!(!waits_for_launcher("https://www.instagram.com/"));
        assert!(!waits_for_launcher("HTTP://a.test/"));
        assert!(waits_for_launcher("instagram://app"));
        assert!(waits_for_launcher("barcelona://"));
        assert!(waits_for_launcher("mailto:?subject=Share"));
    }

    #[test]
    fn dropping_the_download_abandons_the_save() {
        let guard = AbandonOnDrop(Arc::new(AtomicBool::new(false)));
        let flag = guard.0.clone();
        assert!(!flag.load(Ordering::SeqCst));
        drop(guard);
        assert!(flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn native_share_is_unavailable() {
        let request = NativeShareRequest {
            title: None,
            text: String::new(),
            url: "https://a.test/".into(),
        };
        assert_eq!(
            SystemHost::default().native_share(&request).await,
            Err(HostError::Unavailable)
        );
    }
}
