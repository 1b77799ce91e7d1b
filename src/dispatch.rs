//! Turns a (platform, payload) pair into a concrete share action.
//!
//! Planning is pure: [`Dispatcher::plan`] only builds a [`DestinationAction`].
//! [`Dispatcher::execute`] runs that action against a [`ShareHost`] and folds
//! every failure into a [`DispatchResult`], so nothing escapes as an `Err`.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::ShareConfig;
use crate::download::{default_filename, safe_filename};
use crate::error::HostError;
use crate::host::ShareHost;
use crate::models::{
    Capabilities, DispatchResult, DownloadRequest, NativeShareRequest, Outcome, SharePayload,
};
use crate::registry::PlatformId;
use crate::url_safety::UrlSanitizer;

/// Characters left alone by `encodeURIComponent`. Share-intent endpoints are
/// matched byte for byte, so the encoding has to agree with browsers.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    OpenUrl(String),
    CopyToClipboard(String),
    NativeShare(NativeShareRequest),
    Download(DownloadRequest),
    /// Copy `text`, then try the app scheme and fall back to the web homepage.
    CopyThenOpenApp {
        text: String,
        app_url: &'static str,
        web_url: &'static str,
    },
    Unsupported(&'static str),
}

fn app_urls(id: PlatformId) -> Option<(&'static str, &'static str)> {
    match id {
        PlatformId::Instagram => Some(("instagram://app", "https://www.instagram.com/")),
        PlatformId::Tiktok => Some(("tiktok://", "https://www.tiktok.com/")),
        PlatformId::Threads => Some(("barcelona://", "https://www.threads.net/")),
        PlatformId::Snapchat => Some(("snapchat://", "https://www.snapchat.com/")),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    sanitizer: UrlSanitizer,
    fallback_url: String,
    default_subject: String,
    download_timeout: Duration,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(&ShareConfig::default())
    }
}

impl Dispatcher {
    pub fn new(config: &ShareConfig) -> Self {
        Self {
            sanitizer: config.sanitizer(),
            fallback_url: config.fallback_url(),
            default_subject: config.default_subject.clone(),
            download_timeout: config.download_timeout(),
        }
    }

    /// The share URL as it will be embedded into destination links.
    pub fn safe_url(&self, payload: &SharePayload) -> String {
        self.sanitizer.sanitize(Some(&payload.url), &self.fallback_url)
    }

    /// The download URL, if the payload has one that is safe to fetch.
    pub fn safe_download_url(&self, payload: &SharePayload) -> Option<String> {
        let url = self.sanitizer.sanitize(payload.download_url.as_deref(), "");
        (!url.is_empty()).then_some(url)
    }

    fn subject<'a>(&'a self, payload: &'a SharePayload) -> &'a str {
        payload.subject.as_deref().unwrap_or(&self.default_subject)
    }

    pub fn plan(
        &self,
        id: PlatformId,
        payload: &SharePayload,
        capabilities: Capabilities,
    ) -> DestinationAction {
        let url = self.safe_url(payload);
        let text = payload.text.as_str();

        if id == PlatformId::Native && !capabilities.supports_native_share {
            return DestinationAction::Unsupported("native share is not available");
        }
        // Without a base URL an unsafe share URL sanitizes to nothing.
        if url.is_empty() && id != PlatformId::Download {
            return DestinationAction::Unsupported("no safe share url");
        }

        match id {
            PlatformId::Native => {
                DestinationAction::NativeShare(NativeShareRequest {
                    title: Some(self.subject(payload).to_string()),
                    text: text.to_string(),
                    url,
                })
            }
            PlatformId::Copy => DestinationAction::CopyToClipboard(url),
            PlatformId::Download => match self.safe_download_url(payload) {
                None => DestinationAction::Unsupported("no download url"),
                Some(download_url) => {
                    let filename = payload
                        .download_filename
                        .as_deref()
                        .and_then(safe_filename)
                        .unwrap_or_else(|| default_filename(&download_url));
                    DestinationAction::Download(DownloadRequest {
                        url: download_url,
                        filename,
                    })
                }
            },
            PlatformId::Whatsapp => DestinationAction::OpenUrl(format!(
                "https://wa.me/?text={}",
                encode(&format!("{text} {url}"))
            )),
            PlatformId::Telegram => DestinationAction::OpenUrl(format!(
                "https://t.me/share/url?url={}&text={}",
                encode(&url),
                encode(text)
            )),
            PlatformId::Facebook => DestinationAction::OpenUrl(format!(
                "https://www.facebook.com/sharer/sharer.php?u={}",
                encode(&url)
            )),
            PlatformId::Linkedin => DestinationAction::OpenUrl(format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={}",
                encode(&url)
            )),
            PlatformId::Reddit => DestinationAction::OpenUrl(format!(
                "https://www.reddit.com/submit?url={}&title={}",
                encode(&url),
                encode(text)
            )),
            PlatformId::X => DestinationAction::OpenUrl(format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                encode(text),
                encode(&url)
            )),
            PlatformId::Sms => {
                DestinationAction::OpenUrl(format!("sms:?body={}", encode(&format!("{text} {url}"))))
            }
            PlatformId::Email => DestinationAction::OpenUrl(format!(
                "mailto:?subject={}&body={}",
                encode(self.subject(payload)),
                encode(&format!("{text}\n\n{url}"))
            )),
            PlatformId::Instagram | PlatformId::Tiktok | PlatformId::Threads | PlatformId::Snapchat => {
                match app_urls(id) {
                    Some((app_url, web_url)) => DestinationAction::CopyThenOpenApp {
                        text: url,
                        app_url,
                        web_url,
                    },
                    None => DestinationAction::Unsupported("no app url for platform"),
                }
            }
        }
    }

    pub async fn execute<H: ShareHost + ?Sized>(
        &self,
        host: &H,
        action: DestinationAction,
    ) -> DispatchResult {
        match action {
            DestinationAction::Unsupported(reason) => DispatchResult::unsupported(reason),
            DestinationAction::OpenUrl(url) => match host.open_url(&url) {
                Ok(()) => DispatchResult::new(Outcome::Opened),
                Err(err) => {
                    log::warn!("failed to open share url: {err}");
                    DispatchResult::failed(err)
                }
            },
            DestinationAction::CopyToClipboard(text) => match host.write_clipboard(&text).await {
                Ok(()) => DispatchResult::new(Outcome::Copied),
                Err(err) => {
                    log::warn!("clipboard write failed: {err}");
                    DispatchResult::failed(err)
                }
            },
            DestinationAction::NativeShare(request) => match host.native_share(&request).await {
                Ok(()) => DispatchResult::new(Outcome::Shared),
                Err(HostError::Cancelled) => {
                    log::debug!("native share dismissed");
                    DispatchResult::failed(HostError::Cancelled)
                }
                Err(err) => {
                    log::warn!("native share failed: {err}");
                    DispatchResult::failed(err)
                }
            },
            DestinationAction::Download(request) => {
                let timeout_ms = self.download_timeout.as_millis() as u64;
                match tokio::time::timeout(self.download_timeout, host.download(&request)).await {
                    Ok(Ok(path)) => {
                        log::debug!("downloaded {} to {}", request.url, path.display());
                        DispatchResult::new(Outcome::Downloaded)
                    }
                    Ok(Err(err)) => {
                        log::warn!("download of {} failed: {err}", request.url);
                        DispatchResult::failed(err)
                    }
                    Err(_) => {
                        log::warn!("download of {} timed out", request.url);
                        DispatchResult::failed(HostError::TimedOut(timeout_ms))
                    }
                }
            }
            DestinationAction::CopyThenOpenApp {
                text,
                app_url,
                web_url,
            } => {
                let copied = match host.write_clipboard(&text).await {
                    Ok(()) => true,
                    Err(err) => {
                        log::warn!("clipboard write before opening {app_url} failed: {err}");
                        false
                    }
                };
                // Whether the app actually came up cannot be observed; a launch
                // that did not error counts as opened.
                let opened = host.open_url(app_url).or_else(|err| {
                    log::debug!("{app_url} unavailable ({err}), opening {web_url}");
                    host.open_url(web_url)
                });
                match (opened, copied) {
                    (Ok(()), _) => DispatchResult::new(Outcome::Opened),
                    (Err(_), true) => DispatchResult::new(Outcome::Copied),
                    (Err(err), false) => DispatchResult::failed(err),
                }
            }
        }
    }

    pub async fn dispatch<H: ShareHost + ?Sized>(
        &self,
        host: &H,
        id: PlatformId,
        payload: &SharePayload,
        capabilities: Capabilities,
    ) -> DispatchResult {
        let action = self.plan(id, payload, capabilities);
        log::debug!("dispatching {id}: {action:?}");
        self.execute(host, action).await
    }
}
