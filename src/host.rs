//! The side-effecting boundary: everything the dispatch engine asks the
//! environment to do goes through a [`ShareHost`].

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::HostError;
use crate::models::{Capabilities, DownloadRequest, NativeShareRequest};

#[async_trait]
pub trait ShareHost: Send + Sync + 'static {
    fn capabilities(&self) -> Capabilities;

    /// Opens `url` in a new browsing context (or the app registered for its
    /// scheme). Never replaces the current page and never waits for it to load.
    fn open_url(&self, url: &str) -> Result<(), HostError>;

    async fn write_clipboard(&self, text: &str) -> Result<(), HostError>;

    /// Shows the OS share sheet. A dismissed sheet is `Err(HostError::Cancelled)`.
    async fn native_share(&self, request: &NativeShareRequest) -> Result<(), HostError>;

    /// Fetches and saves the resource, returning where it was written.
    async fn download(&self, request: &DownloadRequest) -> Result<PathBuf, HostError>;
}

#[async_trait]
impl<T: ShareHost + ?Sized> ShareHost for std::sync::Arc<T> {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn open_url(&self, url: &str) -> Result<(), HostError> {
        (**self).open_url(url)
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), HostError> {
        (**self).write_clipboard(text).await
    }

    async fn native_share(&self, request: &NativeShareRequest) -> Result<(), HostError> {
        (**self).native_share(request).await
    }

    async fn download(&self, request: &DownloadRequest) -> Result<PathBuf, HostError> {
        (**self).download(request).await
    }
}
