//! A [`ShareHost`] that records what it was asked to do.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::HostError;
use crate::host::ShareHost;
use crate::models::{Capabilities, DownloadRequest, NativeShareRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Open(String),
    Clipboard(String),
    NativeShare(NativeShareRequest),
    Download(DownloadRequest),
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub native_share: bool,
    pub cancel_native_share: bool,
    pub fail_clipboard: bool,
    /// `open_url` fails for urls with one of these schemes.
    pub failing_schemes: Vec<&'static str>,
    pub download_delay: Option<Duration>,
    pub download_error: Option<HostError>,
    pub calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn with_native_share() -> Self {
        Self {
            native_share: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ShareHost for RecordingHost {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_native_share: self.native_share,
        }
    }

    fn open_url(&self, url: &str) -> Result<(), HostError> {
        self.record(HostCall::Open(url.to_string()));
        let scheme = url.split(':').next().unwrap_or_default();
        if self.failing_schemes.iter().any(|failing| *failing == scheme) {
            return Err(HostError::Unavailable);
        }
        Ok(())
    }

    async fn write_clipboard(&self, text: &str) -> Result<(), HostError> {
        self.record(HostCall::Clipboard(text.to_string()));
        if self.fail_clipboard {
            return Err(HostError::Denied("clipboard".into()));
        }
        Ok(())
    }

    async fn native_share(&self, request: &NativeShareRequest) -> Result<(), HostError> {
        self.record(HostCall::NativeShare(request.clone()));
        if self.cancel_native_share {
            return Err(HostError::Cancelled);
        }
        Ok(())
    }

    async fn download(&self, request: &DownloadRequest) -> Result<PathBuf, HostError> {
        self.record(HostCall::Download(request.clone()));
        if let Some(delay) = self.download_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.download_error {
            Some(err) => Err(err.clone()),
            None => Ok(PathBuf::from(&request.filename)),
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
