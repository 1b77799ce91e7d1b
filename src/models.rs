use serde::{Deserialize, Serialize};

/// What the caller wants to share. Read-only for the duration of one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub url: String,
    #[serde(default)]
    pub text: String,
    pub subject: Option<String>,
    pub download_url: Option<String>,
    pub download_filename: Option<String>,
}

impl SharePayload {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_download(mut self, url: impl Into<String>, filename: Option<String>) -> Self {
        self.download_url = Some(url.into());
        self.download_filename = filename;
        self
    }
}

/// What the host environment is able to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub supports_native_share: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Opened,
    Copied,
    Downloaded,
    Shared,
    /// A capability or required field is missing. Not an error: the caller
    /// should not offer the action at all.
    Unsupported,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl DispatchResult {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            error_detail: None,
        }
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Unsupported,
            error_detail: Some(reason.into()),
        }
    }

    pub fn failed(detail: impl ToString) -> Self {
        Self {
            outcome: Outcome::Failed,
            error_detail: Some(detail.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, Outcome::Unsupported | Outcome::Failed)
    }
}

/// Transient UI state of one share session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub copied: bool,
    pub downloading: bool,
    pub can_native_share: bool,
}

/// Content handed to the OS share sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeShareRequest {
    pub title: Option<String>,
    pub text: String,
    pub url: String,
}

impl NativeShareRequest {
    /// Text and URL joined the way share sheets expect a single text item.
    pub fn combined_text(&self) -> String {
        match (self.text.is_empty(), self.url.is_empty()) {
            (false, false) => format!("{}\n{}", self.text, self.url),
            (false, true) => self.text.clone(),
            (true, false) => self.url.clone(),
            (true, true) => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub url: String,
    pub filename: String,
}
