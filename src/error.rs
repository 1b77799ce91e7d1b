use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

// Errors that can be returned to the caller (and, with the `tauri` feature,
// sent back to the frontend). Failures of the share actions themselves are
// never reported here: they end up in a `DispatchResult`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown share platform: {0}")]
    UnknownPlatform(String),
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("Failed to interact with native sharing API: {0}")]
    NativeApi(String),
    #[error("No share session with id {0}")]
    UnknownSession(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "tauri")]
    #[error("Tauri API error: {0}")]
    Tauri(#[from] tauri::Error),
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

/// Failure of a single host operation (clipboard, URL launch, share sheet, download).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("operation not available on this host")]
    Unavailable,
    #[error("cancelled by the user")]
    Cancelled,
    #[error("permission denied: {0}")]
    Denied(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("timed out after {0} ms")]
    TimedOut(u64),
}

impl From<std::io::Error> for HostError {
    fn from(err: std::io::Error) -> Self {
        HostError::Io(err.to_string())
    }
}
