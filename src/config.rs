use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::url_safety::UrlSanitizer;

const DEFAULT_COPY_RESET_MS: u64 = 2000;
const DEFAULT_DOWNLOAD_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_SUBJECT: &str = "Share";

/// Runtime configuration. With the `tauri` feature this is read from the
/// `plugins.share-menu` block of the app configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareConfig {
    /// Resolves relative share URLs, and stands in for an absent or unsafe one.
    pub base_url: Option<Url>,
    pub copy_reset_ms: u64,
    /// A download still running at the deadline is reported as failed and its
    /// file is discarded.
    pub download_timeout_ms: u64,
    pub download_dir: Option<PathBuf>,
    pub default_subject: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            copy_reset_ms: DEFAULT_COPY_RESET_MS,
            download_timeout_ms: DEFAULT_DOWNLOAD_TIMEOUT_MS,
            download_dir: None,
            default_subject: DEFAULT_SUBJECT.to_string(),
        }
    }
}

impl ShareConfig {
    pub fn copy_reset_delay(&self) -> Duration {
        Duration::from_millis(self.copy_reset_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_millis(self.download_timeout_ms)
    }

    pub fn sanitizer(&self) -> UrlSanitizer {
        UrlSanitizer::new(self.base_url.clone())
    }

    pub fn fallback_url(&self) -> String {
        self.base_url.as_ref().map(Url::to_string).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: ShareConfig = serde_json::from_str(r#"{"copyResetMs":500}"#).unwrap();
        assert_eq!(config.copy_reset_delay(), Duration::from_millis(500));
        assert_eq!(config.download_timeout(), Duration::from_secs(30));
        assert_eq!(config.default_subject, "Share");
        assert_eq!(config.fallback_url(), "");
    }

    #[test]
    fn base_url_is_the_fallback() {
        let config: ShareConfig =
            serde_json::from_str(r#"{"baseUrl":"https://app.test/page"}"#).unwrap();
        assert_eq!(config.fallback_url(), "https://app.test/page");
        assert_eq!(
            config.sanitizer().sanitize(Some("other"), &config.fallback_url()),
            "https://app.test/other"
        );
    }
}
