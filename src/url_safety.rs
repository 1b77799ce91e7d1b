//! Gatekeeping for URLs that end up inside outgoing share links.

use url::Url;

/// Validates candidate share URLs, optionally resolving relative ones
/// against an application-supplied base.
#[derive(Debug, Clone, Default)]
pub struct UrlSanitizer {
    base: Option<Url>,
}

impl UrlSanitizer {
    pub fn new(base: Option<Url>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Returns the normalized absolute form of `candidate`, or `fallback` when
    /// the candidate is absent, unparseable or not `http`/`https`.
    pub fn sanitize(&self, candidate: Option<&str>, fallback: &str) -> String {
        let Some(candidate) = candidate.map(str::trim).filter(|c| !c.is_empty()) else {
            return fallback.to_string();
        };
        let parsed = Url::options().base_url(self.base.as_ref()).parse(candidate);
        match parsed {
            Ok(url) if is_web_scheme(&url) => url.into(),
            Ok(url) => {
                log::warn!("rejected share url with scheme {:?}", url.scheme());
                fallback.to_string()
            }
            Err(err) => {
                log::debug!("unparseable share url {candidate:?}: {err}");
                fallback.to_string()
            }
        }
    }
}

/// [`UrlSanitizer::sanitize`] without a base: relative candidates fall back.
pub fn sanitize(candidate: Option<&str>, fallback: &str) -> String {
    UrlSanitizer::default().sanitize(candidate, fallback)
}

fn is_web_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "https://example.com";

    #[test]
    fn absent_candidate_returns_fallback() {
        assert_eq!(sanitize(None, FALLBACK), FALLBACK);
        assert_eq!(sanitize(Some("   "), FALLBACK), FALLBACK);
    }

    #[test]
    fn script_and_data_schemes_are_rejected() {
        assert_eq!(sanitize(Some("javascript:alert(1)"), FALLBACK), FALLBACK);
        assert_eq!(sanitize(Some("data:text/html,<b>hi</b>"), FALLBACK), FALLBACK);
        assert_eq!(sanitize(Some("file:///etc/passwd"), FALLBACK), FALLBACK);
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let sanitizer = UrlSanitizer::new(Some(Url::parse("https://host.test").unwrap()));
        assert_eq!(
            sanitizer.sanitize(Some("/relative/path"), FALLBACK),
            "https://host.test/relative/path"
        );
    }

    #[test]
    fn relative_paths_without_base_fall_back() {
        assert_eq!(sanitize(Some("/relative/path"), FALLBACK), FALLBACK);
    }

    #[test]
    fn absolute_urls_are_normalized() {
        assert_eq!(
            sanitize(Some("HTTPS://Example.COM/a b"), FALLBACK),
            "https://example.com/a%20b"
        );
        assert_eq!(sanitize(Some("http://x.test"), FALLBACK), "http://x.test/");
    }
}
