//! Picks a preview affordance for shared content. Has no effect on dispatch.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico", "avif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "avi", "mkv", "m4v", "ogv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "aac", "flac", "wma"];
const GENERATED_IMAGE_MARKERS: &[&str] = &["/api/og", "og-image"];
const VIDEO_HOSTS: &[&str] = &["youtube.com", "vimeo.com"];

// Relative inputs are classified as if served from here.
const RESOLUTION_BASE: &str = "http://localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Image,
    Video,
    Audio,
    File,
    Link,
}

/// A requested preview type; `Auto` asks for inference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewType {
    #[default]
    Auto,
    Image,
    Video,
    Audio,
    File,
    Link,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewConfig {
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: Option<PreviewType>,
    pub filename: Option<String>,
    pub alt: Option<String>,
    pub poster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDescriptor {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: PreviewKind,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

impl PreviewDescriptor {
    pub fn from_url(url: &str) -> Self {
        Self::from_config(PreviewConfig {
            url: url.to_string(),
            ..Default::default()
        })
    }

    pub fn from_config(config: PreviewConfig) -> Self {
        let kind = match config.kind.unwrap_or_default() {
            PreviewType::Auto => classify(&config.url),
            PreviewType::Image => PreviewKind::Image,
            PreviewType::Video => PreviewKind::Video,
            PreviewType::Audio => PreviewKind::Audio,
            PreviewType::File => PreviewKind::File,
            PreviewType::Link => PreviewKind::Link,
        };
        let filename = config
            .filename
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| filename_from_url(&config.url));
        Self {
            url: config.url,
            kind,
            filename,
            alt: config.alt,
            poster: config.poster,
        }
    }
}

fn resolve(url: &str) -> Option<Url> {
    let base = Url::parse(RESOLUTION_BASE).ok()?;
    Url::options().base_url(Some(&base)).parse(url).ok()
}

fn extension(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    let (_, ext) = last.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

fn is_video_host(url: &Url) -> bool {
    url.host_str().is_some_and(|host| {
        VIDEO_HOSTS
            .iter()
            .any(|known| host == *known || host.ends_with(&format!(".{known}")))
    })
}

pub fn classify(url: &str) -> PreviewKind {
    let Some(parsed) = resolve(url) else {
        return PreviewKind::Link;
    };
    if let Some(ext) = extension(&parsed) {
        let ext = ext.as_str();
        if IMAGE_EXTENSIONS.contains(&ext) {
            return PreviewKind::Image;
        }
        if VIDEO_EXTENSIONS.contains(&ext) {
            return PreviewKind::Video;
        }
        if AUDIO_EXTENSIONS.contains(&ext) {
            return PreviewKind::Audio;
        }
    }
    if GENERATED_IMAGE_MARKERS.iter().any(|marker| url.contains(marker)) {
        return PreviewKind::Image;
    }
    if is_video_host(&parsed) {
        return PreviewKind::Video;
    }
    PreviewKind::Link
}

/// Percent-decoded last path segment, or the input itself when unparseable.
pub fn filename_from_url(url: &str) -> String {
    let Some(parsed) = resolve(url) else {
        return url.to_string();
    };
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .unwrap_or_default()
}
