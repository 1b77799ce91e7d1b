//! The static table of share destinations.
//!
//! Every [`PlatformId`] has exactly one [`PlatformDescriptor`], held in a
//! constant table that is never mutated. Lookups are infallible for typed ids;
//! ids arriving as strings go through [`parse_platform`].

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{Error, Result};

/// Identifier of a share destination.
///
/// Declaration order is the default rendering order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlatformId {
    Native,
    Copy,
    Download,
    Whatsapp,
    Telegram,
    Instagram,
    Facebook,
    Snapchat,
    Sms,
    Email,
    Linkedin,
    Reddit,
    X,
    Tiktok,
    Threads,
}

impl PlatformId {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Platforms that only exist as apps, without a web share-intent URL.
    pub fn is_app_only(self) -> bool {
        matches!(
            self,
            PlatformId::Instagram | PlatformId::Tiktok | PlatformId::Threads | PlatformId::Snapchat
        )
    }
}

/// Background and foreground colors of a platform button, as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformColors {
    pub background: &'static str,
    pub foreground: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDescriptor {
    pub id: PlatformId,
    pub label: &'static str,
    pub colors: PlatformColors,
    /// Name of the icon the rendering layer should draw.
    pub icon: &'static str,
    /// Theme variable that overrides the background color.
    pub theme_variable: &'static str,
}

const fn descriptor(
    id: PlatformId,
    label: &'static str,
    background: &'static str,
    foreground: &'static str,
    icon: &'static str,
    theme_variable: &'static str,
) -> PlatformDescriptor {
    PlatformDescriptor {
        id,
        label,
        colors: PlatformColors {
            background,
            foreground,
        },
        icon,
        theme_variable,
    }
}

// Indexed by `PlatformId as usize`.
static PLATFORMS: [PlatformDescriptor; PlatformId::COUNT] = [
    descriptor(PlatformId::Native, "Share…", "#7c3aed", "#ffffff", "send", "--share-menu-native-share-bg"),
    descriptor(PlatformId::Copy, "Copy", "#3b82f6", "#ffffff", "link", "--share-menu-copy-bg"),
    descriptor(PlatformId::Download, "Download", "#ef4444", "#ffffff", "download", "--share-menu-download-bg"),
    descriptor(PlatformId::Whatsapp, "WhatsApp", "#25D366", "#ffffff", "whatsapp", "--share-menu-whatsapp-bg"),
    descriptor(PlatformId::Telegram, "Telegram", "#229ED9", "#ffffff", "telegram", "--share-menu-telegram-bg"),
    descriptor(PlatformId::Instagram, "Instagram", "#E1306C", "#ffffff", "instagram", "--share-menu-instagram-bg"),
    descriptor(PlatformId::Facebook, "Facebook", "#1877F2", "#ffffff", "facebook", "--share-menu-facebook-bg"),
    descriptor(PlatformId::Snapchat, "Snapchat", "#FFFC00", "#000000", "snapchat", "--share-menu-snapchat-bg"),
    descriptor(PlatformId::Sms, "SMS", "#22c55e", "#ffffff", "message-circle", "--share-menu-sms-bg"),
    descriptor(PlatformId::Email, "Email", "#f97316", "#ffffff", "mail", "--share-menu-email-bg"),
    descriptor(PlatformId::Linkedin, "LinkedIn", "#0A66C2", "#ffffff", "linkedin", "--share-menu-linkedin-bg"),
    descriptor(PlatformId::Reddit, "Reddit", "#FF4500", "#ffffff", "reddit", "--share-menu-reddit-bg"),
    descriptor(PlatformId::X, "X", "#000000", "#ffffff", "x-twitter", "--share-menu-x-bg"),
    descriptor(PlatformId::Tiktok, "TikTok", "#000000", "#ffffff", "tiktok", "--share-menu-tiktok-bg"),
    descriptor(PlatformId::Threads, "Threads", "#000000", "#ffffff", "threads", "--share-menu-threads-bg"),
];

pub fn get_platform(id: PlatformId) -> &'static PlatformDescriptor {
    &PLATFORMS[id as usize]
}

/// Looks up a platform by its string id, e.g. `"whatsapp"`.
pub fn parse_platform(name: &str) -> Result<PlatformId> {
    PlatformId::from_str(name).map_err(|_| Error::UnknownPlatform(name.to_string()))
}

/// All platforms in default rendering order.
pub fn list_platforms() -> impl Iterator<Item = &'static PlatformDescriptor> {
    PlatformId::iter().map(get_platform)
}

pub fn platform_label(id: PlatformId) -> &'static str {
    get_platform(id).label
}

pub fn platform_colors(id: PlatformId) -> PlatformColors {
    get_platform(id).colors
}

pub fn platform_icon(id: PlatformId) -> &'static str {
    get_platform(id).icon
}

/// Maps every platform's theme variable to its default background color.
pub fn css_defaults() -> IndexMap<&'static str, &'static str> {
    list_platforms()
        .map(|platform| (platform.theme_variable, platform.colors.background))
        .collect()
}
