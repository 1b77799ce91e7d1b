//! The render model of a share menu: which buttons to draw, in which order,
//! and how they look for the current session state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::SessionState;
use crate::registry::{list_platforms, PlatformId};
use crate::theme::{css_var, platform_background};

const COPIED_LABEL: &str = "Copied!";
const DOWNLOADING_LABEL: &str = "...";

/// Caller customization of the menu.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuOptions {
    /// When non-empty, only these platforms are shown and `hide` is ignored.
    pub show: Vec<PlatformId>,
    pub hide: Vec<PlatformId>,
    pub labels: HashMap<PlatformId, String>,
    pub icons: HashMap<PlatformId, String>,
    /// Theme variable name to color.
    pub theme: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareButton {
    pub id: PlatformId,
    pub label: String,
    pub icon: String,
    /// CSS background value, `var(<theme variable>, <color>)`.
    pub background: String,
    pub foreground: String,
}

fn dynamic_label(id: PlatformId, state: &SessionState) -> Option<&'static str> {
    match id {
        PlatformId::Copy if state.copied => Some(COPIED_LABEL),
        PlatformId::Download if state.downloading => Some(DOWNLOADING_LABEL),
        _ => None,
    }
}

fn is_available(id: PlatformId, state: &SessionState, has_download: bool) -> bool {
    match id {
        PlatformId::Native => state.can_native_share,
        PlatformId::Download => has_download,
        _ => true,
    }
}

fn is_selected(id: PlatformId, options: &MenuOptions) -> bool {
    if !options.show.is_empty() {
        return options.show.contains(&id);
    }
    !options.hide.contains(&id)
}

pub fn build_buttons(
    state: &SessionState,
    has_download: bool,
    options: &MenuOptions,
) -> Vec<ShareButton> {
    list_platforms()
        .filter(|platform| is_available(platform.id, state, has_download))
        .filter(|platform| is_selected(platform.id, options))
        .map(|platform| {
            let id = platform.id;
            let label = options
                .labels
                .get(&id)
                .map(String::as_str)
                .or_else(|| dynamic_label(id, state))
                .unwrap_or(platform.label);
            let icon = options.icons.get(&id).map(String::as_str).unwrap_or(platform.icon);
            ShareButton {
                id,
                label: label.to_string(),
                icon: icon.to_string(),
                background: css_var(platform.theme_variable, platform_background(id, &options.theme)),
                foreground: platform.colors.foreground.to_string(),
            }
        })
        .collect()
}
