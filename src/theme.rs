use std::collections::HashMap;

use indexmap::IndexMap;

use crate::registry::{get_platform, PlatformId};

/// Theme variables of the menu chrome, with their default values.
pub const UI_THEME_DEFAULTS: [(&str, &str); 9] = [
    ("--share-menu-overlay-bg", "rgba(0, 0, 0, 0.7)"),
    ("--share-menu-drawer-bg", "#09090b"),
    ("--share-menu-drawer-border", "#27272a"),
    ("--share-menu-handle-bg", "#27272a"),
    ("--share-menu-title-color", "#ffffff"),
    ("--share-menu-subtitle-color", "#a1a1aa"),
    ("--share-menu-button-label-color", "#ffffff"),
    ("--share-menu-preview-bg", "rgba(255, 255, 255, 0.05)"),
    ("--share-menu-preview-shimmer", "rgba(255, 255, 255, 0.1)"),
];

pub fn ui_css_defaults() -> IndexMap<&'static str, &'static str> {
    UI_THEME_DEFAULTS.into_iter().collect()
}

/// `var(name, fallback)`
pub fn css_var(name: &str, fallback: &str) -> String {
    format!("var({name}, {fallback})")
}

/// Background of a platform button: the caller's theme mapping first, then
/// the registry default.
pub fn platform_background<'a>(id: PlatformId, theme: &'a HashMap<String, String>) -> &'a str {
    let platform = get_platform(id);
    theme
        .get(platform.theme_variable)
        .map(String::as_str)
        .unwrap_or(platform.colors.background)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_overrides_win_over_registry_colors() {
        let mut theme = HashMap::new();
        assert_eq!(platform_background(PlatformId::X, &theme), "#000000");
        theme.insert("--share-menu-x-bg".to_string(), "#111111".to_string());
        assert_eq!(platform_background(PlatformId::X, &theme), "#111111");
    }

    #[test]
    fn css_var_keeps_the_fallback() {
        assert_eq!(css_var("--a", "#fff"), "var(--a, #fff)");
        assert_eq!(ui_css_defaults()["--share-menu-drawer-bg"], "#09090b");
    }
}
