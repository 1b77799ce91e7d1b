//! # tauri-plugin-share-menu
//!
//! Share a link to the native share sheet, the clipboard, messaging apps, social platforms,
//! email, or download the shared file.
//!
//! The core is independent of any UI framework:
//!
//! - [`registry`]: the fixed table of share destinations (label, colors, icon, theme variable).
//! - [`url_safety`]: the gate every URL passes before it is embedded in an outgoing link.
//! - [`dispatch`]: builds the destination action for a platform and runs it on a [`ShareHost`].
//! - [`session`]: the `copied` / `downloading` state around dispatches for one open menu.
//! - [`preview`]: guesses whether shared content should be previewed as an image, video, audio,
//!   file or plain link.
//!
//! With the default `system` feature, [`SystemHost`] talks to the desktop clipboard, URL
//! handler and network. The `tauri` feature turns the crate into a Tauri plugin.
//!
//! ## Usage
//!
//! ### Rust
//!
//! ```rust,no_run
//! use tauri_plugin_share_menu::{SharePayload, ShareConfig, ShareSession, SystemHost, Observers};
//!
//! # async fn run() {
//! let config = ShareConfig::default();
//! let payload = SharePayload::new("https://tauri.app", "I found this cool project built with Tauri.");
//! let session = ShareSession::new(SystemHost::new(&config), payload, &config, Observers::default());
//!
//! session.copy_link().await;
//! assert!(session.state().copied);
//! session.share_whatsapp();
//! # }
//! ```
//!
//! ### Tauri
//!
//! ```rust,ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(tauri_plugin_share_menu::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! ```js
//! import { invoke } from '@tauri-apps/api/core';
//!
//! const { id } = await invoke('plugin:share-menu|open_session', {
//!   payload: { url: 'https://tauri.app', text: 'Check this out!' },
//! });
//! const result = await invoke('plugin:share-menu|dispatch', { session: id, platform: 'whatsapp' });
//! ```

pub mod config;
pub mod dispatch;
pub mod download;
mod error;
pub mod host;
pub mod menu;
mod models;
pub mod preview;
pub mod registry;
pub mod session;
mod state;
pub mod theme;
pub mod url_safety;

#[cfg(feature = "system")]
mod system;

#[cfg(feature = "tauri")]
mod commands;
#[cfg(feature = "tauri")]
mod desktop;
#[cfg(feature = "tauri")]
mod platform;

#[cfg(test)]
mod testing;

pub use config::ShareConfig;
pub use dispatch::{DestinationAction, Dispatcher};
pub use error::{Error, HostError, Result};
pub use host::ShareHost;
pub use menu::{MenuOptions, ShareButton};
pub use models::*;
pub use preview::{classify, PreviewConfig, PreviewDescriptor, PreviewKind, PreviewType};
pub use registry::{css_defaults, get_platform, list_platforms, PlatformDescriptor, PlatformId};
pub use session::{Observers, ShareSession};
pub use state::SessionRegistry;
pub use url_safety::{sanitize, UrlSanitizer};

#[cfg(feature = "system")]
pub use system::SystemHost;

#[cfg(feature = "tauri")]
pub use desktop::{SessionInfo, ShareMenu, WindowHost, STATE_EVENT};

#[cfg(feature = "tauri")]
use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the share menu APIs.
#[cfg(feature = "tauri")]
pub trait ShareMenuExt<R: Runtime> {
    fn share_menu(&self) -> &ShareMenu<R>;
}

#[cfg(feature = "tauri")]
impl<R: Runtime, T: Manager<R>> crate::ShareMenuExt<R> for T {
    fn share_menu(&self) -> &ShareMenu<R> {
        self.state::<ShareMenu<R>>().inner()
    }
}

/// Initializes the plugin.
///
/// Reads [`ShareConfig`] from the `plugins.share-menu` block of the app
/// configuration, registers the commands and drops every open session when
/// the app exits.
#[cfg(feature = "tauri")]
pub fn init<R: Runtime>() -> TauriPlugin<R, ShareConfig> {
    Builder::<R, ShareConfig>::new("share-menu")
        .invoke_handler(tauri::generate_handler![
            commands::list_platforms,
            commands::css_defaults,
            commands::classify_preview,
            commands::open_session,
            commands::dispatch,
            commands::session_state,
            commands::menu_buttons,
            commands::close_session,
        ])
        .setup(|app, api| {
            let share_menu = desktop::init(app, api)?;
            app.manage(share_menu);
            Ok(())
        })
        .on_drop(|app| {
            app.state::<ShareMenu<R>>().close_all();
        })
        .build()
}
