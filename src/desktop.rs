use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tauri::{plugin::PluginApi, AppHandle, Emitter, Runtime, Window};
use uuid::Uuid;

use crate::error::HostError;
use crate::host::ShareHost;
use crate::menu::{MenuOptions, ShareButton};
use crate::models::*;
use crate::platform;
use crate::registry::PlatformId;
use crate::session::{Observers, ShareSession};
use crate::state::SessionRegistry;
use crate::system::SystemHost;
use crate::{Result, ShareConfig};

pub const STATE_EVENT: &str = "share-menu://state";

pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    api: PluginApi<R, ShareConfig>,
) -> crate::Result<ShareMenu<R>> {
    let config = api.config().clone();
    log::debug!("share menu configured: {config:?}");
    Ok(ShareMenu {
        app: app.clone(),
        system: SystemHost::new(&config),
        config,
        sessions: SessionRegistry::new(),
    })
}

/// A window's share sheet on top of the desktop services.
pub struct WindowHost<R: Runtime> {
    window: Window<R>,
    system: SystemHost,
}

#[async_trait]
impl<R: Runtime> ShareHost for WindowHost<R> {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_native_share: platform::can_share(),
        }
    }

    fn open_url(&self, url: &str) -> std::result::Result<(), HostError> {
        self.system.open_url(url)
    }

    async fn write_clipboard(&self, text: &str) -> std::result::Result<(), HostError> {
        self.system.write_clipboard(text).await
    }

    async fn native_share(&self, request: &NativeShareRequest) -> std::result::Result<(), HostError> {
        let window = self.window.clone();
        let request = request.clone();
        tauri::async_runtime::spawn_blocking(move || platform::share(window, request))
            .await
            .map_err(|e| HostError::Io(e.to_string()))?
            .map_err(|e| {
                log::warn!("native share failed: {e}");
                HostError::Unavailable
            })
    }

    async fn download(&self, request: &DownloadRequest) -> std::result::Result<PathBuf, HostError> {
        self.system.download(request).await
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: Uuid,
    pub state: SessionState,
    pub safe_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateEvent {
    session: Uuid,
    state: SessionState,
}

/// Access to the share menu APIs.
pub struct ShareMenu<R: Runtime> {
    app: AppHandle<R>,
    config: ShareConfig,
    system: SystemHost,
    sessions: SessionRegistry<ShareSession<WindowHost<R>>>,
}

impl<R: Runtime> ShareMenu<R> {
    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    pub fn open_session(&self, window: Window<R>, payload: SharePayload) -> Result<SessionInfo> {
        let id = Uuid::new_v4();
        let app = self.app.clone();
        let observers = Observers {
            on_state_change: Some(Arc::new(move |state: SessionState| {
                if let Err(e) = app.emit(STATE_EVENT, StateEvent { session: id, state }) {
                    log::warn!("failed to emit share state: {e}");
                }
            })),
            ..Default::default()
        };
        let host = WindowHost {
            window,
            system: self.system.clone(),
        };
        let session = ShareSession::new(host, payload, &self.config, observers);
        let info = SessionInfo {
            id,
            state: session.state(),
            safe_url: session.safe_url(),
        };
        self.sessions.insert_with_id(id, session);
        Ok(info)
    }

    pub async fn dispatch(&self, session: Uuid, platform: PlatformId) -> Result<DispatchResult> {
        self.sessions
            .get(&session)?
            .trigger(platform)
            .await
            .map_err(|e| crate::Error::NativeApi(e.to_string()))
    }

    pub fn session_state(&self, session: Uuid) -> Result<SessionState> {
        Ok(self.sessions.get(&session)?.state())
    }

    pub fn menu_buttons(&self, session: Uuid, options: &MenuOptions) -> Result<Vec<ShareButton>> {
        Ok(self.sessions.get(&session)?.buttons(options))
    }

    pub fn close_session(&self, session: Uuid) -> Result<()> {
        self.sessions.remove(&session)
    }

    pub fn close_all(&self) {
        self.sessions.clear();
    }
}
