use indexmap::IndexMap;
use tauri::{command, AppHandle, Runtime, Window};
use uuid::Uuid;

use crate::desktop::SessionInfo;
use crate::menu::{MenuOptions, ShareButton};
use crate::models::{DispatchResult, SessionState, SharePayload};
use crate::preview::{PreviewConfig, PreviewDescriptor};
use crate::registry::{self, PlatformDescriptor, PlatformId};
use crate::{error, ShareMenuExt};

#[command]
pub fn list_platforms() -> Vec<PlatformDescriptor> {
    registry::list_platforms().copied().collect()
}

#[command]
pub fn css_defaults() -> IndexMap<&'static str, &'static str> {
    let mut defaults = crate::theme::ui_css_defaults();
    defaults.extend(registry::css_defaults());
    defaults
}

#[command]
pub fn classify_preview(preview: PreviewConfig) -> PreviewDescriptor {
    PreviewDescriptor::from_config(preview)
}

#[command]
pub async fn open_session<R: Runtime>(
    app: AppHandle<R>,
    window: Window<R>,
    payload: SharePayload,
) -> Result<SessionInfo, error::Error> {
    app.share_menu().open_session(window, payload)
}

#[command]
pub async fn dispatch<R: Runtime>(
    app: AppHandle<R>,
    session: Uuid,
    platform: PlatformId,
) -> Result<DispatchResult, error::Error> {
    app.share_menu().dispatch(session, platform).await
}

#[command]
pub async fn session_state<R: Runtime>(
    app: AppHandle<R>,
    session: Uuid,
) -> Result<SessionState, error::Error> {
    app.share_menu().session_state(session)
}

#[command]
pub async fn menu_buttons<R: Runtime>(
    app: AppHandle<R>,
    session: Uuid,
    options: Option<MenuOptions>,
) -> Result<Vec<ShareButton>, error::Error> {
    app.share_menu()
        .menu_buttons(session, &options.unwrap_or_default())
}

#[command]
pub async fn close_session<R: Runtime>(
    app: AppHandle<R>,
    session: Uuid,
) -> Result<(), error::Error> {
    app.share_menu().close_session(session)
}
