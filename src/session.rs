//! One active share context: a held payload, a host, and the transient UI
//! state (`copied`, `downloading`) around dispatches.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::ShareConfig;
use crate::dispatch::Dispatcher;
use crate::host::ShareHost;
use crate::menu::{build_buttons, MenuOptions, ShareButton};
use crate::models::{Capabilities, DispatchResult, Outcome, SessionState, SharePayload};
use crate::registry::PlatformId;

pub type ResultObserver = Arc<dyn Fn(&DispatchResult) + Send + Sync>;
pub type StateObserver = Arc<dyn Fn(SessionState) + Send + Sync>;

/// Optional callbacks. Completions may arrive after the menu was dismissed.
#[derive(Clone, Default)]
pub struct Observers {
    pub on_copy: Option<ResultObserver>,
    pub on_download: Option<ResultObserver>,
    pub on_native_share: Option<ResultObserver>,
    /// Every dispatch result, whatever the platform.
    pub on_dispatch: Option<ResultObserver>,
    pub on_state_change: Option<StateObserver>,
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("on_copy", &self.on_copy.is_some())
            .field("on_download", &self.on_download.is_some())
            .field("on_native_share", &self.on_native_share.is_some())
            .field("on_dispatch", &self.on_dispatch.is_some())
            .field("on_state_change", &self.on_state_change.is_some())
            .finish()
    }
}

#[derive(Default)]
struct CopyReset {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

struct Inner<H> {
    host: H,
    dispatcher: Dispatcher,
    payload: SharePayload,
    capabilities: Capabilities,
    copy_reset_delay: Duration,
    observers: Observers,
    state: Mutex<SessionState>,
    copy_reset: Mutex<CopyReset>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn notify(observer: &Option<ResultObserver>, result: &DispatchResult) {
    if let Some(observer) = observer {
        observer(result);
    }
}

/// Cheap to clone; clones share the same state.
pub struct ShareSession<H> {
    inner: Arc<Inner<H>>,
}

impl<H> Clone for ShareSession<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: ShareHost> ShareSession<H> {
    pub fn new(host: H, payload: SharePayload, config: &ShareConfig, observers: Observers) -> Self {
        // Capability detection happens once; it does not change for the session.
        let capabilities = host.capabilities();
        let state = SessionState {
            can_native_share: capabilities.supports_native_share,
            ..Default::default()
        };
        Self {
            inner: Arc::new(Inner {
                host,
                dispatcher: Dispatcher::new(config),
                payload,
                capabilities,
                copy_reset_delay: config.copy_reset_delay(),
                observers,
                state: Mutex::new(state),
                copy_reset: Mutex::new(CopyReset::default()),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        *lock(&self.inner.state)
    }

    pub fn payload(&self) -> &SharePayload {
        &self.inner.payload
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    /// The share URL after sanitizing, as it is embedded into links.
    pub fn safe_url(&self) -> String {
        self.inner.dispatcher.safe_url(&self.inner.payload)
    }

    pub fn has_download(&self) -> bool {
        self.inner
            .dispatcher
            .safe_download_url(&self.inner.payload)
            .is_some()
    }

    pub fn buttons(&self, options: &MenuOptions) -> Vec<ShareButton> {
        build_buttons(&self.state(), self.has_download(), options)
    }

    async fn run(&self, id: PlatformId) -> DispatchResult {
        let inner = &self.inner;
        let result = inner
            .dispatcher
            .dispatch(&inner.host, id, &inner.payload, inner.capabilities)
            .await;
        notify(&inner.observers.on_dispatch, &result);
        result
    }

    pub async fn copy_link(&self) -> DispatchResult {
        let result = self.run(PlatformId::Copy).await;
        if result.outcome == Outcome::Copied {
            self.mark_copied();
        }
        notify(&self.inner.observers.on_copy, &result);
        result
    }

    pub async fn native_share(&self) -> DispatchResult {
        let result = self.run(PlatformId::Native).await;
        notify(&self.inner.observers.on_native_share, &result);
        result
    }

    /// Ignored (reported as unsupported) while another download is in flight.
    pub async fn download_file(&self) -> DispatchResult {
        let Some(_guard) = DownloadGuard::acquire(self) else {
            log::debug!("download already in progress, ignoring");
            return DispatchResult::unsupported("download already in progress");
        };
        let result = self.run(PlatformId::Download).await;
        notify(&self.inner.observers.on_download, &result);
        result
    }

    /// Runs the action for `id` in the background. Copy, native share and
    /// download keep their state tracking.
    pub fn trigger(&self, id: PlatformId) -> JoinHandle<DispatchResult> {
        let session = self.clone();
        tokio::spawn(async move {
            match id {
                PlatformId::Copy => session.copy_link().await,
                PlatformId::Native => session.native_share().await,
                PlatformId::Download => session.download_file().await,
                other => session.run(other).await,
            }
        })
    }

    pub fn share_whatsapp(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Whatsapp)
    }

    pub fn share_telegram(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Telegram)
    }

    pub fn share_x(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::X)
    }

    pub fn share_facebook(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Facebook)
    }

    pub fn share_instagram(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Instagram)
    }

    pub fn share_tiktok(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Tiktok)
    }

    pub fn share_threads(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Threads)
    }

    pub fn share_snapchat(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Snapchat)
    }

    pub fn share_sms(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Sms)
    }

    pub fn share_email(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Email)
    }

    pub fn share_linkedin(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Linkedin)
    }

    pub fn share_reddit(&self) -> JoinHandle<DispatchResult> {
        self.trigger(PlatformId::Reddit)
    }

    fn update(&self, apply: impl FnOnce(&mut SessionState)) {
        update_state(&self.inner, apply);
    }

    fn mark_copied(&self) {
        let inner = &self.inner;
        let mut reset = lock(&inner.copy_reset);
        reset.generation += 1;
        if let Some(task) = reset.task.take() {
            task.abort();
        }
        self.update(|state| state.copied = true);

        let generation = reset.generation;
        let delay = inner.copy_reset_delay;
        let weak: Weak<Inner<H>> = Arc::downgrade(inner);
        reset.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                clear_copied(&inner, generation);
            }
        }));
    }
}

fn update_state<H>(inner: &Inner<H>, apply: impl FnOnce(&mut SessionState)) {
    let (before, after) = {
        let mut state = lock(&inner.state);
        let before = *state;
        apply(&mut state);
        (before, *state)
    };
    if before != after {
        if let Some(observer) = &inner.observers.on_state_change {
            observer(after);
        }
    }
}

fn clear_copied<H>(inner: &Inner<H>, generation: u64) {
    let mut reset = lock(&inner.copy_reset);
    // A newer copy rescheduled the reset.
    if reset.generation != generation {
        return;
    }
    reset.task = None;
    update_state(inner, |state| state.copied = false);
}

/// Holds `downloading` for as long as it lives, so the flag clears on success,
/// failure and when the download future is dropped.
struct DownloadGuard<'a, H> {
    inner: &'a Inner<H>,
}

impl<'a, H> DownloadGuard<'a, H> {
    fn acquire(session: &'a ShareSession<H>) -> Option<Self> {
        let inner = &*session.inner;
        let mut acquired = false;
        update_state(inner, |state| {
            if !state.downloading {
                state.downloading = true;
                acquired = true;
            }
        });
        acquired.then_some(Self { inner })
    }
}

impl<H> Drop for DownloadGuard<'_, H> {
    fn drop(&mut self) {
        update_state(self.inner, |state| state.downloading = false);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{init_logging, HostCall, RecordingHost};

    fn session(host: RecordingHost) -> ShareSession<Arc<RecordingHost>> {
        session_with(host, Observers::default())
    }

    fn session_with(host: RecordingHost, observers: Observers) -> ShareSession<Arc<RecordingHost>> {
        init_logging();
        let payload = SharePayload::new("https://example.com/a", "Hi")
            .with_download("https://example.com/a.zip", None);
        ShareSession::new(Arc::new(host), payload, &ShareConfig::default(), observers)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn copied_resets_after_the_delay() {
        let session = session(RecordingHost::default());
        let result = session.copy_link().await;
        assert_eq!(result.outcome, Outcome::Copied);
        assert!(session.state().copied);

        advance(1999).await;
        assert!(session.state().copied);
        advance(2).await;
        assert!(!session.state().copied);
    }

    #[tokio::test(start_paused = true)]
    async fn copying_again_restarts_the_timer() {
        let session = session(RecordingHost::default());
        session.copy_link().await;
        advance(1500).await;
        session.copy_link().await;

        advance(1000).await;
        assert!(session.state().copied, "first timer must not clear the second copy");
        advance(1001).await;
        assert!(!session.state().copied);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_copy_leaves_copied_unset() {
        let session = session(RecordingHost {
            fail_clipboard: true,
            ..Default::default()
        });
        let result = session.copy_link().await;
        assert_eq!(result.outcome, Outcome::Failed);
        assert!(!session.state().copied);
    }

    #[tokio::test(start_paused = true)]
    async fn downloading_is_set_only_while_in_flight() {
        let session = session(RecordingHost {
            download_delay: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let handle = session.trigger(PlatformId::Download);
        advance(10).await;
        assert!(session.state().downloading);

        let second = session.download_file().await;
        assert_eq!(second.outcome, Outcome::Unsupported);

        let first = handle.await.unwrap();
        assert_eq!(first.outcome, Outcome::Downloaded);
        assert!(!session.state().downloading);
        let host = session.host();
        assert_eq!(host.count(|call| matches!(call, HostCall::Download(_))), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn downloading_clears_on_failure_and_cancellation() {
        let session = session(RecordingHost {
            download_error: Some(crate::HostError::Network("503".into())),
            ..Default::default()
        });
        let result = session.download_file().await;
        assert_eq!(result.outcome, Outcome::Failed);
        assert!(!session.state().downloading);

        let session = self::session(RecordingHost {
            download_delay: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let handle = session.trigger(PlatformId::Download);
        advance(10).await;
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
        assert!(!session.state().downloading);
    }

    #[tokio::test]
    async fn capability_is_detected_once() {
        let session = session(RecordingHost::with_native_share());
        assert!(session.state().can_native_share);
        assert_eq!(session.native_share().await.outcome, Outcome::Shared);

        let session = self::session(RecordingHost::default());
        assert!(!session.state().can_native_share);
        assert_eq!(session.native_share().await.outcome, Outcome::Unsupported);
    }

    #[tokio::test]
    async fn deep_link_triggers_report_to_observers() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let observers = Observers {
            on_dispatch: Some(Arc::new(move |result: &DispatchResult| {
                assert_eq!(result.outcome, Outcome::Opened);
                counter.fetch_add(1, Ordering::SeqCst);
            })),
            ..Default::default()
        };
        let session = session_with(RecordingHost::default(), observers);
        let result = session.share_whatsapp().await.unwrap();
        assert_eq!(result.outcome, Outcome::Opened);
        session.share_email().await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(session.state(), SessionState::default());
        assert!(matches!(
            &session.host().calls()[0],
            HostCall::Open(url) if url.starts_with("https://wa.me/?text=Hi%20")
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn state_changes_are_observed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let observers = Observers {
            on_state_change: Some(Arc::new(move |state: SessionState| sink.lock().unwrap().push(state.copied))),
            on_copy: Some(Arc::new(|result: &DispatchResult| {
                assert_eq!(result.outcome, Outcome::Copied)
            })),
            ..Default::default()
        };
        let session = session_with(RecordingHost::default(), observers);
        session.copy_link().await;
        advance(2001).await;
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    fn recorder() -> (Arc<Mutex<Vec<DispatchResult>>>, ResultObserver) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let observer: ResultObserver =
            Arc::new(move |result: &DispatchResult| sink.lock().unwrap().push(result.clone()));
        (seen, observer)
    }

    #[tokio::test]
    async fn native_share_results_reach_their_observer() {
        let (seen, observer) = recorder();
        let observers = Observers {
            on_native_share: Some(observer.clone()),
            ..Default::default()
        };
        let session = session_with(RecordingHost::with_native_share(), observers.clone());
        session.native_share().await;

        let cancelling = RecordingHost {
            cancel_native_share: true,
            ..RecordingHost::with_native_share()
        };
        let session = session_with(cancelling, observers);
        session.native_share().await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                DispatchResult::new(Outcome::Shared),
                DispatchResult::failed(crate::HostError::Cancelled),
            ]
        );
    }

    #[tokio::test]
    async fn download_results_reach_their_observer() {
        let (seen, observer) = recorder();
        let observers = Observers {
            on_download: Some(observer),
            ..Default::default()
        };
        let session = session_with(RecordingHost::default(), observers.clone());
        session.download_file().await;

        let failing = RecordingHost {
            download_error: Some(crate::HostError::Network("503".into())),
            ..Default::default()
        };
        let session = session_with(failing, observers);
        session.download_file().await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                DispatchResult::new(Outcome::Downloaded),
                DispatchResult::failed(crate::HostError::Network("503".into())),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn ignored_download_is_not_reported() {
        let (seen, observer) = recorder();
        let observers = Observers {
            on_download: Some(observer),
            ..Default::default()
        };
        let session = session_with(
            RecordingHost {
                download_delay: Some(Duration::from_secs(5)),
                ..Default::default()
            },
            observers,
        );
        let handle = session.trigger(PlatformId::Download);
        advance(10).await;

        assert_eq!(session.download_file().await.outcome, Outcome::Unsupported);
        assert!(seen.lock().unwrap().is_empty());

        handle.await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![DispatchResult::new(Outcome::Downloaded)]);
    }

    #[tokio::test]
    async fn buttons_follow_session_state() {
        let session = session(RecordingHost::default());
        let buttons = session.buttons(&MenuOptions::default());
        assert_eq!(buttons.len(), 14);
        assert_eq!(buttons[0].id, PlatformId::Copy);
        assert_eq!(buttons[1].id, PlatformId::Download);
        assert_eq!(session.safe_url(), "https://example.com/a");
    }
}
