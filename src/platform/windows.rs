use std::cell::RefCell;
use std::sync::mpsc;

use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use tauri::{Runtime, Window};
use windows::core::{Ref, HSTRING};
use windows::ApplicationModel::DataTransfer::{DataRequestedEventArgs, DataTransferManager};
use windows::Foundation::{TypedEventHandler, Uri};
use windows::Win32::Foundation::HWND;
use windows::Win32::System::WinRT::{RoInitialize, RO_INIT_SINGLETHREADED};
use windows::Win32::UI::Shell::IDataTransferManagerInterop;

use crate::models::NativeShareRequest;
use crate::Error;

// Keeps the manager and its DataRequested registration alive until the share
// UI asks for the data. Only touched on the main thread.
thread_local! {
    static SHARE_STATE: RefCell<Option<(DataTransferManager, i64)>> = const { RefCell::new(None) };
}

impl From<windows::core::Error> for Error {
    fn from(err: windows::core::Error) -> Self {
        Error::NativeApi(err.message().to_string())
    }
}

pub fn can_share() -> bool {
    true
}

pub fn share<R: Runtime>(window: Window<R>, request: NativeShareRequest) -> Result<(), Error> {
    let (tx, rx) = mpsc::channel();
    let target = window.clone();

    window.run_on_main_thread(move || {
        let result = (|| -> Result<(), Error> {
            unsafe { RoInitialize(RO_INIT_SINGLETHREADED) }
                .map_err(|e| Error::NativeApi(format!("Failed to initialize WinRT: {}", e)))?;
            let hwnd = get_hwnd(&target)?;
            let interop =
                windows::core::factory::<DataTransferManager, IDataTransferManagerInterop>()?;
            let manager: DataTransferManager = unsafe { interop.GetForWindow(hwnd) }?;

            let handler = TypedEventHandler::new(
                move |_, args: Ref<'_, DataRequestedEventArgs>| -> windows::core::Result<()> {
                    if let Some(args) = args.as_ref() {
                        let data = args.Request()?.Data()?;
                        if let Some(title) = &request.title {
                            data.Properties()?.SetTitle(&HSTRING::from(title))?;
                        }
                        let text = request.combined_text();
                        if !text.is_empty() {
                            data.SetText(&HSTRING::from(text))?;
                        }
                        if !request.url.is_empty() {
                            data.SetWebLink(&Uri::CreateUri(&HSTRING::from(&request.url))?)?;
                        }
                    }
                    SHARE_STATE.with(|state| {
                        if let Some((manager, token)) = state.borrow_mut().take() {
                            let _ = manager.RemoveDataRequested(token);
                        }
                    });
                    Ok(())
                },
            );

            let token = manager.DataRequested(&handler)?;
            SHARE_STATE.with(|state| *state.borrow_mut() = Some((manager, token)));
            unsafe { interop.ShowShareUIForWindow(hwnd) }?;
            Ok(())
        })();
        let _ = tx.send(result);
    })?;

    rx.recv()
        .map_err(|_| Error::NativeApi("Failed to receive result from main thread".to_string()))?
}

fn get_hwnd<R: Runtime>(window: &Window<R>) -> Result<HWND, Error> {
    let handle = window
        .window_handle()
        .map_err(|e| Error::NativeApi(e.to_string()))?;
    match handle.as_raw() {
        RawWindowHandle::Win32(handle) => Ok(HWND(handle.hwnd.get() as *mut std::ffi::c_void)),
        _ => Err(Error::NativeApi("Unsupported window handle type".to_string())),
    }
}
