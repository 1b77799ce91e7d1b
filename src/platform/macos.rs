use std::sync::mpsc;

use objc2::rc::{autoreleasepool, Retained};
use objc2::runtime::AnyObject;
use objc2::AnyThread;
use objc2_app_kit::{NSSharingServicePicker, NSView};
use objc2_core_foundation::{CGPoint, CGRect, CGSize};
use objc2_foundation::{NSArray, NSRectEdge, NSString, NSURL};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use tauri::{Runtime, Window};

use crate::models::NativeShareRequest;
use crate::Error;

pub fn can_share() -> bool {
    true
}

/// Shows the `NSSharingServicePicker` anchored at the center of the window.
pub fn share<R: Runtime>(window: Window<R>, request: NativeShareRequest) -> Result<(), Error> {
    let (tx, rx) = mpsc::channel();
    let target = window.clone();

    window.run_on_main_thread(move || {
        let result = (|| -> Result<(), Error> {
            let ns_view = get_ns_view(&target)?;
            let mut items: Vec<Retained<AnyObject>> = Vec::new();

            if !request.text.is_empty() {
                let text = NSString::from_str(&request.text);
                items.push(Retained::into_super(Retained::into_super(text)));
            }
            if !request.url.is_empty() {
                let url = NSURL::URLWithString(&NSString::from_str(&request.url))
                    .ok_or_else(|| Error::InvalidArgs("Share URL is not valid.".to_string()))?;
                items.push(Retained::into_super(Retained::into_super(url)));
            }
            if items.is_empty() {
                return Err(Error::InvalidArgs("No content provided to share.".to_string()));
            }

            autoreleasepool(|_pool| {
                let items = NSArray::from_retained_slice(&items);
                let picker = unsafe {
                    NSSharingServicePicker::initWithItems(NSSharingServicePicker::alloc(), &items)
                };
                let bounds = ns_view.bounds();
                unsafe {
                    picker.showRelativeToRect_ofView_preferredEdge(
                        CGRect {
                            origin: CGPoint {
                                x: bounds.size.width / 2.0,
                                y: bounds.size.height / 2.0,
                            },
                            size: CGSize {
                                width: 0.0,
                                height: 0.0,
                            },
                        },
                        &ns_view,
                        NSRectEdge::NSMinYEdge,
                    );
                }
            });
            Ok(())
        })();
        let _ = tx.send(result);
    })?;

    rx.recv()
        .map_err(|_| Error::NativeApi("Share sheet never reported back.".to_string()))?
}

fn get_ns_view<R: Runtime>(window: &Window<R>) -> Result<Retained<NSView>, Error> {
    let handle = window
        .window_handle()
        .map_err(|e| Error::NativeApi(e.to_string()))?;
    match handle.as_raw() {
        RawWindowHandle::AppKit(handle) => {
            let ptr = handle.ns_view.as_ptr().cast::<NSView>();
            unsafe { Retained::retain(ptr) }
                .ok_or_else(|| Error::NativeApi("Window has no NSView.".to_string()))
        }
        _ => Err(Error::NativeApi(
            "Unsupported window handle type on macOS.".to_string(),
        )),
    }
}
