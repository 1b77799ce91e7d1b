use tauri::{Runtime, Window};

use crate::models::NativeShareRequest;
use crate::Error;

pub fn can_share() -> bool {
    false
}

pub fn share<R: Runtime>(_window: Window<R>, _request: NativeShareRequest) -> Result<(), Error> {
    Err(Error::NativeApi(
        "No native share sheet on this platform.".to_string(),
    ))
}
