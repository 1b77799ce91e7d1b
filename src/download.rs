//! File naming and persistence for downloaded share content.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use percent_encoding::percent_decode_str;
use tempfile::{Builder, PersistError};
use url::Url;

const FALLBACK_FILENAME: &str = "download";
const MAX_NAME_ATTEMPTS: usize = 1000;

/// Strips any directory components from a caller-supplied name.
pub fn safe_filename(name: &str) -> Option<String> {
    // Treat both separators as separators regardless of the host OS.
    let last = name.rsplit(['/', '\\']).next()?.trim();
    match last {
        "" | "." | ".." => None,
        other => Some(other.to_string()),
    }
}

/// Derives a file name from the last path segment of `url`.
pub fn default_filename(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|url| {
            let segment = url.path_segments()?.next_back()?.to_string();
            let decoded = percent_decode_str(&segment).decode_utf8_lossy().into_owned();
            safe_filename(&decoded)
        })
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Writes `bytes` into `dir` under `filename`, adding ` (n)` before the
/// extension when the name is taken. Never overwrites an existing file.
///
/// Once `cancelled` is set the partial file is discarded instead of being
/// moved into place.
pub fn save_bytes(
    dir: &Path,
    filename: &str,
    bytes: &[u8],
    cancelled: &AtomicBool,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let mut temp_file = Builder::new()
        .prefix(&format!(".{}-", uuid::Uuid::new_v4()))
        .suffix(".part")
        .tempfile_in(dir)?;
    temp_file.write_all(bytes)?;
    temp_file.flush()?;

    if cancelled.load(Ordering::SeqCst) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::Interrupted,
            format!("download of {filename} was abandoned"),
        ));
    }

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let target = dir.join(numbered_name(filename, attempt));
        match temp_file.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(PersistError { error, file }) => {
                if error.kind() != std::io::ErrorKind::AlreadyExists {
                    return Err(error);
                }
                temp_file = file;
            }
        }
    }
    Err(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("no free file name for {filename}"),
    ))
}

fn numbered_name(filename: &str, attempt: usize) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({attempt}).{ext}"),
        _ => format!("{filename} ({attempt})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_come_from_the_last_segment() {
        assert_eq!(default_filename("https://a.test/files/My%20Report.pdf"), "My Report.pdf");
        assert_eq!(default_filename("https://a.test/files/"), "download");
        assert_eq!(default_filename("not a url"), "download");
    }

    #[test]
    fn caller_names_lose_their_directories() {
        assert_eq!(safe_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(safe_filename("C:\\tmp\\a.txt").as_deref(), Some("a.txt"));
        assert_eq!(safe_filename(".."), None);
        assert_eq!(safe_filename(""), None);
    }

    #[test]
    fn saving_never_clobbers() {
        let dir = tempfile::tempdir().unwrap();
        let live = AtomicBool::new(false);
        let first = save_bytes(dir.path(), "photo.png", b"one", &live).unwrap();
        let second = save_bytes(dir.path(), "photo.png", b"two", &live).unwrap();
        assert_eq!(first, dir.path().join("photo.png"));
        assert_eq!(second, dir.path().join("photo (1).png"));
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }

    #[test]
    fn abandoned_saves_leave_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_bytes(dir.path(), "late.zip", b"data", &AtomicBool::new(true)).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::Interrupted);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn names_without_extension_are_numbered_at_the_end() {
        assert_eq!(numbered_name("README", 2), "README (2)");
        assert_eq!(numbered_name(".env", 1), ".env (1)");
    }
}
