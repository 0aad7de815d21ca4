use std::ffi::OsStr;
use std::path::Path;

/// Extensions recognized as video containers (case-sensitive)
pub const VIDEO_CONTAINER_SUFFIXES: &[&str] = &["mp4", "mov", "mkv", "avi", "rmvb", "wmv", "flv"];

/// Check whether an extension names a recognized video container.
///
/// The match is exact: no case folding and no leading dot is stripped,
/// so `"MP4"` and `".mp4"` are both rejected.
pub fn is_recognized_container(suffix: &str) -> bool {
    VIDEO_CONTAINER_SUFFIXES.contains(&suffix)
}

/// Check whether a file name or path ends in a video container suffix.
///
/// Only the final path component is inspected and only its last
/// dot-delimited segment counts as the extension. A name without any dot
/// has no extension. Hidden names are still split, so `.mp4` counts.
pub fn has_video_container_suffix(file: &Path) -> bool {
    let name = match file.file_name() {
        Some(name) => name,
        None => return false,
    };

    match split_last_dot(name) {
        Some((_, suffix)) => suffix.to_str().is_some_and(is_recognized_container),
        None => false,
    }
}

/// Split a file name around its last `.` without touching the other bytes,
/// so names that are not valid UTF-8 survive unchanged.
pub(crate) fn split_last_dot(name: &OsStr) -> Option<(&OsStr, &OsStr)> {
    let bytes = name.as_encoded_bytes();
    let dot = bytes.iter().rposition(|&b| b == b'.')?;
    // SAFETY: both halves are split right next to an ASCII '.', which is a
    // valid boundary for OsStr's encoding.
    unsafe {
        Some((
            OsStr::from_encoded_bytes_unchecked(&bytes[..dot]),
            OsStr::from_encoded_bytes_unchecked(&bytes[dot + 1..]),
        ))
    }
}
