use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use log::{debug, info, warn};
use crate::container::has_video_container_suffix;
use crate::error::{TranscodeError, TranscodeResult};

/// List the video files directly inside `dir` (no recursion).
///
/// Subdirectories and names without a video container suffix are skipped,
/// as are names starting with `.` when `ignore_hidden` is set. Results are
/// sorted by file name.
pub fn scan_dir(dir: &Path, ignore_hidden: bool) -> TranscodeResult<Vec<PathBuf>> {
    info!("Scanning directory: {}", dir.display());

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            // The root itself being unreadable is fatal, a single bad entry is not
            Err(e) if e.depth() == 0 => {
                return Err(TranscodeError::Scan {
                    dir: dir.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                warn!("Error reading directory entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if ignore_hidden && name.starts_with('.') {
            debug!("Skipping hidden file: {}", entry.path().display());
            continue;
        }

        if !has_video_container_suffix(entry.path()) {
            debug!("Skipping non-video file: {}", entry.path().display());
            continue;
        }

        files.push(entry.into_path());
    }

    info!("Found {} video file(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// Expand a mixed list of files and directories into transcode inputs.
///
/// Directories are scanned with [`scan_dir`]; anything else is taken as
/// given, in order.
pub fn collect_inputs(paths: &[PathBuf], ignore_hidden: bool) -> TranscodeResult<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            inputs.extend(scan_dir(path, ignore_hidden)?);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}
