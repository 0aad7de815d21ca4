use std::ffi::{OsStr, OsString};
use crate::container::{is_recognized_container, split_last_dot};

/// Derive the default output file name for a transcode.
///
/// Rules, applied to the dot-delimited segments of `original` (raw bytes,
/// so names that are not valid UTF-8 keep their bytes):
/// - no dot: append `_<codec_tag>` (if any) and `.<target_container>`
/// - otherwise every segment but the last is kept, with `_<codec_tag>`
///   appended to the second-to-last one; a last segment that is a video
///   container is replaced by `target_container`, any other last segment is
///   kept and `.<target_container>` is appended after it
///
/// ```
/// use ffhevc::naming::derive_output_name;
///
/// assert_eq!(derive_output_name("clip.mov", "mp4", None), "clip.mp4");
/// assert_eq!(derive_output_name("clip.txt", "mp4", None), "clip.txt.mp4");
/// assert_eq!(derive_output_name("clip.mov", "mp4", Some("libx265")), "clip_libx265.mp4");
/// ```
pub fn derive_output_name(
    original: impl AsRef<OsStr>,
    target_container: &str,
    codec_tag: Option<&str>,
) -> OsString {
    let original = original.as_ref();
    let tag = codec_tag.map(|t| format!("_{}", t)).unwrap_or_default();

    let (head, last) = match split_last_dot(original) {
        Some(parts) => parts,
        None => {
            let mut name = original.to_os_string();
            name.push(format!("{}.{}", tag, target_container));
            return name;
        }
    };

    let mut name = head.to_os_string();
    name.push(&tag);
    if !last.to_str().is_some_and(is_recognized_container) {
        name.push(".");
        name.push(last);
    }
    name.push(".");
    name.push(target_container);
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{has_video_container_suffix, VIDEO_CONTAINER_SUFFIXES};
    use proptest::prelude::*;
    use std::path::Path;

    #[test]
    fn test_replace_container_suffix() {
        assert_eq!(derive_output_name("clip.mov", "mp4", None), "clip.mp4");
        assert_eq!(derive_output_name("clip.mp4", "mp4", None), "clip.mp4");
        assert_eq!(derive_output_name("a.b.rmvb", "mkv", None), "a.b.mkv");
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(derive_output_name("clip", "mp4", None), "clip.mp4");
        assert_eq!(derive_output_name("clip", "mp4", Some("libx265")), "clip_libx265.mp4");
    }

    #[test]
    fn test_non_container_suffix_preserved() {
        assert_eq!(derive_output_name("clip.txt", "mp4", None), "clip.txt.mp4");
        assert_eq!(derive_output_name("clip.MOV", "mp4", None), "clip.MOV.mp4");
        assert_eq!(
            derive_output_name("clip.txt", "mp4", Some("libx265")),
            "clip_libx265.txt.mp4"
        );
    }

    #[test]
    fn test_codec_tag_on_second_to_last_segment() {
        assert_eq!(
            derive_output_name("clip.mov", "mp4", Some("libx265")),
            "clip_libx265.mp4"
        );
        assert_eq!(
            derive_output_name("show.s01e01.mkv", "mp4", Some("libx265")),
            "show.s01e01_libx265.mp4"
        );
    }

    #[test]
    fn test_hidden_name() {
        assert_eq!(derive_output_name(".mov", "mp4", None), ".mp4");
        assert_eq!(derive_output_name(".mov", "mp4", Some("x")), "_x.mp4");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_bytes_preserved() {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let derived = derive_output_name(OsStr::from_bytes(b"clip\xff.mov"), "mp4", None);
        assert_eq!(derived.into_vec(), b"clip\xff.mp4");

        let derived = derive_output_name(OsStr::from_bytes(b"\xfe.txt"), "mp4", Some("libx265"));
        assert_eq!(derived.into_vec(), b"\xfe_libx265.txt.mp4");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: derived names always end in the target container
        #[test]
        fn test_derived_name_has_target_suffix(
            name in "[A-Za-z0-9_.-]{0,40}",
            idx in 0usize..VIDEO_CONTAINER_SUFFIXES.len(),
            tagged in prop::bool::ANY,
        ) {
            let target = VIDEO_CONTAINER_SUFFIXES[idx];
            let tag = if tagged { Some("libx265") } else { None };
            let derived = derive_output_name(&name, target, tag);
            let expected_suffix = format!(".{}", target);
            let derived_str = derived.to_str().unwrap();
            prop_assert!(derived_str.ends_with(&expected_suffix));
            prop_assert!(has_video_container_suffix(Path::new(&derived)));
        }

        /// Property: a stem with a container suffix is rewritten without loss
        #[test]
        fn test_stem_preserved(
            stem in "[A-Za-z0-9_-]{1,30}",
            from in 0usize..VIDEO_CONTAINER_SUFFIXES.len(),
        ) {
            let original = format!("{}.{}", stem, VIDEO_CONTAINER_SUFFIXES[from]);
            let expected = OsString::from(format!("{}.mp4", stem));
            prop_assert_eq!(derive_output_name(&original, "mp4", None), expected);
        }
    }
}
