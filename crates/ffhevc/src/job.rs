use std::ffi::OsString;
use std::path::{Path, PathBuf};
use crate::naming::derive_output_name;
use crate::preset::Preset;

pub const DEFAULT_ENCODER_BIN: &str = "ffmpeg";
pub const DEFAULT_VIDEO_CODEC: &str = "libx265";
pub const DEFAULT_CONTAINER: &str = "mp4";
pub const DEFAULT_CRF: u32 = 30;

/// Settings for one encoder invocation.
///
/// A job is built once with defaults and then reused across a batch by
/// overwriting the input (and optionally output) between runs. Setters do
/// no validation; a missing input is only reported when the job runs.
/// See <https://trac.ffmpeg.org/wiki/Encode/H.265> for the encoder knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeJob {
    input: PathBuf,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    video_codec: String,
    container: String,
    crf: u32,
    preset: Preset,
    encoder_bin: PathBuf,
    tag_codec: bool,
    format_flag: bool,
}

impl Default for TranscodeJob {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscodeJob {
    pub fn new() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: None,
            output_name: None,
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            crf: DEFAULT_CRF,
            preset: Preset::default(),
            encoder_bin: PathBuf::from(DEFAULT_ENCODER_BIN),
            tag_codec: false,
            format_flag: true,
        }
    }

    pub fn set_input(&mut self, input: impl Into<PathBuf>) {
        self.input = input.into();
    }

    /// An empty path clears the override and falls back to the input's directory
    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        self.output_dir = if dir.as_os_str().is_empty() { None } else { Some(dir) };
    }

    /// An empty name clears the override and falls back to the derived name
    pub fn set_output_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.output_name = if name.is_empty() { None } else { Some(name) };
    }

    pub fn set_video_codec(&mut self, codec: impl Into<String>) {
        self.video_codec = codec.into();
    }

    pub fn set_container(&mut self, container: impl Into<String>) {
        self.container = container.into();
    }

    pub fn set_crf(&mut self, crf: u32) {
        self.crf = crf;
    }

    pub fn set_preset(&mut self, preset: Preset) {
        self.preset = preset;
    }

    pub fn set_encoder_bin(&mut self, bin: impl Into<PathBuf>) {
        self.encoder_bin = bin.into();
    }

    /// Insert `_<codec>` into derived output names
    pub fn set_tag_codec(&mut self, tag: bool) {
        self.tag_codec = tag;
    }

    /// Pass `-f <container>` to the encoder
    pub fn set_format_flag(&mut self, enabled: bool) {
        self.format_flag = enabled;
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn video_codec(&self) -> &str {
        &self.video_codec
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn crf(&self) -> u32 {
        self.crf
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn encoder_bin(&self) -> &Path {
        &self.encoder_bin
    }

    pub fn has_input(&self) -> bool {
        !self.input.as_os_str().is_empty()
    }

    /// Compute where the encoder should write.
    ///
    /// The directory is the explicit output directory, or the input's own
    /// directory. The name is the explicit output name, or one derived from
    /// the input's file name and the current container.
    pub fn output_path(&self) -> PathBuf {
        let dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => self
                .input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        let name = match &self.output_name {
            Some(name) => OsString::from(name),
            None => {
                let input_name = self.input.file_name().unwrap_or_default();
                let tag = self.tag_codec.then_some(self.video_codec.as_str());
                derive_output_name(input_name, &self.container, tag)
            }
        };

        dir.join(name)
    }

    /// Encoder arguments, in the order the encoder expects them.
    ///
    /// Paths are passed through as raw OS strings.
    pub fn build_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();

        args.push("-i".into());
        args.push(self.input.clone().into_os_string());

        args.push("-c:v".into());
        args.push(self.video_codec.as_str().into());

        if self.format_flag {
            args.push("-f".into());
            args.push(self.container.as_str().into());
        }

        args.push("-crf".into());
        args.push(self.crf.to_string().into());

        args.push("-preset".into());
        args.push(self.preset.as_str().into());

        args.push(self.output_path().into_os_string());

        args
    }

    /// The full command line as a single display string (lossy)
    pub fn preview(&self) -> String {
        let args: Vec<String> = self
            .build_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        format!("{} {}", self.encoder_bin.display(), args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let job = TranscodeJob::new();
        assert_eq!(job.video_codec(), "libx265");
        assert_eq!(job.container(), "mp4");
        assert_eq!(job.crf(), 30);
        assert_eq!(job.preset(), Preset::Medium);
        assert_eq!(job.encoder_bin(), Path::new("ffmpeg"));
        assert!(!job.has_input());
    }

    #[test]
    fn test_output_path_defaults_to_input_dir() {
        let mut job = TranscodeJob::new();
        job.set_input("/x/y/clip.mov");
        assert_eq!(job.output_path(), PathBuf::from("/x/y/clip.mp4"));

        job.set_tag_codec(true);
        assert_eq!(job.output_path(), PathBuf::from("/x/y/clip_libx265.mp4"));
    }

    #[test]
    fn test_output_path_relative_input() {
        let mut job = TranscodeJob::new();
        job.set_input("clip.avi");
        assert_eq!(job.output_path(), PathBuf::from("clip.mp4"));
    }

    #[test]
    fn test_explicit_output_dir_and_name() {
        let mut job = TranscodeJob::new();
        job.set_input("/x/y/clip.mov");
        job.set_output_dir("/out");
        assert_eq!(job.output_path(), PathBuf::from("/out/clip.mp4"));

        job.set_output_name("final.mkv");
        assert_eq!(job.output_path(), PathBuf::from("/out/final.mkv"));

        job.set_output_dir("");
        assert_eq!(job.output_path(), PathBuf::from("/x/y/final.mkv"));

        job.set_output_name("");
        assert_eq!(job.output_path(), PathBuf::from("/x/y/clip.mp4"));
    }

    #[test]
    fn test_reuse_across_inputs() {
        let mut job = TranscodeJob::new();
        job.set_output_dir("/out");
        job.set_input("/a/one.mkv");
        assert_eq!(job.output_path(), PathBuf::from("/out/one.mp4"));
        job.set_input("/b/two.wmv");
        assert_eq!(job.output_path(), PathBuf::from("/out/two.mp4"));
    }

    #[test]
    fn test_build_args() {
        let mut job = TranscodeJob::new();
        job.set_input("/x/y/clip.mov");
        job.set_crf(28);
        job.set_preset(Preset::Slow);

        assert_eq!(
            job.build_args(),
            vec![
                "-i", "/x/y/clip.mov",
                "-c:v", "libx265",
                "-f", "mp4",
                "-crf", "28",
                "-preset", "slow",
                "/x/y/clip.mp4",
            ]
        );
    }

    #[test]
    fn test_build_args_without_format_flag() {
        let mut job = TranscodeJob::new();
        job.set_input("/x/y/clip.mov");
        job.set_format_flag(false);

        let args = job.build_args();
        assert!(!args.iter().any(|a| a == "-f"));
        assert_eq!(args.len(), 9);
        assert_eq!(args.last().unwrap(), "/x/y/clip.mp4");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_input_passed_through() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new(OsStr::from_bytes(b"/x/clip\xff.mov"));
        let mut job = TranscodeJob::new();
        job.set_input(input);

        let output = PathBuf::from(OsStr::from_bytes(b"/x/clip\xff.mp4"));
        assert_eq!(job.output_path(), output);

        let args = job.build_args();
        assert_eq!(args[1], input.as_os_str());
        assert_eq!(args.last().unwrap(), output.as_os_str());
        assert!(job.preview().contains("clip\u{FFFD}.mov"));
    }

    #[test]
    fn test_preview() {
        let mut job = TranscodeJob::new();
        job.set_input("in.flv");
        assert_eq!(
            job.preview(),
            "ffmpeg -i in.flv -c:v libx265 -f mp4 -crf 30 -preset medium in.mp4"
        );
    }
}
