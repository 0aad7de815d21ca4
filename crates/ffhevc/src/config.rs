use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use crate::job::{TranscodeJob, DEFAULT_CONTAINER, DEFAULT_CRF, DEFAULT_ENCODER_BIN, DEFAULT_VIDEO_CODEC};
use crate::preset::Preset;

/// Batch defaults, loadable from a JSON or TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Encoder binary, a bare name is searched on PATH
    pub encoder_bin: PathBuf,
    /// Output directory; unset means next to each input
    pub output_dir: Option<PathBuf>,
    /// Video codec passed through `-c:v`
    pub video_codec: String,
    /// Output container, used for `-f` and the derived file suffix
    pub container: String,
    /// Constant rate factor
    pub crf: u32,
    pub preset: Preset,
    /// Insert `_<codec>` into derived output names
    pub tag_codec: bool,
    /// Pass `-f <container>` to the encoder
    pub format_flag: bool,
    /// Skip dot-files when scanning directories
    pub ignore_hidden: bool,
    /// Keep going after a failed file instead of aborting the batch
    pub keep_going: bool,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl TranscodeConfig {
    pub fn default_config() -> Self {
        Self {
            encoder_bin: PathBuf::from(DEFAULT_ENCODER_BIN),
            output_dir: None,
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            crf: DEFAULT_CRF,
            preset: Preset::default(),
            tag_codec: false,
            format_flag: true,
            ignore_hidden: true,
            keep_going: false,
        }
    }

    /// Read settings from `path`; a missing path or file yields the defaults.
    ///
    /// `.toml` files are parsed as TOML, anything else as JSON.
    pub fn load_config(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) if path.exists() => path,
            _ => return Ok(Self::default_config()),
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let parsed: Result<Self> = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(anyhow::Error::from),
            _ => serde_json::from_str(&content).map_err(anyhow::Error::from),
        };
        parsed.with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Build a job template carrying these settings, with no input set
    pub fn job_template(&self) -> TranscodeJob {
        let mut job = TranscodeJob::new();
        job.set_encoder_bin(&self.encoder_bin);
        if let Some(dir) = &self.output_dir {
            job.set_output_dir(dir);
        }
        job.set_video_codec(&self.video_codec);
        job.set_container(&self.container);
        job.set_crf(self.crf);
        job.set_preset(self.preset);
        job.set_tag_codec(self.tag_codec);
        job.set_format_flag(self.format_flag);
        job
    }
}
