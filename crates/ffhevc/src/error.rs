use std::path::PathBuf;
use thiserror::Error;

/// Failures that can stop a single transcode job
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Encoder '{0}' not found. Install ffmpeg or set the encoder path.")]
    EncoderNotFound(String),

    #[error("No input file set")]
    MissingInput,

    #[error("Failed to start encoder '{bin}': {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for encoder: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Encoder failed for {} ({})", .input.display(), describe_exit(.code))]
    EncoderFailed { input: PathBuf, code: Option<i32> },

    #[error("Failed to relay encoder {stream}: {source}")]
    Relay {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory {}: {source}", .dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

pub type TranscodeResult<T> = Result<T, TranscodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TranscodeError::EncoderNotFound("ffmpeg".to_string());
        assert!(err.to_string().contains("'ffmpeg' not found"));

        let err = TranscodeError::EncoderFailed {
            input: PathBuf::from("/x/clip.mov"),
            code: Some(1),
        };
        assert!(err.to_string().contains("/x/clip.mov"));
        assert!(err.to_string().contains("exit code 1"));

        let err = TranscodeError::EncoderFailed {
            input: PathBuf::from("clip.mov"),
            code: None,
        };
        assert!(err.to_string().contains("signal"));
    }
}
