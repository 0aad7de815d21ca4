pub mod batch;
pub mod config;
pub mod container;
pub mod error;
pub mod ffmpeg;
pub mod job;
pub mod naming;
pub mod preset;
pub mod scan;

pub use batch::{run_batch, BatchReport, FailurePolicy, JobOutcome, JobStatus};
pub use config::TranscodeConfig;
pub use error::{TranscodeError, TranscodeResult};
pub use job::TranscodeJob;
pub use preset::Preset;
