use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use log::{debug, info};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Command;
use tokio::task::JoinHandle;
use crate::error::{TranscodeError, TranscodeResult};
use crate::job::TranscodeJob;

/// Result of a successful encoder run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub elapsed: Duration,
}

/// Resolve the encoder binary.
///
/// A value with a directory part must point at an existing file. A bare
/// name is looked up in each `PATH` entry, the way a shell would.
pub fn locate_encoder(bin: &Path) -> TranscodeResult<PathBuf> {
    let not_found = || TranscodeError::EncoderNotFound(bin.display().to_string());

    if bin.as_os_str().is_empty() {
        return Err(not_found());
    }

    if bin.is_absolute() || bin.components().count() > 1 {
        return if is_executable(bin) {
            Ok(bin.to_path_buf())
        } else {
            Err(not_found())
        };
    }

    let path_var = std::env::var_os("PATH").ok_or_else(not_found)?;
    std::env::split_paths(&path_var)
        .flat_map(|dir| candidates(&dir, bin))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(not_found)
}

fn candidates(dir: &Path, bin: &Path) -> Vec<PathBuf> {
    let plain = dir.join(bin);
    let suffix = std::env::consts::EXE_SUFFIX;
    if suffix.is_empty() || bin.extension().is_some() {
        vec![plain]
    } else {
        let mut with_suffix = plain.clone().into_os_string();
        with_suffix.push(suffix);
        vec![plain, PathBuf::from(with_suffix)]
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Run the encoder for one job and wait for it to finish.
///
/// The encoder's stdout and stderr are relayed to ours while it runs.
/// Nothing is launched unless the encoder resolves and an input is set.
pub async fn run(job: &TranscodeJob) -> TranscodeResult<RunSummary> {
    let encoder = locate_encoder(job.encoder_bin())?;

    if !job.has_input() {
        return Err(TranscodeError::MissingInput);
    }

    let output = job.output_path();
    info!("Transcoding {} -> {}", job.input().display(), output.display());
    info!("Executing: {}", job.preview());

    let started = Instant::now();
    let mut child = Command::new(&encoder)
        .args(job.build_args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| TranscodeError::Spawn {
            bin: encoder.display().to_string(),
            source,
        })?;

    let stdout_relay = child
        .stdout
        .take()
        .map(|out| relay("stdout", out, tokio::io::stdout()));
    let stderr_relay = child
        .stderr
        .take()
        .map(|err| relay("stderr", err, tokio::io::stderr()));

    let status = match child.wait().await {
        Ok(status) => status,
        Err(e) => {
            for handle in [&stdout_relay, &stderr_relay].into_iter().flatten() {
                handle.abort();
            }
            return Err(TranscodeError::Wait(e));
        }
    };

    for handle in [stdout_relay, stderr_relay].into_iter().flatten() {
        finish_relay(handle).await?;
    }

    if !status.success() {
        return Err(TranscodeError::EncoderFailed {
            input: job.input().to_path_buf(),
            code: status.code(),
        });
    }

    let elapsed = started.elapsed();
    info!("Finished {} in {:.1}s", output.display(), elapsed.as_secs_f64());

    Ok(RunSummary { output, elapsed })
}

type RelayHandle = JoinHandle<(&'static str, std::io::Result<u64>)>;

/// Copy one child stream to one of our streams on its own task
fn relay<R, W>(stream: &'static str, mut reader: R, mut writer: W) -> RelayHandle
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move { (stream, tokio::io::copy(&mut reader, &mut writer).await) })
}

async fn finish_relay(handle: RelayHandle) -> TranscodeResult<()> {
    match handle.await {
        Ok((_, Ok(bytes))) => {
            debug!("Relay finished after {} bytes", bytes);
            Ok(())
        }
        Ok((stream, Err(source))) => Err(TranscodeError::Relay { stream, source }),
        Err(join_err) => Err(TranscodeError::Relay {
            stream: "output",
            source: std::io::Error::other(join_err),
        }),
    }
}
