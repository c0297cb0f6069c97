//! Child process execution with streamed output and a hard timeout.

use super::{ProcessRunner, ProcessSpec};
use crate::error::{BundlerError, CliError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Default timeout for a single tool invocation (30 minutes)
/// Decompiling large APKs with jadx can take a long time
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(1800);

/// Number of stderr lines kept in error messages
const STDERR_TAIL: usize = 20;

/// Process runner backed by `tokio::process`.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_PROCESS_TIMEOUT)
    }
}

impl CommandRunner {
    /// Creates a runner that kills commands running longer than `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn failure(spec: &ProcessSpec, reason: String) -> BundlerError {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: spec.command_line(),
            reason,
        })
    }
}

#[async_trait]
impl ProcessRunner for CommandRunner {
    async fn run_process(&self, spec: &ProcessSpec) -> Result<()> {
        log::info!("{}", spec.report);
        log::debug!("[{}] {}", spec.name, spec.command_line());

        let mut child = Command::new(&spec.command)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Self::failure(spec, e.to_string()))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both streams must be drained before the exit status is trusted
        let streams = async {
            tokio::join!(
                async {
                    if let Some(stdout) = stdout {
                        for_each_line(stdout, |line| log::info!("[{}] {}", spec.name, line)).await;
                    }
                },
                async {
                    let mut captured = Vec::new();
                    if let Some(stderr) = stderr {
                        for_each_line(stderr, |line| {
                            log::debug!("[{}] {}", spec.name, line);
                            captured.push(line);
                        })
                        .await;
                    }
                    captured
                }
            )
        };

        let outcome = tokio::time::timeout(self.timeout, async {
            let (_, stderr_lines) = streams.await;
            let status = child.wait().await;
            (status, stderr_lines)
        })
        .await;

        let (status, stderr_lines) = match outcome {
            Ok((Ok(status), stderr_lines)) => (status, stderr_lines),
            Ok((Err(e), _)) => return Err(Self::failure(spec, e.to_string())),
            Err(_elapsed) => {
                log::warn!(
                    "[{}] timed out after {} seconds, terminating...",
                    spec.name,
                    self.timeout.as_secs()
                );
                if let Err(e) = child.kill().await {
                    log::warn!("[{}] failed to kill process: {}", spec.name, e);
                }
                return Err(Self::failure(
                    spec,
                    format!("timed out after {} seconds", self.timeout.as_secs()),
                ));
            }
        };

        if status.success() {
            return Ok(());
        }

        let tail_start = stderr_lines.len().saturating_sub(STDERR_TAIL);
        let tail = stderr_lines[tail_start..].join("\n");
        Err(Self::failure(
            spec,
            match status.code() {
                Some(code) => format!("exit code {}\n{}", code, tail),
                None => format!("terminated by signal\n{}", tail),
            },
        ))
    }
}

/// Feeds every line of `stream` to `on_line` until EOF.
///
/// Lines are decoded lossily so tool output in a legacy encoding never stops
/// the drain. On a read error the rest of the stream is discarded, keeping
/// the pipe open so the child is not killed by `SIGPIPE`.
async fn for_each_line<R>(stream: R, mut on_line: impl FnMut(String))
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                on_line(line.trim_end_matches(['\n', '\r']).to_string());
            }
            Err(e) => {
                log::debug!("output stream read failed ({}), discarding the rest", e);
                if let Err(e) = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await {
                    log::debug!("discarding output failed: {}", e);
                }
                break;
            }
        }
    }
}
