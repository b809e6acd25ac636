use std::os::unix::process::ExitStatusExt;
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout};

use crate::constants::{CAPTURE_CHUNK_BYTES, OUTPUT_DRAIN_GRACE_MS};
use crate::core::{
    domain::Artifact,
    traits::runner::{RunError, RunResult, Runner},
};

/// Runs an artifact as a fresh child process per call.
#[derive(Clone, Debug)]
pub struct NativeRunner {
    max_output_bytes: usize,
}

impl NativeRunner {
    pub fn new(max_output_bytes: usize) -> Self {
        Self { max_output_bytes }
    }
}

#[async_trait::async_trait]
impl Runner for NativeRunner {
    #[tracing::instrument(skip(self, artifact, stdin), fields(submission_id = %artifact.submission_id))]
    async fn run(
        &self,
        artifact: &Artifact,
        stdin: &str,
        time_limit: Duration,
    ) -> Result<RunResult, RunError> {
        let mut cmd = Command::new(&artifact.path);
        if let Some(dir) = artifact.path.parent() {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start_time = Instant::now();
        let mut child = cmd.spawn().map_err(|e| RunError::FailedToLaunch {
            msg: format!("Failed to spawn {}: {}", artifact.path.display(), e),
        })?;

        // Input goes in from its own task so a program that never reads
        // stdin cannot stall the timeout below.
        let stdin_task = child.stdin.take().map(|mut pipe| {
            let input = format!("{}\n", stdin);
            tokio::spawn(async move {
                if let Err(e) = pipe.write_all(input.as_bytes()).await {
                    tracing::debug!("Stdin was not fully consumed: {}", e);
                }
            })
        });
        let stdout_task = child
            .stdout
            .take()
            .map(|pipe| spawn_capture(pipe, self.max_output_bytes, "stdout"));
        let stderr_task = child
            .stderr
            .take()
            .map(|pipe| spawn_capture(pipe, self.max_output_bytes, "stderr"));

        let (status, timed_out) = match timeout(time_limit, child.wait()).await {
            Ok(status) => {
                let status = status.map_err(|e| RunError::FailedToLaunch {
                    msg: format!("Failed to wait for process: {}", e),
                })?;
                (Some(status), false)
            }
            Err(_) => {
                tracing::debug!("Time limit of {:?} exceeded, killing process", time_limit);
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill timed out process: {}", e);
                }
                (child.try_wait().ok().flatten(), true)
            }
        };
        let execution_time = start_time.elapsed();

        if let Some(task) = stdin_task {
            task.abort();
        }
        let stdout = collect(stdout_task).await;
        let stderr = collect(stderr_task).await;

        Ok(RunResult {
            status: status.and_then(|s| s.code()),
            signal: status.and_then(|s| s.signal()),
            stdout,
            stderr,
            execution_time,
            timed_out,
        })
    }
}

type Captured = Arc<Mutex<Vec<u8>>>;

fn spawn_capture<R>(pipe: R, limit: usize, stream: &'static str) -> (JoinHandle<()>, Captured)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let captured = Captured::default();
    let task = tokio::spawn(capture(pipe, limit, stream, captured.clone()));
    (task, captured)
}

/// Keeps up to `limit` bytes and discards the rest, so the child never
/// blocks on a full pipe.
async fn capture<R>(mut pipe: R, limit: usize, stream: &'static str, captured: Captured)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; CAPTURE_CHUNK_BYTES];
    let mut discarded = 0usize;

    loop {
        let read = match pipe.read(&mut chunk).await {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", stream, e);
                break;
            }
        };

        let mut buf = captured.lock().unwrap_or_else(PoisonError::into_inner);
        let kept = read.min(limit.saturating_sub(buf.len()));
        buf.extend_from_slice(&chunk[..kept]);
        discarded += read - kept;
    }

    if discarded > 0 {
        tracing::warn!(
            "{} exceeded {} bytes, {} bytes discarded",
            stream,
            limit,
            discarded
        );
    }
}

/// Waits briefly for a capture task, then keeps whatever it has read. The
/// pipe stays open past the child's exit only if the program left a
/// descendant holding it.
async fn collect(task: Option<(JoinHandle<()>, Captured)>) -> String {
    let Some((mut task, captured)) = task else {
        return String::new();
    };

    match timeout(Duration::from_millis(OUTPUT_DRAIN_GRACE_MS), &mut task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("Output capture task failed: {}", e),
        Err(_) => {
            tracing::warn!("Output pipe still open after process exit, keeping output read so far");
            task.abort();
        }
    }

    let buf = captured.lock().unwrap_or_else(PoisonError::into_inner);
    String::from_utf8_lossy(&buf).into_owned()
}
