// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The external index process.
//!
//! stdout is read in fixed-size chunks on a background task and forwarded
//! over a bounded channel; stderr is drained into the log.

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::SearchError;

/// Bytes requested per stdout read.
const READ_CHUNK: usize = 8 * 1024;
/// Chunks buffered between the reader task and the session.
const CHUNK_BACKLOG: usize = 16;

/// Stream of stdout chunks. An `Err` item ends the stream.
pub type ChunkReceiver = mpsc::Receiver<io::Result<Vec<u8>>>;

/// Lifecycle control over a running producer.
#[async_trait]
pub trait ProducerControl: Send {
    /// Asks the producer to exit (SIGTERM on Unix).
    fn request_stop(&mut self) -> io::Result<()>;

    /// Kills the producer outright.
    fn force_kill(&mut self) -> io::Result<()>;

    /// Waits for the producer to exit and logs its status.
    async fn reap(&mut self);
}

/// A spawned `program [args..] <term>` process.
pub struct ChildProducer {
    program: String,
    child: Child,
}

impl ChildProducer {
    /// Spawns the producer and starts forwarding its output.
    pub fn spawn(
        program: &str,
        args: &[String],
        term: &str,
    ) -> Result<(Self, ChunkReceiver), SearchError> {
        let mut child = Command::new(program)
            .args(args)
            .arg(term)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SearchError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or(SearchError::NoStdout)?;
        let (tx, rx) = mpsc::channel(CHUNK_BACKLOG);
        tokio::spawn(read_stdout(stdout, tx));
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(drain_stderr(stderr, program.to_string()));
        }

        info!(program, pid = child.id(), "search producer started");
        Ok((
            Self {
                program: program.to_string(),
                child,
            },
            rx,
        ))
    }
}

#[async_trait]
impl ProducerControl for ChildProducer {
    #[cfg(unix)]
    fn request_stop(&mut self) -> io::Result<()> {
        // `id()` is None once the child has been reaped.
        let Some(pid) = self.child.id() else {
            return Ok(());
        };
        let pid = libc::pid_t::try_from(pid)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        // SAFETY: kill(2) has no memory-safety preconditions; pid belongs to
        // our unreaped child.
        if unsafe { libc::kill(pid, libc::SIGTERM) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(not(unix))]
    fn request_stop(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }

    fn force_kill(&mut self) -> io::Result<()> {
        match self.child.start_kill() {
            // Already exited.
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
            other => other,
        }
    }

    async fn reap(&mut self) {
        match self.child.wait().await {
            Ok(status) if status.success() => {
                debug!(program = %self.program, "search producer exited")
            }
            Ok(status) => {
                warn!(program = %self.program, %status, "search producer exited abnormally")
            }
            Err(e) => warn!(program = %self.program, error = %e, "waiting on search producer failed"),
        }
    }
}

async fn read_stdout(mut stdout: ChildStdout, tx: mpsc::Sender<io::Result<Vec<u8>>>) {
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        match stdout.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(Ok(buf[..n].to_vec())).await.is_err() {
                    // Session finished; stop reading.
                    break;
                }
            }
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                break;
            }
        }
    }
}

async fn drain_stderr(stderr: ChildStderr, program: String) {
    let mut reader = BufReader::new(stderr);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                debug!(program = %program, "stderr: {}", text.trim_end());
            }
            Err(e) => {
                warn!(program = %program, error = %e, "stderr read failed");
                break;
            }
        }
    }
}
