//! Run the external fetch command for one job: stdout discarded, stderr
//! captured, optional deadline enforced by polling.

use std::ffi::OsString;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use super::error::FetchFailure;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long a timed-out job waits for its stderr reader to hit EOF.
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Run `program args...` to completion. `Ok(())` iff it exited with status 0.
pub(super) fn run_command(
    program: &str,
    args: &[OsString],
    timeout: Option<Duration>,
) -> Result<(), FetchFailure> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| FetchFailure::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;

    // Drain stderr on its own thread so a chatty child never blocks on a full pipe.
    // The buffer is shared so a timed-out job can still report what was written.
    let captured = Arc::new(Mutex::new(Vec::new()));
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        let captured = Arc::clone(&captured);
        thread::spawn(move || {
            let mut chunk = [0u8; 4096];
            loop {
                match pipe.read(&mut chunk) {
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if let Ok(mut buf) = captured.lock() {
                            buf.extend_from_slice(&chunk[..n]);
                        }
                    }
                }
            }
        })
    });

    let waited = match timeout {
        Some(limit) => wait_with_deadline(&mut child, limit),
        None => child.wait().map(Some),
    };

    if let Some(reader) = stderr_reader {
        if matches!(waited, Ok(None)) {
            // A killed child may leave grandchildren holding the pipe; wait briefly only.
            let grace_end = Instant::now() + STDERR_GRACE;
            while !reader.is_finished() && Instant::now() < grace_end {
                thread::sleep(Duration::from_millis(10));
            }
            if reader.is_finished() {
                let _ = reader.join();
            }
        } else {
            let _ = reader.join();
        }
    }
    let diagnostic = captured
        .lock()
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default();

    match waited {
        Ok(Some(status)) if status.success() => Ok(()),
        Ok(Some(status)) => Err(FetchFailure::NonZeroExit {
            code: status.code(),
            diagnostic,
        }),
        Ok(None) => Err(FetchFailure::TimedOut {
            after: timeout.unwrap_or_default(),
            diagnostic,
        }),
        Err(e) => Err(FetchFailure::NonZeroExit {
            code: None,
            diagnostic: format!("waiting for fetch command failed: {}", e),
        }),
    }
}

/// Poll the child until it exits or `limit` elapses. On expiry the child is
/// killed and reaped, and `Ok(None)` is returned.
fn wait_with_deadline(child: &mut Child, limit: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            if let Err(e) = child.kill() {
                tracing::warn!(error = %e, "failed to kill timed-out fetch command");
            }
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<OsString> {
        vec!["-c".into(), script.into()]
    }

    #[test]
    fn zero_exit_is_ok() {
        assert!(run_command("/bin/sh", &sh("exit 0"), None).is_ok());
    }

    #[test]
    fn non_zero_exit_captures_stderr_not_stdout() {
        let err = run_command(
            "/bin/sh",
            &sh("echo noise; echo 'hash mismatch' >&2; exit 3"),
            None,
        )
        .unwrap_err();
        match err {
            FetchFailure::NonZeroExit { code, diagnostic } => {
                assert_eq!(code, Some(3));
                assert_eq!(diagnostic.trim(), "hash mismatch");
            }
            other => panic!("expected NonZeroExit, got {:?}", other),
        }
    }

    #[test]
    fn missing_program_is_spawn_failure() {
        let err = run_command("/nonexistent/lockfetch-fetcher", &[], None).unwrap_err();
        assert!(matches!(err, FetchFailure::Spawn { .. }));
    }

    #[test]
    fn deadline_kills_child() {
        let start = Instant::now();
        let err = run_command(
            "/bin/sh",
            &sh("exec sleep 10"),
            Some(Duration::from_millis(200)),
        )
        .unwrap_err();
        assert!(matches!(err, FetchFailure::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn timed_out_job_keeps_stderr_written_so_far() {
        let err = run_command(
            "/bin/sh",
            &sh("echo 'resolving numpy' >&2; exec sleep 10"),
            Some(Duration::from_millis(300)),
        )
        .unwrap_err();
        match err {
            FetchFailure::TimedOut { after, diagnostic } => {
                assert_eq!(after, Duration::from_millis(300));
                assert_eq!(diagnostic.trim(), "resolving numpy");
            }
            other => panic!("expected TimedOut, got {:?}", other),
        }
    }
}
