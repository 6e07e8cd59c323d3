//! Child process invocation with captured streams
//!
//! Both pipeline stages go through [`invoke`]: spawn the program with a
//! literal argument vector (never a shell command line), block until it
//! terminates, and keep its stdout/stderr as raw bytes for diagnostic
//! reporting. Streams are never passed through to the caller's console.

use std::ffi::OsStr;
use std::io;
use std::process::Command;

/// Outcome of one child-process invocation.
///
/// Stdout and stderr are retained byte-for-byte; callers that want text go
/// through the lossy helpers. Success is defined solely as a zero exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Raw exit code, if the process exited normally (None if killed by signal)
    pub exit_code: Option<i32>,
    /// Captured standard output, unmodified
    pub stdout: Vec<u8>,
    /// Captured standard error, unmodified
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    /// Stdout decoded for display (invalid UTF-8 replaced).
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Stderr decoded for display (invalid UTF-8 replaced).
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}

impl From<std::process::Output> for CapturedOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Run `program` with the given arguments, blocking until it exits.
///
/// The argument vector is passed to the OS as-is; nothing is interpreted by a
/// shell. Spawn failures (program missing, not executable) surface as the
/// underlying `io::Error` so callers can classify them as environment
/// problems rather than stage failures.
pub fn invoke<I, S>(program: &OsStr, args: I) -> io::Result<CapturedOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program).args(args).output()?;
    Ok(output.into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[cfg(unix)]
    #[test]
    fn invoke_captures_stdout_exactly() {
        let out = invoke(OsStr::new("/bin/sh"), ["-c", "printf 'hello world'"]).unwrap();
        assert!(out.success);
        assert_eq!(out.exit_code, Some(0));
        assert_eq!(out.stdout, b"hello world");
        assert!(out.stderr.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn invoke_reports_nonzero_exit() {
        let out = invoke(OsStr::new("/bin/sh"), ["-c", "echo oops >&2; exit 3"]).unwrap();
        assert!(!out.success);
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.stderr, b"oops\n");
    }

    #[test]
    fn invoke_missing_program_is_io_error() {
        let err = invoke(
            OsStr::new("/definitely/not/a/real/program"),
            Vec::<OsString>::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
