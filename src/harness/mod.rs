//! Two-stage smoke-test pipeline
//!
//! The pipeline is strictly sequential: compile the source with the external
//! compiler, and only if that exits 0, execute the produced artifact. Each
//! stage is a blocking child-process invocation with captured streams. There
//! is no retry and no timeout; the first failure is terminal for the run.
//!
//! ## Modules
//!
//! - `process` - child invocation and stream capture
//! - `interfaces` - trait seams for the two stages
//!
//! ## Design
//!
//! The runner returns an explicit [`Verdict`] instead of signalling failure
//! through error propagation: a compiler rejection or a crashing artifact is
//! an expected, classified outcome. Only environment problems (missing
//! source, missing compiler, artifact never produced) travel the `Err` arm
//! as [`HarnessError`].

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod interfaces;
pub mod process;

use std::path::{Path, PathBuf};

use interfaces::{ArtifactRunner, Compiler, HarnessError, ProcessCompiler, ProcessRunner};
use process::CapturedOutput;

/// Compiler binary used when none is configured.
pub const DEFAULT_COMPILER: &str = "./fgc";

/// Artifact path used when none is configured.
pub const DEFAULT_OUTPUT: &str = "./testout";

/// Configuration for one smoke test.
///
/// Modeled as an explicit struct rather than free constants so callers (and
/// the suite runner) can parameterize repeated runs.
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    /// Path to the external compiler binary
    pub compiler: PathBuf,
    /// Source file handed to the compiler
    pub source: PathBuf,
    /// Path the compiler is asked to write the artifact to
    pub output: PathBuf,
    /// When set, the artifact's stdout must equal these bytes exactly.
    /// Off by default; exit-status checking alone decides the verdict.
    pub expected_stdout: Option<Vec<u8>>,
}

impl SmokeConfig {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            compiler: PathBuf::from(DEFAULT_COMPILER),
            source: source.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            expected_stdout: None,
        }
    }

    pub fn with_compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = compiler.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Enable the optional content comparison against the artifact's stdout.
    pub fn with_expected_stdout(mut self, expected: impl Into<Vec<u8>>) -> Self {
        self.expected_stdout = Some(expected.into());
        self
    }
}

/// Classified outcome of one smoke test.
#[derive(Debug)]
pub enum Verdict {
    /// Both stages exited 0 (and the content comparison, if enabled, matched).
    /// Carries the artifact's captured streams for reporting.
    Pass(CapturedOutput),
    /// The compiler exited non-zero; the execute stage never ran.
    CompileFailed(CapturedOutput),
    /// The artifact exited non-zero.
    ExecuteFailed(CapturedOutput),
    /// Both stages exited 0 but the artifact's stdout differed from the
    /// expected bytes (content comparison enabled).
    Mismatch {
        expected: Vec<u8>,
        actual: CapturedOutput,
    },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass(_))
    }

    /// Short label for log lines and suite reporting.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass(_) => "pass",
            Verdict::CompileFailed(_) => "compile failed",
            Verdict::ExecuteFailed(_) => "execute failed",
            Verdict::Mismatch { .. } => "output mismatch",
        }
    }
}

/// Run one smoke test with the process-backed stages.
pub fn run_smoke_test(config: &SmokeConfig) -> Result<Verdict, HarnessError> {
    let compiler = ProcessCompiler::new(&config.compiler);
    run_pipeline(&compiler, &ProcessRunner, config)
}

/// Drive the two-stage pipeline over arbitrary stage implementations.
///
/// Invariant: `runner` is not touched unless `compiler` reported a zero exit
/// status and the artifact exists on disk.
pub fn run_pipeline<C, R>(
    compiler: &C,
    runner: &R,
    config: &SmokeConfig,
) -> Result<Verdict, HarnessError>
where
    C: Compiler,
    R: ArtifactRunner,
{
    // Pre-flight so a missing input reads as an environment problem instead
    // of whatever the compiler happens to print about it.
    if !config.source.exists() {
        return Err(HarnessError::SourceMissing(config.source.clone()));
    }

    tracing::debug!(source = %config.source.display(), "compile stage");
    let compiled = compiler.compile(&config.source, &config.output)?;
    if !compiled.success {
        tracing::debug!(exit_code = ?compiled.exit_code, "compile stage failed");
        return Ok(Verdict::CompileFailed(compiled));
    }

    // A zero-exit compiler that wrote nothing must not read as a pass, and
    // must not be misreported as the artifact failing to run.
    if !artifact_present(&config.output) {
        tracing::warn!(output = %config.output.display(), "compiler exited 0 without producing an artifact");
        return Err(HarnessError::ArtifactMissing(config.output.clone()));
    }

    tracing::debug!(artifact = %config.output.display(), "execute stage");
    let executed = runner.run(&config.output)?;
    if !executed.success {
        tracing::debug!(exit_code = ?executed.exit_code, "execute stage failed");
        return Ok(Verdict::ExecuteFailed(executed));
    }

    if let Some(expected) = &config.expected_stdout {
        if executed.stdout != *expected {
            return Ok(Verdict::Mismatch {
                expected: expected.clone(),
                actual: executed,
            });
        }
    }

    Ok(Verdict::Pass(executed))
}

fn artifact_present(output: &Path) -> bool {
    output.exists()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Compile stage double with a scripted exit status.
    struct FakeCompiler {
        exit_code: i32,
        stderr: &'static [u8],
        /// Create the artifact on success, like a real compiler would
        produce_artifact: bool,
        calls: Cell<usize>,
    }

    impl FakeCompiler {
        fn succeeding() -> Self {
            Self {
                exit_code: 0,
                stderr: b"",
                produce_artifact: true,
                calls: Cell::new(0),
            }
        }

        fn failing(stderr: &'static [u8]) -> Self {
            Self {
                exit_code: 1,
                stderr,
                produce_artifact: false,
                calls: Cell::new(0),
            }
        }
    }

    impl Compiler for FakeCompiler {
        fn compile(&self, _source: &Path, output: &Path) -> Result<CapturedOutput, HarnessError> {
            self.calls.set(self.calls.get() + 1);
            if self.produce_artifact {
                std::fs::write(output, b"").unwrap();
            }
            Ok(CapturedOutput {
                success: self.exit_code == 0,
                exit_code: Some(self.exit_code),
                stdout: Vec::new(),
                stderr: self.stderr.to_vec(),
            })
        }
    }

    /// Execute stage double that records whether it was ever invoked.
    struct SpyRunner {
        exit_code: i32,
        stdout: &'static [u8],
        calls: Cell<usize>,
    }

    impl SpyRunner {
        fn new(exit_code: i32, stdout: &'static [u8]) -> Self {
            Self {
                exit_code,
                stdout,
                calls: Cell::new(0),
            }
        }
    }

    impl ArtifactRunner for SpyRunner {
        fn run(&self, _artifact: &Path) -> Result<CapturedOutput, HarnessError> {
            self.calls.set(self.calls.get() + 1);
            Ok(CapturedOutput {
                success: self.exit_code == 0,
                exit_code: Some(self.exit_code),
                stdout: self.stdout.to_vec(),
                stderr: Vec::new(),
            })
        }
    }

    fn scratch_config(dir: &tempfile::TempDir) -> SmokeConfig {
        let source = dir.path().join("hello.fg");
        std::fs::write(&source, "print \"hello world\"\n").unwrap();
        SmokeConfig::new(source).with_output(dir.path().join("testout"))
    }

    #[test]
    fn both_stages_zero_is_pass() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(&dir);
        let compiler = FakeCompiler::succeeding();
        let runner = SpyRunner::new(0, b"hello world");

        let verdict = run_pipeline(&compiler, &runner, &config).unwrap();
        assert!(verdict.is_pass());
        assert_eq!(compiler.calls.get(), 1);
        assert_eq!(runner.calls.get(), 1);
    }

    #[test]
    fn compile_failure_short_circuits_execute_stage() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(&dir);
        let compiler = FakeCompiler::failing(b"syntax error at line 1\n");
        let runner = SpyRunner::new(0, b"");

        let verdict = run_pipeline(&compiler, &runner, &config).unwrap();
        match verdict {
            Verdict::CompileFailed(out) => {
                assert_eq!(out.stderr, b"syntax error at line 1\n");
                assert_eq!(out.exit_code, Some(1));
            }
            other => panic!("expected CompileFailed, got {other:?}"),
        }
        assert_eq!(runner.calls.get(), 0, "execute stage must never run");
    }

    #[test]
    fn artifact_exit_nonzero_is_execute_failure_with_exact_streams() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(&dir);
        let compiler = FakeCompiler::succeeding();
        // Non-UTF-8 bytes must survive capture untouched
        let runner = SpyRunner::new(42, b"partial \xff output");

        let verdict = run_pipeline(&compiler, &runner, &config).unwrap();
        match verdict {
            Verdict::ExecuteFailed(out) => {
                assert_eq!(out.exit_code, Some(42));
                assert_eq!(out.stdout, b"partial \xff output");
            }
            other => panic!("expected ExecuteFailed, got {other:?}"),
        }
    }

    #[test]
    fn missing_source_is_environment_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = SmokeConfig::new(dir.path().join("nonexistent.fg"))
            .with_output(dir.path().join("testout"));
        let compiler = FakeCompiler::succeeding();
        let runner = SpyRunner::new(0, b"");

        let err = run_pipeline(&compiler, &runner, &config).unwrap_err();
        assert!(matches!(err, HarnessError::SourceMissing(_)));
        assert_eq!(compiler.calls.get(), 0);
        assert_eq!(runner.calls.get(), 0);
    }

    #[test]
    fn zero_exit_without_artifact_is_artifact_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(&dir);
        let compiler = FakeCompiler {
            exit_code: 0,
            stderr: b"",
            produce_artifact: false,
            calls: Cell::new(0),
        };
        let runner = SpyRunner::new(0, b"");

        let err = run_pipeline(&compiler, &runner, &config).unwrap_err();
        assert!(matches!(err, HarnessError::ArtifactMissing(_)));
        assert_eq!(runner.calls.get(), 0);
    }

    #[test]
    fn content_comparison_disabled_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(&dir);
        let compiler = FakeCompiler::succeeding();
        let runner = SpyRunner::new(0, b"anything at all");

        let verdict = run_pipeline(&compiler, &runner, &config).unwrap();
        assert!(verdict.is_pass());
    }

    #[test]
    fn content_comparison_flags_mismatch_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(&dir).with_expected_stdout(&b"hello world"[..]);
        let compiler = FakeCompiler::succeeding();
        let runner = SpyRunner::new(0, b"goodbye world");

        let verdict = run_pipeline(&compiler, &runner, &config).unwrap();
        match verdict {
            Verdict::Mismatch { expected, actual } => {
                assert_eq!(expected, b"hello world");
                assert_eq!(actual.stdout, b"goodbye world");
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }

    #[test]
    fn content_comparison_matching_output_is_pass() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(&dir).with_expected_stdout(&b"hello world"[..]);
        let compiler = FakeCompiler::succeeding();
        let runner = SpyRunner::new(0, b"hello world");

        let verdict = run_pipeline(&compiler, &runner, &config).unwrap();
        assert!(verdict.is_pass());
    }

    #[test]
    fn rerun_with_same_inputs_yields_same_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let config = scratch_config(&dir);
        let compiler = FakeCompiler::succeeding();
        let runner = SpyRunner::new(0, b"hello world");

        let first = run_pipeline(&compiler, &runner, &config).unwrap();
        let second = run_pipeline(&compiler, &runner, &config).unwrap();
        assert_eq!(first.label(), second.label());
    }
}
