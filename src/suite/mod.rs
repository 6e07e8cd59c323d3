//! Multi-case suite runner
//!
//! Generalizes the single smoke test to a list of (source, expected output)
//! cases driving repeated runs of the same two-stage pipeline. Cases come
//! from a JSON manifest:
//!
//! ```json
//! {
//!   "compiler": "./fgc",
//!   "cases": [
//!     { "name": "hello", "source": "examples/helloworld.fg", "expected_stdout": "hello world" }
//!   ]
//! }
//! ```
//!
//! Source paths are resolved relative to the manifest's directory. Each case
//! compiles into its own artifact inside a per-run scratch directory so cases
//! cannot clobber one another. Cases run strictly in order, one at a time.
//!
//! ## SuiteReporter Trait
//!
//! The runner reports through a `SuiteReporter` trait to separate reporting
//! from execution. Implement it for custom output formats (JSON, TAP, etc.);
//! the default `ConsoleReporter` prints pytest-style lines.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;

use crate::harness::interfaces::HarnessError;
use crate::harness::{SmokeConfig, Verdict, run_smoke_test};

/// One entry in a suite manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub name: String,
    /// Source file, relative to the manifest directory
    pub source: PathBuf,
    /// Optional content comparison against the artifact's stdout
    #[serde(default)]
    pub expected_stdout: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    /// Compiler binary, relative to the manifest directory (CLI flag wins)
    #[serde(default)]
    compiler: Option<PathBuf>,
    cases: Vec<TestCase>,
}

/// Errors that abort a suite run.
///
/// Individual stage failures (compile/execute) do not abort; they are counted
/// and reported. Environment problems do abort, since every following case
/// would hit the same broken environment.
#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("failed to read manifest '{path}': {source}")]
    ManifestRead { path: PathBuf, source: std::io::Error },

    #[error("failed to parse manifest '{path}': {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("manifest '{0}' contains no cases")]
    EmptyManifest(PathBuf),

    #[error("case '{name}': {source}")]
    Environment { name: String, source: HarnessError },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for a suite run.
#[derive(Debug, Default, Clone)]
pub struct SuiteOptions {
    /// Override the manifest's compiler path
    pub compiler: Option<PathBuf>,
    pub verbose: bool,
    /// Stop after the first failing case
    pub stop_on_fail: bool,
}

/// Aggregate result of a suite run.
#[derive(Debug)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration: Duration,
}

// ============================================================================
// Suite Reporter Trait
// ============================================================================

/// Trait for reporting suite execution results.
pub trait SuiteReporter {
    /// Called after the manifest is loaded
    fn on_collection_complete(&mut self, _case_count: usize) {}

    /// Called before a case runs
    fn on_case_start(&mut self, _case: &TestCase) {}

    /// Called when a case completes
    fn on_case_complete(&mut self, case: &TestCase, verdict: &Verdict);

    /// Called when all cases have completed
    fn on_run_complete(&mut self, summary: &SuiteSummary);
}

/// Default console reporter (pytest-style).
#[derive(Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl SuiteReporter for ConsoleReporter {
    fn on_collection_complete(&mut self, case_count: usize) {
        println!("collected {} case(s)", case_count);
        println!();
    }

    fn on_case_complete(&mut self, case: &TestCase, verdict: &Verdict) {
        let status = match verdict {
            Verdict::Pass(_) => "\x1b[32mPASSED\x1b[0m".to_string(),
            Verdict::CompileFailed(_) => "\x1b[31mFAILED\x1b[0m (compile)".to_string(),
            Verdict::ExecuteFailed(_) => "\x1b[31mFAILED\x1b[0m (execute)".to_string(),
            Verdict::Mismatch { .. } => "\x1b[31mFAILED\x1b[0m (output mismatch)".to_string(),
        };
        println!("{} {}", case.name, status);

        // Failure details: the failing stage's raw streams, no interpretation
        match verdict {
            Verdict::CompileFailed(out) | Verdict::ExecuteFailed(out) => {
                let stdout = out.stdout_lossy();
                let stderr = out.stderr_lossy();
                if !stdout.is_empty() {
                    println!("{}", stdout.trim_end());
                }
                if !stderr.is_empty() {
                    eprintln!("{}", stderr.trim_end());
                }
            }
            Verdict::Mismatch { expected, actual } => {
                println!("  expected: {:?}", String::from_utf8_lossy(expected));
                println!("  actual:   {:?}", actual.stdout_lossy());
            }
            Verdict::Pass(out) => {
                if self.verbose && !out.stdout.is_empty() {
                    println!("{}", out.stdout_lossy().trim_end());
                }
            }
        }
    }

    fn on_run_complete(&mut self, summary: &SuiteSummary) {
        println!();
        let color = if summary.failed > 0 {
            "\x1b[1;31m"
        } else {
            "\x1b[1;32m"
        };
        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if parts.is_empty() {
            parts.push("0 run".to_string());
        }
        println!(
            "{}====== {} in {:.2}s ======\x1b[0m",
            color,
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}

// ============================================================================
// Suite execution
// ============================================================================

/// Run every case in the manifest, reporting to the console.
pub fn run_suite(manifest_path: &Path, opts: &SuiteOptions) -> Result<SuiteSummary, SuiteError> {
    let mut reporter = ConsoleReporter::new(opts.verbose);
    run_suite_with_reporter(manifest_path, opts, &mut reporter)
}

/// Run every case in the manifest with a caller-supplied reporter.
pub fn run_suite_with_reporter(
    manifest_path: &Path,
    opts: &SuiteOptions,
    reporter: &mut dyn SuiteReporter,
) -> Result<SuiteSummary, SuiteError> {
    let start = Instant::now();
    let manifest = load_manifest(manifest_path)?;
    if manifest.cases.is_empty() {
        return Err(SuiteError::EmptyManifest(manifest_path.to_path_buf()));
    }

    let base_dir = manifest_path.parent().unwrap_or(Path::new("."));
    let compiler = opts
        .compiler
        .clone()
        .or_else(|| manifest.compiler.as_ref().map(|c| base_dir.join(c)))
        .unwrap_or_else(|| PathBuf::from(crate::harness::DEFAULT_COMPILER));

    let scratch_dir = scratch_dir()?;

    reporter.on_collection_complete(manifest.cases.len());

    let mut passed = 0;
    let mut failed = 0;
    let total = manifest.cases.len();

    for case in &manifest.cases {
        reporter.on_case_start(case);

        let mut config = SmokeConfig::new(base_dir.join(&case.source))
            .with_compiler(&compiler)
            .with_output(scratch_dir.join(&case.name));
        if let Some(expected) = &case.expected_stdout {
            config = config.with_expected_stdout(expected.as_bytes());
        }

        let verdict = run_smoke_test(&config).map_err(|e| SuiteError::Environment {
            name: case.name.clone(),
            source: e,
        })?;

        if verdict.is_pass() {
            passed += 1;
        } else {
            failed += 1;
        }
        reporter.on_case_complete(case, &verdict);

        if opts.stop_on_fail && !verdict.is_pass() {
            break;
        }
    }

    let summary = SuiteSummary {
        total,
        passed,
        failed,
        duration: start.elapsed(),
    };
    reporter.on_run_complete(&summary);
    Ok(summary)
}

fn load_manifest(path: &Path) -> Result<Manifest, SuiteError> {
    let text = fs::read_to_string(path).map_err(|e| SuiteError::ManifestRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| SuiteError::ManifestParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Per-run artifact directory under the system temp dir.
///
/// Keyed by process id so concurrent fgtest invocations do not collide; cases
/// within one run are sequential by construction.
fn scratch_dir() -> std::io::Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("fgtest_{}", std::process::id()));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

// ============================================================================
// Tests
// ============================================================================
