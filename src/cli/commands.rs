//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, Write};
use std::path::PathBuf;

use crate::harness::process::CapturedOutput;
use crate::harness::{SmokeConfig, Verdict, run_smoke_test};
use crate::suite::{SuiteOptions, run_suite};

use super::{CliError, CliResult, ExitCode};

/// Run one smoke test: compile, execute, classify.
pub fn run_case(
    source: PathBuf,
    output: PathBuf,
    compiler: PathBuf,
    expect: Option<String>,
    verbose: bool,
) -> CliResult<ExitCode> {
    let mut config = SmokeConfig::new(source)
        .with_compiler(compiler)
        .with_output(output);
    if let Some(expected) = expect {
        config = config.with_expected_stdout(expected.into_bytes());
    }

    let verdict = run_smoke_test(&config).map_err(|e| CliError::environment(e.to_string()))?;

    match verdict {
        Verdict::Pass(out) => {
            if verbose && !out.stdout.is_empty() {
                // Show what the artifact printed, bytes untouched
                let _ = io::stdout().write_all(&out.stdout);
            }
            println!("Done");
            Ok(ExitCode::SUCCESS)
        }
        Verdict::CompileFailed(out) => {
            report_stage_failure(&out);
            Err(CliError::new("", ExitCode::COMPILE_FAILED))
        }
        Verdict::ExecuteFailed(out) => {
            report_stage_failure(&out);
            Err(CliError::new("", ExitCode::EXECUTE_FAILED))
        }
        Verdict::Mismatch { expected, actual } => Err(CliError::new(
            format!(
                "output mismatch\n  expected: {:?}\n  actual:   {:?}",
                String::from_utf8_lossy(&expected),
                actual.stdout_lossy()
            ),
            ExitCode::MISMATCH,
        )),
    }
}

/// Surface a failed stage's captured streams verbatim: stdout bytes to our
/// stdout, stderr bytes to our stderr, no added interpretation.
fn report_stage_failure(out: &CapturedOutput) {
    let _ = io::stdout().write_all(&out.stdout);
    let _ = io::stdout().flush();
    let _ = io::stderr().write_all(&out.stderr);
}

/// Run every case in a suite manifest.
pub fn run_suite_cmd(
    manifest: PathBuf,
    compiler: Option<PathBuf>,
    verbose: bool,
    stop_on_fail: bool,
) -> CliResult<ExitCode> {
    let opts = SuiteOptions {
        compiler,
        verbose,
        stop_on_fail,
    };

    // Stage failures are reported per-case by the reporter and land in the
    // summary; anything surfacing here aborted the run (manifest problems,
    // broken environment).
    let summary = run_suite(&manifest, &opts).map_err(|e| CliError::environment(e.to_string()))?;

    if summary.failed > 0 {
        // Per-case output already printed by the reporter
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
