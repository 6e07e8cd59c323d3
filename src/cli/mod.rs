//! CLI module for fgtest
//!
//! ## Commands
//!
//! - `run <file>` - Compile a source file and execute the artifact
//! - `suite <manifest>` - Run every case in a JSON suite manifest
//!
//! ## Exit codes
//!
//! The reference workflow died via an unhandled error; fgtest instead maps
//! each outcome class to a distinct code so scripts can branch:
//!
//! - `0` - all stages passed
//! - `1` - compile stage failed
//! - `2` - execute stage failed
//! - `3` - environment failure (missing source/compiler/artifact)
//! - `4` - artifact output did not match the expected string
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::harness::{DEFAULT_COMPILER, DEFAULT_OUTPUT};
use crate::version::FGTEST_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// Generic failure, used by `suite` when any case failed
    pub const FAILURE: ExitCode = ExitCode(1);
    pub const COMPILE_FAILED: ExitCode = ExitCode(1);
    pub const EXECUTE_FAILED: ExitCode = ExitCode(2);
    pub const ENVIRONMENT: ExitCode = ExitCode(3);
    pub const MISMATCH: ExitCode = ExitCode(4);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (may be empty if output was already printed)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create an environment-failure error (exit code 3).
    pub fn environment(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::ENVIRONMENT)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Smoke-test harness for the fgc compiler
#[derive(Parser, Debug)]
#[command(name = "fgtest")]
#[command(version = FGTEST_VERSION)]
#[command(about = "Smoke-test harness for the fgc compiler", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a source file and execute the artifact
    Run {
        /// Source file to compile
        #[arg(value_name = "FILE")]
        source: PathBuf,
        /// Path the compiler writes the artifact to
        #[arg(short = 'o', long = "output", value_name = "PATH", default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Compiler binary to invoke
        #[arg(long, value_name = "PATH", default_value = DEFAULT_COMPILER)]
        compiler: PathBuf,
        /// Require the artifact's stdout to equal this string exactly
        #[arg(long = "expect", value_name = "STRING")]
        expect: Option<String>,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run every case in a JSON suite manifest
    Suite {
        /// Path to the suite manifest
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Compiler binary (overrides the manifest)
        #[arg(long, value_name = "PATH")]
        compiler: Option<PathBuf>,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Stop on first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            source,
            output,
            compiler,
            expect,
            verbose,
        } => commands::run_case(source, output, compiler, expect, verbose),
        Command::Suite {
            manifest,
            compiler,
            verbose,
            stop_on_fail,
        } => commands::run_suite_cmd(manifest, compiler, verbose, stop_on_fail),
    }
}

// ============================================================================
// Tests
// ============================================================================
