//! Pipeline stage boundary interfaces
//!
//! This module defines trait-based abstractions for the two pipeline stages:
//! - Compile (external compiler invocation)
//! - Execute (running the produced artifact)
//!
//! These interfaces let the orchestration logic be exercised with stage
//! doubles (for example, proving the execute stage is never reached after a
//! compile failure) without spawning real processes. The default
//! implementations are `std::process`-backed and define the shipped behavior.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::process::{CapturedOutput, invoke};

/// Environment failures, distinct from stage failures.
///
/// A stage failure means the code under test is broken (compiler rejected the
/// source, or the artifact crashed). A `HarnessError` means the environment
/// is broken: missing inputs, missing compiler, an artifact that was never
/// produced. The two must never be conflated in reporting.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("source file not found: {0}")]
    SourceMissing(PathBuf),

    #[error("compiler '{path}' could not be invoked: {source}")]
    CompilerUnavailable { path: PathBuf, source: io::Error },

    #[error("compiler reported success but produced no artifact at {0}")]
    ArtifactMissing(PathBuf),

    #[error("artifact '{path}' could not be executed: {source}")]
    ArtifactUnavailable { path: PathBuf, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// Compile Stage Interface
// ============================================================================

/// Invoke the external compiler on one source file.
///
/// Contract: `<compiler> <source> <output>` as a literal argument vector, no
/// shell interpretation, streams captured. Zero exit status is the sole
/// definition of success; the returned [`CapturedOutput`] carries the
/// diagnostics either way.
pub trait Compiler {
    fn compile(&self, source: &Path, output: &Path) -> Result<CapturedOutput, HarnessError>;
}

// ============================================================================
// Execute Stage Interface
// ============================================================================

/// Execute a compiled artifact and capture its streams.
///
/// Contract: `<artifact>` with no arguments, no shell, streams captured.
pub trait ArtifactRunner {
    fn run(&self, artifact: &Path) -> Result<CapturedOutput, HarnessError>;
}

// ============================================================================
// Default Implementations
// ============================================================================

/// Process-backed compile stage: spawns the configured compiler binary.
pub struct ProcessCompiler {
    compiler: PathBuf,
}

impl ProcessCompiler {
    pub fn new(compiler: impl Into<PathBuf>) -> Self {
        Self {
            compiler: compiler.into(),
        }
    }
}

impl Compiler for ProcessCompiler {
    fn compile(&self, source: &Path, output: &Path) -> Result<CapturedOutput, HarnessError> {
        let args: [OsString; 2] = [source.into(), output.into()];
        invoke(self.compiler.as_os_str(), args).map_err(|e| {
            // A spawn failure is the environment's fault, not the source's
            HarnessError::CompilerUnavailable {
                path: self.compiler.clone(),
                source: e,
            }
        })
    }
}

/// Process-backed execute stage: spawns the artifact directly.
pub struct ProcessRunner;

impl ArtifactRunner for ProcessRunner {
    fn run(&self, artifact: &Path) -> Result<CapturedOutput, HarnessError> {
        invoke(artifact.as_os_str(), Vec::<OsString>::new()).map_err(|e| {
            HarnessError::ArtifactUnavailable {
                path: artifact.to_path_buf(),
                source: e,
            }
        })
    }
}
