#![forbid(unsafe_code)]
//! fgtest - smoke-test harness for the fgc compiler
//!
//! fgtest drives a two-stage pipeline against an externally-built compiler:
//! invoke the compiler on a source file, then execute the binary it produced,
//! and classify the outcome by process exit status. The compiler itself, the
//! language it compiles, and the programs under test are all external
//! collaborators; this crate only orchestrates and reports.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `harness` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod harness;
pub mod suite;
pub mod version;

pub use harness::interfaces::{ArtifactRunner, Compiler, HarnessError, ProcessCompiler, ProcessRunner};
pub use harness::process::CapturedOutput;
pub use harness::{SmokeConfig, Verdict, run_smoke_test};
pub use suite::{SuiteOptions, SuiteSummary, run_suite};
