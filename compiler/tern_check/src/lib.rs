//! Semantic analysis for Tern.
//!
//! This crate turns parsed files into a checked [`Program`]:
//! - Symbol collection and module resolution ([`symbols`])
//! - Lazy generic instantiation with memoization ([`instance`])
//! - Bidirectional type checking into the typed IR ([`tir`])
//! - Pattern decomposition and exhaustiveness ([`patterns`])
//!
//! # Passes
//!
//! [`check_program`] runs three strictly ordered passes over the whole
//! program: name collection, context collection, and checking from the
//! non-generic roots. Instantiation is pull-based; a generic declaration
//! that no checked code references is never checked, and its errors are
//! never reported.
//!
//! # Failure
//!
//! A failed instance stays in the arena. Consumers must consult
//! [`CheckOutput::diagnostics`] before trusting any instance.

mod check;
mod config;
pub mod instance;
pub mod patterns;
mod program;
mod scope;
pub mod symbols;
pub mod tir;

use tern_diagnostic::{Diagnostics, Message};

pub use config::{CheckConfig, MatchPolicy};
pub use instance::{Instance, InstanceArena, InstanceId, InstanceRef};
pub use program::Program;
pub use symbols::{ParsedFile, Symbol, SymbolId, SymbolKind, SymbolTable};

/// Result of a check step; the error aborts checking of the current instance.
pub type CheckResult<T> = Result<T, Message>;

/// A checked program and everything reported while checking it.
#[derive(Debug)]
pub struct CheckOutput<'ast> {
    pub program: Program<'ast>,
    pub diagnostics: Diagnostics,
}

impl CheckOutput<'_> {
    pub fn success(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Collect, resolve and check `files`.
#[tracing::instrument(level = "debug", skip_all, fields(files = files.len()))]
pub fn check_program<'ast>(files: &'ast [ParsedFile], config: &CheckConfig) -> CheckOutput<'ast> {
    let mut diagnostics = Diagnostics::new();
    let mut symbols = symbols::collect_names(files, &mut diagnostics);
    symbols::collect_symbols(&mut symbols, files);

    let mut checker = check::Checker::new(&symbols, config, diagnostics);
    checker.check_roots();
    let (instances, diagnostics) = checker.finish();

    tracing::debug!(
        instances = instances.len(),
        errors = diagnostics.error_count(),
        "checking complete"
    );
    CheckOutput {
        program: Program::new(files, symbols, instances),
        diagnostics,
    }
}
