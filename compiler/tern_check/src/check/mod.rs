//! Bidirectional type checker and generic instantiation engine.
//!
//! Checking is pull-based. [`Checker::check_roots`] instantiates every
//! non-generic symbol; each instance resolves its signature, checks its body
//! and thereby instantiates whatever it references. A generic declaration
//! that no checked code references is never checked.
//!
//! # Module Structure
//!
//! - `instantiate`: instance creation, memoization and type-argument inference
//! - `types`: resolution of type annotations
//! - `expr`: expressions, paths, operators, lambdas
//! - `call`: calls, constructors and piped calls
//! - `cycles`: initialization cycles between global variables
//! - `stmt`: statements and blocks
//! - `pattern`: match patterns and exhaustiveness reporting
//!
//! # Diagnostics
//!
//! Recoverable errors travel as `Err(Message)` and abort checking of the
//! current instance. Messages that do not abort (a failed function body,
//! unhandled match values) are emitted into the innermost buffer. Each
//! instance collects its own buffer while it is created and reports it on its
//! first non-speculative use, so probing a candidate never leaks or loses a
//! diagnostic.

mod call;
mod cycles;
mod expr;
mod instantiate;
mod pattern;
mod stmt;
mod types;

use std::rc::Rc;

use rustc_hash::FxHashSet;
use tern_diagnostic::{Diagnostics, ErrorCode, Message};
use tern_ir::Span;
use tern_types::{accepts, Type, TypeKind};

use crate::config::CheckConfig;
use crate::instance::{InstanceArena, InstanceId};
use crate::patterns::ShapeSource;
use crate::scope::Scope;
use crate::symbols::{ModuleContext, SymbolKind, SymbolTable};
use crate::CheckResult;

pub(crate) use instantiate::Request;

/// Module context and lexical scope of the code being checked.
#[derive(Clone, Debug)]
pub(crate) struct Env {
    pub ctx: Rc<ModuleContext>,
    pub scope: Scope,
}

impl Env {
    /// Same module context, nested block scope.
    pub fn child(&self) -> Env {
        Env {
            ctx: Rc::clone(&self.ctx),
            scope: self.scope.child(),
        }
    }

    /// Resolve a written path in this environment.
    pub fn expand(&self, symbols: &SymbolTable<'_>, path: &str) -> String {
        symbols.expand(path, &self.ctx, self.scope.type_args())
    }
}

/// Checker state for one program.
pub struct Checker<'a, 'ast> {
    symbols: &'a SymbolTable<'ast>,
    config: &'a CheckConfig,
    arena: InstanceArena,
    /// Instances whose creation has started but not finished.
    in_flight: FxHashSet<InstanceId>,
    /// One buffer per instance under construction, plus one per speculation.
    buffers: Vec<Vec<Message>>,
    diagnostics: Diagnostics,
    speculating: bool,
    /// Nesting of generic instance creation.
    depth: usize,
}

impl<'a, 'ast> Checker<'a, 'ast> {
    pub fn new(
        symbols: &'a SymbolTable<'ast>,
        config: &'a CheckConfig,
        diagnostics: Diagnostics,
    ) -> Self {
        Checker {
            symbols,
            config,
            arena: InstanceArena::default(),
            in_flight: FxHashSet::default(),
            buffers: Vec::new(),
            diagnostics,
            speculating: false,
            depth: 0,
        }
    }

    /// Instantiate every non-generic symbol in declaration order.
    #[tracing::instrument(level = "debug", skip_all, fields(symbols = self.symbols.len()))]
    pub fn check_roots(&mut self) {
        let symbols = self.symbols;
        for symbol in symbols.iter().filter(|symbol| !symbol.is_generic()) {
            let request = Request::new(symbol.span(), &symbol.path, SymbolKind::ALL)
                .with_type_args(Some(Vec::new()));
            if let Err(message) = self.instantiate(request) {
                self.emit(message);
            }
        }
        self.check_global_cycles();
        tracing::debug!(
            instances = self.arena.len(),
            errors = self.diagnostics.error_count(),
            "root checking complete"
        );
    }

    pub fn finish(self) -> (InstanceArena, Diagnostics) {
        (self.arena, self.diagnostics)
    }

    /// Report a message that does not abort the current instance.
    fn emit(&mut self, message: Message) {
        match self.buffers.last_mut() {
            Some(buffer) => buffer.push(message),
            None => {
                self.diagnostics.push(message);
            }
        }
    }

    /// Run `f` without committing its diagnostics or marking instances used.
    ///
    /// Instances created inside stay cached; they report their diagnostics
    /// when something uses them for real.
    fn speculate<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let was_speculating = std::mem::replace(&mut self.speculating, true);
        self.buffers.push(Vec::new());
        let result = f(self);
        let discarded = self.buffers.pop().map_or(0, |buffer| buffer.len());
        tracing::trace!(discarded, "speculation finished");
        self.speculating = was_speculating;
        result
    }

    /// Fail unless `expected` accepts `got`.
    fn expect_type(&self, expected: &Type, got: &Type, site: Span) -> CheckResult<()> {
        if accepts(expected, got) {
            return Ok(());
        }
        Err(Message::error(
            ErrorCode::E2001,
            format!("Expected type '{expected}', but got '{got}'"),
        )
        .with_code(site)
        .with_noted_code(format!("'{expected}' originates from here:"), expected.origin)
        .with_noted_code(format!("'{got}' originates from here:"), got.origin))
    }
}

impl ShapeSource for Checker<'_, '_> {
    fn struct_members(&mut self, ty: &Type) -> Option<Vec<(String, Type)>> {
        let TypeKind::Struct { path, args, .. } = &ty.kind else {
            return None;
        };
        let request = Request::new(ty.origin, path, &[SymbolKind::Struct])
            .with_type_args(Some(args.clone()));
        let id = self.instantiate(request).ok()??;
        self.arena.get(id).members().map(<[_]>::to_vec)
    }

    fn enum_variants(&mut self, ty: &Type) -> Option<Vec<(String, Type)>> {
        let TypeKind::Enum { path, args } = &ty.kind else {
            return None;
        };
        let request = Request::new(ty.origin, path, &[SymbolKind::Enum])
            .with_type_args(Some(args.clone()));
        let id = self.instantiate(request).ok()??;
        self.arena.get(id).variants().map(<[_]>::to_vec)
    }
}

/// `1 argument`, `2 arguments`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn was_were(n: usize) -> &'static str {
    if n == 1 {
        "was"
    } else {
        "were"
    }
}
