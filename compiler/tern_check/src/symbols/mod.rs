//! Symbol table and module resolver.
//!
//! Collection runs in two passes over every file, tracking the current module
//! and usage map as `mod` and `use` directives are scanned in order:
//!
//! 1. [`collect_names`] registers every struct, enum, function and variable at
//!    its fully-qualified path.
//! 2. [`collect_symbols`] attaches to each symbol a snapshot of the module
//!    context (module path and usage map) in effect at its declaration.
//!
//! Wildcard usages enumerate the paths registered in the first pass, so the
//! second pass sees symbols from every file.
//!
//! After collection the table is read-only.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tern_diagnostic::{Diagnostics, ErrorCode, Message};
use tern_ir::{Decl, DeclKind, FileId, Span, UsageItem};
use tern_types::Type;

use crate::CheckResult;

/// Declarations of one parsed file.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedFile {
    pub file: FileId,
    pub path: String,
    pub decls: Vec<Decl>,
}

/// Index of a symbol in its [`SymbolTable`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct SymbolId(u32);

impl SymbolId {
    pub(crate) const fn from_raw(raw: u32) -> Self {
        SymbolId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    Function,
    Struct,
    Enum,
    Variable,
}

impl SymbolKind {
    pub fn of(decl: &Decl) -> Option<Self> {
        match decl.kind {
            DeclKind::Function(_) => Some(SymbolKind::Function),
            DeclKind::Struct(_) => Some(SymbolKind::Struct),
            DeclKind::Enum(_) => Some(SymbolKind::Enum),
            DeclKind::Variable(_) => Some(SymbolKind::Variable),
            DeclKind::Module(_) | DeclKind::Usage(_) => None,
        }
    }

    /// Every kind; used when instantiating roots.
    pub const ALL: &'static [SymbolKind] = &[
        SymbolKind::Function,
        SymbolKind::Struct,
        SymbolKind::Enum,
        SymbolKind::Variable,
    ];
}

/// Module path and short-name aliases in effect at some point of a file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleContext {
    pub module: String,
    /// Short name to fully-qualified path.
    pub usages: FxHashMap<String, String>,
}

impl ModuleContext {
    /// `name` qualified with the current module.
    pub fn qualify(&self, name: &str) -> String {
        qualify(&self.module, name)
    }
}

fn qualify(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{module}::{name}")
    }
}

/// A declaration registered at a fully-qualified path.
#[derive(Clone, Debug)]
pub struct Symbol<'ast> {
    pub id: SymbolId,
    pub name: String,
    pub path: String,
    pub file: FileId,
    pub decl: &'ast Decl,
    pub kind: SymbolKind,
    /// Context snapshot at the declaration site.
    pub ctx: Rc<ModuleContext>,
}

impl<'ast> Symbol<'ast> {
    pub fn type_params(&self) -> &'ast [String] {
        self.decl.type_params()
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params().is_empty()
    }

    pub fn is_public(&self) -> bool {
        self.decl.is_public()
    }

    pub fn span(&self) -> Span {
        self.decl.span
    }

    /// Fail unless this symbol may be referenced from `from`.
    ///
    /// Public symbols are visible everywhere; private ones only inside the
    /// module that declares them.
    pub fn check_exposed(&self, site: Span, from: &ModuleContext) -> CheckResult<()> {
        if self.is_public() || self.ctx.module == from.module {
            return Ok(());
        }
        let path = &self.path;
        Err(Message::error(
            ErrorCode::E2009,
            format!("'{path}' is not public but accessed from a different module"),
        )
        .with_code(site)
        .with_noted_code(format!("'{path}' is defined here:"), self.span())
        .with_note(format!(
            "The access is in '{}', which is only valid if '{path}' is declared as public",
            display_module(&from.module)
        )))
    }
}

fn display_module(module: &str) -> &str {
    if module.is_empty() {
        "the root module"
    } else {
        module
    }
}

/// All symbols of a program, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable<'ast> {
    symbols: Vec<Symbol<'ast>>,
    by_path: FxHashMap<String, SymbolId>,
}

impl<'ast> SymbolTable<'ast> {
    pub fn get(&self, id: SymbolId) -> &Symbol<'ast> {
        &self.symbols[id.index()]
    }

    pub fn lookup(&self, path: &str) -> Option<&Symbol<'ast>> {
        self.by_path.get(path).map(|id| self.get(*id))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol<'ast>> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Resolve a written path to a fully-qualified one.
    ///
    /// The path relative to the current module wins if such a symbol exists.
    /// Otherwise the head segment is replaced: by the canonical path of a bound
    /// type argument first, then by a usage alias. A path nothing applies to is
    /// returned unchanged.
    pub fn expand(
        &self,
        path: &str,
        ctx: &ModuleContext,
        type_args: Option<&FxHashMap<String, Type>>,
    ) -> String {
        let in_module = ctx.qualify(path);
        if self.contains(&in_module) {
            return in_module;
        }
        let (head, rest) = match path.split_once("::") {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let expansion = type_args
            .and_then(|args| args.get(head))
            .map(|ty| ty.canonical_path().to_string())
            .or_else(|| ctx.usages.get(head).cloned());
        match (expansion, rest) {
            (None, _) => path.to_string(),
            (Some(expanded), None) => expanded,
            (Some(expanded), Some(rest)) => format!("{expanded}::{rest}"),
        }
    }

    fn insert(&mut self, symbol: Symbol<'ast>) {
        self.by_path.insert(symbol.path.clone(), symbol.id);
        self.symbols.push(symbol);
    }

    /// Alias the segment following `module` for every registered path under it.
    fn add_wildcard(&self, usages: &mut FxHashMap<String, String>, module: &str) {
        let prefix: Vec<&str> = module.split("::").collect();
        for symbol in &self.symbols {
            let segments: Vec<&str> = symbol.path.split("::").collect();
            if segments.len() <= prefix.len() || segments[..prefix.len()] != prefix[..] {
                continue;
            }
            let alias = segments[prefix.len()];
            usages.insert(alias.to_string(), segments[..=prefix.len()].join("::"));
        }
    }

    /// Context at the start of a file or right after `mod name`.
    fn fresh_context(&self, module: &str) -> ModuleContext {
        let mut ctx = ModuleContext {
            module: module.to_string(),
            usages: FxHashMap::default(),
        };
        self.add_wildcard(&mut ctx.usages, "std");
        if !module.is_empty() {
            self.add_wildcard(&mut ctx.usages, module);
        }
        ctx
    }

    fn apply_usage(&self, ctx: &mut ModuleContext, item: &UsageItem) {
        match item {
            UsageItem::Alias { name, path } => {
                ctx.usages.insert(name.clone(), path.clone());
            }
            UsageItem::Wildcard { module } => self.add_wildcard(&mut ctx.usages, module),
        }
    }
}

/// First collection pass: register every symbol-introducing declaration.
///
/// A second declaration at an already registered path is reported and
/// ignored; the first one stays authoritative.
#[tracing::instrument(level = "debug", skip_all, fields(files = files.len()))]
pub fn collect_names<'ast>(
    files: &'ast [ParsedFile],
    diagnostics: &mut Diagnostics,
) -> SymbolTable<'ast> {
    let mut table = SymbolTable::default();
    for file in files {
        let mut module = String::new();
        for decl in &file.decls {
            if let DeclKind::Module(name) = &decl.kind {
                module.clone_from(name);
                continue;
            }
            let (Some(kind), Some(name)) = (SymbolKind::of(decl), decl.name()) else {
                continue;
            };
            let path = qualify(&module, name);
            if let Some(existing) = table.lookup(&path) {
                diagnostics.push(
                    Message::error(
                        ErrorCode::E2006,
                        format!("The symbol '{path}' exists more than once"),
                    )
                    .with_code(decl.span)
                    .with_noted_code(format!("'{path}' is first declared here:"), existing.span())
                    .with_note("There may only be one symbol of the same name in the same module"),
                );
                continue;
            }
            let id = SymbolId::from_raw(u32::try_from(table.len()).unwrap_or(u32::MAX));
            table.insert(Symbol {
                id,
                name: name.to_string(),
                path,
                file: file.file,
                decl,
                kind,
                ctx: Rc::default(),
            });
        }
    }
    tracing::debug!(symbols = table.len(), "name collection complete");
    table
}

/// Second collection pass: attach module context snapshots.
#[tracing::instrument(level = "debug", skip_all, fields(symbols = table.len()))]
pub fn collect_symbols(table: &mut SymbolTable<'_>, files: &[ParsedFile]) {
    for file in files {
        let mut ctx = Rc::new(table.fresh_context(""));
        for decl in &file.decls {
            match &decl.kind {
                DeclKind::Module(name) => ctx = Rc::new(table.fresh_context(name)),
                DeclKind::Usage(items) => {
                    let mut updated = (*ctx).clone();
                    for item in items {
                        table.apply_usage(&mut updated, item);
                    }
                    ctx = Rc::new(updated);
                }
                DeclKind::Function(_)
                | DeclKind::Struct(_)
                | DeclKind::Enum(_)
                | DeclKind::Variable(_) => {
                    let Some(name) = decl.name() else { continue };
                    let path = ctx.qualify(name);
                    let Some(id) = table.by_path.get(&path).copied() else {
                        continue;
                    };
                    let symbol = &mut table.symbols[id.index()];
                    // Later duplicates were rejected in the first pass.
                    if std::ptr::eq(symbol.decl, decl) {
                        symbol.ctx = Rc::clone(&ctx);
                    }
                }
            }
        }
    }
    tracing::debug!("symbol collection complete");
}

#[cfg(test)]
mod tests;
