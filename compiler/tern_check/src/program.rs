//! The checked program handed to code generation.

use crate::instance::{Instance, InstanceArena, InstanceId};
use crate::symbols::{ParsedFile, Symbol, SymbolKind, SymbolTable};

/// Symbols and instances of a checked program.
///
/// Generated code initializes every global variable before any other item,
/// so declarations are exposed in two groups: [`Program::variables`] and
/// [`Program::items`], each in file and declaration order.
#[derive(Debug)]
pub struct Program<'ast> {
    files: &'ast [ParsedFile],
    symbols: SymbolTable<'ast>,
    instances: InstanceArena,
}

impl<'ast> Program<'ast> {
    pub(crate) fn new(files: &'ast [ParsedFile], symbols: SymbolTable<'ast>, instances: InstanceArena) -> Self {
        Program {
            files,
            symbols,
            instances,
        }
    }

    pub fn files(&self) -> &'ast [ParsedFile] {
        self.files
    }

    pub fn symbols(&self) -> &SymbolTable<'ast> {
        &self.symbols
    }

    pub fn symbol(&self, path: &str) -> Option<&Symbol<'ast>> {
        self.symbols.lookup(path)
    }

    pub fn instances(&self) -> &InstanceArena {
        &self.instances
    }

    pub fn instance(&self, id: InstanceId) -> &Instance {
        self.instances.get(id)
    }

    /// Instances of the symbol at `path` reachable from checked code, in
    /// ordinal order.
    ///
    /// Instances only created while probing a piped-call candidate or an
    /// inference hint are left out.
    pub fn instances_of(&self, path: &str) -> Vec<(InstanceId, &Instance)> {
        let Some(symbol) = self.symbols.lookup(path) else {
            return Vec::new();
        };
        self.instances
            .iter()
            .filter(|(_, instance)| instance.symbol == symbol.id && instance.is_used())
            .collect()
    }

    /// Global variables.
    pub fn variables(&self) -> impl Iterator<Item = &Symbol<'ast>> {
        self.symbols
            .iter()
            .filter(|symbol| symbol.kind == SymbolKind::Variable)
    }

    /// Functions, structs and enums.
    pub fn items(&self) -> impl Iterator<Item = &Symbol<'ast>> {
        self.symbols
            .iter()
            .filter(|symbol| symbol.kind != SymbolKind::Variable)
    }
}
