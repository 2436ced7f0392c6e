//! Interfaces to the parser and code generator.

use tern_check::Program;
use tern_diagnostic::Message;
use tern_ir::{Decl, FileId};

/// What a parser produced for one file.
#[derive(Clone, Debug, Default)]
pub struct ParseOutput {
    /// Top-level declarations in source order, or `None` if the parse was
    /// aborted. An aborted file's symbols are absent from the program.
    pub decls: Option<Vec<Decl>>,
    /// Lexical and syntax messages. Warnings do not block checking.
    pub messages: Vec<Message>,
}

impl ParseOutput {
    pub fn parsed(decls: Vec<Decl>) -> Self {
        ParseOutput {
            decls: Some(decls),
            messages: Vec::new(),
        }
    }

    pub fn failed(messages: Vec<Message>) -> Self {
        ParseOutput {
            decls: None,
            messages,
        }
    }
}

/// Turns source text into declarations.
///
/// Paths in the produced tree must be exactly as written; name resolution
/// belongs to the checker. Every node's span must point into `file`.
pub trait Parser {
    fn parse(&mut self, file: FileId, path: &str, text: &str) -> ParseOutput;
}

/// Turns a checked program into target code.
///
/// Called only for programs without errors. Instances are selected through
/// the `(path, ordinal)` stamps in the typed tree.
pub trait Backend {
    fn generate(&mut self, program: &Program<'_>) -> Result<String, Vec<Message>>;
}
