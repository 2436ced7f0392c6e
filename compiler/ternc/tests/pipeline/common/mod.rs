//! Shared fixtures for pipeline tests.

use std::collections::BTreeMap;

use tern_check::SymbolKind;
use tern_diagnostic::{ErrorCode, Message};
use tern_ir::{AstBuilder, Decl, FileId, SourceMap};
use ternc::{compile, Backend, CompileOptions, CompileOutput, ParseOutput, Parser, Program};

/// Serves prepared parse results by path and records which paths it saw.
#[derive(Default)]
pub struct FixtureParser {
    outputs: BTreeMap<String, ParseOutput>,
    pub seen: Vec<String>,
}

impl FixtureParser {
    /// The prepared output for `path`.
    pub fn outputs_mut(&mut self, path: &str) -> &mut ParseOutput {
        self.outputs.get_mut(path).unwrap()
    }
}

impl Parser for FixtureParser {
    fn parse(&mut self, _file: FileId, path: &str, _text: &str) -> ParseOutput {
        self.seen.push(path.to_string());
        self.outputs.get(path).cloned().unwrap_or_default()
    }
}

/// Emits one line per used instance: variables first, then everything else.
#[derive(Default)]
pub struct ListingBackend {
    pub calls: usize,
    pub fail_with: Option<Message>,
}

impl Backend for ListingBackend {
    fn generate(&mut self, program: &Program<'_>) -> Result<String, Vec<Message>> {
        self.calls += 1;
        if let Some(message) = &self.fail_with {
            return Err(vec![message.clone()]);
        }
        let mut lines = Vec::new();
        for symbol in program.variables().chain(program.items()) {
            let keyword = match symbol.kind {
                SymbolKind::Function => "fun",
                SymbolKind::Struct => "struct",
                SymbolKind::Enum => "enum",
                SymbolKind::Variable => "val",
            };
            for (_, instance) in program.instances_of(&symbol.path) {
                lines.push(format!(
                    "{keyword} {}#{} [{}]",
                    symbol.path, instance.ordinal, instance.key
                ));
            }
        }
        Ok(lines.join("\n"))
    }
}

/// Sources plus the trees the fixture parser returns for them.
#[derive(Default)]
pub struct Project {
    pub sources: SourceMap,
    pub parser: FixtureParser,
    pub backend: ListingBackend,
    pub options: CompileOptions,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// A project with a single file `main.tn`.
    pub fn single(text: &str, build: impl FnOnce(&AstBuilder) -> Vec<Decl>) -> Self {
        let mut project = Self::new();
        project.file("main.tn", text, build);
        project
    }

    /// Add a file whose parse yields the declarations built by `build`.
    pub fn file(
        &mut self,
        path: &str,
        text: &str,
        build: impl FnOnce(&AstBuilder) -> Vec<Decl>,
    ) -> FileId {
        let id = self.sources.add(path, text).unwrap();
        let decls = build(&AstBuilder::new(id));
        self.parser
            .outputs
            .insert(path.to_string(), ParseOutput::parsed(decls));
        id
    }

    /// Add a file whose parse is aborted with a syntax error.
    pub fn broken_file(&mut self, path: &str, text: &str) -> FileId {
        let id = self.sources.add(path, text).unwrap();
        let error = Message::error(ErrorCode::E1001, "Unexpected token '}'")
            .with_code(AstBuilder::new(id).span());
        self.parser
            .outputs
            .insert(path.to_string(), ParseOutput::failed(vec![error]));
        id
    }

    pub fn compile(&mut self) -> CompileOutput {
        compile(
            &self.sources,
            &mut self.parser,
            &mut self.backend,
            &self.options,
        )
    }
}

pub fn codes(output: &CompileOutput) -> Vec<ErrorCode> {
    output.messages.iter().map(Message::code).collect()
}

pub fn headlines(output: &CompileOutput) -> Vec<&str> {
    output
        .messages
        .iter()
        .filter_map(Message::headline)
        .collect()
}

pub fn listing(output: &CompileOutput) -> Vec<&str> {
    output
        .code
        .as_deref()
        .map(|code| code.lines().collect())
        .unwrap_or_default()
}
