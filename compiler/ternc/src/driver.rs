//! The compile pipeline.

use std::io::IsTerminal;

use tern_check::{check_program, CheckConfig, CheckOutput, ParsedFile};
use tern_diagnostic::{ColorMode, Diagnostics, Message};
use tern_ir::SourceMap;

use crate::{Backend, Parser};

/// Options for one compilation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub check: CheckConfig,
    /// Carried into [`CompileOutput`] for rendering.
    pub color: ColorMode,
}

/// Result of [`compile`].
#[derive(Clone, Debug)]
pub struct CompileOutput {
    /// `true` if no error was reported and the backend produced code.
    pub success: bool,
    /// Every message in report order, without duplicates.
    pub messages: Vec<Message>,
    pub code: Option<String>,
    pub color: ColorMode,
}

impl CompileOutput {
    /// Render all messages against `sources`, separated by blank lines.
    pub fn render(&self, sources: &SourceMap) -> String {
        let colored = self.color.should_use_colors(std::io::stderr().is_terminal());
        self.messages
            .iter()
            .map(|message| message.render(sources, colored))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn errors(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|message| message.is_error())
    }
}

/// Parse, check and generate code for every file in `sources`.
///
/// Blank files are skipped without consulting the parser.
#[tracing::instrument(level = "debug", skip_all, fields(files = sources.len()))]
pub fn compile(
    sources: &SourceMap,
    parser: &mut impl Parser,
    backend: &mut impl Backend,
    options: &CompileOptions,
) -> CompileOutput {
    let mut diagnostics = Diagnostics::new();
    let files = parse_all(sources, parser, &mut diagnostics);

    let CheckOutput {
        program,
        diagnostics: found,
    } = check_program(&files, &options.check);
    diagnostics.extend(found.into_messages());

    if diagnostics.has_errors() {
        tracing::debug!(errors = diagnostics.error_count(), "skipping code generation");
        return CompileOutput {
            success: false,
            messages: diagnostics.into_messages(),
            code: None,
            color: options.color,
        };
    }

    let code = match backend.generate(&program) {
        Ok(code) => Some(code),
        Err(messages) => {
            tracing::debug!(messages = messages.len(), "code generation failed");
            diagnostics.extend(messages);
            None
        }
    };
    CompileOutput {
        success: code.is_some() && !diagnostics.has_errors(),
        messages: diagnostics.into_messages(),
        code,
        color: options.color,
    }
}

fn parse_all(sources: &SourceMap, parser: &mut impl Parser, diagnostics: &mut Diagnostics) -> Vec<ParsedFile> {
    let mut files = Vec::with_capacity(sources.len());
    for source in sources.files() {
        if source.is_blank() {
            tracing::trace!(path = %source.path, "skipping blank file");
            continue;
        }
        let output = parser.parse(source.id, &source.path, &source.text);
        diagnostics.extend(output.messages);
        match output.decls {
            Some(decls) => files.push(ParsedFile {
                file: source.id,
                path: source.path.clone(),
                decls,
            }),
            None => tracing::debug!(path = %source.path, "parse aborted; file excluded"),
        }
    }
    files
}
