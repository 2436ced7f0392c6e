//! Message and section model.

use std::fmt;

use tern_ir::Span;

use crate::ErrorCode;

/// Severity of a text section.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// One part of a [`Message`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Section {
    Error(String),
    Warning(String),
    Note(String),
    /// Source excerpt, rendered from the source map at display time.
    Code(Span),
}

impl Section {
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Section::Error(_) => Some(Severity::Error),
            Section::Warning(_) => Some(Severity::Warning),
            Section::Note(_) => Some(Severity::Note),
            Section::Code(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Section::Error(text) | Section::Warning(text) | Section::Note(text) => Some(text),
            Section::Code(_) => None,
        }
    }
}

/// A diagnostic: an error code and an ordered list of sections.
///
/// Only messages containing an `Error` section fail a compilation.
///
/// # Example
///
/// ```
/// use tern_diagnostic::{ErrorCode, Message};
/// use tern_ir::{FileId, Span};
///
/// let site = Span::new(FileId::from_raw(0), 4, 9);
/// let msg = Message::error(ErrorCode::E2003, "Unknown variable 'count'")
///     .with_code(site)
///     .with_note("Variables must be declared before use");
/// assert!(msg.is_error());
/// assert_eq!(msg.primary_span(), Some(site));
/// ```
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use]
pub struct Message {
    code: ErrorCode,
    sections: Vec<Section>,
}

impl Message {
    /// Message starting with an error section.
    pub fn error(code: ErrorCode, text: impl Into<String>) -> Self {
        Message {
            code,
            sections: vec![Section::Error(text.into())],
        }
    }

    /// Message starting with a warning section.
    pub fn warning(code: ErrorCode, text: impl Into<String>) -> Self {
        Message {
            code,
            sections: vec![Section::Warning(text.into())],
        }
    }

    /// A checker bug or a collaborator contract violation.
    pub fn internal(text: impl Into<String>) -> Self {
        Message::error(
            ErrorCode::E9001,
            format!("(INTERNAL ERROR) {}", text.into()),
        )
    }

    /// Append a source excerpt.
    pub fn with_code(mut self, span: Span) -> Self {
        self.sections.push(Section::Code(span));
        self
    }

    /// Append a note.
    pub fn with_note(mut self, text: impl Into<String>) -> Self {
        self.sections.push(Section::Note(text.into()));
        self
    }

    /// Append a note followed by a source excerpt.
    pub fn with_noted_code(self, text: impl Into<String>, span: Span) -> Self {
        self.with_note(text).with_code(span)
    }

    /// Append arbitrary sections.
    pub fn with_sections(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        self.sections.extend(sections);
        self
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Whether any section is an error. Warnings and notes never fail a build.
    pub fn is_error(&self) -> bool {
        self.sections
            .iter()
            .any(|section| matches!(section, Section::Error(_)))
    }

    /// Text of the first error or warning section.
    pub fn headline(&self) -> Option<&str> {
        self.sections.iter().find_map(|section| match section {
            Section::Error(text) | Section::Warning(text) => Some(text.as_str()),
            Section::Note(_) | Section::Code(_) => None,
        })
    }

    /// The first `Code` section's span.
    pub fn primary_span(&self) -> Option<Span> {
        self.code_spans().next()
    }

    pub fn code_spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.sections.iter().filter_map(|section| match section {
            Section::Code(span) => Some(*span),
            _ => None,
        })
    }

    /// Concatenated note texts, for assertions and plain logging.
    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().filter_map(|section| match section {
            Section::Note(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Source-free rendering: code sections print their span only.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match section {
                Section::Error(text) => write!(f, "[{}] {text}", self.code)?,
                Section::Warning(text) => write!(f, "<{}> {text}", self.code)?,
                Section::Note(text) => write!(f, "note: {text}")?,
                Section::Code(span) => write!(f, "at {span:?}")?,
            }
        }
        Ok(())
    }
}
