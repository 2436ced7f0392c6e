//! Match patterns and exhaustiveness analysis.
//!
//! A pattern is flattened into [`Condition`]s and [`Capture`]s, each located
//! by a [`PathStep`] list from the matched value's root. Exhaustiveness
//! enumerates the finite [`PatternValue`]s of the matched type and asks
//! whether some pattern covers each one.

mod exhaustive;

use std::fmt;

use tern_ir::Span;
use tern_types::Type;

use crate::tir;

pub use exhaustive::{pattern_values, uncovered, ShapeSource};

/// One step into a matched value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Struct member by name.
    Member(String),
    /// Payload of the named enum variant.
    Variant(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// The value at `path` equals `value`.
    Value {
        path: Vec<PathStep>,
        value: tir::Expr,
    },
    /// The value at `path` is the enum variant with declaration index `tag`.
    Variant {
        path: Vec<PathStep>,
        tag: usize,
        name: String,
    },
}

impl Condition {
    pub fn path(&self) -> &[PathStep] {
        match self {
            Condition::Value { path, .. } | Condition::Variant { path, .. } => path,
        }
    }
}

/// Binds the value at `path`; `name` is `None` for `_`.
#[derive(Clone, Debug, PartialEq)]
pub struct Capture {
    pub name: Option<String>,
    pub path: Vec<PathStep>,
    pub ty: Type,
    pub site: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub conditions: Vec<Condition>,
    pub captures: Vec<Capture>,
    pub span: Span,
}

impl Pattern {
    pub fn new(span: Span) -> Self {
        Pattern {
            conditions: Vec::new(),
            captures: Vec::new(),
            span,
        }
    }

    /// Named captures, in pattern order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Capture)> {
        self.captures
            .iter()
            .filter_map(|capture| Some((capture.name.as_deref()?, capture)))
    }

    pub fn binding(&self, name: &str) -> Option<&Capture> {
        self.bindings()
            .find(|(bound, _)| *bound == name)
            .map(|(_, capture)| capture)
    }
}

/// A finite shape a matched value can take.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatternValue {
    Unit,
    Bool(bool),
    Enum {
        path: String,
        tag: usize,
        variant: String,
        payload: Box<PatternValue>,
    },
    Struct {
        path: String,
        members: Vec<(String, PatternValue)>,
    },
    /// Not enumerable: scalars other than `Bool`, lists, functions, and
    /// recursive occurrences of a type already being expanded.
    Any,
}

impl fmt::Display for PatternValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternValue::Unit => f.write_str("unit"),
            PatternValue::Bool(value) => write!(f, "{value}"),
            PatternValue::Enum {
                path,
                variant,
                payload,
                ..
            } => match payload.as_ref() {
                PatternValue::Unit => write!(f, "{path}::{variant}"),
                payload => write!(f, "{path}::{variant}({payload})"),
            },
            PatternValue::Struct { path, members } => {
                write!(f, "{path}(")?;
                for (i, (_, member)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str(")")
            }
            PatternValue::Any => f.write_str("_"),
        }
    }
}

#[cfg(test)]
mod tests;
