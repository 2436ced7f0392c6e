//! Expressions.
//!
//! Match patterns are parsed as expressions too; the checker decides whether a
//! name in pattern position is a capture, a unit variant or a value.

use super::{BinaryOp, Stmt, TypeExpr, UnaryOp};
use crate::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    // Literals
    Unit,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),

    /// A possibly qualified name with optional explicit type arguments,
    /// e.g. `x`, `geo::origin`, `id[Int]`.
    Path {
        path: String,
        type_args: Option<Vec<TypeExpr>>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `value |> callee(args)`
    Pipe {
        value: Box<Expr>,
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        name: String,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    /// `fun(a, b) { ... }`; parameter types always come from context.
    Lambda {
        params: Vec<LambdaParam>,
        body: Vec<Stmt>,
    },
}

/// `p1 | p2 => value` in a match expression.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchArm {
    pub patterns: Vec<Expr>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LambdaParam {
    pub name: String,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// The written path if this is a plain path reference without type arguments.
    pub fn as_plain_path(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Path {
                path,
                type_args: None,
            } => Some(path),
            _ => None,
        }
    }

    /// Whether this is the `_` wildcard in pattern position.
    pub fn is_wildcard(&self) -> bool {
        self.as_plain_path() == Some("_")
    }
}
