//! Statements.

use super::{Expr, TypeExpr};
use crate::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Expr(Expr),
    /// `val x: T = e` / `mut x = e` inside a block.
    Local(LocalDecl),
    /// `target = value`
    Assign { target: Expr, value: Expr },
    Return(Expr),
    If {
        cond: Expr,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>,
    },
    Match {
        scrutinee: Expr,
        branches: Vec<Branch>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocalDecl {
    pub name: String,
    pub mutable: bool,
    pub ty: Option<TypeExpr>,
    pub value: Expr,
}

/// `p1 | p2 { body }` in a statement-level match.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub patterns: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}
