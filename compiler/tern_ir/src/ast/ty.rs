//! Syntactic type annotations.

use crate::Span;

/// A type as written in source, before resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeExprKind {
    /// `mut? path[args]`, e.g. `Int`, `mut List[T]`, `geo::Point`.
    Path {
        path: String,
        args: Vec<TypeExpr>,
        mutable: bool,
    },
    /// `Fun(params) -> ret`.
    Function {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        TypeExpr { kind, span }
    }

    /// Whether the annotation carries a `mut` marker at its root.
    pub fn is_mutable(&self) -> bool {
        matches!(self.kind, TypeExprKind::Path { mutable: true, .. })
    }
}
