//! Typed IR: the checked, desugared form of instance bodies.
//!
//! Every node carries its resolved [`Type`]. Names are fully qualified, and
//! references to instantiated symbols carry an [`InstanceRef`] so a backend
//! can pick the monomorphized instance by `(path, ordinal)`.
//!
//! Desugarings happen here rather than in the AST: a call to a struct becomes
//! [`ExprKind::StructInit`], a variant reference or call becomes
//! [`ExprKind::EnumInit`], and `v |> f(args)` becomes a call `f(v, args)`.

use tern_ir::{BinaryOp, Span, UnaryOp};
use tern_types::Type;

use crate::instance::InstanceRef;
use crate::patterns::Pattern;

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Unit,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),

    /// A local variable or parameter.
    Local(String),
    /// A global variable.
    Global {
        path: String,
        instance: InstanceRef,
    },
    /// A function used as a value.
    Function {
        path: String,
        instance: InstanceRef,
    },

    Call {
        callee: Callee,
        args: Vec<Expr>,
    },
    StructInit {
        path: String,
        instance: InstanceRef,
        args: Vec<Expr>,
    },
    EnumInit {
        path: String,
        instance: InstanceRef,
        /// Declaration index of the variant.
        tag: usize,
        variant: String,
        value: Box<Expr>,
    },
    Member {
        object: Box<Expr>,
        name: String,
    },

    /// `==` and `!=` compare structurally, never by identity.
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
    Lambda {
        params: Vec<Param>,
        body: Vec<Stmt>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Callee {
    /// Direct call of a function instance.
    Function { path: String, instance: InstanceRef },
    /// Call of a function-typed value.
    Value(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchArm {
    pub patterns: Vec<Pattern>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Expr(Expr),
    Local {
        name: String,
        mutable: bool,
        ty: Type,
        value: Expr,
    },
    Assign {
        target: Expr,
        value: Expr,
    },
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
pub struct Branch {
    /// Alternatives; all bind the same names.
    pub patterns: Vec<Pattern>,
    pub body: Vec<Stmt>,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type, span: Span) -> Self {
        Expr { kind, ty, span }
    }
}
