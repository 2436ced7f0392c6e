//! Top-level declarations.
//!
//! A file is an ordered list of [`Decl`]s. `Module` and `Usage` declarations
//! are directives: they change how the declarations after them are named and
//! resolved, and they do not introduce symbols themselves.

use super::{Expr, Stmt, TypeExpr};
use crate::Span;

#[derive(Clone, Debug, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclKind {
    /// `mod a::b`: following declarations live under `a::b`.
    Module(String),
    /// `use ...`: adds entries to the current usage map.
    Usage(Vec<UsageItem>),
    Function(FunctionDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Variable(VariableDecl),
}

/// One entry of a `use` directive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum UsageItem {
    /// `use a::b::c` (name `c`) or `use a::b::c as d` (name `d`).
    Alias { name: String, path: String },
    /// `use a::b::*`.
    Wildcard { module: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub public: bool,
    pub type_params: Vec<String>,
    pub params: Vec<Param>,
    pub ret: TypeExpr,
    pub body: FunctionBody,
}

impl FunctionDecl {
    /// The trailing `...xs` parameter, if any.
    pub fn variadic(&self) -> Option<&Param> {
        self.params.last().filter(|param| param.variadic)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
    /// Only the last parameter may be variadic; its type is `List[T]`.
    pub variadic: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    /// `ext fun f() -> T = "target text"`; never checked.
    External(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub public: bool,
    pub type_params: Vec<String>,
    pub members: Vec<Member>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub public: bool,
    pub type_params: Vec<String>,
    /// A variant declared without a payload carries `Unit`.
    pub variants: Vec<Member>,
}

/// A named, typed slot: a struct member or an enum variant payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Member {
    pub name: String,
    pub ty: TypeExpr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub public: bool,
    pub mutable: bool,
    pub ty: Option<TypeExpr>,
    pub init: VariableInit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VariableInit {
    Expr(Expr),
    /// `ext val x: T = name`; requires a declared type.
    External(String),
}

impl Decl {
    pub fn new(kind: DeclKind, span: Span) -> Self {
        Decl { kind, span }
    }

    /// Name of the symbol this declaration introduces, if any.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            DeclKind::Function(f) => Some(&f.name),
            DeclKind::Struct(s) => Some(&s.name),
            DeclKind::Enum(e) => Some(&e.name),
            DeclKind::Variable(v) => Some(&v.name),
            DeclKind::Module(_) | DeclKind::Usage(_) => None,
        }
    }

    pub fn is_public(&self) -> bool {
        match &self.kind {
            DeclKind::Function(f) => f.public,
            DeclKind::Struct(s) => s.public,
            DeclKind::Enum(e) => e.public,
            DeclKind::Variable(v) => v.public,
            DeclKind::Module(_) | DeclKind::Usage(_) => false,
        }
    }

    pub fn type_params(&self) -> &[String] {
        match &self.kind {
            DeclKind::Function(f) => &f.type_params,
            DeclKind::Struct(s) => &s.type_params,
            DeclKind::Enum(e) => &e.type_params,
            DeclKind::Variable(_) | DeclKind::Module(_) | DeclKind::Usage(_) => &[],
        }
    }

    /// Whether this is a `mod` or `use` directive.
    pub fn is_directive(&self) -> bool {
        matches!(self.kind, DeclKind::Module(_) | DeclKind::Usage(_))
    }
}
