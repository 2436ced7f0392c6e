//! Tern IR - source locations and the parser-facing syntax tree.
//!
//! This crate contains the data structures shared between the parser
//! collaborator and the semantic front end:
//! - Spans and file ids for source locations
//! - The `SourceMap` that owns source text for diagnostic rendering
//! - AST nodes for declarations, statements, expressions and type annotations
//! - `AstBuilder` for constructing trees programmatically
//!
//! # Design Philosophy
//!
//! - **Immutable Trees**: the checker never rewrites the AST. Resolved paths,
//!   types and desugarings are produced in a separate typed tree.
//! - **Unresolved Names**: every path in the AST is exactly as written. Short
//!   names are resolved to fully-qualified paths only by the checker.
//! - **Spans Everywhere**: every node carries a [`Span`] including its file.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-copied types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
pub mod build;
mod source_map;
mod span;

pub use ast::{
    BinaryOp, Branch, Decl, DeclKind, EnumDecl, Expr, ExprKind, FunctionBody, FunctionDecl,
    LambdaParam, LocalDecl, MatchArm, Member, Param, Stmt, StmtKind, StructDecl, TypeExpr,
    TypeExprKind, UnaryOp, UsageItem, VariableDecl, VariableInit,
};
pub use build::AstBuilder;
pub use source_map::{SourceError, SourceFile, SourceMap};
pub use span::{FileId, Span};
