//! Parser-facing syntax tree.
//!
//! The tree is owned and boxed; the checker borrows it for the whole
//! compilation and never rewrites it.
//!
//! # Module Structure
//!
//! - `decl`: top-level declarations (module, usage, function, struct, enum, variable)
//! - `stmt`: statements inside function bodies and branches
//! - `expr`: expressions, including patterns (patterns are parsed as expressions)
//! - `operators`: binary and unary operators
//! - `ty`: syntactic type annotations

mod decl;
mod expr;
mod operators;
mod stmt;
mod ty;

pub use decl::{
    Decl, DeclKind, EnumDecl, FunctionBody, FunctionDecl, Member, Param, StructDecl, UsageItem,
    VariableDecl, VariableInit,
};
pub use expr::{Expr, ExprKind, LambdaParam, MatchArm};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Branch, LocalDecl, Stmt, StmtKind};
pub use ty::{TypeExpr, TypeExprKind};

#[cfg(test)]
mod tests;
