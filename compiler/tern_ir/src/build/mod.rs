//! Programmatic AST construction.
//!
//! The parser is an external collaborator, so tests and embedders build trees
//! directly. Every node built by one [`AstBuilder`] gets its own distinct span
//! in the builder's file, which keeps diagnostics attributable to the node that
//! produced them.

use std::cell::Cell;

use crate::ast::{
    BinaryOp, Branch, Decl, DeclKind, EnumDecl, Expr, ExprKind, FunctionBody, FunctionDecl,
    LambdaParam, LocalDecl, MatchArm, Member, Param, Stmt, StmtKind, StructDecl, TypeExpr,
    TypeExprKind, UnaryOp, UsageItem, VariableDecl, VariableInit,
};
use crate::{FileId, Span};

/// Builds AST nodes with fresh synthetic spans.
pub struct AstBuilder {
    file: FileId,
    next: Cell<u32>,
}

impl AstBuilder {
    pub fn new(file: FileId) -> Self {
        AstBuilder {
            file,
            next: Cell::new(0),
        }
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    /// A fresh one-byte span no other node of this builder shares.
    pub fn span(&self) -> Span {
        let start = self.next.get();
        self.next.set(start + 1);
        Span::new(self.file, start, start + 1)
    }

    // Types

    pub fn ty(&self, path: &str) -> TypeExpr {
        self.ty_args(path, Vec::new())
    }

    pub fn ty_args(&self, path: &str, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::new(
            TypeExprKind::Path {
                path: path.to_string(),
                args,
                mutable: false,
            },
            self.span(),
        )
    }

    pub fn ty_mut(&self, path: &str, args: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::new(
            TypeExprKind::Path {
                path: path.to_string(),
                args,
                mutable: true,
            },
            self.span(),
        )
    }

    pub fn ty_fun(&self, params: Vec<TypeExpr>, ret: TypeExpr) -> TypeExpr {
        TypeExpr::new(
            TypeExprKind::Function {
                params,
                ret: Box::new(ret),
            },
            self.span(),
        )
    }

    // Expressions

    fn expr(&self, kind: ExprKind) -> Expr {
        Expr::new(kind, self.span())
    }

    pub fn unit(&self) -> Expr {
        self.expr(ExprKind::Unit)
    }

    pub fn int(&self, value: i64) -> Expr {
        self.expr(ExprKind::Int(value))
    }

    pub fn float(&self, value: f64) -> Expr {
        self.expr(ExprKind::Float(value))
    }

    pub fn bool(&self, value: bool) -> Expr {
        self.expr(ExprKind::Bool(value))
    }

    pub fn str(&self, value: &str) -> Expr {
        self.expr(ExprKind::Str(value.to_string()))
    }

    pub fn path(&self, path: &str) -> Expr {
        self.expr(ExprKind::Path {
            path: path.to_string(),
            type_args: None,
        })
    }

    /// `path[type_args]`
    pub fn path_with(&self, path: &str, type_args: Vec<TypeExpr>) -> Expr {
        self.expr(ExprKind::Path {
            path: path.to_string(),
            type_args: Some(type_args),
        })
    }

    /// `_`
    pub fn wildcard(&self) -> Expr {
        self.path("_")
    }

    pub fn call(&self, callee: Expr, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call {
            callee: Box::new(callee),
            args,
        })
    }

    /// Shorthand for calling a path: `name(args)`.
    pub fn call_path(&self, name: &str, args: Vec<Expr>) -> Expr {
        let callee = self.path(name);
        self.call(callee, args)
    }

    pub fn pipe(&self, value: Expr, callee: Expr, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Pipe {
            value: Box::new(value),
            callee: Box::new(callee),
            args,
        })
    }

    pub fn member(&self, object: Expr, name: &str) -> Expr {
        self.expr(ExprKind::Member {
            object: Box::new(object),
            name: name.to_string(),
        })
    }

    pub fn binary(&self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn unary(&self, op: UnaryOp, operand: Expr) -> Expr {
        self.expr(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn if_expr(&self, cond: Expr, then: Expr, otherwise: Expr) -> Expr {
        self.expr(ExprKind::If {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    pub fn match_expr(&self, scrutinee: Expr, arms: Vec<(Vec<Expr>, Expr)>) -> Expr {
        let arms = arms
            .into_iter()
            .map(|(patterns, value)| MatchArm {
                patterns,
                value,
                span: self.span(),
            })
            .collect();
        self.expr(ExprKind::Match {
            scrutinee: Box::new(scrutinee),
            arms,
        })
    }

    pub fn lambda(&self, params: &[&str], body: Vec<Stmt>) -> Expr {
        let params = params
            .iter()
            .map(|name| LambdaParam {
                name: (*name).to_string(),
                span: self.span(),
            })
            .collect();
        self.expr(ExprKind::Lambda { params, body })
    }

    // Statements

    fn stmt(&self, kind: StmtKind) -> Stmt {
        Stmt::new(kind, self.span())
    }

    pub fn expr_stmt(&self, expr: Expr) -> Stmt {
        self.stmt(StmtKind::Expr(expr))
    }

    /// `val name: ty = value`
    pub fn local(&self, name: &str, ty: Option<TypeExpr>, value: Expr) -> Stmt {
        self.stmt(StmtKind::Local(LocalDecl {
            name: name.to_string(),
            mutable: false,
            ty,
            value,
        }))
    }

    /// `mut name: ty = value`
    pub fn local_mut(&self, name: &str, ty: Option<TypeExpr>, value: Expr) -> Stmt {
        self.stmt(StmtKind::Local(LocalDecl {
            name: name.to_string(),
            mutable: true,
            ty,
            value,
        }))
    }

    pub fn assign(&self, target: Expr, value: Expr) -> Stmt {
        self.stmt(StmtKind::Assign { target, value })
    }

    pub fn ret(&self, value: Expr) -> Stmt {
        self.stmt(StmtKind::Return(value))
    }

    pub fn if_stmt(&self, cond: Expr, then: Vec<Stmt>, otherwise: Vec<Stmt>) -> Stmt {
        self.stmt(StmtKind::If {
            cond,
            then,
            otherwise,
        })
    }

    pub fn match_stmt(&self, scrutinee: Expr, branches: Vec<(Vec<Expr>, Vec<Stmt>)>) -> Stmt {
        let branches = branches
            .into_iter()
            .map(|(patterns, body)| Branch {
                patterns,
                body,
                span: self.span(),
            })
            .collect();
        self.stmt(StmtKind::Match {
            scrutinee,
            branches,
        })
    }

    // Declarations

    fn decl(&self, kind: DeclKind) -> Decl {
        Decl::new(kind, self.span())
    }

    /// `mod name`
    pub fn module(&self, name: &str) -> Decl {
        self.decl(DeclKind::Module(name.to_string()))
    }

    /// `use a::b::c`
    pub fn use_path(&self, path: &str) -> Decl {
        let name = path.rsplit("::").next().unwrap_or(path);
        self.use_as(path, name)
    }

    /// `use a::b::c as name`
    pub fn use_as(&self, path: &str, name: &str) -> Decl {
        self.decl(DeclKind::Usage(vec![UsageItem::Alias {
            name: name.to_string(),
            path: path.to_string(),
        }]))
    }

    /// `use module::*`
    pub fn use_wildcard(&self, module: &str) -> Decl {
        self.decl(DeclKind::Usage(vec![UsageItem::Wildcard {
            module: module.to_string(),
        }]))
    }

    pub fn param(&self, name: &str, ty: TypeExpr) -> Param {
        Param {
            name: name.to_string(),
            ty,
            variadic: false,
            span: self.span(),
        }
    }

    /// `...name: ty`; `ty` is the full `List[T]` annotation.
    pub fn variadic(&self, name: &str, ty: TypeExpr) -> Param {
        Param {
            variadic: true,
            ..self.param(name, ty)
        }
    }

    pub fn function(&self, name: &str, params: Vec<Param>, ret: TypeExpr, body: Vec<Stmt>) -> Decl {
        self.generic_function(name, &[], params, ret, body)
    }

    pub fn generic_function(
        &self,
        name: &str,
        type_params: &[&str],
        params: Vec<Param>,
        ret: TypeExpr,
        body: Vec<Stmt>,
    ) -> Decl {
        self.decl(DeclKind::Function(FunctionDecl {
            name: name.to_string(),
            public: false,
            type_params: owned(type_params),
            params,
            ret,
            body: FunctionBody::Block(body),
        }))
    }

    /// `ext fun name(params) -> ret = "target"`
    pub fn ext_function(
        &self,
        name: &str,
        type_params: &[&str],
        params: Vec<Param>,
        ret: TypeExpr,
        target: &str,
    ) -> Decl {
        self.decl(DeclKind::Function(FunctionDecl {
            name: name.to_string(),
            public: false,
            type_params: owned(type_params),
            params,
            ret,
            body: FunctionBody::External(target.to_string()),
        }))
    }

    pub fn structure(&self, name: &str, type_params: &[&str], members: Vec<(&str, TypeExpr)>) -> Decl {
        let members = members
            .into_iter()
            .map(|(name, ty)| self.member_decl(name, ty))
            .collect();
        self.decl(DeclKind::Struct(StructDecl {
            name: name.to_string(),
            public: false,
            type_params: owned(type_params),
            members,
        }))
    }

    /// Variants without a payload type carry `Unit`.
    pub fn enumeration(
        &self,
        name: &str,
        type_params: &[&str],
        variants: Vec<(&str, Option<TypeExpr>)>,
    ) -> Decl {
        let variants = variants
            .into_iter()
            .map(|(name, ty)| {
                let ty = ty.unwrap_or_else(|| self.ty("Unit"));
                self.member_decl(name, ty)
            })
            .collect();
        self.decl(DeclKind::Enum(EnumDecl {
            name: name.to_string(),
            public: false,
            type_params: owned(type_params),
            variants,
        }))
    }

    fn member_decl(&self, name: &str, ty: TypeExpr) -> Member {
        Member {
            name: name.to_string(),
            ty,
            span: self.span(),
        }
    }

    /// `val name: ty = init`
    pub fn val(&self, name: &str, ty: Option<TypeExpr>, init: Expr) -> Decl {
        self.variable(name, false, ty, VariableInit::Expr(init))
    }

    /// `mut name: ty = init`
    pub fn var(&self, name: &str, ty: Option<TypeExpr>, init: Expr) -> Decl {
        self.variable(name, true, ty, VariableInit::Expr(init))
    }

    /// `ext val name: ty = external`
    pub fn ext_val(&self, name: &str, ty: TypeExpr, external: &str) -> Decl {
        self.variable(name, false, Some(ty), VariableInit::External(external.to_string()))
    }

    fn variable(&self, name: &str, mutable: bool, ty: Option<TypeExpr>, init: VariableInit) -> Decl {
        self.decl(DeclKind::Variable(VariableDecl {
            name: name.to_string(),
            public: false,
            mutable,
            ty,
            init,
        }))
    }
}

impl Decl {
    /// Mark a symbol-introducing declaration `pub`. Directives are unchanged.
    #[must_use]
    pub fn public(mut self) -> Self {
        match &mut self.kind {
            DeclKind::Function(f) => f.public = true,
            DeclKind::Struct(s) => s.public = true,
            DeclKind::Enum(e) => e.public = true,
            DeclKind::Variable(v) => v.public = true,
            DeclKind::Module(_) | DeclKind::Usage(_) => {}
        }
        self
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[cfg(test)]
mod tests;
