//! Statements, blocks and the always-returns analysis.

use tern_diagnostic::{ErrorCode, Message};
use tern_ir::{LocalDecl, Span, Stmt, StmtKind};
use tern_types::Type;

use super::{Checker, Env};
use crate::scope::Binding;
use crate::tir;
use crate::CheckResult;

impl Checker<'_, '_> {
    /// Check a function body in `env`, which must be a function scope.
    ///
    /// Unless the function returns `Unit`, every path through the body
    /// must end in a `return`.
    pub(crate) fn check_function_body(
        &mut self,
        stmts: &[Stmt],
        env: &mut Env,
        ret: &Type,
        fallback: Span,
        description: &str,
    ) -> CheckResult<Vec<tir::Stmt>> {
        let checked = self.check_stmts_in(stmts, env)?;
        if ret.is_unit() || env.scope.always_returns() {
            return Ok(checked);
        }
        let tail = stmts.last().map_or(fallback, |stmt| stmt.span);
        Err(Message::error(
            ErrorCode::E2013,
            format!("{description} does not always return a value"),
        )
        .with_note(format!("The function specifies '{ret}' as the return type here:"))
        .with_code(ret.origin)
        .with_note(
            "However, the end of the function can be reached, which is only allowed if the function returns 'Unit':",
        )
        .with_code(tail))
    }

    /// Check statements directly in `env`'s innermost frame.
    fn check_stmts_in(&mut self, stmts: &[Stmt], env: &mut Env) -> CheckResult<Vec<tir::Stmt>> {
        stmts.iter().map(|stmt| self.check_stmt(stmt, env)).collect()
    }

    /// Check a nested block; returns its statements and whether it always
    /// returns.
    pub(super) fn check_block(&mut self, stmts: &[Stmt], env: &Env) -> CheckResult<(Vec<tir::Stmt>, bool)> {
        let mut inner = env.child();
        let checked = self.check_stmts_in(stmts, &mut inner)?;
        Ok((checked, inner.scope.always_returns()))
    }

    fn check_stmt(&mut self, stmt: &Stmt, env: &mut Env) -> CheckResult<tir::Stmt> {
        let kind = match &stmt.kind {
            StmtKind::Expr(expr) => tir::StmtKind::Expr(self.check_expr(expr, env, None)?),
            StmtKind::Local(local) => self.check_local(local, stmt.span, env)?,
            StmtKind::Assign { target, value } => {
                let target = self.check_place(target, env)?;
                let value_expr = value;
                let value = self.check_expr(value_expr, env, Some(&target.ty))?;
                self.expect_type(&target.ty, &value.ty, value_expr.span)?;
                tir::StmtKind::Assign { target, value }
            }
            StmtKind::Return(value) => {
                let Some(ret) = env.scope.return_type().cloned() else {
                    return Err(Message::internal("'return' outside of a function body").with_code(stmt.span));
                };
                let checked = self.check_expr(value, env, Some(&ret))?;
                self.expect_type(&ret, &checked.ty, value.span)?;
                env.scope.mark_returns();
                tir::StmtKind::Return(checked)
            }
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.check_condition(cond, env)?;
                let (then, then_returns) = self.check_block(then, env)?;
                let (otherwise, otherwise_returns) = self.check_block(otherwise, env)?;
                if then_returns && otherwise_returns {
                    env.scope.mark_returns();
                }
                tir::StmtKind::If {
                    cond,
                    then,
                    otherwise,
                }
            }
            StmtKind::Match {
                scrutinee,
                branches,
            } => self.check_match_stmt(stmt.span, scrutinee, branches, env)?,
        };
        Ok(tir::Stmt {
            kind,
            span: stmt.span,
        })
    }

    fn check_local(&mut self, local: &LocalDecl, site: Span, env: &mut Env) -> CheckResult<tir::StmtKind> {
        let declared = local
            .ty
            .as_ref()
            .map(|ty| self.type_from_expr(ty, env))
            .transpose()?;
        let value = self.check_expr(&local.value, env, declared.as_ref())?;
        let ty = match declared {
            Some(declared) => {
                self.expect_type(&declared, &value.ty, local.value.span)?;
                declared
            }
            None => value.ty.clone(),
        };
        env.scope.bind(
            local.name.clone(),
            Binding {
                ty: ty.clone(),
                mutable: local.mutable,
                site,
            },
        );
        Ok(tir::StmtKind::Local {
            name: local.name.clone(),
            mutable: local.mutable,
            ty,
            value,
        })
    }
}
