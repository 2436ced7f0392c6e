//! Calls, constructors and piped calls.

use tern_diagnostic::{ErrorCode, Message};
use tern_ir::{DeclKind, Expr, ExprKind, Span};
use tern_types::{accepts, Type, TypeKind};

use super::expr::{enum_init, variant_arity};
use super::{count, was_were, Checker, Env, Request};
use crate::symbols::{Symbol, SymbolKind};
use crate::tir;
use crate::CheckResult;

impl<'ast> Checker<'_, 'ast> {
    /// Check `callee(args)`.
    ///
    /// A callee path is tried as a local, a function, a struct constructor
    /// and an enum variant constructor, in that order; anything else is
    /// called as a function-typed value. `resolved` skips name resolution
    /// for a piped call whose function was already chosen.
    pub(super) fn check_call(
        &mut self,
        expr: &Expr,
        callee: &Expr,
        resolved: Option<&str>,
        args: &[&Expr],
        env: &Env,
        expected: Option<&Type>,
    ) -> CheckResult<tir::Expr> {
        let ExprKind::Path { path, type_args } = &callee.kind else {
            return self.call_value(expr, callee, args, env);
        };
        if resolved.is_none() && type_args.is_none() && env.scope.lookup(path).is_some() {
            return self.call_value(expr, callee, args, env);
        }

        let symbols = self.symbols;
        let full = match resolved {
            Some(full) => full.to_string(),
            None => env.expand(symbols, path),
        };
        let explicit = self.explicit_type_args(type_args.as_deref(), env)?;
        match symbols.lookup(&full) {
            Some(symbol) if symbol.kind == SymbolKind::Function => {
                return self.call_function(expr, callee.span, symbol, explicit, args, env, expected);
            }
            Some(symbol) if symbol.kind == SymbolKind::Struct => {
                return self.construct_struct(expr, callee.span, symbol, explicit, args, env, expected);
            }
            Some(symbol) if symbol.kind == SymbolKind::Variable => {
                return self.call_value(expr, callee, args, env);
            }
            _ => {}
        }

        let payload_hint = match args {
            [arg] => Some(self.speculate(|this| this.check_expr(arg, env, None).ok().map(|arg| arg.ty))),
            _ => None,
        };
        if let Some(target) = self.resolve_variant(callee.span, path, explicit, env, expected, payload_hint)? {
            let [arg] = args else {
                return Err(variant_arity(&target, args.len(), expr.span));
            };
            let value = self.check_expr(arg, env, Some(&target.payload))?;
            self.expect_type(&target.payload, &value.ty, arg.span)?;
            return Ok(enum_init(target, value, expr.span));
        }

        self.call_value(expr, callee, args, env)
    }

    /// Argument types for inference, computed without committing anything.
    fn arg_hints(&mut self, args: &[&Expr], env: &Env) -> Vec<Option<Type>> {
        self.speculate(|this| {
            args.iter()
                .map(|arg| this.check_expr(arg, env, None).ok().map(|arg| arg.ty))
                .collect()
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn call_function(
        &mut self,
        expr: &Expr,
        callee_site: Span,
        symbol: &Symbol<'ast>,
        explicit: Option<Vec<Type>>,
        args: &[&Expr],
        env: &Env,
        expected: Option<&Type>,
    ) -> CheckResult<tir::Expr> {
        let hints = (explicit.is_none() && symbol.is_generic()).then(|| self.arg_hints(args, env));
        let request = Request::new(expr.span, &symbol.path, &[SymbolKind::Function])
            .with_type_args(explicit)
            .with_arg_hints(hints.as_deref())
            .with_return_hint(expected);
        let id = self
            .instantiate(request)?
            .ok_or_else(|| Message::internal(format!("Function '{}' disappeared", symbol.path)))?;
        symbol.check_exposed(callee_site, &env.ctx)?;

        let instance = self.arena.get(id);
        let reference = instance.reference(id);
        let function = instance
            .function()
            .ok_or_else(|| Message::internal(format!("'{}' has no function signature", symbol.path)))?;
        let ret = function.ret.clone();
        let variadic = function.variadic().and_then(|param| match &param.ty.kind {
            TypeKind::List { elem, .. } => Some(elem.as_ref().clone()),
            _ => None,
        });
        let mut params: Vec<Type> = function.params.iter().map(|param| param.ty.clone()).collect();

        let fixed = if variadic.is_some() {
            params.len() - 1
        } else {
            params.len()
        };
        let arity_ok = match variadic {
            Some(_) => args.len() >= fixed,
            None => args.len() == fixed,
        };
        if !arity_ok {
            let at_least = if variadic.is_some() { "at least " } else { "" };
            return Err(Message::error(
                ErrorCode::E2004,
                format!(
                    "The function '{}' expects {at_least}{}, but {} {} provided",
                    symbol.path,
                    count(fixed, "argument"),
                    args.len(),
                    was_were(args.len())
                ),
            )
            .with_code(expr.span)
            .with_noted_code(format!("The function '{}' is defined here:", symbol.path), symbol.span()));
        }
        params.truncate(fixed);
        if let Some(elem) = variadic {
            params.resize(args.len(), elem);
        }
        let args = self.check_args(args, &params, env)?;

        Ok(tir::Expr::new(
            tir::ExprKind::Call {
                callee: tir::Callee::Function {
                    path: symbol.path.clone(),
                    instance: reference,
                },
                args,
            },
            ret,
            expr.span,
        ))
    }

    /// Struct construction. The constructed value is a fresh `mut` value.
    #[allow(clippy::too_many_arguments)]
    fn construct_struct(
        &mut self,
        expr: &Expr,
        callee_site: Span,
        symbol: &Symbol<'ast>,
        explicit: Option<Vec<Type>>,
        args: &[&Expr],
        env: &Env,
        expected: Option<&Type>,
    ) -> CheckResult<tir::Expr> {
        let hints = (explicit.is_none() && symbol.is_generic()).then(|| self.arg_hints(args, env));
        let request = Request::new(expr.span, &symbol.path, &[SymbolKind::Struct])
            .with_type_args(explicit)
            .with_arg_hints(hints.as_deref())
            .with_return_hint(expected);
        let id = self
            .instantiate(request)?
            .ok_or_else(|| Message::internal(format!("Structure '{}' disappeared", symbol.path)))?;
        symbol.check_exposed(callee_site, &env.ctx)?;

        let instance = self.arena.get(id);
        let reference = instance.reference(id);
        let type_args = instance.type_args.clone();
        let members: Vec<Type> = instance
            .members()
            .unwrap_or_default()
            .iter()
            .map(|(_, ty)| ty.clone())
            .collect();
        if members.len() != args.len() {
            return Err(Message::error(
                ErrorCode::E2004,
                format!(
                    "The structure '{}' expects {}, but {} {} provided",
                    symbol.path,
                    count(members.len(), "argument"),
                    args.len(),
                    was_were(args.len())
                ),
            )
            .with_code(expr.span)
            .with_noted_code(format!("The structure '{}' is defined here:", symbol.path), symbol.span()));
        }
        let args = self.check_args(args, &members, env)?;

        Ok(tir::Expr::new(
            tir::ExprKind::StructInit {
                path: symbol.path.clone(),
                instance: reference,
                args,
            },
            Type::structure(symbol.path.clone(), type_args, true, expr.span),
            expr.span,
        ))
    }

    /// Call of a function-typed value.
    fn call_value(&mut self, expr: &Expr, callee: &Expr, args: &[&Expr], env: &Env) -> CheckResult<tir::Expr> {
        let callee = self.check_expr(callee, env, None)?;
        let TypeKind::Function { params, ret } = &callee.ty.kind else {
            let ty = &callee.ty;
            return Err(Message::error(
                ErrorCode::E2010,
                format!("Expected function type, but got '{ty}'"),
            )
            .with_code(callee.span)
            .with_noted_code(format!("'{ty}' originates from here:"), ty.origin));
        };
        if params.len() != args.len() {
            return Err(Message::error(
                ErrorCode::E2004,
                format!(
                    "The function expects {}, but {} {} provided",
                    count(params.len(), "argument"),
                    args.len(),
                    was_were(args.len())
                ),
            )
            .with_code(expr.span)
            .with_noted_code("The function type originates from here:", callee.ty.origin));
        }
        let params = params.clone();
        let ret = ret.as_ref().clone();
        let args = self.check_args(args, &params, env)?;
        Ok(tir::Expr::new(
            tir::ExprKind::Call {
                callee: tir::Callee::Value(Box::new(callee)),
                args,
            },
            ret,
            expr.span,
        ))
    }

    fn check_args(&mut self, args: &[&Expr], params: &[Type], env: &Env) -> CheckResult<Vec<tir::Expr>> {
        args.iter()
            .zip(params)
            .map(|(arg, param)| {
                let checked = self.check_expr(arg, env, Some(param))?;
                self.expect_type(param, &checked.ty, arg.span)?;
                Ok(checked)
            })
            .collect()
    }

    /// Check `value |> callee(args)` as `callee(value, args)`.
    ///
    /// An unqualified callee that names nothing in scope is looked up in
    /// every module the file uses; exactly one visible function whose first
    /// parameter accepts the piped value must exist.
    pub(super) fn check_pipe(
        &mut self,
        expr: &Expr,
        value: &Expr,
        callee: &Expr,
        args: &[Expr],
        env: &Env,
        expected: Option<&Type>,
    ) -> CheckResult<tir::Expr> {
        let mut all_args: Vec<&Expr> = Vec::with_capacity(args.len() + 1);
        all_args.push(value);
        all_args.extend(args);

        let resolved = match callee.as_plain_path() {
            Some(name) if self.needs_pipe_search(name, env) => Some(self.pipe_target(expr, name, value, env)?),
            _ => None,
        };
        self.check_call(expr, callee, resolved.as_deref(), &all_args, env, expected)
    }

    fn needs_pipe_search(&self, name: &str, env: &Env) -> bool {
        !name.contains("::")
            && env.scope.lookup(name).is_none()
            && !self.symbols.contains(&env.expand(self.symbols, name))
    }

    fn pipe_target(&mut self, expr: &Expr, name: &str, value: &Expr, env: &Env) -> CheckResult<String> {
        let self_ty = match self.speculate(|this| this.check_expr(value, env, None)) {
            Ok(checked) => checked.ty,
            // Report the piped value's own error, not a failed search.
            Err(_) => self.check_expr(value, env, None)?.ty,
        };

        let mut candidates: Vec<String> = env
            .ctx
            .usages
            .values()
            .map(|module| format!("{module}::{name}"))
            .collect();
        candidates.sort();
        candidates.dedup();

        let mut matching = Vec::new();
        for candidate in candidates {
            if self.pipe_candidate_accepts(&candidate, &self_ty, env) {
                tracing::trace!(candidate = %candidate, "pipe candidate matches");
                matching.push(candidate);
            }
        }

        match matching.as_slice() {
            [only] => Ok(only.clone()),
            [] => Err(Message::error(
                ErrorCode::E2015,
                format!("No function '{name}' found for a piped value of type '{self_ty}'"),
            )
            .with_code(expr.span)
            .with_noted_code(format!("'{self_ty}' originates from here:"), self_ty.origin)
            .with_note(format!(
                "A piped call searches every used module for a function '{name}' whose first parameter accepts the piped value"
            ))),
            [first, second, ..] => Err(Message::error(
                ErrorCode::E2014,
                format!("Ambiguous piped call - both '{first}' and '{second}' are valid candidates"),
            )
            .with_code(expr.span)),
        }
    }

    /// Whether `candidate` is a visible function whose first parameter
    /// accepts `self_ty`.
    fn pipe_candidate_accepts(&mut self, candidate: &str, self_ty: &Type, env: &Env) -> bool {
        let Some(symbol) = self.symbols.lookup(candidate) else {
            return false;
        };
        let DeclKind::Function(decl) = &symbol.decl.kind else {
            return false;
        };
        if decl.params.is_empty() || !(symbol.is_public() || symbol.ctx.module == env.ctx.module) {
            return false;
        }
        let hints = [Some(self_ty.clone())];
        let request = Request::new(self_ty.origin, candidate, &[SymbolKind::Function]).with_arg_hints(Some(hints.as_slice()));
        self.speculate(|this| {
            let Ok(Some(id)) = this.instantiate(request) else {
                return false;
            };
            this.arena
                .get(id)
                .function()
                .and_then(|function| function.params.first())
                .is_some_and(|first| accepts(&first.ty, self_ty))
        })
    }
}
