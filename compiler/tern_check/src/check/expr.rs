//! Expression checking.

use tern_diagnostic::{ErrorCode, Message};
use tern_ir::{BinaryOp, DeclKind, Expr, ExprKind, LambdaParam, Span, Stmt, TypeExpr, UnaryOp};
use tern_types::{Type, TypeKind};

use super::{count, was_were, Checker, Env, Request};
use crate::instance::{InstanceId, InstanceRef};
use crate::scope::Binding;
use crate::symbols::SymbolKind;
use crate::tir;
use crate::CheckResult;

/// An enum variant a path resolved to.
pub(super) struct VariantTarget {
    pub path: String,
    pub instance: InstanceRef,
    pub tag: usize,
    pub variant: String,
    pub payload: Type,
    pub ty: Type,
    pub decl_site: Span,
}

impl<'ast> Checker<'_, 'ast> {
    /// Check `expr`, using `expected` as context where inference needs it.
    ///
    /// The result is not compared against `expected`; callers that require
    /// a type use [`Checker::expect_type`] on the result.
    pub(crate) fn check_expr(
        &mut self,
        expr: &Expr,
        env: &Env,
        expected: Option<&Type>,
    ) -> CheckResult<tir::Expr> {
        let span = expr.span;
        let typed = |kind, ty| Ok(tir::Expr::new(kind, ty, span));
        match &expr.kind {
            ExprKind::Unit => typed(tir::ExprKind::Unit, Type::unit(span)),
            ExprKind::Int(value) => typed(tir::ExprKind::Int(*value), Type::int(span)),
            ExprKind::Float(value) => typed(tir::ExprKind::Float(*value), Type::float(span)),
            ExprKind::Bool(value) => typed(tir::ExprKind::Bool(*value), Type::bool(span)),
            ExprKind::Str(value) => typed(tir::ExprKind::Str(value.clone()), Type::string(span)),
            ExprKind::Path { path, type_args } => {
                self.check_path(expr, path, type_args.as_deref(), env, expected)
            }
            ExprKind::Call { callee, args } => {
                let args: Vec<&Expr> = args.iter().collect();
                self.check_call(expr, callee, None, &args, env, expected)
            }
            ExprKind::Pipe {
                value,
                callee,
                args,
            } => self.check_pipe(expr, value, callee, args, env, expected),
            ExprKind::Member { object, name } => {
                let object = self.check_expr(object, env, None)?;
                self.access_member(object, name, span)
            }
            ExprKind::Binary { op, lhs, rhs } => self.check_binary(expr, *op, lhs, rhs, env),
            ExprKind::Unary { op, operand } => {
                let operand = self.check_expr(operand, env, None)?;
                let ty = match op {
                    UnaryOp::Neg => {
                        require_number(&operand)?;
                        operand.ty.clone().at(span)
                    }
                    UnaryOp::Not => {
                        self.expect_type(&Type::bool(span), &operand.ty, operand.span)?;
                        Type::bool(span)
                    }
                };
                typed(
                    tir::ExprKind::Unary {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    ty,
                )
            }
            ExprKind::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.check_condition(cond, env)?;
                let then = self.check_expr(then, env, expected)?;
                let otherwise_expr = otherwise;
                let otherwise = self.check_expr(otherwise_expr, env, expected.or(Some(&then.ty)))?;
                self.expect_type(&then.ty, &otherwise.ty, otherwise_expr.span)?;
                let ty = then.ty.clone();
                typed(
                    tir::ExprKind::If {
                        cond: Box::new(cond),
                        then: Box::new(then),
                        otherwise: Box::new(otherwise),
                    },
                    ty,
                )
            }
            ExprKind::Match { scrutinee, arms } => {
                self.check_match_expr(expr, scrutinee, arms, env, expected)
            }
            ExprKind::Lambda { params, body } => self.check_lambda(expr, params, body, env, expected),
        }
    }

    /// Check an expression that must be `Bool`.
    pub(super) fn check_condition(&mut self, cond: &Expr, env: &Env) -> CheckResult<tir::Expr> {
        let bool_ty = Type::bool(cond.span);
        let checked = self.check_expr(cond, env, Some(&bool_ty))?;
        self.expect_type(&bool_ty, &checked.ty, cond.span)?;
        Ok(checked)
    }

    /// A path in value position: local, global variable, function, or unit
    /// enum variant, in that order.
    fn check_path(
        &mut self,
        expr: &Expr,
        path: &str,
        type_args: Option<&[TypeExpr]>,
        env: &Env,
        expected: Option<&Type>,
    ) -> CheckResult<tir::Expr> {
        let span = expr.span;
        if type_args.is_none() {
            if let Some(binding) = env.scope.lookup(path) {
                return Ok(tir::Expr::new(
                    tir::ExprKind::Local(path.to_string()),
                    binding.ty.clone(),
                    span,
                ));
            }
        }

        let symbols = self.symbols;
        let explicit = self.explicit_type_args(type_args, env)?;
        let full = env.expand(symbols, path);

        let request = Request::new(span, &full, &[SymbolKind::Variable]).with_type_args(explicit.clone());
        if let Some(id) = self.instantiate(request)? {
            return self.global_reference(id, &full, span, env);
        }

        let (arg_hints, return_hint) = match expected.map(|ty| &ty.kind) {
            Some(TypeKind::Function { params, ret }) => (
                Some(params.iter().cloned().map(Some).collect::<Vec<_>>()),
                Some(ret.as_ref()),
            ),
            _ => (None, None),
        };
        let request = Request::new(span, &full, &[SymbolKind::Function])
            .with_type_args(explicit.clone())
            .with_arg_hints(arg_hints.as_deref())
            .with_return_hint(return_hint);
        if let Some(id) = self.instantiate(request)? {
            if let Some(symbol) = symbols.lookup(&full) {
                symbol.check_exposed(span, &env.ctx)?;
            }
            let instance = self.arena.get(id);
            let ty = instance
                .function()
                .map(|function| function.signature(span))
                .ok_or_else(|| Message::internal(format!("'{full}' has no function signature")))?;
            return Ok(tir::Expr::new(
                tir::ExprKind::Function {
                    path: full,
                    instance: instance.reference(id),
                },
                ty,
                span,
            ));
        }

        if let Some(target) = self.resolve_variant(span, path, explicit, env, expected, None)? {
            if !target.payload.is_unit() {
                return Err(variant_arity(&target, 0, span));
            }
            let unit = tir::Expr::new(tir::ExprKind::Unit, Type::unit(span), span);
            return Ok(enum_init(target, unit, span));
        }

        Err(Message::error(
            ErrorCode::E2003,
            format!("Access of unknown variable '{path}'"),
        )
        .with_code(span))
    }

    fn global_reference(
        &mut self,
        id: InstanceId,
        full: &str,
        span: Span,
        env: &Env,
    ) -> CheckResult<tir::Expr> {
        if let Some(symbol) = self.symbols.lookup(full) {
            symbol.check_exposed(span, &env.ctx)?;
        }
        let instance = self.arena.get(id);
        let variable = instance
            .variable()
            .ok_or_else(|| Message::internal(format!("'{full}' has no resolved type")))?;
        Ok(tir::Expr::new(
            tir::ExprKind::Global {
                path: full.to_string(),
                instance: instance.reference(id),
            },
            variable.ty.clone(),
            span,
        ))
    }

    /// Resolve `Enum::Variant`, or a bare `Variant` of the expected enum.
    ///
    /// Returns `Ok(None)` if `written` names no variant.
    pub(super) fn resolve_variant(
        &mut self,
        site: Span,
        written: &str,
        explicit: Option<Vec<Type>>,
        env: &Env,
        expected: Option<&Type>,
        payload_hint: Option<Option<Type>>,
    ) -> CheckResult<Option<VariantTarget>> {
        let symbols = self.symbols;
        let (enum_path, variant, explicit) = match written.rsplit_once("::") {
            Some((head, variant)) => (env.expand(symbols, head), variant, explicit),
            None => match expected.map(|ty| &ty.kind) {
                Some(TypeKind::Enum { path, args }) => {
                    (path.clone(), written, explicit.or_else(|| Some(args.clone())))
                }
                _ => return Ok(None),
            },
        };
        let Some(symbol) = symbols.lookup(&enum_path) else {
            return Ok(None);
        };
        let DeclKind::Enum(decl) = &symbol.decl.kind else {
            return Ok(None);
        };
        if !decl.variants.iter().any(|member| member.name == variant) {
            if written.contains("::") {
                return Err(Message::error(
                    ErrorCode::E2011,
                    format!("The enumeration '{enum_path}' has no variant '{variant}'"),
                )
                .with_code(site)
                .with_noted_code(format!("'{enum_path}' is defined here:"), symbol.span()));
            }
            return Ok(None);
        }

        let hints = payload_hint.map(|hint| vec![hint]);
        let request = Request::new(site, &enum_path, &[SymbolKind::Enum])
            .with_type_args(explicit)
            .with_arg_hints(hints.as_deref())
            .with_return_hint(expected)
            .with_variant(variant);
        let Some(id) = self.instantiate(request)? else {
            return Ok(None);
        };
        symbol.check_exposed(site, &env.ctx)?;
        let instance = self.arena.get(id);
        let (tag, payload) = instance
            .variant(variant)
            .ok_or_else(|| Message::internal(format!("'{enum_path}' lost variant '{variant}'")))?;
        let payload = payload.clone();
        let ty = Type::enumeration(enum_path.clone(), instance.type_args.clone(), site);
        Ok(Some(VariantTarget {
            path: enum_path,
            instance: instance.reference(id),
            tag,
            variant: variant.to_string(),
            payload,
            ty,
            decl_site: symbol.span(),
        }))
    }

    pub(super) fn access_member(&mut self, object: tir::Expr, name: &str, span: Span) -> CheckResult<tir::Expr> {
        let TypeKind::Struct { path, args, .. } = &object.ty.kind else {
            return Err(Message::error(
                ErrorCode::E2011,
                format!("Access of member '{name}' on non-structure type '{}'", object.ty),
            )
            .with_code(span)
            .with_noted_code(format!("'{}' originates from here:", object.ty), object.ty.origin));
        };
        let request = Request::new(span, path, &[SymbolKind::Struct]).with_type_args(Some(args.clone()));
        let id = self
            .instantiate(request)?
            .ok_or_else(|| Message::internal(format!("Structure '{path}' disappeared")))?;
        let member = self
            .arena
            .get(id)
            .members()
            .and_then(|members| members.iter().find(|(member, _)| member == name))
            .map(|(_, ty)| ty.clone());
        let Some(ty) = member else {
            let mut message = Message::error(
                ErrorCode::E2011,
                format!("The structure '{path}' has no member '{name}'"),
            )
            .with_code(span);
            if let Some(symbol) = self.symbols.lookup(path) {
                message = message.with_noted_code(format!("'{path}' is defined here:"), symbol.span());
            }
            return Err(message);
        };
        Ok(tir::Expr::new(
            tir::ExprKind::Member {
                object: Box::new(object),
                name: name.to_string(),
            },
            ty,
            span,
        ))
    }

    /// Check the left side of an assignment.
    ///
    /// Only `mut` locals, `mut` globals and members reached through a `mut`
    /// struct type are assignable; everything else is a mutability error,
    /// never a type mismatch.
    pub(super) fn check_place(&mut self, target: &Expr, env: &Env) -> CheckResult<tir::Expr> {
        let span = target.span;
        match &target.kind {
            ExprKind::Path {
                path,
                type_args: None,
            } => {
                if let Some(binding) = env.scope.lookup(path) {
                    if !binding.mutable {
                        return Err(immutable_variable(path, span, binding.site));
                    }
                    return Ok(tir::Expr::new(
                        tir::ExprKind::Local(path.clone()),
                        binding.ty.clone(),
                        span,
                    ));
                }
                let symbols = self.symbols;
                let full = env.expand(symbols, path);
                let request = Request::new(span, &full, &[SymbolKind::Variable]);
                if let Some(id) = self.instantiate(request)? {
                    let mutable = self.arena.get(id).variable().is_some_and(|variable| variable.mutable);
                    if !mutable {
                        let site = symbols.lookup(&full).map_or(span, |symbol| symbol.span());
                        return Err(immutable_variable(path, span, site));
                    }
                    return self.global_reference(id, &full, span, env);
                }
                if symbols.contains(&full) {
                    return Err(immutable_expression(span));
                }
                Err(Message::error(
                    ErrorCode::E2003,
                    format!("Access of unknown variable '{path}'"),
                )
                .with_code(span))
            }
            ExprKind::Member { object, name } => {
                let object = self.check_expr(object, env, None)?;
                if matches!(object.ty.kind, TypeKind::Struct { .. }) && !object.ty.is_mutable() {
                    let ty = &object.ty;
                    return Err(Message::error(
                        ErrorCode::E2008,
                        format!("Assignment to property of object behind non-mut reference '{ty}'"),
                    )
                    .with_code(span)
                    .with_noted_code(format!("'{ty}' originates from here:"), ty.origin)
                    .with_note(format!(
                        "Members can only be assigned through a 'mut {ty}' reference"
                    )));
                }
                self.access_member(object, name, span)
            }
            _ => Err(immutable_expression(span)),
        }
    }

    fn check_binary(
        &mut self,
        expr: &Expr,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        env: &Env,
    ) -> CheckResult<tir::Expr> {
        let span = expr.span;
        let (lhs, rhs, ty) = if op.is_logical() {
            let lhs = self.check_condition(lhs, env)?;
            let rhs = self.check_condition(rhs, env)?;
            (lhs, rhs, Type::bool(span))
        } else {
            let lhs = self.check_expr(lhs, env, None)?;
            if !op.is_equality() {
                require_number(&lhs)?;
            }
            let rhs_expr = rhs;
            let rhs = self.check_expr(rhs_expr, env, Some(&lhs.ty))?;
            self.expect_type(&lhs.ty, &rhs.ty, rhs_expr.span)?;
            let ty = if op.is_arithmetic() {
                lhs.ty.clone().at(span)
            } else {
                Type::bool(span)
            };
            (lhs, rhs, ty)
        };
        Ok(tir::Expr::new(
            tir::ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
            span,
        ))
    }

    /// Function literals take their parameter and return types from the
    /// expected function type; there is no inference without one.
    fn check_lambda(
        &mut self,
        expr: &Expr,
        params: &[LambdaParam],
        body: &[Stmt],
        env: &Env,
        expected: Option<&Type>,
    ) -> CheckResult<tir::Expr> {
        let span = expr.span;
        let Some(TypeKind::Function {
            params: param_types,
            ret,
        }) = expected.map(|ty| &ty.kind)
        else {
            let mut message = Message::error(
                ErrorCode::E2012,
                "Insufficient context for function literal",
            )
            .with_code(span);
            message = match expected {
                Some(ty) => message.with_noted_code(
                    format!("The context expects '{ty}', which is not a function type:"),
                    ty.origin,
                ),
                None => message.with_note(
                    "Function literals can only be used where a function type is expected",
                ),
            };
            return Err(message);
        };
        if param_types.len() != params.len() {
            return Err(Message::error(
                ErrorCode::E2004,
                format!(
                    "The context expects a function taking {}, but the function literal takes {}",
                    count(param_types.len(), "argument"),
                    params.len()
                ),
            )
            .with_code(span)
            .with_noted_code("The expected function type originates from here:", ret.origin));
        }

        let ret = ret.as_ref().clone();
        let mut scope = env.scope.function(ret.clone());
        let mut typed_params = Vec::with_capacity(params.len());
        for (param, ty) in params.iter().zip(param_types) {
            scope.bind(
                param.name.clone(),
                Binding {
                    ty: ty.clone(),
                    mutable: false,
                    site: param.span,
                },
            );
            typed_params.push(tir::Param {
                name: param.name.clone(),
                ty: ty.clone(),
            });
        }
        let mut lambda_env = Env {
            ctx: env.ctx.clone(),
            scope,
        };
        let body = self.check_function_body(body, &mut lambda_env, &ret, span, "The function literal")?;
        let ty = Type::function(param_types.clone(), ret, span);
        Ok(tir::Expr::new(
            tir::ExprKind::Lambda {
                params: typed_params,
                body,
            },
            ty,
            span,
        ))
    }
}

pub(super) fn enum_init(target: VariantTarget, value: tir::Expr, span: Span) -> tir::Expr {
    let VariantTarget {
        path,
        instance,
        tag,
        variant,
        ty,
        ..
    } = target;
    tir::Expr::new(
        tir::ExprKind::EnumInit {
            path,
            instance,
            tag,
            variant,
            value: Box::new(value),
        },
        ty,
        span,
    )
}

pub(super) fn variant_arity(target: &VariantTarget, got: usize, site: Span) -> Message {
    Message::error(
        ErrorCode::E2004,
        format!(
            "Enum variants take one value, but {got} {} provided",
            was_were(got)
        ),
    )
    .with_code(site)
    .with_noted_code(
        format!("'{}::{}' is defined here:", target.path, target.variant),
        target.decl_site,
    )
}

fn require_number(operand: &tir::Expr) -> CheckResult<()> {
    if operand.ty.is_numeric() {
        return Ok(());
    }
    let ty = &operand.ty;
    Err(Message::error(
        ErrorCode::E2018,
        format!("Expected number type, but got '{ty}'"),
    )
    .with_code(operand.span)
    .with_noted_code(format!("'{ty}' originates from here:"), ty.origin))
}

fn immutable_variable(name: &str, site: Span, decl: Span) -> Message {
    Message::error(
        ErrorCode::E2008,
        format!("Assignment to immutable variable '{name}'"),
    )
    .with_code(site)
    .with_noted_code(format!("'{name}' is defined here:"), decl)
}

fn immutable_expression(site: Span) -> Message {
    Message::error(ErrorCode::E2008, "Assignment to immutable expression").with_code(site)
}
