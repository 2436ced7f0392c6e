//! Match statements, match expressions and their patterns.

use tern_diagnostic::{ErrorCode, Message};
use tern_ir::{Branch, Expr, ExprKind, MatchArm, Span};
use tern_types::Type;

use super::expr::variant_arity;
use super::{count, was_were, Checker, Env, Request};
use crate::config::MatchPolicy;
use crate::patterns::{pattern_values, uncovered, Capture, Condition, PathStep, Pattern, PatternValue};
use crate::scope::Binding;
use crate::symbols::SymbolKind;
use crate::tir;
use crate::CheckResult;

impl<'ast> Checker<'_, 'ast> {
    /// Check a `match` statement.
    ///
    /// The enclosing scope always returns if every branch does and no value
    /// of the matched type is left unhandled.
    pub(super) fn check_match_stmt(
        &mut self,
        site: Span,
        scrutinee: &Expr,
        branches: &[Branch],
        env: &mut Env,
    ) -> CheckResult<tir::StmtKind> {
        let scrutinee = self.check_expr(scrutinee, env, None)?;
        let ty = scrutinee.ty.clone();

        let mut checked = Vec::with_capacity(branches.len());
        let mut all_return = true;
        for branch in branches {
            let patterns = self.branch_patterns(&branch.patterns, &ty, env)?;
            let inner = bind_captures(env, &patterns);
            let (body, returns) = self.check_block(&branch.body, &inner)?;
            all_return &= returns;
            checked.push(tir::Branch { patterns, body });
        }

        let patterns: Vec<&Pattern> = checked.iter().flat_map(|branch| &branch.patterns).collect();
        let exhaustive = self.check_exhaustive(site, &ty, &patterns, self.config.match_policy);
        if all_return && exhaustive {
            env.scope.mark_returns();
        }
        Ok(tir::StmtKind::Match {
            scrutinee,
            branches: checked,
        })
    }

    /// Check a `match` expression. Every arm must produce the type of the
    /// first arm, and unhandled values are always errors.
    pub(super) fn check_match_expr(
        &mut self,
        expr: &Expr,
        scrutinee: &Expr,
        arms: &[MatchArm],
        env: &Env,
        expected: Option<&Type>,
    ) -> CheckResult<tir::Expr> {
        let scrutinee = self.check_expr(scrutinee, env, None)?;
        let ty = scrutinee.ty.clone();

        let mut checked = Vec::with_capacity(arms.len());
        let mut result: Option<Type> = None;
        for arm in arms {
            let patterns = self.branch_patterns(&arm.patterns, &ty, env)?;
            let inner = bind_captures(env, &patterns);
            let value = self.check_expr(&arm.value, &inner, expected.or(result.as_ref()))?;
            let first = result.get_or_insert_with(|| value.ty.clone());
            self.expect_type(first, &value.ty, arm.value.span)?;
            checked.push(tir::MatchArm { patterns, value });
        }

        let patterns: Vec<&Pattern> = checked.iter().flat_map(|arm| &arm.patterns).collect();
        self.check_exhaustive(expr.span, &ty, &patterns, MatchPolicy::Strict);
        Ok(tir::Expr::new(
            tir::ExprKind::Match {
                scrutinee: Box::new(scrutinee),
                arms: checked,
            },
            result.unwrap_or_else(|| Type::unit(expr.span)),
            expr.span,
        ))
    }

    /// Report every value of `ty` no pattern handles; returns whether the
    /// match is exhaustive.
    fn check_exhaustive(&mut self, site: Span, ty: &Type, patterns: &[&Pattern], policy: MatchPolicy) -> bool {
        let values = pattern_values(ty, self);
        let missing = uncovered(&values, patterns);
        for value in &missing {
            let shown = match value {
                PatternValue::Any => format!("all possible values of '{ty}'"),
                value => value.to_string(),
            };
            let text = format!("'match' does not handle {shown}");
            let message = match policy {
                MatchPolicy::Strict => Message::error(ErrorCode::E3001, text),
                MatchPolicy::Permissive => Message::warning(ErrorCode::E3001, text),
            };
            self.emit(
                message
                    .with_code(site)
                    .with_note("Add a default branch by using '_' to capture all other values"),
            );
        }
        missing.is_empty()
    }

    /// Decompose the alternatives of one branch. All alternatives must bind
    /// the same names with compatible types.
    fn branch_patterns(&mut self, alternatives: &[Expr], ty: &Type, env: &Env) -> CheckResult<Vec<Pattern>> {
        let mut patterns = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            let mut pattern = Pattern::new(alternative.span);
            self.decompose(alternative, ty, env, &mut pattern, &mut Vec::new())?;
            patterns.push(pattern);
        }

        if let Some((first, rest)) = patterns.split_first() {
            for other in rest {
                same_names(first, other)?;
                same_names(other, first)?;
                for (name, capture) in first.bindings() {
                    if let Some(alternative) = other.binding(name) {
                        self.expect_type(&capture.ty, &alternative.ty, alternative.site)?;
                        self.expect_type(&alternative.ty, &capture.ty, capture.site)?;
                    }
                }
            }
        }
        Ok(patterns)
    }

    /// Flatten the pattern `expr`, matched against a value of type
    /// `expected` at `path`, into conditions and captures.
    fn decompose(
        &mut self,
        expr: &Expr,
        expected: &Type,
        env: &Env,
        pattern: &mut Pattern,
        path: &mut Vec<PathStep>,
    ) -> CheckResult<()> {
        match &expr.kind {
            _ if expr.is_wildcard() => {
                pattern.captures.push(Capture {
                    name: None,
                    path: path.clone(),
                    ty: expected.clone(),
                    site: expr.span,
                });
                Ok(())
            }
            ExprKind::Path {
                path: name,
                type_args: None,
            } if !name.contains("::") => {
                if self.variant_condition(expr, name, None, expected, env, pattern, path)? {
                    return Ok(());
                }
                if env.scope.lookup(name).is_some() {
                    return self.value_condition(expr, expected, env, pattern, path);
                }
                if let Some(first) = pattern.binding(name) {
                    return Err(Message::error(
                        ErrorCode::E3003,
                        format!("The variable '{name}' is captured more than once in this pattern"),
                    )
                    .with_code(expr.span)
                    .with_noted_code(format!("'{name}' is first captured here:"), first.site));
                }
                pattern.captures.push(Capture {
                    name: Some(name.clone()),
                    path: path.clone(),
                    ty: expected.clone(),
                    site: expr.span,
                });
                Ok(())
            }
            ExprKind::Path {
                path: name,
                type_args,
            } => {
                let explicit = self.explicit_type_args(type_args.as_deref(), env)?;
                if self.variant_condition(expr, name, explicit, expected, env, pattern, path)? {
                    return Ok(());
                }
                self.value_condition(expr, expected, env, pattern, path)
            }
            ExprKind::Call { callee, args } => {
                let ExprKind::Path {
                    path: written,
                    type_args,
                } = &callee.kind
                else {
                    return self.value_condition(expr, expected, env, pattern, path);
                };
                let symbols = self.symbols;
                let full = env.expand(symbols, written);
                let explicit = self.explicit_type_args(type_args.as_deref(), env)?;
                match symbols.lookup(&full).map(|symbol| symbol.kind) {
                    Some(SymbolKind::Struct) => {
                        self.struct_pattern(expr, callee.span, &full, explicit, args, expected, env, pattern, path)
                    }
                    Some(SymbolKind::Function | SymbolKind::Variable) => {
                        self.value_condition(expr, expected, env, pattern, path)
                    }
                    _ => {
                        let Some(target) = self.resolve_variant(callee.span, written, explicit, env, Some(expected), None)?
                        else {
                            return self.value_condition(expr, expected, env, pattern, path);
                        };
                        let [payload] = args.as_slice() else {
                            return Err(variant_arity(&target, args.len(), expr.span));
                        };
                        self.expect_type(expected, &target.ty, expr.span)?;
                        pattern.conditions.push(Condition::Variant {
                            path: path.clone(),
                            tag: target.tag,
                            name: target.variant.clone(),
                        });
                        path.push(PathStep::Variant(target.variant));
                        let result = self.decompose(payload, &target.payload, env, pattern, path);
                        path.pop();
                        result
                    }
                }
            }
            _ => self.value_condition(expr, expected, env, pattern, path),
        }
    }

    /// Record a variant condition if `name` resolves to an enum variant
    /// without a payload. A variant carrying a value is matched only through
    /// the call form `Variant(p)`.
    #[allow(clippy::too_many_arguments)]
    fn variant_condition(
        &mut self,
        expr: &Expr,
        name: &str,
        explicit: Option<Vec<Type>>,
        expected: &Type,
        env: &Env,
        pattern: &mut Pattern,
        path: &[PathStep],
    ) -> CheckResult<bool> {
        let Some(target) = self.resolve_variant(expr.span, name, explicit, env, Some(expected), None)? else {
            return Ok(false);
        };
        if !target.payload.is_unit() {
            return Ok(false);
        }
        self.expect_type(expected, &target.ty, expr.span)?;
        pattern.conditions.push(Condition::Variant {
            path: path.to_vec(),
            tag: target.tag,
            name: target.variant.clone(),
        });
        let mut payload_path = path.to_vec();
        payload_path.push(PathStep::Variant(target.variant));
        pattern.captures.push(Capture {
            name: None,
            path: payload_path,
            ty: target.payload,
            site: expr.span,
        });
        Ok(true)
    }

    /// The matched value must equal `expr`.
    fn value_condition(
        &mut self,
        expr: &Expr,
        expected: &Type,
        env: &Env,
        pattern: &mut Pattern,
        path: &[PathStep],
    ) -> CheckResult<()> {
        let value = self.check_expr(expr, env, Some(expected))?;
        self.expect_type(expected, &value.ty, expr.span)?;
        pattern.conditions.push(Condition::Value {
            path: path.to_vec(),
            value,
        });
        Ok(())
    }

    /// `Struct(p1, p2)`: each member is matched by its own sub-pattern.
    #[allow(clippy::too_many_arguments)]
    fn struct_pattern(
        &mut self,
        expr: &Expr,
        callee_site: Span,
        full: &str,
        explicit: Option<Vec<Type>>,
        args: &[Expr],
        expected: &Type,
        env: &Env,
        pattern: &mut Pattern,
        path: &mut Vec<PathStep>,
    ) -> CheckResult<()> {
        let request = Request::new(expr.span, full, &[SymbolKind::Struct])
            .with_type_args(explicit)
            .with_return_hint(Some(expected));
        let id = self
            .instantiate(request)?
            .ok_or_else(|| Message::internal(format!("Structure '{full}' disappeared")))?;
        let symbol = self
            .symbols
            .lookup(full)
            .ok_or_else(|| Message::internal(format!("Structure '{full}' disappeared")))?;
        symbol.check_exposed(callee_site, &env.ctx)?;

        let instance = self.arena.get(id);
        let ty = Type::structure(full, instance.type_args.clone(), true, expr.span);
        let members = instance.members().unwrap_or_default().to_vec();
        if members.len() != args.len() {
            return Err(Message::error(
                ErrorCode::E2004,
                format!(
                    "The structure '{full}' expects {}, but {} {} provided",
                    count(members.len(), "argument"),
                    args.len(),
                    was_were(args.len())
                ),
            )
            .with_code(expr.span)
            .with_noted_code(format!("The structure '{full}' is defined here:"), symbol.span()));
        }
        self.expect_type(expected, &ty, expr.span)?;

        for ((name, member), arg) in members.into_iter().zip(args) {
            path.push(PathStep::Member(name));
            let result = self.decompose(arg, &member, env, pattern, path);
            path.pop();
            result?;
        }
        Ok(())
    }
}

/// A child scope binding the named captures of the first alternative.
fn bind_captures(env: &Env, patterns: &[Pattern]) -> Env {
    let mut inner = env.child();
    if let Some(first) = patterns.first() {
        for (name, capture) in first.bindings() {
            inner.scope.bind(
                name,
                Binding {
                    ty: capture.ty.clone(),
                    mutable: false,
                    site: capture.site,
                },
            );
        }
    }
    inner
}

/// Every name `pattern` binds must be bound by `other` too.
fn same_names(pattern: &Pattern, other: &Pattern) -> CheckResult<()> {
    for (name, capture) in pattern.bindings() {
        if other.binding(name).is_none() {
            return Err(Message::error(
                ErrorCode::E3002,
                format!("Alternative patterns bind different variables: '{name}' is not bound by every alternative"),
            )
            .with_noted_code(format!("'{name}' is bound in this pattern:"), capture.site)
            .with_noted_code("...but not in this pattern:", other.span));
        }
    }
    Ok(())
}
