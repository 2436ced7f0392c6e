//! Resolution of type annotations.

use tern_diagnostic::{ErrorCode, Message};
use tern_ir::{TypeExpr, TypeExprKind};
use tern_types::{lookup_builtin, Type};

use super::instantiate::{check_builtin_use, check_type_arg_use, unknown_type};
use super::{Checker, Env, Request};
use crate::symbols::SymbolKind;
use crate::CheckResult;

impl Checker<'_, '_> {
    /// Resolve an annotation to a type whose origin is the annotation.
    ///
    /// Names resolve to bound type arguments first, then builtins, then
    /// struct and enum symbols, which are instantiated for the written
    /// type arguments.
    pub(crate) fn type_from_expr(&mut self, ty: &TypeExpr, env: &Env) -> CheckResult<Type> {
        match &ty.kind {
            TypeExprKind::Function { params, ret } => {
                let params = params
                    .iter()
                    .map(|param| self.type_from_expr(param, env))
                    .collect::<CheckResult<Vec<_>>>()?;
                let ret = self.type_from_expr(ret, env)?;
                Ok(Type::function(params, ret, ty.span))
            }
            TypeExprKind::Path {
                path,
                args,
                mutable,
            } => {
                if let Some(bound) = env.scope.type_arg(path) {
                    check_type_arg_use(args.len(), *mutable, ty.span)?;
                    return Ok(bound.clone().at(ty.span));
                }
                let resolved = args
                    .iter()
                    .map(|arg| self.type_from_expr(arg, env))
                    .collect::<CheckResult<Vec<_>>>()?;
                if let Some(builtin) = lookup_builtin(path) {
                    check_builtin_use(builtin, args.len(), *mutable, ty.span)?;
                    return builtin
                        .instantiate(resolved, *mutable, ty.span)
                        .ok_or_else(|| Message::internal(format!("Builtin '{path}' rejected its arguments")));
                }

                let symbols = self.symbols;
                let full = env.expand(symbols, path);
                let request = Request::new(ty.span, &full, &[SymbolKind::Struct, SymbolKind::Enum])
                    .with_type_args(Some(resolved));
                let (Some(id), Some(symbol)) = (self.instantiate(request)?, symbols.lookup(&full)) else {
                    return Err(unknown_type(path, ty.span));
                };
                symbol.check_exposed(ty.span, &env.ctx)?;
                let type_args = self.arena.get(id).type_args.clone();
                match symbol.kind {
                    SymbolKind::Enum if *mutable => Err(Message::error(
                        ErrorCode::E2008,
                        format!("Attempt to specify the enumeration '{full}' as mutable"),
                    )
                    .with_code(ty.span)
                    .with_noted_code(format!("'{full}' is defined here:"), symbol.span())),
                    SymbolKind::Enum => Ok(Type::enumeration(full, type_args, ty.span)),
                    _ => Ok(Type::structure(full, type_args, *mutable, ty.span)),
                }
            }
        }
    }

    /// Resolve `name[T, U]` type arguments written at a use site.
    pub(crate) fn explicit_type_args(
        &mut self,
        args: Option<&[TypeExpr]>,
        env: &Env,
    ) -> CheckResult<Option<Vec<Type>>> {
        args.map(|args| {
            args.iter()
                .map(|arg| self.type_from_expr(arg, env))
                .collect::<CheckResult<Vec<_>>>()
        })
        .transpose()
    }
}
