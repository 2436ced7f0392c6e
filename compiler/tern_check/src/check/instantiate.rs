//! Instance creation, memoization and type-argument inference.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tern_diagnostic::{ErrorCode, Message};
use tern_ir::{DeclKind, FunctionBody, Span, TypeExpr, TypeExprKind, VariableInit};
use tern_types::{instance_key, lookup_builtin, Type, TypeKind};

use super::{count, was_were, Checker, Env};
use crate::instance::{
    Body, FunctionInstance, InstanceData, InstanceId, ParamInstance, VariableInstance,
    VariableValue,
};
use crate::scope::{Binding, Scope};
use crate::symbols::{Symbol, SymbolKind};
use crate::CheckResult;

/// What to instantiate and which hints inference may use.
#[derive(Clone, Debug)]
pub(crate) struct Request<'r> {
    pub site: Span,
    pub path: &'r str,
    pub kinds: &'r [SymbolKind],
    /// Explicit type arguments; inference runs only when absent.
    pub type_args: Option<Vec<Type>>,
    /// Argument types for functions and structs, or the single variant
    /// payload for enums. `None` entries could not be typed.
    pub arg_hints: Option<&'r [Option<Type>]>,
    pub return_hint: Option<&'r Type>,
    /// Variant being constructed, for enum payload inference.
    pub variant: Option<&'r str>,
}

impl<'r> Request<'r> {
    pub fn new(site: Span, path: &'r str, kinds: &'r [SymbolKind]) -> Self {
        Request {
            site,
            path,
            kinds,
            type_args: None,
            arg_hints: None,
            return_hint: None,
            variant: None,
        }
    }

    #[must_use]
    pub fn with_type_args(mut self, type_args: Option<Vec<Type>>) -> Self {
        self.type_args = type_args;
        self
    }

    #[must_use]
    pub fn with_arg_hints(mut self, hints: Option<&'r [Option<Type>]>) -> Self {
        self.arg_hints = hints;
        self
    }

    #[must_use]
    pub fn with_return_hint(mut self, hint: Option<&'r Type>) -> Self {
        self.return_hint = hint;
        self
    }

    #[must_use]
    pub fn with_variant(mut self, variant: &'r str) -> Self {
        self.variant = Some(variant);
        self
    }
}

impl<'ast> Checker<'_, 'ast> {
    /// Get or create the instance of the symbol at `request.path`.
    ///
    /// Returns `Ok(None)` if no symbol of an allowed kind exists there, so
    /// callers can probe several interpretations of one name.
    #[tracing::instrument(level = "debug", skip_all, fields(path = request.path))]
    pub(crate) fn instantiate(&mut self, request: Request<'_>) -> CheckResult<Option<InstanceId>> {
        let symbols = self.symbols;
        let Some(symbol) = symbols.lookup(request.path) else {
            return Ok(None);
        };
        if !request.kinds.contains(&symbol.kind) {
            return Ok(None);
        }

        let params = symbol.type_params();
        let type_args = match request.type_args.clone() {
            Some(args) => args,
            None if params.is_empty() => Vec::new(),
            None => self.infer_type_args(symbol, &request)?,
        };
        if type_args.len() != params.len() {
            return Err(Message::error(
                ErrorCode::E2007,
                format!(
                    "The symbol '{}' takes {}, but {} {} provided",
                    symbol.path,
                    count(params.len(), "type argument"),
                    type_args.len(),
                    was_were(type_args.len())
                ),
            )
            .with_code(request.site)
            .with_noted_code(format!("'{}' is defined here:", symbol.path), symbol.span()));
        }

        let key = instance_key(&type_args);
        if let Some(id) = self.arena.find(symbol.id, &key) {
            tracing::trace!(key = %key, "instance cache hit");
            return self.reuse(id, symbol, request.site).map(Some);
        }
        self.create(symbol, request.site, type_args, key).map(Some)
    }

    fn reuse(&mut self, id: InstanceId, symbol: &Symbol<'ast>, site: Span) -> CheckResult<InstanceId> {
        if self.in_flight.contains(&id) {
            if symbol.kind == SymbolKind::Variable {
                return Err(Message::error(
                    ErrorCode::E2017,
                    format!("Global variable '{}' depends on itself", symbol.path),
                )
                .with_code(site)
                .with_noted_code(format!("'{}' is defined here:", symbol.path), symbol.span()));
            }
            // Recursion: the signature is resolved, the body is still pending.
            return Ok(id);
        }
        if !self.speculating {
            self.mark_used(id);
        }
        match self.arena.get(id).failure() {
            Some(failure) => Err(failure.clone()),
            None => Ok(id),
        }
    }

    fn create(
        &mut self,
        symbol: &Symbol<'ast>,
        site: Span,
        type_args: Vec<Type>,
        key: String,
    ) -> CheckResult<InstanceId> {
        let generic = !type_args.is_empty();
        if generic && self.depth >= self.config.max_instantiation_depth {
            return Err(Message::error(
                ErrorCode::E2016,
                format!(
                    "Instantiating '{}' exceeds the maximum instantiation depth of {}",
                    symbol.path, self.config.max_instantiation_depth
                ),
            )
            .with_code(site)
            .with_noted_code(format!("'{}' is defined here:", symbol.path), symbol.span()));
        }

        tracing::debug!(key = %key, "creating instance");
        let named: FxHashMap<String, Type> = symbol
            .type_params()
            .iter()
            .cloned()
            .zip(type_args.iter().cloned())
            .collect();
        let id = self
            .arena
            .insert(symbol.id, symbol.path.clone(), key, type_args);
        self.in_flight.insert(id);

        let env = Env {
            ctx: Rc::clone(&symbol.ctx),
            scope: Scope::with_type_args(named),
        };
        let was_speculating = std::mem::replace(&mut self.speculating, false);
        if generic {
            self.depth += 1;
        }
        self.buffers.push(Vec::new());
        let result = self
            .resolve_instance(id, symbol, &env, site)
            .map_err(|message| self.annotate(message, id, site));
        let buffered = self.buffers.pop().unwrap_or_default();
        if generic {
            self.depth -= 1;
        }
        self.speculating = was_speculating;
        self.in_flight.remove(&id);

        let instance = self.arena.get_mut(id);
        instance.pending.extend(buffered);
        if let Err(failure) = &result {
            instance.failure = Some(failure.clone());
        }
        if !self.speculating {
            self.mark_used(id);
        }
        result.map(|()| id)
    }

    /// Mark an instance reachable and report what it buffered.
    fn mark_used(&mut self, id: InstanceId) {
        let instance = self.arena.get_mut(id);
        if instance.used {
            return;
        }
        instance.used = true;
        let pending = std::mem::take(&mut instance.pending);
        for message in pending {
            self.emit(message);
        }
    }

    /// Name the type-argument substitution an error was produced under.
    fn annotate(&self, message: Message, id: InstanceId, site: Span) -> Message {
        let instance = self.arena.get(id);
        if instance.type_args.is_empty() {
            return message;
        }
        let params = self.symbols.get(instance.symbol).type_params();
        let bindings: Vec<String> = params
            .iter()
            .zip(&instance.type_args)
            .map(|(param, arg)| format!("'{param}={arg}'"))
            .collect();
        let listed = match bindings.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
            _ => bindings.concat(),
        };
        message.with_noted_code(
            format!("'{}' is instantiated using {listed} here:", instance.path),
            site,
        )
    }

    fn resolve_instance(
        &mut self,
        id: InstanceId,
        symbol: &Symbol<'ast>,
        env: &Env,
        site: Span,
    ) -> CheckResult<()> {
        let data = match &symbol.decl.kind {
            DeclKind::Struct(decl) => InstanceData::Struct {
                members: self.resolve_members(&decl.members, env)?,
            },
            DeclKind::Enum(decl) => InstanceData::Enum {
                variants: self.resolve_members(&decl.variants, env)?,
            },
            DeclKind::Function(decl) => {
                let ret = self.type_from_expr(&decl.ret, env)?;
                let mut params = Vec::with_capacity(decl.params.len());
                for param in &decl.params {
                    let ty = self.type_from_expr(&param.ty, env)?;
                    if param.variadic && !matches!(ty.kind, TypeKind::List { .. }) {
                        return Err(Message::error(
                            ErrorCode::E2001,
                            format!("Expected variadic parameter '{}' to be a list, but got '{ty}'", param.name),
                        )
                        .with_code(param.ty.span));
                    }
                    params.push(ParamInstance {
                        name: param.name.clone(),
                        ty,
                        variadic: param.variadic,
                    });
                }
                let body = match &decl.body {
                    FunctionBody::External(target) => Body::External(target.clone()),
                    FunctionBody::Block(_) => Body::Pending,
                };
                // Published before the body is checked, so recursive calls see it.
                self.arena.get_mut(id).data = InstanceData::Function(FunctionInstance {
                    params: params.clone(),
                    ret: ret.clone(),
                    body,
                });
                let FunctionBody::Block(stmts) = &decl.body else {
                    return Ok(());
                };
                let mut scope = env.scope.function(ret.clone());
                for (param, decl_param) in params.into_iter().zip(&decl.params) {
                    scope.bind(
                        param.name,
                        Binding {
                            ty: param.ty,
                            mutable: false,
                            site: decl_param.span,
                        },
                    );
                }
                let mut body_env = Env {
                    ctx: Rc::clone(&env.ctx),
                    scope,
                };
                let description = format!("Function '{}'", symbol.path);
                let body = match self.check_function_body(stmts, &mut body_env, &ret, symbol.span(), &description) {
                    Ok(stmts) => Body::Block(stmts),
                    Err(message) => {
                        let message = self.annotate(message, id, site);
                        self.emit(message);
                        Body::Failed
                    }
                };
                if let InstanceData::Function(function) = &mut self.arena.get_mut(id).data {
                    function.body = body;
                }
                return Ok(());
            }
            DeclKind::Variable(decl) => {
                let declared = decl
                    .ty
                    .as_ref()
                    .map(|ty| self.type_from_expr(ty, env))
                    .transpose()?;
                let (ty, init) = match &decl.init {
                    VariableInit::External(name) => {
                        let Some(ty) = declared else {
                            return Err(Message::error(
                                ErrorCode::E2019,
                                format!("External variable '{}' needs an explicit type", symbol.path),
                            )
                            .with_code(symbol.span()));
                        };
                        (ty, VariableValue::External(name.clone()))
                    }
                    VariableInit::Expr(value) => {
                        let checked = self.check_expr(value, env, declared.as_ref())?;
                        if let Some(expected) = &declared {
                            self.expect_type(expected, &checked.ty, value.span)?;
                        }
                        let ty = declared.unwrap_or_else(|| checked.ty.clone());
                        (ty, VariableValue::Expr(checked))
                    }
                };
                InstanceData::Variable(VariableInstance {
                    ty,
                    mutable: decl.mutable,
                    init,
                })
            }
            DeclKind::Module(_) | DeclKind::Usage(_) => {
                return Err(Message::internal(format!(
                    "Directive registered as symbol '{}'",
                    symbol.path
                )));
            }
        };
        self.arena.get_mut(id).data = data;
        Ok(())
    }

    fn resolve_members(
        &mut self,
        members: &[tern_ir::Member],
        env: &Env,
    ) -> CheckResult<Vec<(String, Type)>> {
        members
            .iter()
            .map(|member| Ok((member.name.clone(), self.type_from_expr(&member.ty, env)?)))
            .collect()
    }

    /// Infer missing type arguments from the request's hints.
    ///
    /// Declared parameter, member or payload types are walked against the
    /// hint types and the first concrete type met for each type parameter
    /// wins. Every walked annotation is validated first, independent of
    /// inference.
    fn infer_type_args(&mut self, symbol: &Symbol<'ast>, request: &Request<'_>) -> CheckResult<Vec<Type>> {
        let params = symbol.type_params();
        let mut bindings: FxHashMap<&str, Type> = FxHashMap::default();

        let hints = request.arg_hints.unwrap_or(&[]);
        match &symbol.decl.kind {
            DeclKind::Struct(decl) => {
                for (member, hint) in decl.members.iter().zip(hints) {
                    self.precheck_type(&member.ty, params, symbol)?;
                    if let Some(hint) = hint {
                        self.unify(&member.ty, hint, params, symbol, &mut bindings);
                    }
                }
            }
            DeclKind::Enum(decl) => {
                let payload = request
                    .variant
                    .and_then(|name| decl.variants.iter().find(|variant| variant.name == name));
                if let (Some(variant), [Some(hint)]) = (payload, hints) {
                    self.precheck_type(&variant.ty, params, symbol)?;
                    self.unify(&variant.ty, hint, params, symbol, &mut bindings);
                }
            }
            DeclKind::Function(decl) => {
                for (i, hint) in hints.iter().enumerate() {
                    let Some(param) = decl.params.get(i).or_else(|| decl.variadic()) else {
                        break;
                    };
                    self.precheck_type(&param.ty, params, symbol)?;
                    let Some(hint) = hint else { continue };
                    if param.variadic {
                        let list = Type::list(hint.clone(), false, hint.origin);
                        self.unify(&param.ty, &list, params, symbol, &mut bindings);
                    } else {
                        self.unify(&param.ty, hint, params, symbol, &mut bindings);
                    }
                }
            }
            DeclKind::Variable(_) | DeclKind::Module(_) | DeclKind::Usage(_) => {}
        }

        if let Some(hint) = request.return_hint {
            match &symbol.decl.kind {
                DeclKind::Struct(_) | DeclKind::Enum(_) => {
                    let same_type = matches!(hint.kind, TypeKind::Struct { .. } | TypeKind::Enum { .. })
                        && hint.canonical_path() == symbol.path;
                    if same_type {
                        for (param, arg) in params.iter().zip(hint.type_args()) {
                            bindings.entry(param.as_str()).or_insert_with(|| arg.clone());
                        }
                    }
                }
                DeclKind::Function(decl) => {
                    self.precheck_type(&decl.ret, params, symbol)?;
                    self.unify(&decl.ret, hint, params, symbol, &mut bindings);
                }
                DeclKind::Variable(_) | DeclKind::Module(_) | DeclKind::Usage(_) => {}
            }
        }

        params
            .iter()
            .map(|param| {
                bindings.remove(param.as_str()).ok_or_else(|| {
                    Message::error(
                        ErrorCode::E2005,
                        format!(
                            "Not enough context to infer type argument '{param}' of symbol '{}'",
                            symbol.path
                        ),
                    )
                    .with_code(request.site)
                    .with_noted_code(format!("'{}' is defined here:", symbol.path), symbol.span())
                })
            })
            .collect()
    }

    /// Record the first binding of each type parameter in `declared`.
    fn unify<'p>(
        &self,
        declared: &TypeExpr,
        hint: &Type,
        params: &'p [String],
        symbol: &Symbol<'ast>,
        bindings: &mut FxHashMap<&'p str, Type>,
    ) {
        match (&declared.kind, &hint.kind) {
            (TypeExprKind::Path { path, args, .. }, _) => {
                if let Some(param) = params.iter().find(|param| *param == path) {
                    if args.is_empty() {
                        bindings.entry(param.as_str()).or_insert_with(|| hint.clone());
                    }
                    return;
                }
                let hint_args = hint.type_args();
                if args.is_empty() || args.len() != hint_args.len() {
                    return;
                }
                let head = match lookup_builtin(path) {
                    Some(builtin) => format!("std::{}", builtin.name),
                    None => self.symbols.expand(path, &symbol.ctx, None),
                };
                if head != hint.canonical_path() {
                    return;
                }
                for (arg, hint_arg) in args.iter().zip(hint_args) {
                    self.unify(arg, hint_arg, params, symbol, bindings);
                }
            }
            (
                TypeExprKind::Function { params: declared_params, ret },
                TypeKind::Function {
                    params: hint_params,
                    ret: hint_ret,
                },
            ) => {
                if declared_params.len() == hint_params.len() {
                    for (param, hint_param) in declared_params.iter().zip(hint_params) {
                        self.unify(param, hint_param, params, symbol, bindings);
                    }
                }
                self.unify(ret, hint_ret, params, symbol, bindings);
            }
            (TypeExprKind::Function { .. }, _) => {}
        }
    }

    /// Validate an annotation of a generic declaration with its type
    /// parameters as placeholders, without instantiating anything.
    fn precheck_type(&self, ty: &TypeExpr, params: &[String], symbol: &Symbol<'ast>) -> CheckResult<()> {
        match &ty.kind {
            TypeExprKind::Function { params: inputs, ret } => {
                for input in inputs {
                    self.precheck_type(input, params, symbol)?;
                }
                self.precheck_type(ret, params, symbol)
            }
            TypeExprKind::Path {
                path,
                args,
                mutable,
            } => {
                if params.iter().any(|param| param == path) {
                    return check_type_arg_use(args.len(), *mutable, ty.span);
                }
                for arg in args {
                    self.precheck_type(arg, params, symbol)?;
                }
                if let Some(builtin) = lookup_builtin(path) {
                    return check_builtin_use(builtin, args.len(), *mutable, ty.span);
                }
                let full = self.symbols.expand(path, &symbol.ctx, None);
                match self.symbols.lookup(&full) {
                    Some(found) if matches!(found.kind, SymbolKind::Struct | SymbolKind::Enum) => {
                        let expected = found.type_params().len();
                        if expected == args.len() {
                            return Ok(());
                        }
                        Err(Message::error(
                            ErrorCode::E2007,
                            format!(
                                "The symbol '{full}' takes {}, but {} {} provided",
                                count(expected, "type argument"),
                                args.len(),
                                was_were(args.len())
                            ),
                        )
                        .with_code(ty.span)
                        .with_noted_code(format!("'{full}' is defined here:"), found.span()))
                    }
                    _ => Err(unknown_type(path, ty.span)),
                }
            }
        }
    }
}

/// A type parameter takes neither `mut` nor type arguments.
pub(super) fn check_type_arg_use(args: usize, mutable: bool, site: Span) -> CheckResult<()> {
    if mutable {
        return Err(Message::error(
            ErrorCode::E2008,
            "Attempt to specify mutability on a type argument",
        )
        .with_code(site));
    }
    if args > 0 {
        return Err(Message::error(
            ErrorCode::E2007,
            "Attempt to pass type arguments to a type argument",
        )
        .with_code(site));
    }
    Ok(())
}

pub(super) fn check_builtin_use(
    builtin: &tern_types::BuiltinType,
    args: usize,
    mutable: bool,
    site: Span,
) -> CheckResult<()> {
    if mutable && !builtin.mutable_allowed {
        return Err(Message::error(
            ErrorCode::E2008,
            format!("Attempt to specify the immutable type '{}' as mutable", builtin.name),
        )
        .with_code(site));
    }
    if args != builtin.arity {
        return Err(Message::error(
            ErrorCode::E2007,
            format!(
                "'{}' expects {}, but {args} {} provided",
                builtin.name,
                count(builtin.arity, "type argument"),
                was_were(args)
            ),
        )
        .with_code(site));
    }
    Ok(())
}

pub(super) fn unknown_type(path: &str, site: Span) -> Message {
    Message::error(ErrorCode::E2002, format!("Unknown type '{path}'")).with_code(site)
}
