//! Initialization cycles between global variables.
//!
//! The in-flight guard only sees a cycle when the variable itself is being
//! created at the time it is read. When a function is entered first, the
//! variable's initializer calls back into the still-pending function and the
//! read is never revisited. This pass walks the typed IR of every used
//! initializer and function body once checking is done, so the answer does
//! not depend on declaration order.

use rustc_hash::{FxHashMap, FxHashSet};
use tern_diagnostic::{ErrorCode, Message};
use tern_ir::Span;

use super::Checker;
use crate::instance::{Body, InstanceData, InstanceId, VariableValue};
use crate::patterns::{Condition, Pattern};
use crate::symbols::SymbolKind;
use crate::tir::{Callee, Expr, ExprKind, Stmt, StmtKind};

/// Instances referenced from one body, with the referencing site.
type Edges = FxHashMap<InstanceId, Vec<(InstanceId, Span)>>;

impl Checker<'_, '_> {
    /// Report every global variable whose initializer reaches itself through
    /// other globals or the functions it calls or references.
    pub(super) fn check_global_cycles(&mut self) {
        let mut edges = Edges::default();
        for (id, instance) in self.arena.iter().filter(|(_, instance)| instance.is_used()) {
            let mut out = Vec::new();
            match &instance.data {
                InstanceData::Variable(variable) => {
                    if let VariableValue::Expr(init) = &variable.init {
                        expr_refs(init, &mut out);
                    }
                }
                InstanceData::Function(function) => {
                    if let Body::Block(stmts) = &function.body {
                        block_refs(stmts, &mut out);
                    }
                }
                InstanceData::Pending | InstanceData::Struct { .. } | InstanceData::Enum { .. } => {}
            }
            if !out.is_empty() {
                edges.insert(id, out);
            }
        }

        let mut reported: FxHashSet<InstanceId> = FxHashSet::default();
        let symbols = self.symbols;
        for symbol in symbols.iter().filter(|symbol| symbol.kind == SymbolKind::Variable) {
            let Some(start) = self.arena.find(symbol.id, "") else {
                continue;
            };
            if reported.contains(&start) {
                continue;
            }
            let mut trail = Vec::new();
            if !find_cycle(&edges, start, start, &mut FxHashSet::default(), &mut trail) {
                continue;
            }
            tracing::debug!(path = %symbol.path, length = trail.len(), "global initialization cycle");

            let Some(&(_, first_site)) = trail.first() else {
                continue;
            };
            let mut message = Message::error(
                ErrorCode::E2017,
                format!("Global variable '{}' depends on itself", symbol.path),
            )
            .with_code(first_site)
            .with_noted_code(format!("'{}' is defined here:", symbol.path), symbol.span());
            for pair in trail.windows(2) {
                let (from, _) = pair[0];
                let (to, site) = pair[1];
                message = message.with_noted_code(
                    format!(
                        "'{}' uses '{}' here:",
                        self.arena.get(from).path,
                        self.arena.get(to).path
                    ),
                    site,
                );
            }
            for &(id, _) in &trail {
                if matches!(self.arena.get(id).data, InstanceData::Variable(_)) {
                    reported.insert(id);
                }
            }
            self.emit(message);
        }
    }
}

/// Depth-first search for a path from `node` back to `start`. On success
/// `trail` holds the path as `(instance, referencing site)` steps, ending at
/// `start`.
fn find_cycle(
    edges: &Edges,
    start: InstanceId,
    node: InstanceId,
    visited: &mut FxHashSet<InstanceId>,
    trail: &mut Vec<(InstanceId, Span)>,
) -> bool {
    let Some(targets) = edges.get(&node) else {
        return false;
    };
    for &(next, site) in targets {
        trail.push((next, site));
        if next == start {
            return true;
        }
        if visited.insert(next) && find_cycle(edges, start, next, visited, trail) {
            return true;
        }
        trail.pop();
    }
    false
}

fn block_refs(stmts: &[Stmt], out: &mut Vec<(InstanceId, Span)>) {
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Expr(expr) | StmtKind::Return(expr) | StmtKind::Local { value: expr, .. } => {
                expr_refs(expr, out);
            }
            StmtKind::Assign { target, value } => {
                expr_refs(target, out);
                expr_refs(value, out);
            }
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => {
                expr_refs(cond, out);
                block_refs(then, out);
                block_refs(otherwise, out);
            }
            StmtKind::Match {
                scrutinee,
                branches,
            } => {
                expr_refs(scrutinee, out);
                for branch in branches {
                    pattern_refs(&branch.patterns, out);
                    block_refs(&branch.body, out);
                }
            }
        }
    }
}

fn expr_refs(expr: &Expr, out: &mut Vec<(InstanceId, Span)>) {
    match &expr.kind {
        ExprKind::Unit
        | ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Bool(_)
        | ExprKind::Str(_)
        | ExprKind::Local(_) => {}
        ExprKind::Global { instance, .. } | ExprKind::Function { instance, .. } => {
            out.push((instance.id, expr.span));
        }
        ExprKind::Call { callee, args } => {
            match callee {
                Callee::Function { instance, .. } => out.push((instance.id, expr.span)),
                Callee::Value(value) => expr_refs(value, out),
            }
            for arg in args {
                expr_refs(arg, out);
            }
        }
        ExprKind::StructInit { args, .. } => {
            for arg in args {
                expr_refs(arg, out);
            }
        }
        ExprKind::EnumInit { value, .. } => expr_refs(value, out),
        ExprKind::Member { object, .. } => expr_refs(object, out),
        ExprKind::Binary { lhs, rhs, .. } => {
            expr_refs(lhs, out);
            expr_refs(rhs, out);
        }
        ExprKind::Unary { operand, .. } => expr_refs(operand, out),
        ExprKind::If {
            cond,
            then,
            otherwise,
        } => {
            expr_refs(cond, out);
            expr_refs(then, out);
            expr_refs(otherwise, out);
        }
        ExprKind::Match { scrutinee, arms } => {
            expr_refs(scrutinee, out);
            for arm in arms {
                pattern_refs(&arm.patterns, out);
                expr_refs(&arm.value, out);
            }
        }
        ExprKind::Lambda { body, .. } => block_refs(body, out),
    }
}

fn pattern_refs(patterns: &[Pattern], out: &mut Vec<(InstanceId, Span)>) {
    for condition in patterns.iter().flat_map(|pattern| &pattern.conditions) {
        if let Condition::Value { value, .. } = condition {
            expr_refs(value, out);
        }
    }
}
