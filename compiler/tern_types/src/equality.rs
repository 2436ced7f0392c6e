//! Structural type compatibility.

use crate::{Type, TypeKind};

/// Whether a value of type `actual` may be used where `expected` is required.
///
/// Mutability is the only asymmetric part: `mut` expected rejects an
/// immutable actual, at every nesting level.
pub fn accepts(expected: &Type, actual: &Type) -> bool {
    match (&expected.kind, &actual.kind) {
        (TypeKind::Unit, TypeKind::Unit)
        | (TypeKind::Int, TypeKind::Int)
        | (TypeKind::Float, TypeKind::Float)
        | (TypeKind::Bool, TypeKind::Bool)
        | (TypeKind::String, TypeKind::String) => true,
        (
            TypeKind::List {
                elem: exp_elem,
                mutable: exp_mut,
            },
            TypeKind::List {
                elem: got_elem,
                mutable: got_mut,
            },
        ) => mutability_ok(*exp_mut, *got_mut) && accepts(exp_elem, got_elem),
        (
            TypeKind::Struct {
                path: exp_path,
                args: exp_args,
                mutable: exp_mut,
            },
            TypeKind::Struct {
                path: got_path,
                args: got_args,
                mutable: got_mut,
            },
        ) => {
            exp_path == got_path
                && mutability_ok(*exp_mut, *got_mut)
                && all_accept(exp_args, got_args)
        }
        (
            TypeKind::Enum {
                path: exp_path,
                args: exp_args,
            },
            TypeKind::Enum {
                path: got_path,
                args: got_args,
            },
        ) => exp_path == got_path && all_accept(exp_args, got_args),
        (
            TypeKind::Function {
                params: exp_params,
                ret: exp_ret,
            },
            TypeKind::Function {
                params: got_params,
                ret: got_ret,
            },
        ) => all_accept(exp_params, got_params) && accepts(exp_ret, got_ret),
        _ => false,
    }
}

#[inline]
fn mutability_ok(expected: bool, actual: bool) -> bool {
    !expected || actual
}

fn all_accept(expected: &[Type], actual: &[Type]) -> bool {
    expected.len() == actual.len() && expected.iter().zip(actual).all(|(e, a)| accepts(e, a))
}
