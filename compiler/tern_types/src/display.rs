//! Human-readable type names and instance keys.

use std::fmt;

use crate::{Type, TypeKind};

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mutable() {
            f.write_str("mut ")?;
        }
        match &self.kind {
            TypeKind::Unit => f.write_str("Unit"),
            TypeKind::Int => f.write_str("Int"),
            TypeKind::Float => f.write_str("Float"),
            TypeKind::Bool => f.write_str("Bool"),
            TypeKind::String => f.write_str("String"),
            TypeKind::List { elem, .. } => write!(f, "List[{elem}]"),
            TypeKind::Struct { path, args, .. } | TypeKind::Enum { path, args } => {
                f.write_str(path)?;
                if !args.is_empty() {
                    f.write_str("[")?;
                    write_list(f, args)?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeKind::Function { params, ret } => {
                f.write_str("Fun(")?;
                write_list(f, params)?;
                write!(f, ") -> {ret}")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

/// Canonical key of a resolved type-argument tuple.
///
/// Display is injective on type shapes, so structurally equal tuples always
/// produce equal keys.
pub fn instance_key(type_args: &[Type]) -> String {
    type_args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
