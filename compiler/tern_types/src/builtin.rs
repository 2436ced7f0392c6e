//! Builtin type table.

use tern_ir::Span;

use crate::Type;

/// A builtin type name and the rules for annotating it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BuiltinType {
    pub name: &'static str,
    /// Number of type arguments the annotation must carry.
    pub arity: usize,
    /// Whether `mut` may be written on the annotation.
    pub mutable_allowed: bool,
}

pub const BUILTINS: &[BuiltinType] = &[
    BuiltinType {
        name: "Unit",
        arity: 0,
        mutable_allowed: false,
    },
    BuiltinType {
        name: "Int",
        arity: 0,
        mutable_allowed: false,
    },
    BuiltinType {
        name: "Float",
        arity: 0,
        mutable_allowed: false,
    },
    BuiltinType {
        name: "Bool",
        arity: 0,
        mutable_allowed: false,
    },
    BuiltinType {
        name: "String",
        arity: 0,
        mutable_allowed: false,
    },
    BuiltinType {
        name: "List",
        arity: 1,
        mutable_allowed: true,
    },
];

/// Look up a builtin by its short name or its `std::` path.
pub fn lookup_builtin(name: &str) -> Option<&'static BuiltinType> {
    let short = name.strip_prefix("std::").unwrap_or(name);
    BUILTINS.iter().find(|builtin| builtin.name == short)
}

impl BuiltinType {
    /// Build the type. `args` must already have `self.arity` entries.
    pub fn instantiate(&self, mut args: Vec<Type>, mutable: bool, origin: Span) -> Option<Type> {
        if args.len() != self.arity {
            return None;
        }
        let ty = match self.name {
            "Unit" => Type::unit(origin),
            "Int" => Type::int(origin),
            "Float" => Type::float(origin),
            "Bool" => Type::bool(origin),
            "String" => Type::string(origin),
            "List" => Type::list(args.pop()?, mutable, origin),
            _ => return None,
        };
        Some(ty)
    }
}
