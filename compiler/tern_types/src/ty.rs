//! Type representation.

use tern_ir::Span;

/// A resolved type and where it comes from.
#[derive(Clone, Debug)]
pub struct Type {
    pub kind: TypeKind,
    /// Source of the type: an annotation, a literal, or a declaration.
    pub origin: Span,
}

#[derive(Clone, Debug)]
pub enum TypeKind {
    Unit,
    Int,
    Float,
    Bool,
    String,
    List {
        elem: Box<Type>,
        mutable: bool,
    },
    Struct {
        path: String,
        args: Vec<Type>,
        mutable: bool,
    },
    /// Enum values are never mutable.
    Enum {
        path: String,
        args: Vec<Type>,
    },
    Function {
        params: Vec<Type>,
        ret: Box<Type>,
    },
}

impl Type {
    pub fn new(kind: TypeKind, origin: Span) -> Self {
        Type { kind, origin }
    }

    pub fn unit(origin: Span) -> Self {
        Type::new(TypeKind::Unit, origin)
    }

    pub fn int(origin: Span) -> Self {
        Type::new(TypeKind::Int, origin)
    }

    pub fn float(origin: Span) -> Self {
        Type::new(TypeKind::Float, origin)
    }

    pub fn bool(origin: Span) -> Self {
        Type::new(TypeKind::Bool, origin)
    }

    pub fn string(origin: Span) -> Self {
        Type::new(TypeKind::String, origin)
    }

    pub fn list(elem: Type, mutable: bool, origin: Span) -> Self {
        Type::new(
            TypeKind::List {
                elem: Box::new(elem),
                mutable,
            },
            origin,
        )
    }

    pub fn structure(path: impl Into<String>, args: Vec<Type>, mutable: bool, origin: Span) -> Self {
        Type::new(
            TypeKind::Struct {
                path: path.into(),
                args,
                mutable,
            },
            origin,
        )
    }

    pub fn enumeration(path: impl Into<String>, args: Vec<Type>, origin: Span) -> Self {
        Type::new(
            TypeKind::Enum {
                path: path.into(),
                args,
            },
            origin,
        )
    }

    pub fn function(params: Vec<Type>, ret: Type, origin: Span) -> Self {
        Type::new(
            TypeKind::Function {
                params,
                ret: Box::new(ret),
            },
            origin,
        )
    }

    /// Same type, different origin.
    #[must_use]
    pub fn at(mut self, origin: Span) -> Self {
        self.origin = origin;
        self
    }

    pub fn is_mutable(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::List { mutable: true, .. } | TypeKind::Struct { mutable: true, .. }
        )
    }

    pub fn is_unit(&self) -> bool {
        matches!(self.kind, TypeKind::Unit)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, TypeKind::Int | TypeKind::Float)
    }

    /// Type arguments: the element type for lists, declared arguments for
    /// structs and enums, nothing for everything else.
    pub fn type_args(&self) -> &[Type] {
        match &self.kind {
            TypeKind::List { elem, .. } => std::slice::from_ref(&**elem),
            TypeKind::Struct { args, .. } | TypeKind::Enum { args, .. } => args,
            TypeKind::Unit
            | TypeKind::Int
            | TypeKind::Float
            | TypeKind::Bool
            | TypeKind::String
            | TypeKind::Function { .. } => &[],
        }
    }

    /// Fully-qualified path of the symbol that names this type.
    ///
    /// Builtins live in `std`, so `T::show` with `T = Int` becomes `std::Int::show`.
    pub fn canonical_path(&self) -> &str {
        match &self.kind {
            TypeKind::Unit => "std::Unit",
            TypeKind::Int => "std::Int",
            TypeKind::Float => "std::Float",
            TypeKind::Bool => "std::Bool",
            TypeKind::String => "std::String",
            TypeKind::List { .. } => "std::List",
            TypeKind::Function { .. } => "std::Fun",
            TypeKind::Struct { path, .. } | TypeKind::Enum { path, .. } => path,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        crate::accepts(self, other) && crate::accepts(other, self)
    }
}

impl Eq for Type {}
