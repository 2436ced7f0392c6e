//! Type model for Tern.
//!
//! Types are a plain tagged union ([`TypeKind`]) carrying the span they
//! originate from, so a mismatch can point at both the expected and the actual
//! type's source.
//!
//! # Equality
//!
//! Compatibility is [`accepts`]: recursive over tag, path, type arguments and
//! (asymmetrically) mutability. A `mut` expected type rejects an immutable
//! actual type; an immutable expected type accepts either. `PartialEq` on
//! [`Type`] is exact structural equality and ignores origins.

mod builtin;
mod display;
mod equality;
mod ty;

pub use builtin::{lookup_builtin, BuiltinType, BUILTINS};
pub use display::instance_key;
pub use equality::accepts;
pub use ty::{Type, TypeKind};

#[cfg(test)]
mod tests;
