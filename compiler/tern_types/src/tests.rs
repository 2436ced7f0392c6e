use pretty_assertions::assert_eq;
use tern_ir::{FileId, Span};

use super::*;

fn at(n: u32) -> Span {
    Span::new(FileId::from_raw(0), n, n + 1)
}

fn pair(mutable: bool) -> Type {
    Type::structure("geo::Pair", vec![Type::int(at(1)), Type::string(at(2))], mutable, at(0))
}

#[test]
fn test_display() {
    assert_eq!(Type::int(at(0)).to_string(), "Int");
    assert_eq!(pair(false).to_string(), "geo::Pair[Int, String]");
    assert_eq!(pair(true).to_string(), "mut geo::Pair[Int, String]");
    assert_eq!(
        Type::list(Type::bool(at(0)), true, at(1)).to_string(),
        "mut List[Bool]"
    );
    assert_eq!(
        Type::function(
            vec![Type::int(at(0)), Type::float(at(1))],
            Type::unit(at(2)),
            at(3)
        )
        .to_string(),
        "Fun(Int, Float) -> Unit"
    );
    assert_eq!(Type::enumeration("Bit", vec![], at(0)).to_string(), "Bit");
}

#[test]
fn test_mutability_is_asymmetric() {
    assert!(accepts(&pair(false), &pair(true)));
    assert!(!accepts(&pair(true), &pair(false)));
    assert!(accepts(&pair(true), &pair(true)));
    assert_ne!(pair(true), pair(false));
}

#[test]
fn test_origin_is_ignored() {
    assert_eq!(Type::int(at(0)), Type::int(at(9)));
    assert_eq!(pair(false), pair(false).at(at(40)));
}

#[test]
fn test_paths_and_args_must_match() {
    let other = Type::structure("Pair", vec![Type::int(at(1)), Type::string(at(2))], false, at(0));
    assert!(!accepts(&pair(false), &other));

    let swapped = Type::structure(
        "geo::Pair",
        vec![Type::string(at(1)), Type::int(at(2))],
        false,
        at(0),
    );
    assert!(!accepts(&pair(false), &swapped));

    let as_enum = Type::enumeration("geo::Pair", vec![Type::int(at(1)), Type::string(at(2))], at(0));
    assert!(!accepts(&pair(false), &as_enum));
}

#[test]
fn test_function_arity() {
    let one = Type::function(vec![Type::int(at(0))], Type::int(at(1)), at(2));
    let two = Type::function(
        vec![Type::int(at(0)), Type::int(at(0))],
        Type::int(at(1)),
        at(2),
    );
    assert!(!accepts(&one, &two));
    assert!(accepts(&one, &one.clone()));
}

#[test]
fn test_instance_key() {
    assert_eq!(instance_key(&[]), "");
    assert_eq!(
        instance_key(&[Type::int(at(0)), pair(true)]),
        "Int, mut geo::Pair[Int, String]"
    );
}

#[test]
fn test_type_args_and_paths() {
    let list = Type::list(Type::int(at(0)), false, at(1));
    assert_eq!(list.type_args().len(), 1);
    assert_eq!(list.canonical_path(), "std::List");
    assert_eq!(pair(false).type_args().len(), 2);
    assert_eq!(pair(false).canonical_path(), "geo::Pair");
    assert!(Type::int(at(0)).type_args().is_empty());
    assert_eq!(Type::int(at(0)).canonical_path(), "std::Int");
}

#[test]
fn test_builtins() {
    let list = lookup_builtin("List").unwrap();
    assert_eq!(list.arity, 1);
    assert!(list.mutable_allowed);
    assert_eq!(lookup_builtin("std::Int").map(|b| b.name), Some("Int"));
    assert!(lookup_builtin("Pair").is_none());

    let built = list
        .instantiate(vec![Type::int(at(0))], true, at(1))
        .unwrap();
    assert_eq!(built.to_string(), "mut List[Int]");
    assert!(list.instantiate(vec![], false, at(1)).is_none());
}
