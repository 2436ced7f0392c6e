use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use tern_ir::Span;
use tern_types::Type;

use super::*;
use crate::tir;

/// Shapes keyed by type path.
#[derive(Default)]
struct Shapes {
    structs: FxHashMap<String, Vec<(String, Type)>>,
    enums: FxHashMap<String, Vec<(String, Type)>>,
}

impl ShapeSource for Shapes {
    fn struct_members(&mut self, ty: &Type) -> Option<Vec<(String, Type)>> {
        self.structs.get(ty.canonical_path()).cloned()
    }

    fn enum_variants(&mut self, ty: &Type) -> Option<Vec<(String, Type)>> {
        self.enums.get(ty.canonical_path()).cloned()
    }
}

fn sp() -> Span {
    Span::default()
}

fn enum_ty(path: &str) -> Type {
    Type::enumeration(path, vec![], sp())
}

fn shapes() -> Shapes {
    let mut shapes = Shapes::default();
    shapes.enums.insert(
        "Bit".into(),
        vec![("Zero".into(), Type::unit(sp())), ("One".into(), Type::unit(sp()))],
    );
    shapes.enums.insert(
        "Nat".into(),
        vec![("Zero".into(), Type::unit(sp())), ("Succ".into(), enum_ty("Nat"))],
    );
    shapes.structs.insert(
        "Pair".into(),
        vec![("a".into(), Type::bool(sp())), ("b".into(), enum_ty("Bit"))],
    );
    shapes.structs.insert("Empty".into(), vec![]);
    shapes
}

fn capture(name: Option<&str>, path: Vec<PathStep>) -> Capture {
    Capture {
        name: name.map(str::to_string),
        path,
        ty: Type::unit(sp()),
        site: sp(),
    }
}

fn variant(path: Vec<PathStep>, tag: usize, name: &str) -> Condition {
    Condition::Variant {
        path,
        tag,
        name: name.to_string(),
    }
}

fn literal(path: Vec<PathStep>, kind: tir::ExprKind) -> Condition {
    Condition::Value {
        path,
        value: tir::Expr::new(kind, Type::bool(sp()), sp()),
    }
}

/// `Variant` with a wildcard payload, as produced by a bare variant name.
fn bare_variant(tag: usize, name: &str) -> Pattern {
    let mut pattern = Pattern::new(sp());
    pattern.conditions.push(variant(vec![], tag, name));
    pattern
        .captures
        .push(capture(None, vec![PathStep::Variant(name.into())]));
    pattern
}

fn wildcard() -> Pattern {
    let mut pattern = Pattern::new(sp());
    pattern.captures.push(capture(None, vec![]));
    pattern
}

fn display(values: &[&PatternValue]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[test]
fn test_values_of_scalars() {
    let mut shapes = shapes();
    assert_eq!(
        pattern_values(&Type::bool(sp()), &mut shapes),
        [PatternValue::Bool(true), PatternValue::Bool(false)]
    );
    assert_eq!(pattern_values(&Type::unit(sp()), &mut shapes), [PatternValue::Unit]);
    assert_eq!(pattern_values(&Type::int(sp()), &mut shapes), [PatternValue::Any]);
    assert_eq!(
        pattern_values(&Type::list(Type::bool(sp()), false, sp()), &mut shapes),
        [PatternValue::Any]
    );
}

#[test]
fn test_struct_values_are_cross_product() {
    let mut shapes = shapes();
    let values = pattern_values(&Type::structure("Pair", vec![], false, sp()), &mut shapes);
    let shown: Vec<String> = values.iter().map(ToString::to_string).collect();
    assert_eq!(
        shown,
        [
            "Pair(true, Bit::Zero)",
            "Pair(true, Bit::One)",
            "Pair(false, Bit::Zero)",
            "Pair(false, Bit::One)",
        ]
    );
    let empty = pattern_values(&Type::structure("Empty", vec![], false, sp()), &mut shapes);
    assert_eq!(empty.len(), 1);
}

#[test]
fn test_recursive_enum_is_cut_off() {
    let mut shapes = shapes();
    let values = pattern_values(&enum_ty("Nat"), &mut shapes);
    let shown: Vec<String> = values.iter().map(ToString::to_string).collect();
    assert_eq!(shown, ["Nat::Zero", "Nat::Succ(_)"]);
}

#[test]
fn test_unknown_shape_is_any() {
    let mut shapes = shapes();
    assert_eq!(pattern_values(&enum_ty("Missing"), &mut shapes), [PatternValue::Any]);
}

#[test]
fn test_bit_coverage() {
    let mut shapes = shapes();
    let values = pattern_values(&enum_ty("Bit"), &mut shapes);
    let zero = bare_variant(0, "Zero");
    let one = bare_variant(1, "One");
    assert_eq!(display(&uncovered(&values, &[&zero])), ["Bit::One"]);
    assert!(uncovered(&values, &[&zero, &one]).is_empty());
    assert!(uncovered(&values, &[&zero, &wildcard()]).is_empty());
}

#[test]
fn test_bool_needs_both_literals() {
    let mut shapes = shapes();
    let values = pattern_values(&Type::bool(sp()), &mut shapes);
    let mut only_true = Pattern::new(sp());
    only_true
        .conditions
        .push(literal(vec![], tir::ExprKind::Bool(true)));
    assert_eq!(display(&uncovered(&values, &[&only_true])), ["false"]);
}

#[test]
fn test_nat_one_level_is_exhaustive() {
    let mut shapes = shapes();
    let values = pattern_values(&enum_ty("Nat"), &mut shapes);
    let zero = bare_variant(0, "Zero");
    let mut succ = Pattern::new(sp());
    succ.conditions.push(variant(vec![], 1, "Succ"));
    succ.captures
        .push(capture(Some("n"), vec![PathStep::Variant("Succ".into())]));
    assert!(uncovered(&values, &[&zero, &succ]).is_empty());
}

#[test]
fn test_any_is_only_covered_by_captures() {
    let mut shapes = shapes();
    let values = pattern_values(&enum_ty("Nat"), &mut shapes);
    let zero = bare_variant(0, "Zero");
    // `Succ(Zero)`: a condition on the cut-off payload never covers it.
    let mut succ_zero = Pattern::new(sp());
    succ_zero.conditions.push(variant(vec![], 1, "Succ"));
    succ_zero.conditions.push(variant(
        vec![PathStep::Variant("Succ".into())],
        0,
        "Zero",
    ));
    assert_eq!(
        display(&uncovered(&values, &[&zero, &succ_zero])),
        ["Nat::Succ(_)"]
    );
}

#[test]
fn test_struct_members_are_covered_individually() {
    let mut shapes = shapes();
    let values = pattern_values(&Type::structure("Pair", vec![], false, sp()), &mut shapes);
    // Pair(true, _) and Pair(false, Zero)
    let mut first = Pattern::new(sp());
    first
        .conditions
        .push(literal(vec![PathStep::Member("a".into())], tir::ExprKind::Bool(true)));
    first
        .captures
        .push(capture(None, vec![PathStep::Member("b".into())]));
    let mut second = Pattern::new(sp());
    second
        .conditions
        .push(literal(vec![PathStep::Member("a".into())], tir::ExprKind::Bool(false)));
    second
        .conditions
        .push(variant(vec![PathStep::Member("b".into())], 0, "Zero"));
    second.captures.push(capture(
        None,
        vec![PathStep::Member("b".into()), PathStep::Variant("Zero".into())],
    ));
    assert_eq!(
        display(&uncovered(&values, &[&first, &second])),
        ["Pair(false, Bit::One)"]
    );
}

#[test]
fn test_bindings_skip_wildcards() {
    let mut pattern = wildcard();
    pattern.captures.push(capture(Some("x"), vec![]));
    let names: Vec<&str> = pattern.bindings().map(|(name, _)| name).collect();
    assert_eq!(names, ["x"]);
    assert!(pattern.binding("x").is_some());
    assert!(pattern.binding("_").is_none());
}
