use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_spans_are_distinct() {
    let b = AstBuilder::new(FileId::from_raw(2));
    let one = b.int(1);
    let two = b.int(2);
    assert_ne!(one.span, two.span);
    assert_eq!(one.span.file, FileId::from_raw(2));
}

#[test]
fn test_enum_unit_variants_carry_unit() {
    let b = AstBuilder::new(FileId::default());
    let decl = b.enumeration("Bit", &[], vec![("Zero", None), ("One", None)]);
    let DeclKind::Enum(e) = &decl.kind else {
        panic!("expected enum, got {decl:?}");
    };
    assert_eq!(e.variants.len(), 2);
    for variant in &e.variants {
        match &variant.ty.kind {
            TypeExprKind::Path { path, .. } => assert_eq!(path, "Unit"),
            other => panic!("unexpected payload {other:?}"),
        }
    }
}

#[test]
fn test_public_marks_symbols_only() {
    let b = AstBuilder::new(FileId::default());
    let f = b.function("main", vec![], b.ty("Unit"), vec![]).public();
    assert!(f.is_public());
    let m = b.module("geo").public();
    assert!(!m.is_public());
}

#[test]
fn test_use_path_aliases_last_segment() {
    let b = AstBuilder::new(FileId::default());
    let decl = b.use_path("geo::shapes::Point");
    assert_eq!(
        decl.kind,
        DeclKind::Usage(vec![UsageItem::Alias {
            name: "Point".to_string(),
            path: "geo::shapes::Point".to_string(),
        }])
    );
}

#[test]
fn test_variadic_param() {
    let b = AstBuilder::new(FileId::default());
    let decl = b.generic_function(
        "list",
        &["T"],
        vec![b.variadic("xs", b.ty_args("List", vec![b.ty("T")]))],
        b.ty_args("List", vec![b.ty("T")]),
        vec![b.ret(b.path("xs"))],
    );
    let DeclKind::Function(f) = &decl.kind else {
        panic!("expected function");
    };
    assert_eq!(f.variadic().map(|p| p.name.as_str()), Some("xs"));
    assert_eq!(decl.type_params(), &["T".to_string()]);
}
