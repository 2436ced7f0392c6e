use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use tern_diagnostic::{Diagnostics, ErrorCode};
use tern_ir::{AstBuilder, FileId};
use tern_types::Type;

use super::*;

fn file(id: u32, decls: impl FnOnce(&AstBuilder) -> Vec<Decl>) -> ParsedFile {
    let builder = AstBuilder::new(FileId::from_raw(id));
    ParsedFile {
        file: builder.file(),
        path: format!("file{id}.tn"),
        decls: decls(&builder),
    }
}

fn collect(files: &[ParsedFile]) -> (SymbolTable<'_>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut table = collect_names(files, &mut diagnostics);
    collect_symbols(&mut table, files);
    (table, diagnostics)
}

#[test]
fn test_paths_follow_module_directives() {
    let files = [file(0, |b| {
        vec![
            b.function("main", vec![], b.ty("Unit"), vec![]),
            b.module("geo"),
            b.structure("Point", &[], vec![("x", b.ty("Int"))]),
            b.module("geo::shapes"),
            b.enumeration("Shape", &["T"], vec![("Dot", None)]),
        ]
    })];
    let (table, diagnostics) = collect(&files);
    assert!(diagnostics.is_empty());
    let paths: Vec<&str> = table.iter().map(|s| s.path.as_str()).collect();
    assert_eq!(paths, ["main", "geo::Point", "geo::shapes::Shape"]);
    let shape = table.lookup("geo::shapes::Shape").unwrap();
    assert_eq!(shape.kind, SymbolKind::Enum);
    assert_eq!(shape.type_params(), ["T".to_string()]);
    assert_eq!(shape.ctx.module, "geo::shapes");
    assert_eq!(table.lookup("main").unwrap().ctx.module, "");
}

#[test]
fn test_duplicate_keeps_first_declaration() {
    let files = [
        file(0, |b| vec![b.val("x", None, b.int(1))]),
        file(1, |b| vec![b.val("x", None, b.str("two"))]),
    ];
    let (table, diagnostics) = collect(&files);
    assert_eq!(table.len(), 1);
    assert_eq!(table.lookup("x").unwrap().file, FileId::from_raw(0));
    assert_eq!(diagnostics.len(), 1);
    let message = &diagnostics.messages()[0];
    assert_eq!(message.code(), ErrorCode::E2006);
    assert_eq!(message.headline(), Some("The symbol 'x' exists more than once"));
    assert_eq!(message.code_spans().count(), 2);
}

#[test]
fn test_usage_snapshot_is_taken_at_declaration() {
    let files = [
        file(0, |b| {
            vec![
                b.module("util"),
                b.function("helper", vec![], b.ty("Unit"), vec![]).public(),
            ]
        }),
        file(1, |b| {
            vec![
                b.function("before", vec![], b.ty("Unit"), vec![]),
                b.use_path("util::helper"),
                b.function("after", vec![], b.ty("Unit"), vec![]),
            ]
        }),
    ];
    let (table, _) = collect(&files);
    assert!(!table.lookup("before").unwrap().ctx.usages.contains_key("helper"));
    assert_eq!(
        table.lookup("after").unwrap().ctx.usages.get("helper"),
        Some(&"util::helper".to_string())
    );
}

#[test]
fn test_wildcards_alias_next_segment() {
    let files = [
        file(0, |b| {
            vec![
                b.module("std"),
                b.structure("Box", &["T"], vec![]),
                b.module("std::io"),
                b.function("print", vec![], b.ty("Unit"), vec![]),
                b.module("stdx"),
                b.function("other", vec![], b.ty("Unit"), vec![]),
            ]
        }),
        file(1, |b| {
            vec![
                b.use_wildcard("std::io"),
                b.function("main", vec![], b.ty("Unit"), vec![]),
            ]
        }),
    ];
    let (table, _) = collect(&files);
    let usages = &table.lookup("main").unwrap().ctx.usages;
    assert_eq!(usages.get("Box"), Some(&"std::Box".to_string()));
    assert_eq!(usages.get("io"), Some(&"std::io".to_string()));
    assert_eq!(usages.get("print"), Some(&"std::io::print".to_string()));
    // Prefixes match whole segments only.
    assert!(!usages.contains_key("other"));
}

#[test]
fn test_module_directive_imports_own_module() {
    let files = [
        file(0, |b| {
            vec![
                b.module("a"),
                b.function("f", vec![], b.ty("Unit"), vec![]),
            ]
        }),
        file(1, |b| {
            vec![
                b.use_path("x::y"),
                b.module("a"),
                b.function("g", vec![], b.ty("Unit"), vec![]),
            ]
        }),
    ];
    let (table, _) = collect(&files);
    let usages = &table.lookup("a::g").unwrap().ctx.usages;
    assert_eq!(usages.get("f"), Some(&"a::f".to_string()));
    // `mod` starts a fresh usage map.
    assert!(!usages.contains_key("y"));
}

#[test]
fn test_expand_prefers_module_then_type_arg_then_usage() {
    let files = [file(0, |b| {
        vec![
            b.module("m"),
            b.function("show", vec![], b.ty("Unit"), vec![]),
            b.module("std::Int"),
            b.function("show", vec![], b.ty("Unit"), vec![]),
        ]
    })];
    let (table, _) = collect(&files);
    let mut ctx = ModuleContext {
        module: "m".to_string(),
        usages: FxHashMap::default(),
    };
    ctx.usages.insert("T".to_string(), "elsewhere".to_string());
    ctx.usages.insert("alias".to_string(), "a::b".to_string());

    let mut args = FxHashMap::default();
    args.insert("T".to_string(), Type::int(tern_ir::Span::default()));

    assert_eq!(table.expand("show", &ctx, Some(&args)), "m::show");
    assert_eq!(table.expand("T::show", &ctx, Some(&args)), "std::Int::show");
    assert_eq!(table.expand("T::show", &ctx, None), "elsewhere::show");
    assert_eq!(table.expand("alias", &ctx, None), "a::b");
    assert_eq!(table.expand("alias::c", &ctx, None), "a::b::c");
    assert_eq!(table.expand("unknown::x", &ctx, None), "unknown::x");
}

#[test]
fn test_visibility() {
    let files = [file(0, |b| {
        vec![
            b.module("lib"),
            b.function("private", vec![], b.ty("Unit"), vec![]),
            b.function("open", vec![], b.ty("Unit"), vec![]).public(),
        ]
    })];
    let (table, _) = collect(&files);
    let outside = ModuleContext::default();
    let inside = ModuleContext {
        module: "lib".to_string(),
        usages: FxHashMap::default(),
    };
    let site = tern_ir::Span::new(FileId::from_raw(3), 0, 1);
    let private = table.lookup("lib::private").unwrap();
    let open = table.lookup("lib::open").unwrap();

    assert!(private.check_exposed(site, &inside).is_ok());
    assert!(open.check_exposed(site, &outside).is_ok());
    let err = private.check_exposed(site, &outside).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2009);
    assert_eq!(
        err.headline(),
        Some("'lib::private' is not public but accessed from a different module")
    );
    let spans: Vec<_> = err.code_spans().collect();
    assert_eq!(spans, [site, private.span()]);
}
