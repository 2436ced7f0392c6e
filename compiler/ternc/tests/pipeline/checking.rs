//! Whole-program checking observed through the driver.

use pretty_assertions::assert_eq;
use tern_diagnostic::ErrorCode;
use tern_ir::{AstBuilder, Decl, Expr, Stmt};
use ternc::CheckConfig;

use crate::common::{codes, headlines, listing, Project};

fn bit(b: &AstBuilder) -> Decl {
    b.enumeration("Bit", &[], vec![("Zero", None), ("One", None)])
}

fn nat(b: &AstBuilder) -> Decl {
    b.enumeration("Nat", &[], vec![("Zero", None), ("Succ", Some(b.ty("Nat")))])
}

/// `fun f(x: <ty>) { match x { branches } }`
fn matcher(b: &AstBuilder, ty: &str, branches: Vec<(Vec<Expr>, Vec<Stmt>)>) -> Decl {
    b.function(
        "f",
        vec![b.param("x", b.ty(ty))],
        b.ty("Unit"),
        vec![b.match_stmt(b.path("x"), branches)],
    )
}

#[test]
fn pair_construction_and_member_access() {
    let mut project = Project::single("struct Pair(a: Int, b: Int)\nval p = Pair(1, 2)\nval a = p.a", |b| {
        vec![
            b.structure("Pair", &[], vec![("a", b.ty("Int")), ("b", b.ty("Int"))]),
            b.val("p", None, b.call_path("Pair", vec![b.int(1), b.int(2)])),
            b.val("a", None, b.member(b.path("p"), "a")),
        ]
    });
    let output = project.compile();
    assert!(output.success);
    assert_eq!(codes(&output), []);
    assert_eq!(
        listing(&output),
        ["val p#0 []", "val a#0 []", "struct Pair#0 []"]
    );
}

#[test]
fn generic_function_is_emitted_once_per_key() {
    let mut project = Project::single("fun id[T](x: T) -> T = x", |b| {
        vec![
            b.generic_function(
                "id",
                &["T"],
                vec![b.param("x", b.ty("T"))],
                b.ty("T"),
                vec![b.ret(b.path("x"))],
            ),
            b.val("n", None, b.call_path("id", vec![b.int(5)])),
            b.val("s", None, b.call_path("id", vec![b.str("s")])),
            b.val("again", None, b.call_path("id", vec![b.int(7)])),
        ]
    });
    let output = project.compile();
    assert!(output.success);
    let functions: Vec<&str> = listing(&output)
        .into_iter()
        .filter(|line| line.starts_with("fun"))
        .collect();
    assert_eq!(functions, ["fun id#0 [Int]", "fun id#1 [String]"]);
}

#[test]
fn mismatched_initializer_reports_one_error_at_the_value() {
    let mut init_span = None;
    let mut project = Project::single("val x: Int = \"oops\"", |b| {
        let init = b.str("oops");
        init_span = Some(init.span);
        vec![b.val("x", Some(b.ty("Int")), init)]
    });
    let output = project.compile();
    assert!(!output.success);
    assert_eq!(output.errors().count(), 1);
    assert_eq!(headlines(&output), ["Expected type 'Int', but got 'String'"]);
    assert_eq!(output.messages[0].primary_span(), init_span);
}

#[test]
fn bool_match_without_false_is_not_exhaustive() {
    let mut project = Project::single("fun f(x: Bool) { match x { true {} } }", |b| {
        vec![matcher(b, "Bool", vec![(vec![b.bool(true)], vec![])])]
    });
    let output = project.compile();
    assert_eq!(codes(&output), [ErrorCode::E3001]);
    assert_eq!(headlines(&output), ["'match' does not handle false"]);
}

#[test]
fn bit_match_reports_exactly_the_missing_variant() {
    let text = "enum Bit(Zero, One)\nfun f(x: Bit) { match x { Zero {} } }";
    let mut partial = Project::single(text, |b| {
        vec![bit(b), matcher(b, "Bit", vec![(vec![b.path("Zero")], vec![])])]
    });
    let output = partial.compile();
    assert_eq!(headlines(&output), ["'match' does not handle Bit::One"]);

    let mut complete = Project::single(text, |b| {
        vec![
            bit(b),
            matcher(
                b,
                "Bit",
                vec![(vec![b.path("Zero")], vec![]), (vec![b.path("One")], vec![])],
            ),
        ]
    });
    assert_eq!(codes(&complete.compile()), []);

    let mut wildcard = Project::single(text, |b| {
        vec![
            bit(b),
            matcher(
                b,
                "Bit",
                vec![(vec![b.path("Zero")], vec![]), (vec![b.wildcard()], vec![])],
            ),
        ]
    });
    assert_eq!(codes(&wildcard.compile()), []);
}

#[test]
fn recursive_enum_matched_one_level_deep_is_exhaustive() {
    let text = "enum Nat(Zero, Succ: Nat)\nfun f(x: Nat) { match x { Zero {} Succ(n) {} } }";
    let mut project = Project::single(text, |b| {
        vec![
            nat(b),
            matcher(
                b,
                "Nat",
                vec![
                    (vec![b.path("Zero")], vec![]),
                    (vec![b.call_path("Succ", vec![b.path("n")])], vec![]),
                ],
            ),
        ]
    });
    let output = project.compile();
    assert!(output.success, "{:?}", headlines(&output));
}

#[test]
fn mutability_violations_are_never_type_mismatches() {
    let mut project = Project::single("struct Cell(v: Int)\n...", |b| {
        vec![
            b.structure("Cell", &[], vec![("v", b.ty("Int"))]),
            b.function(
                "local",
                vec![],
                b.ty("Unit"),
                vec![
                    b.local("x", Some(b.ty("Int")), b.int(1)),
                    b.assign(b.path("x"), b.int(2)),
                ],
            ),
            b.function(
                "member",
                vec![b.param("c", b.ty("Cell"))],
                b.ty("Unit"),
                vec![b.assign(b.member(b.path("c"), "v"), b.int(2))],
            ),
        ]
    });
    let output = project.compile();
    assert_eq!(codes(&output), [ErrorCode::E2008, ErrorCode::E2008]);
    assert_eq!(
        headlines(&output),
        [
            "Assignment to immutable variable 'x'",
            "Assignment to property of object behind non-mut reference 'Cell'",
        ]
    );
}

#[test]
fn private_symbol_is_visible_only_in_its_module() {
    let build = |public: bool| {
        move |b: &AstBuilder| {
            let secret = b.function("secret", vec![], b.ty("Int"), vec![b.ret(b.int(1))]);
            vec![
                b.module("geo"),
                if public { secret.public() } else { secret },
                b.val("inside", None, b.call_path("secret", vec![])),
            ]
        }
    };
    let app = |b: &AstBuilder| {
        vec![
            b.module("app"),
            b.use_wildcard("geo"),
            b.val("outside", None, b.call_path("secret", vec![])),
        ]
    };

    let mut private = Project::new();
    private.file("geo.tn", "module geo", build(false));
    private.file("app.tn", "module app", app);
    let output = private.compile();
    assert_eq!(codes(&output), [ErrorCode::E2009]);
    assert_eq!(
        headlines(&output),
        ["'geo::secret' is not public but accessed from a different module"]
    );

    let mut public = Project::new();
    public.file("geo.tn", "module geo", build(true));
    public.file("app.tn", "module app", app);
    assert!(public.compile().success);
}

#[test]
fn unreferenced_generic_costs_nothing() {
    let broken = |b: &AstBuilder| {
        b.generic_function(
            "broken",
            &["T"],
            vec![b.param("x", b.ty("T"))],
            b.ty("T"),
            vec![b.ret(b.int(1))],
        )
    };
    let mut unused = Project::single("fun broken[T](x: T) -> T = 1", |b| vec![broken(b)]);
    let output = unused.compile();
    assert!(output.success);
    assert_eq!(listing(&output), Vec::<&str>::new());

    let mut used = Project::single("fun broken[T](x: T) -> T = 1\nval y = broken(true)", |b| {
        vec![broken(b), b.val("y", None, b.call_path("broken", vec![b.bool(true)]))]
    });
    assert_eq!(codes(&used.compile()), [ErrorCode::E2001]);
}

#[test]
fn permissive_policy_lets_incomplete_match_compile() {
    let mut project = Project::single("fun f(x: Bool) { match x { true {} } }", |b| {
        vec![matcher(b, "Bool", vec![(vec![b.bool(true)], vec![])])]
    });
    project.options.check = CheckConfig::permissive();
    let output = project.compile();
    assert!(output.success);
    assert_eq!(codes(&output), [ErrorCode::E3001]);
    assert!(!output.messages[0].is_error());
    assert!(output.code.is_some());
}

#[test]
fn symbols_from_other_files_resolve_across_the_program() {
    let mut project = Project::new();
    project.file("shapes.tn", "module shapes", |b| {
        vec![
            b.module("shapes"),
            b.structure("Point", &[], vec![("x", b.ty("Int")), ("y", b.ty("Int"))])
                .public(),
        ]
    });
    project.file("main.tn", "use shapes::Point", |b| {
        vec![
            b.use_path("shapes::Point"),
            b.val("origin", None, b.call_path("Point", vec![b.int(0), b.int(0)])),
        ]
    });
    let output = project.compile();
    assert!(output.success, "{:?}", headlines(&output));
    assert_eq!(
        listing(&output),
        ["val origin#0 []", "struct shapes::Point#0 []"]
    );
}
