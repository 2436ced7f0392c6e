//! Pass ordering and collaborator handling.

use pretty_assertions::assert_eq;
use tern_diagnostic::{ErrorCode, Message};
use ternc::ColorMode;

use crate::common::{codes, headlines, listing, Project};

#[test]
fn blank_files_never_reach_the_parser() {
    let mut project = Project::new();
    project.sources.add("empty.tn", "").unwrap();
    project.sources.add("spaces.tn", "  \n\t\n").unwrap();
    project.file("main.tn", "val x = 1", |b| vec![b.val("x", None, b.int(1))]);
    let output = project.compile();
    assert!(output.success);
    assert_eq!(project.parser.seen, ["main.tn"]);
}

#[test]
fn backend_runs_only_without_errors() {
    let mut failing = Project::single("val x: Int = true", |b| {
        vec![b.val("x", Some(b.ty("Int")), b.bool(true))]
    });
    let output = failing.compile();
    assert!(!output.success);
    assert_eq!(output.code, None);
    assert_eq!(failing.backend.calls, 0);

    let mut passing = Project::single("val x: Int = 1", |b| {
        vec![b.val("x", Some(b.ty("Int")), b.int(1))]
    });
    let output = passing.compile();
    assert!(output.success);
    assert_eq!(passing.backend.calls, 1);
    assert_eq!(listing(&output), ["val x#0 []"]);
}

#[test]
fn aborted_parse_drops_the_file_but_checks_the_rest() {
    let mut project = Project::new();
    project.broken_file("broken.tn", "fun oops( }");
    project.file("main.tn", "val x: Int = \"s\"", |b| {
        vec![b.val("x", Some(b.ty("Int")), b.str("s"))]
    });
    let output = project.compile();
    assert!(!output.success);
    assert_eq!(codes(&output), [ErrorCode::E1001, ErrorCode::E2001]);
    assert_eq!(project.backend.calls, 0);
}

#[test]
fn symbols_of_an_aborted_file_are_unknown() {
    let mut project = Project::new();
    project.broken_file("lib.tn", "fun helper( }");
    project.file("main.tn", "val x = helper()", |b| {
        vec![b.val("x", None, b.call_path("helper", vec![]))]
    });
    let output = project.compile();
    assert_eq!(codes(&output), [ErrorCode::E1001, ErrorCode::E2003]);
}

#[test]
fn parse_warnings_do_not_fail_the_build() {
    let mut project = Project::single("val s = \"open", |b| {
        vec![b.val("s", None, b.str("open"))]
    });
    let warning = Message::warning(ErrorCode::E1001, "Unclosed string literal");
    project
        .parser
        .outputs_mut("main.tn")
        .messages
        .push(warning.clone());
    let output = project.compile();
    assert!(output.success);
    assert_eq!(output.messages, [warning]);
}

#[test]
fn backend_errors_fail_the_build() {
    let mut project = Project::single("val x = 1", |b| vec![b.val("x", None, b.int(1))]);
    project.backend.fail_with = Some(Message::error(
        ErrorCode::E9001,
        "target does not support globals",
    ));
    let output = project.compile();
    assert!(!output.success);
    assert_eq!(output.code, None);
    assert_eq!(headlines(&output), ["target does not support globals"]);
}

#[test]
fn variables_are_listed_before_other_items_across_files() {
    let mut project = Project::new();
    project.file("a.tn", "fun one() -> Int = 1\nval a = one()", |b| {
        vec![
            b.function("one", vec![], b.ty("Int"), vec![b.ret(b.int(1))]),
            b.val("a", None, b.call_path("one", vec![])),
        ]
    });
    project.file("b.tn", "val b = 2", |b| vec![b.val("b", None, b.int(2))]);
    let output = project.compile();
    assert_eq!(listing(&output), ["val a#0 []", "val b#0 []", "fun one#0 []"]);
}

#[test]
fn compiling_twice_gives_identical_results() {
    let mut project = Project::single("val x: Int = \"oops\"\nval y = 1", |b| {
        vec![
            b.val("x", Some(b.ty("Int")), b.str("oops")),
            b.val("y", None, b.int(1)),
        ]
    });
    let first = project.compile();
    let second = project.compile();
    assert_eq!(first.success, second.success);
    assert_eq!(first.messages, second.messages);
    assert_eq!(first.code, second.code);
}

#[test]
fn rendered_messages_name_the_file() {
    let mut project = Project::single("val x: Int = \"oops\"", |b| {
        vec![b.val("x", Some(b.ty("Int")), b.str("oops"))]
    });
    project.options.color = ColorMode::Never;
    let output = project.compile();
    let rendered = output.render(&project.sources);
    assert!(rendered.starts_with("[error] Expected type 'Int', but got 'String'"));
    assert!(rendered.contains("in 'main.tn'"));
    assert!(!rendered.contains('\x1B'));
}

#[test]
fn color_option_reaches_rendering() {
    let mut project = Project::single("val x: Int = \"oops\"", |b| {
        vec![b.val("x", Some(b.ty("Int")), b.str("oops"))]
    });
    project.options.color = ColorMode::Always;
    let output = project.compile();
    assert_eq!(output.color, ColorMode::Always);
    assert!(output.render(&project.sources).contains('\x1B'));
}
