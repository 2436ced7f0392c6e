use super::*;
use crate::{FileId, Span};

fn span(n: u32) -> Span {
    Span::new(FileId::default(), n, n + 1)
}

#[test]
fn test_operator_classes() {
    assert!(BinaryOp::Add.is_arithmetic());
    assert!(BinaryOp::Lt.is_ordering());
    assert!(BinaryOp::NotEq.is_equality());
    assert!(BinaryOp::Or.is_logical());
    assert!(!BinaryOp::Eq.is_ordering());
    assert_eq!(BinaryOp::Rem.as_symbol(), "%");
    assert_eq!(UnaryOp::Not.as_symbol(), "!");
}

#[test]
fn test_wildcard_detection() {
    let wildcard = Expr::new(
        ExprKind::Path {
            path: "_".to_string(),
            type_args: None,
        },
        span(0),
    );
    assert!(wildcard.is_wildcard());

    let explicit = Expr::new(
        ExprKind::Path {
            path: "_".to_string(),
            type_args: Some(vec![]),
        },
        span(1),
    );
    assert!(!explicit.is_wildcard());
    assert_eq!(explicit.as_plain_path(), None);
}

#[test]
fn test_decl_names() {
    let module = Decl::new(DeclKind::Module("geo".to_string()), span(0));
    assert_eq!(module.name(), None);
    assert!(module.is_directive());

    let variable = Decl::new(
        DeclKind::Variable(VariableDecl {
            name: "origin".to_string(),
            public: true,
            mutable: false,
            ty: None,
            init: VariableInit::Expr(Expr::new(ExprKind::Int(0), span(1))),
        }),
        span(2),
    );
    assert_eq!(variable.name(), Some("origin"));
    assert!(variable.is_public());
    assert!(variable.type_params().is_empty());
}

#[test]
fn test_type_expr_mutability() {
    let ty = TypeExpr::new(
        TypeExprKind::Path {
            path: "List".to_string(),
            args: vec![],
            mutable: true,
        },
        span(0),
    );
    assert!(ty.is_mutable());
}
