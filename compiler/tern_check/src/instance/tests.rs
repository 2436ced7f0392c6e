use tern_ir::Span;
use tern_types::Type;

use super::*;
use crate::symbols::SymbolId;

fn symbol(raw: u32) -> SymbolId {
    SymbolId::from_raw(raw)
}

#[test]
fn test_ordinals_are_per_symbol() {
    let mut arena = InstanceArena::default();
    let a = symbol(0);
    let b = symbol(1);
    let a0 = arena.insert(a, "id".into(), "Int".into(), vec![Type::int(Span::default())]);
    let b0 = arena.insert(b, "other".into(), String::new(), vec![]);
    let a1 = arena.insert(a, "id".into(), "String".into(), vec![Type::string(Span::default())]);

    assert_eq!(arena.get(a0).ordinal, 0);
    assert_eq!(arena.get(b0).ordinal, 0);
    assert_eq!(arena.get(a1).ordinal, 1);
    assert_eq!(arena.find(a, "String"), Some(a1));
    assert_eq!(arena.find(b, "Int"), None);
    assert_eq!(arena.len(), 3);
    assert_eq!(arena.get(a1).reference(a1), InstanceRef { id: a1, ordinal: 1 });
}

#[test]
fn test_new_instances_are_pending_and_unused() {
    let mut arena = InstanceArena::default();
    let id = arena.insert(symbol(0), "p".into(), String::new(), vec![]);
    let instance = arena.get(id);
    assert_eq!(instance.data, InstanceData::Pending);
    assert!(!instance.is_used());
    assert!(instance.failure().is_none());
    assert!(instance.function().is_none());
}

#[test]
fn test_variant_lookup() {
    let mut arena = InstanceArena::default();
    let id = arena.insert(symbol(0), "Bit".into(), String::new(), vec![]);
    arena.get_mut(id).data = InstanceData::Enum {
        variants: vec![
            ("Zero".to_string(), Type::unit(Span::default())),
            ("One".to_string(), Type::int(Span::default())),
        ],
    };
    let (tag, ty) = arena.get(id).variant("One").unwrap();
    assert_eq!(tag, 1);
    assert_eq!(ty.to_string(), "Int");
    assert!(arena.get(id).variant("Two").is_none());
}
