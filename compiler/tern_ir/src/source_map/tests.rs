use super::*;

#[test]
fn test_add_assigns_sequential_ids() {
    let mut map = SourceMap::new();
    let a = map.add("a.tn", "fun main() {}").unwrap();
    let b = map.add("b.tn", "").unwrap();
    assert_eq!(a.raw(), 0);
    assert_eq!(b.raw(), 1);
    assert_eq!(map.len(), 2);
    assert_eq!(map.path(b), Some("b.tn"));
    assert_eq!(map.text(a), Some("fun main() {}"));
    assert_eq!(map.lookup("a.tn"), Some(a));
}

#[test]
fn test_duplicate_path_rejected() {
    let mut map = SourceMap::new();
    map.add("a.tn", "x").unwrap();
    let err = map.add("a.tn", "y").unwrap_err();
    assert_eq!(err, SourceError::DuplicatePath("a.tn".to_string()));
    assert_eq!(err.to_string(), "source file 'a.tn' was added more than once");
}

#[test]
fn test_blank_detection() {
    let mut map = SourceMap::new();
    let blank = map.add("blank.tn", "  \n\t\n").unwrap();
    let full = map.add("full.tn", "val x = 1").unwrap();
    assert!(map.get(blank).unwrap().is_blank());
    assert!(!map.get(full).unwrap().is_blank());
}

#[test]
fn test_files_iterate_in_insertion_order() {
    let mut map = SourceMap::new();
    map.add("z.tn", "").unwrap();
    map.add("a.tn", "").unwrap();
    let paths: Vec<&str> = map.files().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["z.tn", "a.tn"]);
}

#[test]
fn test_unknown_id() {
    let map = SourceMap::new();
    assert!(map.is_empty());
    assert_eq!(map.text(FileId::from_raw(3)), None);
}
