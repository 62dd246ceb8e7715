use super::*;

#[test]
fn equal_spellings_share_a_symbol() {
    let mut table = SymbolTable::new(GenerationId::next());
    let a = table.register("position").unwrap();
    let b = table.register("color").unwrap();
    let c = table.register("position").unwrap();

    assert_eq!(a, c);
    assert_ne!(a, b);
    assert_eq!(table.len(), 2);
    assert_eq!(table.name_for(a), Some("position"));
    assert_eq!(table.name_for(b), Some("color"));
}

#[test]
fn foreign_generation_does_not_resolve() {
    let mut first = SymbolTable::new(GenerationId::next());
    let mut second = SymbolTable::new(GenerationId::next());
    let a = first.register("x").unwrap();
    let b = second.register("x").unwrap();

    // Same spelling, same index, still distinct tokens.
    assert_eq!(a.index(), b.index());
    assert_ne!(a, b);
    assert_eq!(second.name_for(a), None);
    assert!(!second.owns(a));
    assert!(second.owns(b));
}

#[test]
fn invalid_symbol_never_resolves() {
    let mut table = SymbolTable::new(GenerationId::next());
    table.register("x").unwrap();
    assert!(!Symbol::INVALID.is_valid());
    assert_eq!(table.name_for(Symbol::INVALID), None);
    assert_eq!(Symbol::default(), Symbol::INVALID);
}

#[test]
fn get_does_not_register() {
    let mut table = SymbolTable::new(GenerationId::next());
    assert_eq!(table.get("main"), None);
    let main = table.register("main").unwrap();
    assert_eq!(table.get("main"), Some(main));
    assert!(!table.is_empty());
}

#[test]
fn new_unique_skips_taken_names() {
    let mut table = SymbolTable::new(GenerationId::next());
    table.register("tmp").unwrap();
    table.register("tmp_1").unwrap();
    let fresh = table.new_unique("tmp").unwrap();
    assert_eq!(table.name_for(fresh), Some("tmp_2"));
    let untaken = table.new_unique("other").unwrap();
    assert_eq!(table.name_for(untaken), Some("other"));
}

#[test]
fn iter_in_registration_order() {
    let mut table = SymbolTable::new(GenerationId::next());
    let b = table.register("b").unwrap();
    let a = table.register("a").unwrap();
    let all: Vec<(Symbol, &str)> = table.iter().collect();
    assert_eq!(all, [(b, "b"), (a, "a")]);
}
