use lumen_ir::{GenerationId, SymbolTable};

use super::*;

#[test]
fn inner_scopes_shadow_outer() {
    let mut symbols = SymbolTable::new(GenerationId::next());
    let x = symbols.register("x").unwrap();
    let mut scopes = Scopes::default();

    scopes.push();
    assert_eq!(scopes.declare(x, VarId::new(0)), None);
    scopes.push();
    assert_eq!(scopes.declare(x, VarId::new(1)), None);
    assert_eq!(scopes.lookup(x), Some(VarId::new(1)));
    scopes.pop();
    assert_eq!(scopes.lookup(x), Some(VarId::new(0)));
}

#[test]
fn redeclaration_in_same_scope_reports_previous() {
    let mut symbols = SymbolTable::new(GenerationId::next());
    let x = symbols.register("x").unwrap();
    let mut scopes = Scopes::default();

    scopes.push();
    scopes.declare(x, VarId::new(0));
    assert_eq!(scopes.declare(x, VarId::new(3)), Some(VarId::new(0)));
    assert_eq!(scopes.lookup(x), Some(VarId::new(0)));
}
