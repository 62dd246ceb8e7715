use super::*;

#[test]
fn generations_are_unique() {
    let a = GenerationId::next();
    let b = GenerationId::next();
    assert_ne!(a, b);
    assert!(a.is_some());
    assert!(b.is_some());
}

#[test]
fn none_is_not_some() {
    assert!(!GenerationId::NONE.is_some());
    assert_eq!(GenerationId::default(), GenerationId::NONE);
    assert_eq!(format!("{:?}", GenerationId::NONE), "Gen::NONE");
}

#[test]
fn raw_value_round_trips_through_debug() {
    let generation = GenerationId::next();
    assert_eq!(format!("{generation:?}"), format!("Gen({})", generation.raw()));
}
