use super::*;

#[test]
fn propagate_mask() {
    assert!(TypeFlags::PROPAGATE.contains(TypeFlags::HAS_RUNTIME_ARRAY));
    assert!(TypeFlags::PROPAGATE.contains(TypeFlags::HAS_POINTER));
    assert!(!TypeFlags::PROPAGATE.contains(TypeFlags::IS_SCALAR));
}

#[test]
fn helper_queries() {
    let f = TypeFlags::IS_NUMERIC | TypeFlags::HOST_SHAREABLE;
    assert!(f.is_numeric());
    assert!(f.is_host_shareable());
    assert!(!f.is_constructible());
}
