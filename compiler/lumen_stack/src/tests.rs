use super::*;

#[test]
fn shallow_recursion_returns_value() {
    fn depth_sum(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { n + depth_sum(n - 1) })
    }

    assert_eq!(depth_sum(10), 55);
}

#[test]
fn deep_nesting_does_not_overflow() {
    // Mirrors a binary expression chain `a + (a + (a + ...))` nested 100k deep.
    fn nest(n: u32) -> u32 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { nest(n - 1) + 1 })
    }

    assert_eq!(nest(100_000), 100_000);
}

#[test]
fn passes_through_results() {
    let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("unsupported"));
    assert_eq!(result, Err("unsupported"));
}
