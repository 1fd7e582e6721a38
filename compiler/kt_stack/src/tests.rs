use super::*;

#[test]
fn returns_closure_result() {
    assert_eq!(ensure_sufficient_stack(|| 7 * 6), 42);
}

#[test]
fn deep_recursion_does_not_overflow() {
    fn nest(n: u32) -> u32 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { nest(n - 1) + 1 })
    }

    assert_eq!(nest(100_000), 100_000);
}

#[test]
fn budget_refuses_past_max() {
    let mut budget = DepthBudget::new(2);
    assert!(budget.enter());
    assert!(budget.enter());
    assert!(!budget.enter());
    assert_eq!(budget.depth(), 2);

    budget.leave();
    assert_eq!(budget.depth(), 1);
    assert!(budget.enter());
}

#[test]
fn leave_saturates_at_zero() {
    let mut budget = DepthBudget::new(1);
    budget.leave();
    assert_eq!(budget.depth(), 0);
    assert_eq!(budget.max(), 1);
}
