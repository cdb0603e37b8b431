//! Abandonment rule
//!
//! Non-loyalty customers walk out once their wait reaches the patience
//! threshold. Loyalty members never abandon. The sweep runs every minute
//! after rescoring and before dispatch, so a customer at the threshold is
//! gone before any barista could pick them.

use crate::models::order::Order;
use crate::models::queue::DispatchQueue;
use crate::policy::DispatchRules;

/// Remove every order whose customer has run out of patience
///
/// Returned orders are marked abandoned with their final wait recorded.
/// Queue order of the survivors is preserved.
pub fn sweep_impatient(
    queue: &mut DispatchQueue,
    now: usize,
    rules: &DispatchRules,
) -> Vec<Order> {
    let mut walked_out = queue.drain_where(|order| {
        !order.loyalty() && order.wait_at(now) >= rules.patience_minutes
    });
    for order in &mut walked_out {
        order.abandon(now);
    }
    walked_out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::drink::DrinkKind;
    use crate::models::order::OrderStatus;

    #[test]
    fn test_loyalty_members_stay_forever() {
        let rules = DispatchRules::default();
        let mut queue = DispatchQueue::new();
        queue.push(Order::new(1, 0, vec![DrinkKind::Latte], true));

        let walked = sweep_impatient(&mut queue, 60, &rules);
        assert!(walked.is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_walkout_exactly_at_patience_threshold() {
        let rules = DispatchRules::default();
        let mut queue = DispatchQueue::new();
        queue.push(Order::new(1, 0, vec![DrinkKind::Latte], false));

        assert!(sweep_impatient(&mut queue, 7, &rules).is_empty());

        let walked = sweep_impatient(&mut queue, 8, &rules);
        assert_eq!(walked.len(), 1);
        assert_eq!(walked[0].status(), OrderStatus::Abandoned);
        assert_eq!(walked[0].wait_minutes(), 8);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_sweep_only_touches_impatient_orders() {
        let rules = DispatchRules::default();
        let mut queue = DispatchQueue::new();
        queue.push(Order::new(1, 0, vec![DrinkKind::Espresso], false)); // wait 9
        queue.push(Order::new(2, 5, vec![DrinkKind::Espresso], false)); // wait 4
        queue.push(Order::new(3, 0, vec![DrinkKind::Espresso], true)); // loyal

        let walked = sweep_impatient(&mut queue, 9, &rules);
        assert_eq!(walked.len(), 1);
        assert_eq!(walked[0].id(), 1);
        assert_eq!(queue.len(), 2);
    }
}
