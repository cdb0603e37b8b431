//! Dispatch queue
//!
//! Holds every pending order, owned by value. An order lives in exactly one
//! place at a time (queue, a barista's hands, or a terminal collection), so
//! double-dispatch is impossible by construction rather than by locking.
//!
//! # Critical Invariants
//!
//! 1. **Single Owner**: An order removed from the queue cannot be selected again
//! 2. **Pending Only**: Every order in the queue has status `Pending`
//! 3. **Deterministic Ranking**: Ties in priority score break by arrival
//!    minute, then by order ID, so equal-seed runs rank identically

use serde::{Deserialize, Serialize};

use crate::models::order::Order;
use crate::policy::{scoring, DispatchRules};

/// Priority queue of pending orders
///
/// Scores go stale as waits grow, so the queue is rescored every minute and
/// ranked on demand instead of being kept in a heap.
///
/// # Example
/// ```
/// use coffee_sim_core::{DispatchQueue, DrinkKind, Order};
///
/// let mut queue = DispatchQueue::new();
/// queue.push(Order::new(1, 0, vec![DrinkKind::Espresso], false));
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchQueue {
    /// Pending orders in arrival order
    orders: Vec<Order>,
}

impl DispatchQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Add a pending order to the queue
    ///
    /// # Panics
    /// Panics if the order is not pending.
    pub fn push(&mut self, order: Order) {
        assert!(
            order.is_pending(),
            "order {} entered the queue with status {:?}",
            order.id(),
            order.status()
        );
        self.orders.push(order);
    }

    /// Number of pending orders
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// All pending orders, in arrival order
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Look up an order by position
    pub fn get(&self, index: usize) -> Option<&Order> {
        self.orders.get(index)
    }

    /// Look up an order by ID
    pub fn find(&self, order_id: usize) -> Option<&Order> {
        self.orders.iter().find(|o| o.id() == order_id)
    }

    /// Remove and return the order at `index`, transferring ownership
    ///
    /// Relative order of the remaining entries is preserved.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Order {
        self.orders.remove(index)
    }

    /// Recompute every pending order's priority score as of `now`
    pub fn rescore(&mut self, now: usize, rules: &DispatchRules) {
        for order in &mut self.orders {
            let score = scoring::priority_score(order, now, rules);
            order.set_priority_score(score);
        }
    }

    /// Record a fairness-scan skip against the order at `index`
    ///
    /// Returns the order's new skip count.
    pub fn record_skip_at(&mut self, index: usize) -> usize {
        self.orders[index].record_skip()
    }

    /// Attach a dispatch annotation to the order at `index`
    pub fn tag_reason_at(&mut self, index: usize, reason: impl Into<String>) {
        self.orders[index].tag_reason(reason);
    }

    /// Queue positions ranked for selection
    ///
    /// Sorted by priority score descending, breaking ties by earliest
    /// arrival, then by lowest order ID.
    pub fn selection_order(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.orders.len()).collect();
        indices.sort_by(|&a, &b| {
            let left = &self.orders[a];
            let right = &self.orders[b];
            right
                .priority_score()
                .total_cmp(&left.priority_score())
                .then_with(|| left.arrival_minute().cmp(&right.arrival_minute()))
                .then_with(|| left.id().cmp(&right.id()))
        });
        indices
    }

    /// Clone the queue contents in selection order (for live views)
    pub fn ranked_snapshot(&self) -> Vec<Order> {
        self.selection_order()
            .into_iter()
            .map(|index| self.orders[index].clone())
            .collect()
    }

    /// Remove and return every order matching `predicate`
    ///
    /// Relative order of both the removed and the remaining entries is
    /// preserved.
    pub fn drain_where<F>(&mut self, predicate: F) -> Vec<Order>
    where
        F: Fn(&Order) -> bool,
    {
        let mut removed = Vec::new();
        let mut index = 0;
        while index < self.orders.len() {
            if predicate(&self.orders[index]) {
                removed.push(self.orders.remove(index));
            } else {
                index += 1;
            }
        }
        removed
    }

    /// Drop all remaining orders (closing time)
    pub fn clear(&mut self) {
        self.orders.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::drink::DrinkKind;

    fn order(id: usize, arrival: usize, score: f64) -> Order {
        let mut o = Order::new(id, arrival, vec![DrinkKind::Espresso], false);
        o.set_priority_score(score);
        o
    }

    #[test]
    fn test_selection_order_ranks_by_score_then_arrival_then_id() {
        let mut queue = DispatchQueue::new();
        queue.push(order(1, 5, 40.0));
        queue.push(order(2, 3, 40.0));
        queue.push(order(3, 3, 40.0));
        queue.push(order(4, 9, 90.0));

        let ranked: Vec<usize> = queue
            .selection_order()
            .into_iter()
            .map(|i| queue.get(i).map(Order::id).unwrap_or(0))
            .collect();

        assert_eq!(ranked, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_drain_where_preserves_relative_order() {
        let mut queue = DispatchQueue::new();
        for id in 1..=5 {
            queue.push(order(id, id, 0.0));
        }

        let removed = queue.drain_where(|o| o.id() % 2 == 1);
        let removed_ids: Vec<usize> = removed.iter().map(Order::id).collect();
        let kept_ids: Vec<usize> = queue.orders().iter().map(Order::id).collect();

        assert_eq!(removed_ids, vec![1, 3, 5]);
        assert_eq!(kept_ids, vec![2, 4]);
    }

    #[test]
    fn test_remove_transfers_ownership() {
        let mut queue = DispatchQueue::new();
        queue.push(order(1, 0, 10.0));
        queue.push(order(2, 1, 20.0));

        let taken = queue.remove(0);
        assert_eq!(taken.id(), 1);
        assert_eq!(queue.len(), 1);
        assert!(queue.find(1).is_none());
    }
}
