//! Shop state
//!
//! Complete state of one simulated shop: the dispatch queue, the baristas,
//! and the terminal collections every order eventually lands in.
//!
//! # Critical Invariants
//!
//! 1. **Order Uniqueness**: Every order lives in exactly one collection
//!    (queue, in-progress, completed, or abandoned)
//! 2. **Forward-Only Status**: Orders never return to the queue once released
//! 3. **Busy Baristas Decline**: An order is only dispatched to a barista
//!    that is free at the current minute

use serde::{Deserialize, Serialize};

use crate::models::barista::Barista;
use crate::models::order::Order;
use crate::models::queue::DispatchQueue;

/// Complete state of a running shop
///
/// # Example
/// ```
/// use coffee_sim_core::ShopState;
///
/// let state = ShopState::new(3);
/// assert_eq!(state.baristas().len(), 3);
/// assert!(state.queue().is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopState {
    /// Pending orders awaiting dispatch
    queue: DispatchQueue,

    /// Orders being prepared right now (live mode only; batch runs fold
    /// preparation into assignment)
    in_progress: Vec<Order>,

    /// Orders prepared and handed off
    completed: Vec<Order>,

    /// Orders whose customers walked out
    abandoned: Vec<Order>,

    /// Baristas behind the counter, in ID order
    baristas: Vec<Barista>,
}

impl ShopState {
    /// Create a fresh shop with `num_baristas` idle baristas (IDs 1-based)
    pub fn new(num_baristas: usize) -> Self {
        Self {
            queue: DispatchQueue::new(),
            in_progress: Vec::new(),
            completed: Vec::new(),
            abandoned: Vec::new(),
            baristas: (1..=num_baristas).map(Barista::new).collect(),
        }
    }

    // ==================== Accessors ====================

    /// The dispatch queue
    pub fn queue(&self) -> &DispatchQueue {
        &self.queue
    }

    /// Mutable access to the dispatch queue
    pub fn queue_mut(&mut self) -> &mut DispatchQueue {
        &mut self.queue
    }

    /// Orders currently being prepared
    pub fn in_progress(&self) -> &[Order] {
        &self.in_progress
    }

    /// Orders prepared and handed off
    pub fn completed(&self) -> &[Order] {
        &self.completed
    }

    /// Orders whose customers walked out
    pub fn abandoned(&self) -> &[Order] {
        &self.abandoned
    }

    /// Baristas behind the counter
    pub fn baristas(&self) -> &[Barista] {
        &self.baristas
    }

    /// Number of baristas on shift
    pub fn num_baristas(&self) -> usize {
        self.baristas.len()
    }

    // ==================== Dispatch ====================

    /// Batch dispatch: hand the order over and score it as done
    ///
    /// Batch runs measure queueing delay only, so the order goes straight to
    /// the completed collection while the barista stays busy for its
    /// preparation time.
    pub fn complete_at_counter(&mut self, queue_index: usize, barista_index: usize, now: usize) {
        let mut order = self.dispatch_to(queue_index, barista_index, now);
        order.finish_service();
        self.completed.push(order);
    }

    /// Live dispatch: hand the order over and track its preparation
    pub fn hand_to_barista(&mut self, queue_index: usize, barista_index: usize, now: usize) {
        let order = self.dispatch_to(queue_index, barista_index, now);
        self.in_progress.push(order);
    }

    /// Move every in-progress order whose preparation is due to completed
    ///
    /// Returns the number of orders finished this sweep.
    pub fn finish_due(&mut self, now: usize) -> usize {
        let mut finished = 0;
        let mut index = 0;
        while index < self.in_progress.len() {
            let due = self.in_progress[index]
                .completion_minute()
                .map_or(false, |minute| minute <= now);
            if due {
                let mut order = self.in_progress.remove(index);
                order.finish_service();
                self.completed.push(order);
                finished += 1;
            } else {
                index += 1;
            }
        }
        finished
    }

    /// Record orders that walked out (already marked abandoned)
    ///
    /// # Panics
    /// Panics if any order is not abandoned.
    pub fn record_abandoned(&mut self, orders: Vec<Order>) {
        for order in orders {
            assert!(
                order.is_abandoned(),
                "order {} recorded as abandoned with status {:?}",
                order.id(),
                order.status()
            );
            self.abandoned.push(order);
        }
    }

    /// Drain the completed collection (live report-once semantics)
    pub fn take_completed(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.completed)
    }

    /// Remove the order at `queue_index`, hand it to the barista at
    /// `barista_index`, and return it with service begun.
    fn dispatch_to(&mut self, queue_index: usize, barista_index: usize, now: usize) -> Order {
        let mut order = self.queue.remove(queue_index);
        let barista = &mut self.baristas[barista_index];
        order.begin_service(barista.id(), now);
        barista.begin_order(now, order.total_prep_minutes());
        order
    }
}
