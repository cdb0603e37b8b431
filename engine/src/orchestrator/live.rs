//! Live counter mode
//!
//! Runs one shop incrementally instead of simulating a whole shift: orders
//! are placed from outside, the clock advances one minute at a time on
//! demand, and snapshot views show the queue and the counter as they stand.
//!
//! # Concurrency
//!
//! A single mutex guards the whole shop. Every tick and every placement is
//! one exclusive critical section, so two callers can never dispatch the
//! same order, and a snapshot never shows a half-applied tick. None of the
//! public methods call each other; the lock is taken exactly once per call.

use log::debug;
use parking_lot::Mutex;

use crate::core::time::wall_clock_label;
use crate::models::barista::Barista;
use crate::models::order::{Order, OrderError};
use crate::models::state::ShopState;
use crate::orchestrator::engine::{dispatch_phase, OperatingMode, TickResult};
use crate::policy::{abandonment, scoring, DispatchRules};

/// Everything behind the lock
struct LiveState {
    /// Queue, baristas, and terminal collections
    state: ShopState,

    /// Minutes since the counter opened
    minute: usize,

    /// Next order ID; session-scoped so IDs never repeat, even after
    /// walkouts shrink the queue
    next_order_id: usize,
}

/// A coffee counter running in real time
///
/// Safe to share across threads; see the module docs for the locking rules.
///
/// # Example
/// ```
/// use coffee_sim_core::{DispatchRules, LiveShop};
///
/// let shop = LiveShop::open(2, DispatchRules::default());
/// let order_id = shop.place_order(&["ESPRESSO"], false).unwrap();
///
/// shop.advance_tick();
/// assert!(shop.waiting_orders().iter().all(|o| o.id() != order_id));
/// ```
pub struct LiveShop {
    /// Dispatch thresholds; fixed for the session, so kept outside the lock
    rules: DispatchRules,

    /// Mutable shop state
    inner: Mutex<LiveState>,
}

impl LiveShop {
    /// Open a counter with `baristas` idle baristas
    pub fn open(baristas: usize, rules: DispatchRules) -> Self {
        Self {
            rules,
            inner: Mutex::new(LiveState {
                state: ShopState::new(baristas),
                minute: 0,
                next_order_id: 1,
            }),
        }
    }

    /// Place an order at the current minute
    ///
    /// # Arguments
    /// * `drinks` - Menu-board names; case and surrounding whitespace are
    ///   ignored
    /// * `loyalty` - Whether the customer is a loyalty member
    ///
    /// # Returns
    /// The new order's ID, or a validation error for an empty order or an
    /// off-menu name.
    ///
    /// # Example
    /// ```
    /// use coffee_sim_core::{DispatchRules, LiveShop, OrderError};
    ///
    /// let shop = LiveShop::open(1, DispatchRules::default());
    /// assert!(shop.place_order(&["latte", "COLD_BREW"], true).is_ok());
    /// assert_eq!(shop.place_order(&[], false), Err(OrderError::EmptyOrder));
    /// ```
    pub fn place_order(&self, drinks: &[&str], loyalty: bool) -> Result<usize, OrderError> {
        let kinds = Order::parse_drinks(drinks)?;

        let mut inner = self.inner.lock();
        let id = inner.next_order_id;
        inner.next_order_id += 1;

        let mut order = Order::new(id, inner.minute, kinds, loyalty);
        order.set_priority_score(scoring::priority_score(&order, inner.minute, &self.rules));
        inner.state.queue_mut().push(order);

        debug!("order {} placed at minute {}", id, inner.minute);
        Ok(id)
    }

    /// Advance the counter by one minute
    ///
    /// Finishes due preparations, rescores the queue, sweeps walkouts, and
    /// dispatches to free baristas, all under one lock.
    pub fn advance_tick(&self) -> TickResult {
        let mut inner = self.inner.lock();
        inner.minute += 1;
        let minute = inner.minute;

        let num_completed = inner.state.finish_due(minute);
        inner.state.queue_mut().rescore(minute, &self.rules);

        let walked_out = abandonment::sweep_impatient(inner.state.queue_mut(), minute, &self.rules);
        let num_abandoned = walked_out.len();
        inner.state.record_abandoned(walked_out);

        let num_assigned = dispatch_phase(&mut inner.state, minute, &self.rules, OperatingMode::Live);

        debug!(
            "live minute {}: {} finished, {} assigned, {} walked out",
            minute, num_completed, num_assigned, num_abandoned
        );

        TickResult {
            minute,
            num_arrivals: 0, // live orders come from place_order, not a generator
            num_assigned,
            num_completed,
            num_abandoned,
            queue_depth: inner.state.queue().len(),
        }
    }

    /// Minutes since the counter opened
    pub fn current_minute(&self) -> usize {
        self.inner.lock().minute
    }

    /// Wall-clock label for the current minute (e.g. `"07:42"`)
    pub fn wall_clock(&self) -> String {
        wall_clock_label(self.inner.lock().minute)
    }

    /// Snapshot of the waiting queue, best-ranked first
    pub fn waiting_orders(&self) -> Vec<Order> {
        self.inner.lock().state.queue().ranked_snapshot()
    }

    /// Snapshot of the baristas and their workloads
    pub fn baristas(&self) -> Vec<Barista> {
        self.inner.lock().state.baristas().to_vec()
    }

    /// Snapshot of the orders being prepared right now
    pub fn in_preparation(&self) -> Vec<Order> {
        self.inner.lock().state.in_progress().to_vec()
    }

    /// Drain orders finished since the last call
    ///
    /// Finished orders are reported exactly once; a second call returns
    /// empty until more preparations finish.
    pub fn take_finished(&self) -> Vec<Order> {
        self.inner.lock().state.take_completed()
    }

    /// Customers who have walked out since opening
    pub fn abandoned_count(&self) -> usize {
        self.inner.lock().state.abandoned().len()
    }

    /// Estimated minutes until hand-off for a waiting order
    ///
    /// Elapsed wait plus the order's own preparation time; the queue ahead
    /// of it is not modelled. `None` if the order is not waiting.
    pub fn estimate_wait(&self, order_id: usize) -> Option<usize> {
        let inner = self.inner.lock();
        inner
            .state
            .queue()
            .find(order_id)
            .map(|order| order.estimated_wait(inner.minute))
    }

    /// One-line explanation of a waiting order's queue position
    ///
    /// `None` if the order is not waiting.
    pub fn explain(&self, order_id: usize) -> Option<String> {
        let inner = self.inner.lock();
        let order = inner.state.queue().find(order_id)?;

        let explanation = if order.skipped_count() > 0 {
            format!("skipped for fairness ({})", order.skipped_count())
        } else if order.priority_score() > self.rules.high_priority_display_threshold {
            "high priority".to_string()
        } else {
            "standard".to_string()
        };
        Some(explanation)
    }
}
