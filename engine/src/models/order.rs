//! Order model
//!
//! Represents one customer's order from arrival to hand-off.
//! Each order has:
//! - A run-unique numeric ID (monotonically assigned)
//! - One or more drinks from the fixed menu
//! - A loyalty flag (loyalty members never walk out)
//! - A priority score recomputed every minute while waiting
//! - A skip counter maintained by the fairness scan
//! - Status (Pending, Assigned, Completed, Abandoned)
//!
//! Status only ever moves forward: `Pending → Assigned → Completed`, or
//! `Pending → Abandoned`. The scheduler owns every transition.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::drink::DrinkKind;

/// Order status
///
/// Tracks the lifecycle of an order through the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Waiting in the dispatch queue
    Pending,

    /// Handed to a barista who is still preparing it (live mode)
    Assigned,

    /// Prepared and handed off
    ///
    /// Batch runs jump straight from `Pending` to `Completed`: the run is
    /// scored on queueing delay, so preparation is folded into assignment.
    Completed,

    /// The customer walked out before being served
    Abandoned,
}

/// Errors that can occur when placing an order
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Unknown drink kind: {name}")]
    InvalidDrinkKind { name: String },

    #[error("Order must contain at least one drink")]
    EmptyOrder,
}

/// One customer's order
///
/// # Example
/// ```
/// use coffee_sim_core::{DrinkKind, Order};
///
/// let order = Order::new(1, 42, vec![DrinkKind::Latte, DrinkKind::Espresso], true);
/// assert_eq!(order.total_prep_minutes(), 6);
/// assert!(order.is_pending());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Run-unique order identifier
    id: usize,

    /// Minute the customer joined the queue
    arrival_minute: usize,

    /// Drinks requested (never empty)
    drinks: Vec<DrinkKind>,

    /// Loyalty-program member
    loyalty: bool,

    /// Current priority score in [0, 100], recomputed each minute
    priority_score: f64,

    /// Times this order was passed over by the fairness scan
    skipped_count: usize,

    /// Current status
    status: OrderStatus,

    /// Barista who took the order, once assigned
    barista_id: Option<usize>,

    /// Minute the order was handed to a barista
    assigned_minute: Option<usize>,

    /// Minute preparation finishes (assigned minute + total prep time)
    completion_minute: Option<usize>,

    /// Queueing delay in minutes, recorded at assignment or abandonment.
    /// Stays 0 while the order is still pending.
    wait_minutes: usize,

    /// Dispatch annotation, e.g. why an order jumped the queue
    reason: Option<String>,
}

impl Order {
    /// Create a new pending order
    ///
    /// # Arguments
    /// * `id` - Run-unique identifier
    /// * `arrival_minute` - Minute the customer joined the queue
    /// * `drinks` - Drinks requested (must not be empty)
    /// * `loyalty` - Whether the customer is a loyalty member
    ///
    /// # Panics
    /// Panics if `drinks` is empty. Boundary input is validated with
    /// [`Order::parse_drinks`] before construction.
    ///
    /// # Example
    /// ```
    /// use coffee_sim_core::{DrinkKind, Order};
    ///
    /// let order = Order::new(7, 0, vec![DrinkKind::ColdBrew], false);
    /// assert_eq!(order.id(), 7);
    /// ```
    pub fn new(id: usize, arrival_minute: usize, drinks: Vec<DrinkKind>, loyalty: bool) -> Self {
        assert!(!drinks.is_empty(), "order must contain at least one drink");

        Self {
            id,
            arrival_minute,
            drinks,
            loyalty,
            priority_score: 0.0,
            skipped_count: 0,
            status: OrderStatus::Pending,
            barista_id: None,
            assigned_minute: None,
            completion_minute: None,
            wait_minutes: 0,
            reason: None,
        }
    }

    /// Parse menu-board names into drink kinds
    ///
    /// This is the validation step for externally placed orders.
    ///
    /// # Returns
    /// - `Err(OrderError::EmptyOrder)` if `names` is empty
    /// - `Err(OrderError::InvalidDrinkKind)` on the first off-menu name
    ///
    /// # Example
    /// ```
    /// use coffee_sim_core::{DrinkKind, Order, OrderError};
    ///
    /// let drinks = Order::parse_drinks(&["ESPRESSO", "latte"]).unwrap();
    /// assert_eq!(drinks, vec![DrinkKind::Espresso, DrinkKind::Latte]);
    ///
    /// let err = Order::parse_drinks(&["MATCHA"]).unwrap_err();
    /// assert_eq!(err, OrderError::InvalidDrinkKind { name: "MATCHA".to_string() });
    /// ```
    pub fn parse_drinks(names: &[&str]) -> Result<Vec<DrinkKind>, OrderError> {
        if names.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        names
            .iter()
            .map(|name| {
                DrinkKind::from_name(name).ok_or_else(|| OrderError::InvalidDrinkKind {
                    name: (*name).to_string(),
                })
            })
            .collect()
    }

    // ==================== Accessors ====================

    /// Get order ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get the minute the customer joined the queue
    pub fn arrival_minute(&self) -> usize {
        self.arrival_minute
    }

    /// Get the drinks in this order
    pub fn drinks(&self) -> &[DrinkKind] {
        &self.drinks
    }

    /// Whether the customer is a loyalty member
    pub fn loyalty(&self) -> bool {
        self.loyalty
    }

    /// Get the current priority score
    pub fn priority_score(&self) -> f64 {
        self.priority_score
    }

    /// Times this order was passed over by the fairness scan
    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    /// Get current status
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Barista who took the order, once assigned
    pub fn barista_id(&self) -> Option<usize> {
        self.barista_id
    }

    /// Minute the order was handed to a barista
    pub fn assigned_minute(&self) -> Option<usize> {
        self.assigned_minute
    }

    /// Minute preparation finishes
    pub fn completion_minute(&self) -> Option<usize> {
        self.completion_minute
    }

    /// Queueing delay recorded at assignment or abandonment (0 while pending)
    pub fn wait_minutes(&self) -> usize {
        self.wait_minutes
    }

    /// Dispatch annotation, if any
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Check if the order is still waiting in the queue
    pub fn is_pending(&self) -> bool {
        matches!(self.status, OrderStatus::Pending)
    }

    /// Check if the order is being prepared
    pub fn is_assigned(&self) -> bool {
        matches!(self.status, OrderStatus::Assigned)
    }

    /// Check if the order was completed
    pub fn is_completed(&self) -> bool {
        matches!(self.status, OrderStatus::Completed)
    }

    /// Check if the customer walked out
    pub fn is_abandoned(&self) -> bool {
        matches!(self.status, OrderStatus::Abandoned)
    }

    /// Total preparation time across all drinks in the order
    pub fn total_prep_minutes(&self) -> usize {
        self.drinks.iter().map(|d| d.prep_minutes()).sum()
    }

    /// Total menu price of the order in cents
    pub fn total_price_cents(&self) -> i64 {
        self.drinks.iter().map(|d| d.price_cents()).sum()
    }

    /// Minutes waited so far as of `now`
    ///
    /// For pending orders this is the live queueing delay. Saturates at 0
    /// rather than panicking if `now` is before arrival.
    pub fn wait_at(&self, now: usize) -> usize {
        now.saturating_sub(self.arrival_minute)
    }

    /// Estimated minutes until hand-off as of `now`
    ///
    /// Elapsed queueing delay plus the order's own preparation time. This is
    /// a floor, not a promise: it ignores the queue ahead of the order.
    pub fn estimated_wait(&self, now: usize) -> usize {
        self.wait_at(now) + self.total_prep_minutes()
    }

    // ==================== Mutations ====================

    /// Update the priority score (recomputed each minute by the scheduler)
    pub fn set_priority_score(&mut self, score: f64) {
        self.priority_score = score;
    }

    /// Record one fairness-scan skip and return the new count
    pub fn record_skip(&mut self) -> usize {
        self.skipped_count += 1;
        self.skipped_count
    }

    /// Attach a dispatch annotation (e.g. emergency hand-off)
    pub fn tag_reason(&mut self, reason: impl Into<String>) {
        self.reason = Some(reason.into());
    }

    /// Hand the order to a barista
    ///
    /// Records the assignment minute, the projected completion minute, and
    /// the final queueing delay.
    ///
    /// # Panics
    /// Panics if the order is not pending. The queue releases each order by
    /// value, so a second assignment indicates scheduler corruption.
    pub fn begin_service(&mut self, barista_id: usize, minute: usize) {
        assert!(
            self.is_pending(),
            "order {} assigned twice (status {:?})",
            self.id,
            self.status
        );

        self.barista_id = Some(barista_id);
        self.assigned_minute = Some(minute);
        self.completion_minute = Some(minute + self.total_prep_minutes());
        self.wait_minutes = self.wait_at(minute);
        self.status = OrderStatus::Assigned;
    }

    /// Mark preparation as finished
    ///
    /// # Panics
    /// Panics if the order was never assigned.
    pub fn finish_service(&mut self) {
        assert!(
            self.is_assigned(),
            "order {} finished without being assigned (status {:?})",
            self.id,
            self.status
        );
        self.status = OrderStatus::Completed;
    }

    /// The customer walks out before being served
    ///
    /// Records the final queueing delay.
    ///
    /// # Panics
    /// Panics if the order is not pending.
    pub fn abandon(&mut self, minute: usize) {
        assert!(
            self.is_pending(),
            "order {} abandoned after leaving the queue (status {:?})",
            self.id,
            self.status
        );
        self.wait_minutes = self.wait_at(minute);
        self.status = OrderStatus::Abandoned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latte_order() -> Order {
        Order::new(1, 10, vec![DrinkKind::Latte], false)
    }

    #[test]
    #[should_panic(expected = "at least one drink")]
    fn test_empty_order_panics() {
        Order::new(1, 0, vec![], false);
    }

    #[test]
    fn test_begin_service_records_times() {
        let mut order = latte_order();
        order.begin_service(2, 16);

        assert_eq!(order.status(), OrderStatus::Assigned);
        assert_eq!(order.barista_id(), Some(2));
        assert_eq!(order.assigned_minute(), Some(16));
        assert_eq!(order.completion_minute(), Some(20)); // 16 + 4 min latte
        assert_eq!(order.wait_minutes(), 6);
    }

    #[test]
    #[should_panic(expected = "assigned twice")]
    fn test_double_assignment_panics() {
        let mut order = latte_order();
        order.begin_service(1, 12);
        order.begin_service(2, 13);
    }

    #[test]
    fn test_abandon_records_wait() {
        let mut order = latte_order();
        order.abandon(19);

        assert_eq!(order.status(), OrderStatus::Abandoned);
        assert_eq!(order.wait_minutes(), 9);
    }

    #[test]
    fn test_wait_at_saturates_before_arrival() {
        let order = latte_order();
        assert_eq!(order.wait_at(3), 0);
    }

    #[test]
    fn test_parse_drinks_reports_first_unknown() {
        let err = Order::parse_drinks(&["ESPRESSO", "CHAI", "MOCHA"]).unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidDrinkKind {
                name: "CHAI".to_string()
            }
        );
    }

    #[test]
    fn test_parse_drinks_rejects_empty() {
        assert_eq!(Order::parse_drinks(&[]).unwrap_err(), OrderError::EmptyOrder);
    }

    #[test]
    fn test_total_price_sums_menu_prices() {
        let order = Order::new(3, 0, vec![DrinkKind::Latte, DrinkKind::Espresso], true);
        assert_eq!(order.total_price_cents(), 350);
    }
}
