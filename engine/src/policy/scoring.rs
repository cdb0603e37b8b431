//! Priority scoring
//!
//! Scores every pending order on a bounded 0-100 scale. The score is
//! recomputed from scratch each minute; nothing accumulates across
//! recomputations, so a stale score can never leak into the next minute.
//!
//! # Components
//!
//! - Wait: 5 points per minute waited, capped at 50
//! - Loyalty: flat 20-point bonus
//! - Emergency: flat 30-point bonus once the wait reaches the emergency
//!   threshold
//!
//! The total is capped at 100. Eventual service is guaranteed by the
//! hard-timeout override, not by the scorer.

use crate::models::order::Order;
use crate::policy::DispatchRules;

/// Points per minute of queueing delay
const WAIT_POINTS_PER_MINUTE: f64 = 5.0;

/// Ceiling on the wait component
const WAIT_POINTS_CAP: f64 = 50.0;

/// Flat bonus for loyalty members
const LOYALTY_BONUS: f64 = 20.0;

/// Flat bonus once the wait reaches the emergency threshold
const EMERGENCY_BONUS: f64 = 30.0;

/// Ceiling on the total score
const SCORE_CAP: f64 = 100.0;

/// Compute an order's priority score as of `now`
///
/// # Example
/// ```
/// use coffee_sim_core::{DispatchRules, DrinkKind, Order};
/// use coffee_sim_core::policy::scoring::priority_score;
///
/// let rules = DispatchRules::default();
/// let order = Order::new(1, 0, vec![DrinkKind::Latte], true);
///
/// // 3 minutes in: 15 wait points + 20 loyalty
/// assert_eq!(priority_score(&order, 3, &rules), 35.0);
///
/// // 9 minutes in: wait capped at 45, loyalty 20, emergency 30
/// assert_eq!(priority_score(&order, 9, &rules), 95.0);
/// ```
pub fn priority_score(order: &Order, now: usize, rules: &DispatchRules) -> f64 {
    let wait = order.wait_at(now);

    let mut score = (wait as f64 * WAIT_POINTS_PER_MINUTE).min(WAIT_POINTS_CAP);
    if order.loyalty() {
        score += LOYALTY_BONUS;
    }
    if wait >= rules.emergency_threshold_minutes {
        score += EMERGENCY_BONUS;
    }

    score.min(SCORE_CAP)
}
