//! Dispatch policy
//!
//! Everything that decides who gets served: the priority scorer, the
//! selection rules (hard timeout override plus fairness scan), and the
//! abandonment rule. All of it is driven by [`DispatchRules`], the single
//! knob set for a shop.

pub mod abandonment;
pub mod scoring;
pub mod selection;

pub use selection::{Selection, SelectionCause};

use serde::{Deserialize, Serialize};

/// Tunable dispatch thresholds
///
/// Defaults reproduce the standard shop setup. All thresholds are in
/// minutes except the display threshold, which is a score.
///
/// # Example
/// ```
/// use coffee_sim_core::DispatchRules;
///
/// let rules = DispatchRules::default();
/// assert_eq!(rules.max_wait_minutes, 10);
/// assert_eq!(rules.emergency_threshold_minutes, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRules {
    /// Hard ceiling on queueing delay; at this wait an order is served
    /// immediately, bypassing ranking (default: 10)
    pub max_wait_minutes: usize,

    /// Wait at which the scorer adds its emergency bonus (default: 8)
    pub emergency_threshold_minutes: usize,

    /// Skips a normal order tolerates before the fairness scan forces it
    /// to be served (default: 3)
    pub max_skips_tolerated: usize,

    /// Skips a quick order tolerates before being forced (default: 5)
    pub quick_order_skip_allowance: usize,

    /// Total preparation time at or under which an order counts as quick
    /// (default: 2)
    pub quick_prep_minutes: usize,

    /// Wait at which a non-loyalty customer walks out (default: 8)
    pub patience_minutes: usize,

    /// Score above which a live view flags an order as high priority
    /// (default: 70.0)
    pub high_priority_display_threshold: f64,
}

impl Default for DispatchRules {
    fn default() -> Self {
        Self {
            max_wait_minutes: 10,
            emergency_threshold_minutes: 8,
            max_skips_tolerated: 3,
            quick_order_skip_allowance: 5,
            quick_prep_minutes: 2,
            patience_minutes: 8,
            high_priority_display_threshold: 70.0,
        }
    }
}

impl DispatchRules {
    /// Skips the given total preparation time tolerates before the
    /// fairness scan forces service
    pub fn allowed_skips(&self, total_prep_minutes: usize) -> usize {
        if total_prep_minutes <= self.quick_prep_minutes {
            self.quick_order_skip_allowance
        } else {
            self.max_skips_tolerated
        }
    }
}
