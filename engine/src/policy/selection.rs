//! Order selection
//!
//! Decides which pending order a free barista serves next.
//!
//! # Rules, in precedence order
//!
//! 1. **Hard timeout**: any order that has waited `max_wait_minutes` is
//!    served immediately. Among several, the earliest arrival wins (ties
//!    break by lowest ID). Ranking and fairness do not apply.
//! 2. **Fairness scan**: otherwise candidates are walked in ranked order.
//!    A candidate within its skip allowance of the front is served on the
//!    spot. A candidate beyond it takes a skip; once its accumulated skips
//!    exceed the allowance it is served regardless of rank.
//!
//! Quick orders (total preparation within `quick_prep_minutes`) tolerate
//! more skips than normal ones, since baristas can slot them between
//! larger jobs.

use crate::models::queue::DispatchQueue;
use crate::policy::DispatchRules;

/// Why an order was picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCause {
    /// Waited out the hard timeout; served unconditionally
    HardTimeout,

    /// Top of the ranked scan
    Ranked,

    /// Accumulated more skips than tolerated; served regardless of rank
    FairnessForced,
}

/// A dispatch decision: which queue position to serve, and why
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Position in the queue's backing storage (valid until the next removal)
    pub queue_index: usize,

    /// Why this order was picked
    pub cause: SelectionCause,
}

/// Pick the next order for one free barista
///
/// Mutates skip counters on candidates the scan passes over. Returns `None`
/// only when the queue is empty.
pub fn select(queue: &mut DispatchQueue, now: usize, rules: &DispatchRules) -> Option<Selection> {
    if queue.is_empty() {
        return None;
    }

    if let Some(queue_index) = hard_timeout_candidate(queue, now, rules) {
        return Some(Selection {
            queue_index,
            cause: SelectionCause::HardTimeout,
        });
    }

    let ranked = queue.selection_order();
    for (position, &queue_index) in ranked.iter().enumerate() {
        let allowed = rules.allowed_skips(queue.orders()[queue_index].total_prep_minutes());

        if position <= allowed {
            return Some(Selection {
                queue_index,
                cause: SelectionCause::Ranked,
            });
        }

        let skips = queue.record_skip_at(queue_index);
        if skips > allowed {
            return Some(Selection {
                queue_index,
                cause: SelectionCause::FairnessForced,
            });
        }
    }

    None
}

/// Position of the order the hard timeout forces, if any
///
/// Earliest arrival wins; ties break by lowest order ID.
fn hard_timeout_candidate(
    queue: &DispatchQueue,
    now: usize,
    rules: &DispatchRules,
) -> Option<usize> {
    queue
        .orders()
        .iter()
        .enumerate()
        .filter(|(_, order)| order.wait_at(now) >= rules.max_wait_minutes)
        .min_by_key(|(_, order)| (order.arrival_minute(), order.id()))
        .map(|(index, _)| index)
}
