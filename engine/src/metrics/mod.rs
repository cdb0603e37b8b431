//! Shift metrics
//!
//! Aggregates the raw outcome of a run (completed orders, walkouts, barista
//! workloads) into the numbers a shift report shows. Every rate is a
//! percentage in [0, 100], and every aggregate over an empty set is 0
//! rather than NaN.

use serde::{Deserialize, Serialize};

use crate::models::barista::Barista;
use crate::models::drink::DrinkKind;
use crate::models::order::Order;
use crate::policy::DispatchRules;

/// Per-drink-kind outcome for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkStats {
    /// Drink kind
    pub kind: DrinkKind,

    /// Times this kind was served (counted per drink, not per order)
    pub count: usize,

    /// Mean queueing delay of the orders containing it, weighted per drink
    pub avg_wait_minutes: f64,
}

/// One barista's share of the shift's preparation work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaristaLoad {
    /// Barista ID
    pub barista_id: usize,

    /// Total preparation minutes taken
    pub minutes: usize,
}

/// Complete outcome of one simulated shift
///
/// # Example
/// ```
/// use coffee_sim_core::{run_simulation, SimulationConfig};
///
/// let mut config = SimulationConfig::default();
/// config.rng_seed = Some(7);
///
/// let result = run_simulation(&config).unwrap();
/// assert!(result.timeout_rate_percent <= 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Mean queueing delay across completed orders (0 if none completed)
    pub average_wait_minutes: f64,

    /// Share of completed orders that waited strictly longer than the hard
    /// timeout, as a percentage
    pub timeout_rate_percent: f64,

    /// Share of completed orders skipped more times than tolerated, as a
    /// percentage
    pub fairness_violation_rate_percent: f64,

    /// Population standard deviation of barista workloads
    pub workload_balance_stddev: f64,

    /// Timed-out orders plus fairness violations; an order suffering both
    /// counts twice
    pub complaint_count: usize,

    /// Customers who walked out
    pub abandoned_count: usize,

    /// Per-barista preparation minutes, in ID order
    pub barista_workloads: Vec<BaristaLoad>,

    /// Per-kind outcomes, in menu declaration order (all kinds listed)
    pub drink_stats: Vec<DrinkStats>,

    /// Every completed order, in completion order
    pub completed_orders: Vec<Order>,
}

/// Aggregate one finished run into a [`SimulationResult`]
pub fn aggregate(
    completed: &[Order],
    abandoned: &[Order],
    baristas: &[Barista],
    rules: &DispatchRules,
) -> SimulationResult {
    let num_completed = completed.len();

    let mut total_wait = 0usize;
    let mut timeouts = 0usize;
    let mut fairness_violations = 0usize;

    for order in completed {
        total_wait += order.wait_minutes();
        if order.wait_minutes() > rules.max_wait_minutes {
            timeouts += 1;
        }
        if order.skipped_count() > rules.max_skips_tolerated {
            fairness_violations += 1;
        }
    }

    let (average_wait_minutes, timeout_rate_percent, fairness_violation_rate_percent) =
        if num_completed == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let n = num_completed as f64;
            (
                total_wait as f64 / n,
                timeouts as f64 * 100.0 / n,
                fairness_violations as f64 * 100.0 / n,
            )
        };

    SimulationResult {
        average_wait_minutes,
        timeout_rate_percent,
        fairness_violation_rate_percent,
        workload_balance_stddev: workload_stddev(baristas),
        complaint_count: timeouts + fairness_violations,
        abandoned_count: abandoned.len(),
        barista_workloads: baristas
            .iter()
            .map(|b| BaristaLoad {
                barista_id: b.id(),
                minutes: b.workload_minutes(),
            })
            .collect(),
        drink_stats: drink_stats(completed),
        completed_orders: completed.to_vec(),
    }
}

/// Population standard deviation of barista workloads (0 with no baristas)
fn workload_stddev(baristas: &[Barista]) -> f64 {
    if baristas.is_empty() {
        return 0.0;
    }

    let n = baristas.len() as f64;
    let mean = baristas
        .iter()
        .map(|b| b.workload_minutes() as f64)
        .sum::<f64>()
        / n;
    let variance = baristas
        .iter()
        .map(|b| {
            let delta = b.workload_minutes() as f64 - mean;
            delta * delta
        })
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Per-kind counts and waits over one run's completed orders
///
/// Every menu kind appears, in declaration order, so reports line up across
/// runs. An order containing the same kind twice counts it twice, each
/// occurrence contributing the order's wait.
fn drink_stats(completed: &[Order]) -> Vec<DrinkStats> {
    let mut counts = [0usize; DrinkKind::ALL.len()];
    let mut wait_sums = [0usize; DrinkKind::ALL.len()];

    for order in completed {
        for drink in order.drinks() {
            let slot = DrinkKind::ALL
                .iter()
                .position(|k| k == drink)
                .unwrap_or_default();
            counts[slot] += 1;
            wait_sums[slot] += order.wait_minutes();
        }
    }

    DrinkKind::ALL
        .iter()
        .enumerate()
        .map(|(slot, &kind)| DrinkStats {
            kind,
            count: counts[slot],
            avg_wait_minutes: if counts[slot] == 0 {
                0.0
            } else {
                wait_sums[slot] as f64 / counts[slot] as f64
            },
        })
        .collect()
}

/// Drink counts totalled across a batch of runs, in menu order
///
/// Counts per drink occurrence, so an order of two lattes contributes two.
pub fn drink_breakdown(results: &[SimulationResult]) -> Vec<(DrinkKind, usize)> {
    let mut totals = [0usize; DrinkKind::ALL.len()];
    for result in results {
        for stats in &result.drink_stats {
            if let Some(slot) = DrinkKind::ALL.iter().position(|k| *k == stats.kind) {
                totals[slot] += stats.count;
            }
        }
    }

    DrinkKind::ALL
        .iter()
        .enumerate()
        .map(|(slot, &kind)| (kind, totals[slot]))
        .collect()
}

/// Averaged outcome of a batch of runs (mean of per-run means)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEvaluation {
    /// Number of runs averaged
    pub runs: usize,

    /// Mean of per-run average waits
    pub average_wait_minutes: f64,

    /// Mean of per-run timeout rates
    pub timeout_rate_percent: f64,

    /// Mean of per-run fairness violation rates
    pub fairness_violation_rate_percent: f64,

    /// Mean of per-run workload standard deviations
    pub workload_balance_stddev: f64,

    /// Mean completed orders per run
    pub average_completed_orders: f64,

    /// Mean walkouts per run
    pub average_abandoned_orders: f64,
}

/// Average a batch of run results (all zeros for an empty batch)
///
/// Each run counts equally regardless of how many orders it completed.
pub fn evaluate(results: &[SimulationResult]) -> PolicyEvaluation {
    if results.is_empty() {
        return PolicyEvaluation {
            runs: 0,
            average_wait_minutes: 0.0,
            timeout_rate_percent: 0.0,
            fairness_violation_rate_percent: 0.0,
            workload_balance_stddev: 0.0,
            average_completed_orders: 0.0,
            average_abandoned_orders: 0.0,
        };
    }

    let n = results.len() as f64;
    PolicyEvaluation {
        runs: results.len(),
        average_wait_minutes: results.iter().map(|r| r.average_wait_minutes).sum::<f64>() / n,
        timeout_rate_percent: results.iter().map(|r| r.timeout_rate_percent).sum::<f64>() / n,
        fairness_violation_rate_percent: results
            .iter()
            .map(|r| r.fairness_violation_rate_percent)
            .sum::<f64>()
            / n,
        workload_balance_stddev: results
            .iter()
            .map(|r| r.workload_balance_stddev)
            .sum::<f64>()
            / n,
        average_completed_orders: results
            .iter()
            .map(|r| r.completed_orders.len() as f64)
            .sum::<f64>()
            / n,
        average_abandoned_orders: results
            .iter()
            .map(|r| r.abandoned_count as f64)
            .sum::<f64>()
            / n,
    }
}
