//! Arrival generation module for deterministic customer creation.
//!
//! This module creates the stream of customer orders entering the shop.
//! All generation is deterministic based on the RNG seed.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same config → same arrivals
//! 2. **Poisson Arrivals**: Customer count per minute follows a Poisson
//!    distribution
//! 3. **Menu Frequencies**: Drink kinds are sampled by their menu share
//! 4. **Monotonic IDs**: Order IDs count up from 1 within a run
//!
//! # Example
//!
//! ```
//! use coffee_sim_core::arrivals::{ArrivalConfig, ArrivalGenerator};
//! use coffee_sim_core::{DispatchRules, RngManager};
//!
//! let mut rng = RngManager::new(42);
//! let mut generator = ArrivalGenerator::new(ArrivalConfig::default());
//! let orders = generator.generate(0, &mut rng, &DispatchRules::default());
//! # let _ = orders;
//! ```

use serde::{Deserialize, Serialize};

use crate::models::drink::DrinkKind;
use crate::models::order::Order;
use crate::policy::{scoring, DispatchRules};
use crate::rng::RngManager;

/// Configuration for customer arrivals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalConfig {
    /// Expected number of customers per minute (Poisson λ parameter)
    pub rate_per_minute: f64,

    /// Probability that an arriving customer is a loyalty member
    pub loyalty_probability: f64,

    /// Fewest drinks a customer orders (inclusive)
    pub min_drinks: usize,

    /// Most drinks a customer orders (inclusive)
    pub max_drinks: usize,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            rate_per_minute: 1.4,
            loyalty_probability: 0.3,
            min_drinks: 1,
            max_drinks: 3,
        }
    }
}

/// Generator for customer arrivals.
///
/// Owns the order ID counter, so every order a run produces gets a unique,
/// monotonically increasing ID starting at 1.
#[derive(Debug, Clone)]
pub struct ArrivalGenerator {
    /// Arrival configuration
    config: ArrivalConfig,

    /// Next order ID counter
    next_order_id: usize,
}

impl ArrivalGenerator {
    /// Create a new arrival generator.
    pub fn new(config: ArrivalConfig) -> Self {
        Self {
            config,
            next_order_id: 1,
        }
    }

    /// Generate the customers arriving during `minute`.
    ///
    /// Each order gets its initial priority score so the queue is ranked
    /// correctly even before the first rescoring pass.
    ///
    /// # Arguments
    ///
    /// * `minute` - Current shift minute
    /// * `rng` - Mutable reference to RNG manager
    /// * `rules` - Dispatch rules (for initial scoring)
    pub fn generate(
        &mut self,
        minute: usize,
        rng: &mut RngManager,
        rules: &DispatchRules,
    ) -> Vec<Order> {
        let num_arrivals = rng.poisson(self.config.rate_per_minute);

        let mut orders = Vec::with_capacity(num_arrivals);
        for _ in 0..num_arrivals {
            orders.push(self.next_order(minute, rng, rules));
        }
        orders
    }

    /// Build one arriving order.
    fn next_order(
        &mut self,
        minute: usize,
        rng: &mut RngManager,
        rules: &DispatchRules,
    ) -> Order {
        let id = self.next_order_id;
        self.next_order_id += 1;

        let num_drinks = if self.config.min_drinks >= self.config.max_drinks {
            self.config.min_drinks
        } else {
            rng.range(self.config.min_drinks as i64, self.config.max_drinks as i64 + 1) as usize
        };

        let drinks: Vec<DrinkKind> = (0..num_drinks)
            .map(|_| DrinkKind::sample_by_frequency(rng.next_f64()))
            .collect();
        let loyalty = rng.chance(self.config.loyalty_probability);

        let mut order = Order::new(id, minute, drinks, loyalty);
        order.set_priority_score(scoring::priority_score(&order, minute, rules));
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_generates_identical_arrivals() {
        let rules = DispatchRules::default();
        let mut gen1 = ArrivalGenerator::new(ArrivalConfig::default());
        let mut gen2 = ArrivalGenerator::new(ArrivalConfig::default());
        let mut rng1 = RngManager::new(2024);
        let mut rng2 = RngManager::new(2024);

        for minute in 0..60 {
            let a = gen1.generate(minute, &mut rng1, &rules);
            let b = gen2.generate(minute, &mut rng2, &rules);

            assert_eq!(a.len(), b.len());
            for (left, right) in a.iter().zip(b.iter()) {
                assert_eq!(left.id(), right.id());
                assert_eq!(left.drinks(), right.drinks());
                assert_eq!(left.loyalty(), right.loyalty());
            }
        }
    }

    #[test]
    fn test_ids_are_monotonic_across_minutes() {
        let rules = DispatchRules::default();
        let mut generator = ArrivalGenerator::new(ArrivalConfig::default());
        let mut rng = RngManager::new(99);

        let mut last_id = 0;
        for minute in 0..120 {
            for order in generator.generate(minute, &mut rng, &rules) {
                assert_eq!(order.id(), last_id + 1);
                last_id = order.id();
            }
        }
        assert!(last_id > 0, "two hours at the default rate produced nobody");
    }

    #[test]
    fn test_zero_rate_generates_nobody() {
        let rules = DispatchRules::default();
        let config = ArrivalConfig {
            rate_per_minute: 0.0,
            ..ArrivalConfig::default()
        };
        let mut generator = ArrivalGenerator::new(config);
        let mut rng = RngManager::new(7);

        for minute in 0..180 {
            assert!(generator.generate(minute, &mut rng, &rules).is_empty());
        }
    }

    #[test]
    fn test_drink_counts_respect_bounds() {
        let rules = DispatchRules::default();
        let mut generator = ArrivalGenerator::new(ArrivalConfig::default());
        let mut rng = RngManager::new(1234);

        for minute in 0..240 {
            for order in generator.generate(minute, &mut rng, &rules) {
                let count = order.drinks().len();
                assert!((1..=3).contains(&count), "order had {} drinks", count);
            }
        }
    }

    #[test]
    fn test_arrivals_carry_initial_scores() {
        let rules = DispatchRules::default();
        let mut generator = ArrivalGenerator::new(ArrivalConfig {
            loyalty_probability: 1.0,
            ..ArrivalConfig::default()
        });
        let mut rng = RngManager::new(55);

        let mut saw_one = false;
        for minute in 0..60 {
            for order in generator.generate(minute, &mut rng, &rules) {
                // Fresh loyalty member: no wait yet, just the loyalty bonus
                assert_eq!(order.priority_score(), 20.0);
                saw_one = true;
            }
        }
        assert!(saw_one);
    }
}
