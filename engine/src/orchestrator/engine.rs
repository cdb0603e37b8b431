//! Batch simulation engine
//!
//! Runs complete shifts minute by minute. Each tick executes the same four
//! phases in a fixed order:
//!
//! 1. Arrivals join the queue
//! 2. Every pending order is rescored
//! 3. Impatient customers walk out
//! 4. Free baristas each take one order
//!
//! Abandonment runs before dispatch, so a customer whose patience and the
//! hard timeout expire on the same minute walks out rather than being
//! served.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::arrivals::{ArrivalConfig, ArrivalGenerator};
use crate::core::time::ShopClock;
use crate::metrics::{self, PolicyEvaluation, SimulationResult};
use crate::models::state::ShopState;
use crate::policy::{abandonment, selection, DispatchRules, SelectionCause};
use crate::rng::RngManager;

/// Complete configuration for a simulated shift
///
/// # Example
/// ```
/// use coffee_sim_core::SimulationConfig;
///
/// let config = SimulationConfig {
///     rng_seed: Some(42),
///     ..SimulationConfig::default()
/// };
/// assert_eq!(config.shift_minutes, 180);
/// assert_eq!(config.baristas, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Shift length in minutes
    pub shift_minutes: usize,

    /// Baristas on shift (0 is allowed; nobody ever gets served)
    pub baristas: usize,

    /// Customer arrival parameters
    pub arrivals: ArrivalConfig,

    /// Dispatch thresholds
    pub rules: DispatchRules,

    /// RNG seed. `None` draws a fresh seed per run, so repeated runs vary.
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            shift_minutes: 180,
            baristas: 3,
            arrivals: ArrivalConfig::default(),
            rules: DispatchRules::default(),
            rng_seed: None,
        }
    }
}

/// Simulation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Configuration validation error
    InvalidConfig(String),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for SimulationError {}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    /// Minute the tick covered
    pub minute: usize,

    /// Customers who arrived this minute
    pub num_arrivals: usize,

    /// Orders handed to baristas this minute
    pub num_assigned: usize,

    /// Orders whose preparation finished this minute
    pub num_completed: usize,

    /// Customers who walked out this minute
    pub num_abandoned: usize,

    /// Pending orders left at the end of the tick
    pub queue_depth: usize,
}

/// How dispatched orders are accounted
///
/// Batch runs measure queueing delay only, so an assigned order is
/// immediately completed. The live counter keeps it in preparation until
/// the clock reaches its completion minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OperatingMode {
    Batch,
    Live,
}

/// One tick's dispatch phase: every free barista takes one order
///
/// Returns the number of orders handed out. Shared by the batch engine and
/// the live counter so both modes dispatch identically.
pub(crate) fn dispatch_phase(
    state: &mut ShopState,
    now: usize,
    rules: &DispatchRules,
    mode: OperatingMode,
) -> usize {
    let mut assigned = 0;

    for barista_index in 0..state.num_baristas() {
        if !state.baristas()[barista_index].is_free(now) {
            continue;
        }

        let selected = match selection::select(state.queue_mut(), now, rules) {
            Some(s) => s,
            None => break, // nothing left to serve
        };

        if selected.cause == SelectionCause::HardTimeout {
            state.queue_mut().tag_reason_at(
                selected.queue_index,
                format!("emergency: waited {} minutes", rules.max_wait_minutes),
            );
        }

        match mode {
            OperatingMode::Batch => {
                state.complete_at_counter(selected.queue_index, barista_index, now)
            }
            OperatingMode::Live => state.hand_to_barista(selected.queue_index, barista_index, now),
        }
        assigned += 1;
    }

    assigned
}

/// Seed drawn from the system clock for unseeded runs
fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0xC0FFEE)
}

/// Derive the seed for run `index` of a batch from the base seed
fn derive_run_seed(base: u64, index: usize) -> u64 {
    // Golden-ratio stride keeps neighbouring run seeds far apart
    base.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Batch simulation engine
///
/// Owns all state for a shift and drives the tick loop.
///
/// # Example
/// ```
/// use coffee_sim_core::{Orchestrator, SimulationConfig};
///
/// let config = SimulationConfig {
///     rng_seed: Some(42),
///     ..SimulationConfig::default()
/// };
///
/// let mut orchestrator = Orchestrator::new(config).unwrap();
/// let result = orchestrator.run();
/// assert!(result.average_wait_minutes >= 0.0);
/// ```
#[derive(Debug)]
pub struct Orchestrator {
    /// Configuration the shift runs under
    config: SimulationConfig,

    /// Queue, baristas, and terminal collections
    state: ShopState,

    /// Shift clock
    clock: ShopClock,

    /// Deterministic RNG
    rng: RngManager,

    /// Customer stream
    generator: ArrivalGenerator,
}

impl Orchestrator {
    /// Create a new orchestrator from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Successfully initialized
    /// * `Err(SimulationError)` - Configuration validation failed
    ///
    /// # Example
    /// ```
    /// use coffee_sim_core::{Orchestrator, SimulationConfig};
    ///
    /// let orchestrator = Orchestrator::new(SimulationConfig::default()).unwrap();
    /// assert_eq!(orchestrator.current_minute(), 0);
    /// ```
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let seed = config.rng_seed.unwrap_or_else(entropy_seed);

        Ok(Self {
            state: ShopState::new(config.baristas),
            clock: ShopClock::new(config.shift_minutes),
            rng: RngManager::new(seed),
            generator: ArrivalGenerator::new(config.arrivals.clone()),
            config,
        })
    }

    /// Validate configuration
    fn validate_config(config: &SimulationConfig) -> Result<(), SimulationError> {
        if config.shift_minutes == 0 {
            return Err(SimulationError::InvalidConfig(
                "shift_minutes must be > 0".to_string(),
            ));
        }

        let rate = config.arrivals.rate_per_minute;
        if !rate.is_finite() || rate < 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "rate_per_minute must be finite and >= 0, got {}",
                rate
            )));
        }

        let loyalty = config.arrivals.loyalty_probability;
        if !loyalty.is_finite() || !(0.0..=1.0).contains(&loyalty) {
            return Err(SimulationError::InvalidConfig(format!(
                "loyalty_probability must be within [0, 1], got {}",
                loyalty
            )));
        }

        if config.arrivals.min_drinks == 0 {
            return Err(SimulationError::InvalidConfig(
                "min_drinks must be >= 1".to_string(),
            ));
        }

        if config.arrivals.max_drinks < config.arrivals.min_drinks {
            return Err(SimulationError::InvalidConfig(format!(
                "max_drinks ({}) must be >= min_drinks ({})",
                config.arrivals.max_drinks, config.arrivals.min_drinks
            )));
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get current minute
    pub fn current_minute(&self) -> usize {
        self.clock.current_minute()
    }

    /// Get the configuration the shift runs under
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Get reference to shop state
    pub fn state(&self) -> &ShopState {
        &self.state
    }

    // ========================================================================
    // Tick Loop Implementation
    // ========================================================================

    /// Execute one simulation tick
    ///
    /// Runs the four phases for the current minute, then advances the clock.
    pub fn tick(&mut self) -> TickResult {
        let minute = self.clock.current_minute();
        let rules = &self.config.rules;

        // STEP 1: ARRIVALS
        let arrivals = self.generator.generate(minute, &mut self.rng, rules);
        let num_arrivals = arrivals.len();
        for order in arrivals {
            self.state.queue_mut().push(order);
        }

        // STEP 2: RESCORE
        // Scores are recomputed from scratch; nothing persists minute to minute
        self.state.queue_mut().rescore(minute, rules);

        // STEP 3: ABANDONMENT
        // Runs before dispatch: a customer out of patience cannot be served
        let walked_out = abandonment::sweep_impatient(self.state.queue_mut(), minute, rules);
        let num_abandoned = walked_out.len();
        self.state.record_abandoned(walked_out);

        // STEP 4: DISPATCH
        let num_assigned = dispatch_phase(&mut self.state, minute, rules, OperatingMode::Batch);

        // STEP 5: ADVANCE TIME
        self.clock.advance();

        let result = TickResult {
            minute,
            num_arrivals,
            num_assigned,
            num_completed: num_assigned, // batch folds preparation into assignment
            num_abandoned,
            queue_depth: self.state.queue().len(),
        };

        debug!(
            "minute {}: {} arrived, {} assigned, {} walked out, {} queued",
            minute, num_arrivals, num_assigned, num_abandoned, result.queue_depth
        );

        result
    }

    /// Run one complete shift and aggregate its metrics
    ///
    /// Resets all shift state first, so a seeded orchestrator produces the
    /// same result every time `run` is called. Orders still queued at
    /// closing time are dropped unserved; they count neither as completed
    /// nor as abandoned.
    pub fn run(&mut self) -> SimulationResult {
        self.state = ShopState::new(self.config.baristas);
        self.clock = ShopClock::new(self.config.shift_minutes);
        self.generator = ArrivalGenerator::new(self.config.arrivals.clone());
        if let Some(seed) = self.config.rng_seed {
            self.rng = RngManager::new(seed);
        }

        info!(
            "shift starting: {} minutes, {} baristas",
            self.config.shift_minutes, self.config.baristas
        );

        for _ in 0..self.config.shift_minutes {
            self.tick();
        }

        let left_in_queue = self.state.queue().len();
        if left_in_queue > 0 {
            debug!("closing time: {} orders dropped unserved", left_in_queue);
        }
        self.state.queue_mut().clear();

        info!(
            "shift over: {} completed, {} walked out, {} dropped at close",
            self.state.completed().len(),
            self.state.abandoned().len(),
            left_in_queue
        );

        metrics::aggregate(
            self.state.completed(),
            self.state.abandoned(),
            self.state.baristas(),
            &self.config.rules,
        )
    }
}

/// Run one complete shift under `config`
///
/// # Example
/// ```
/// use coffee_sim_core::{run_simulation, SimulationConfig};
///
/// let config = SimulationConfig {
///     rng_seed: Some(7),
///     ..SimulationConfig::default()
/// };
///
/// let once = run_simulation(&config).unwrap();
/// let again = run_simulation(&config).unwrap();
/// assert_eq!(once, again);
/// ```
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationResult, SimulationError> {
    let mut orchestrator = Orchestrator::new(config.clone())?;
    Ok(orchestrator.run())
}

/// Run `runs` independent shifts in parallel
///
/// Results come back in run order. When the config is seeded, each run gets
/// a seed derived from the base seed and its index, so the whole batch is
/// reproducible; an unseeded config draws a fresh base seed per call.
pub fn run_many(
    config: &SimulationConfig,
    runs: usize,
) -> Result<Vec<SimulationResult>, SimulationError> {
    let base_seed = config.rng_seed.unwrap_or_else(entropy_seed);

    (0..runs)
        .into_par_iter()
        .map(|index| {
            let run_config = SimulationConfig {
                rng_seed: Some(derive_run_seed(base_seed, index)),
                ..config.clone()
            };
            let mut orchestrator = Orchestrator::new(run_config)?;
            Ok(orchestrator.run())
        })
        .collect()
}

/// Run a batch of shifts and average their metrics
///
/// This is the policy-comparison entry point: evaluate the same rule set
/// across many seeds and compare the averaged outcomes.
pub fn evaluate_policy(
    config: &SimulationConfig,
    runs: usize,
) -> Result<PolicyEvaluation, SimulationError> {
    let results = run_many(config, runs)?;
    Ok(metrics::evaluate(&results))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            rng_seed: Some(seed),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_rejects_zero_shift() {
        let config = SimulationConfig {
            shift_minutes: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Orchestrator::new(config),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let mut config = SimulationConfig::default();
        config.arrivals.rate_per_minute = -0.5;
        assert!(Orchestrator::new(config).is_err());
    }

    #[test]
    fn test_rejects_loyalty_probability_above_one() {
        let mut config = SimulationConfig::default();
        config.arrivals.loyalty_probability = 1.5;
        assert!(Orchestrator::new(config).is_err());
    }

    #[test]
    fn test_zero_baristas_is_a_valid_dead_shop() {
        let config = SimulationConfig {
            baristas: 0,
            ..seeded_config(11)
        };
        let result = run_simulation(&config).unwrap();

        assert!(result.completed_orders.is_empty());
        assert_eq!(result.average_wait_minutes, 0.0);
        assert_eq!(result.workload_balance_stddev, 0.0);
        // Non-loyalty customers still walk out of a dead shop
        assert!(result.abandoned_count > 0);
    }

    #[test]
    fn test_run_resets_between_calls() {
        let mut orchestrator = Orchestrator::new(seeded_config(5)).unwrap();
        let first = orchestrator.run();
        let second = orchestrator.run();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut orchestrator = Orchestrator::new(seeded_config(5)).unwrap();
        let result = orchestrator.tick();
        assert_eq!(result.minute, 0);
        assert_eq!(orchestrator.current_minute(), 1);
    }

    #[test]
    fn test_run_many_is_reproducible_when_seeded() {
        let config = seeded_config(99);
        let first = run_many(&config, 4).unwrap();
        let second = run_many(&config, 4).unwrap();
        assert_eq!(first, second);
    }
}
