//! Coffee Shop Simulator - Core Engine
//!
//! Discrete-time simulator of a coffee shop order queue with priority
//! dispatch, deterministic execution, and per-shift metrics.
//!
//! # Architecture
//!
//! - **core**: Shift clock and wall-time labels
//! - **models**: Domain types (Drink, Order, Barista, Queue, State)
//! - **arrivals**: Poisson customer stream
//! - **policy**: Priority scoring, selection rules, abandonment
//! - **metrics**: Per-shift aggregation and batch averaging
//! - **orchestrator**: Batch engine and live counter
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded RNG)
//! 2. Orders live in exactly one place; the scheduler owns every transition
//! 3. The tick phase order is fixed: arrivals, rescore, walkouts, dispatch
//!
//! # Example
//!
//! ```
//! use coffee_sim_core::{run_simulation, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     rng_seed: Some(42),
//!     ..SimulationConfig::default()
//! };
//!
//! let result = run_simulation(&config).unwrap();
//! assert!(result.average_wait_minutes >= 0.0);
//! ```

// Module declarations
pub mod arrivals;
pub mod core;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod rng;

// Re-exports for convenience
pub use arrivals::{ArrivalConfig, ArrivalGenerator};
pub use core::time::ShopClock;
pub use metrics::{
    drink_breakdown, BaristaLoad, DrinkStats, PolicyEvaluation, SimulationResult,
};
pub use models::{
    barista::Barista,
    drink::DrinkKind,
    order::{Order, OrderError, OrderStatus},
    queue::DispatchQueue,
    state::ShopState,
};
pub use orchestrator::{
    evaluate_policy, run_many, run_simulation, LiveShop, Orchestrator, SimulationConfig,
    SimulationError, TickResult,
};
pub use policy::DispatchRules;
pub use rng::RngManager;
