//! Orchestrator - simulation entry points
//!
//! Two ways to run a shop:
//!
//! - **Batch** (`engine`): complete shifts, run to the end and aggregated
//!   into metrics. Independent runs can execute in parallel.
//! - **Live** (`live`): one shop advanced a minute at a time, with orders
//!   placed from outside and snapshot views in between.
//!
//! Both modes share the same per-minute phases; see `engine.rs`.

pub mod engine;
pub mod live;

// Re-export main types for convenience
pub use engine::{
    evaluate_policy, run_many, run_simulation, Orchestrator, SimulationConfig, SimulationError,
    TickResult,
};
pub use live::LiveShop;
