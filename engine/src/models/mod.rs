//! Domain models for the coffee shop simulator

pub mod barista;
pub mod drink;
pub mod order;
pub mod queue;
pub mod state;

// Re-exports
pub use barista::Barista;
pub use drink::DrinkKind;
pub use order::{Order, OrderError, OrderStatus};
pub use queue::DispatchQueue;
pub use state::ShopState;
