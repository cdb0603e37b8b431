//! Core infrastructure: shift time management

pub mod time;

pub use time::ShopClock;
