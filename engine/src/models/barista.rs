//! Barista model
//!
//! A barista prepares one order at a time. Availability is tracked as the
//! minute the current order finishes, so a barista is free exactly when the
//! clock has caught up with `available_at_minute`.

use serde::{Deserialize, Serialize};

/// A barista behind the counter
///
/// # Example
/// ```
/// use coffee_sim_core::Barista;
///
/// let mut barista = Barista::new(1);
/// assert!(barista.is_free(0));
///
/// barista.begin_order(0, 4);
/// assert!(!barista.is_free(3));
/// assert!(barista.is_free(4));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barista {
    /// Barista identifier (1-based)
    id: usize,

    /// Total preparation minutes taken on this shift
    workload_minutes: usize,

    /// Minute the current order finishes; free when the clock reaches it
    available_at_minute: usize,
}

impl Barista {
    /// Create an idle barista
    pub fn new(id: usize) -> Self {
        Self {
            id,
            workload_minutes: 0,
            available_at_minute: 0,
        }
    }

    /// Get barista ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Total preparation minutes taken on this shift
    pub fn workload_minutes(&self) -> usize {
        self.workload_minutes
    }

    /// Minute the barista becomes free again
    pub fn available_at_minute(&self) -> usize {
        self.available_at_minute
    }

    /// Check whether the barista can take an order at `now`
    pub fn is_free(&self, now: usize) -> bool {
        self.available_at_minute <= now
    }

    /// Take on an order requiring `prep_minutes` of work
    ///
    /// # Panics
    /// Panics if the barista is still busy. The scheduler only dispatches to
    /// free baristas.
    pub fn begin_order(&mut self, now: usize, prep_minutes: usize) {
        assert!(
            self.is_free(now),
            "barista {} given an order while busy until minute {}",
            self.id,
            self.available_at_minute
        );

        self.workload_minutes += prep_minutes;
        self.available_at_minute = now + prep_minutes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_exactly_when_clock_catches_up() {
        let mut barista = Barista::new(1);
        barista.begin_order(10, 6);

        assert!(!barista.is_free(15));
        assert!(barista.is_free(16));
    }

    #[test]
    fn test_workload_accumulates() {
        let mut barista = Barista::new(2);
        barista.begin_order(0, 2);
        barista.begin_order(2, 6);

        assert_eq!(barista.workload_minutes(), 8);
        assert_eq!(barista.available_at_minute(), 8);
    }

    #[test]
    #[should_panic(expected = "while busy")]
    fn test_begin_order_while_busy_panics() {
        let mut barista = Barista::new(3);
        barista.begin_order(0, 4);
        barista.begin_order(1, 1);
    }
}
