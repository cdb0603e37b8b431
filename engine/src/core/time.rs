//! Shift time management
//!
//! The simulation operates in discrete one-minute ticks spanning a single
//! shift. This module provides deterministic time advancement plus the
//! wall-clock labels shown by the live counter view.

use serde::{Deserialize, Serialize};

/// Hour of day at which the shop opens. Anchors wall-clock labels.
pub const OPENING_HOUR: usize = 7;

/// Format a shift minute as a wall-clock label anchored at opening time.
///
/// # Example
/// ```
/// use coffee_sim_core::core::time::wall_clock_label;
///
/// assert_eq!(wall_clock_label(0), "07:00");
/// assert_eq!(wall_clock_label(125), "09:05");
/// ```
pub fn wall_clock_label(minute: usize) -> String {
    let total = OPENING_HOUR * 60 + minute;
    format!("{:02}:{:02}", (total / 60) % 24, total % 60)
}

/// Manages shift time in discrete minutes
///
/// # Example
/// ```
/// use coffee_sim_core::ShopClock;
///
/// let mut clock = ShopClock::new(180); // a three-hour shift
/// assert_eq!(clock.current_minute(), 0);
///
/// clock.advance();
/// assert_eq!(clock.current_minute(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopClock {
    /// Minutes elapsed since the shift opened
    current_minute: usize,
    /// Length of the shift in minutes
    shift_minutes: usize,
}

impl ShopClock {
    /// Create a clock for a shift of the given length
    ///
    /// # Example
    /// ```
    /// use coffee_sim_core::ShopClock;
    ///
    /// let clock = ShopClock::new(180);
    /// ```
    pub fn new(shift_minutes: usize) -> Self {
        assert!(shift_minutes > 0, "shift_minutes must be positive");
        Self {
            current_minute: 0,
            shift_minutes,
        }
    }

    /// Advance time by one minute
    pub fn advance(&mut self) {
        self.current_minute += 1;
    }

    /// Get the current minute (minutes since the shift opened)
    pub fn current_minute(&self) -> usize {
        self.current_minute
    }

    /// Get the shift length in minutes
    pub fn shift_minutes(&self) -> usize {
        self.shift_minutes
    }

    /// Minutes left before closing time (0 once the shift is over)
    pub fn minutes_remaining(&self) -> usize {
        self.shift_minutes.saturating_sub(self.current_minute)
    }

    /// Check whether the shift is over
    ///
    /// # Example
    /// ```
    /// use coffee_sim_core::ShopClock;
    ///
    /// let mut clock = ShopClock::new(2);
    /// assert!(!clock.is_closing_time());
    /// clock.advance();
    /// clock.advance();
    /// assert!(clock.is_closing_time());
    /// ```
    pub fn is_closing_time(&self) -> bool {
        self.current_minute >= self.shift_minutes
    }

    /// Wall-clock label for the current minute (e.g. `"07:42"`)
    pub fn wall_clock(&self) -> String {
        wall_clock_label(self.current_minute)
    }
}
