//! Drink catalog
//!
//! The menu is fixed: six drink kinds, each with a static preparation time,
//! menu frequency, and price. Frequencies sum to 1.0 and drive arrival
//! sampling.

use serde::{Deserialize, Serialize};

/// A drink on the menu
///
/// Declaration order is the canonical aggregation order for per-drink
/// reports, so it must stay stable.
///
/// # Example
/// ```
/// use coffee_sim_core::DrinkKind;
///
/// assert_eq!(DrinkKind::Latte.prep_minutes(), 4);
/// assert_eq!(DrinkKind::from_name("latte"), Some(DrinkKind::Latte));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrinkKind {
    ColdBrew,
    Espresso,
    Americano,
    Cappuccino,
    Latte,
    Specialty,
}

impl DrinkKind {
    /// All kinds in declaration order
    pub const ALL: [DrinkKind; 6] = [
        DrinkKind::ColdBrew,
        DrinkKind::Espresso,
        DrinkKind::Americano,
        DrinkKind::Cappuccino,
        DrinkKind::Latte,
        DrinkKind::Specialty,
    ];

    /// Minutes a barista needs to prepare one of these
    pub fn prep_minutes(&self) -> usize {
        match self {
            DrinkKind::ColdBrew => 1,
            DrinkKind::Espresso => 2,
            DrinkKind::Americano => 2,
            DrinkKind::Cappuccino => 4,
            DrinkKind::Latte => 4,
            DrinkKind::Specialty => 6,
        }
    }

    /// Share of arriving drink requests (all kinds sum to 1.0)
    pub fn frequency(&self) -> f64 {
        match self {
            DrinkKind::ColdBrew => 0.25,
            DrinkKind::Espresso => 0.20,
            DrinkKind::Americano => 0.15,
            DrinkKind::Cappuccino => 0.20,
            DrinkKind::Latte => 0.12,
            DrinkKind::Specialty => 0.08,
        }
    }

    /// Menu price in cents
    pub fn price_cents(&self) -> i64 {
        match self {
            DrinkKind::ColdBrew => 120,
            DrinkKind::Espresso => 150,
            DrinkKind::Americano => 140,
            DrinkKind::Cappuccino => 180,
            DrinkKind::Latte => 200,
            DrinkKind::Specialty => 250,
        }
    }

    /// Canonical menu-board name (`"COLD_BREW"`, `"LATTE"`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            DrinkKind::ColdBrew => "COLD_BREW",
            DrinkKind::Espresso => "ESPRESSO",
            DrinkKind::Americano => "AMERICANO",
            DrinkKind::Cappuccino => "CAPPUCCINO",
            DrinkKind::Latte => "LATTE",
            DrinkKind::Specialty => "SPECIALTY",
        }
    }

    /// Parse a menu-board name, ignoring case and surrounding whitespace
    ///
    /// Returns `None` for anything not on the menu.
    pub fn from_name(name: &str) -> Option<DrinkKind> {
        let canonical = name.trim().to_uppercase();
        DrinkKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == canonical)
    }

    /// Map a uniform roll in [0.0, 1.0) onto the menu by frequency
    ///
    /// Walks kinds in declaration order accumulating frequency and returns
    /// the first kind whose cumulative share covers the roll. Falls back to
    /// the first kind if float rounding leaves the roll uncovered.
    pub fn sample_by_frequency(roll: f64) -> DrinkKind {
        let mut cumulative = 0.0;
        for kind in DrinkKind::ALL {
            cumulative += kind.frequency();
            if roll <= cumulative {
                return kind;
            }
        }
        DrinkKind::ALL[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequencies_sum_to_one() {
        let total: f64 = DrinkKind::ALL.iter().map(|k| k.frequency()).sum();
        assert!((total - 1.0).abs() < 1e-9, "frequencies sum to {}", total);
    }

    #[test]
    fn test_from_name_round_trip() {
        for kind in DrinkKind::ALL {
            assert_eq!(DrinkKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_from_name_is_lenient_about_case() {
        assert_eq!(DrinkKind::from_name("  cold_brew "), Some(DrinkKind::ColdBrew));
        assert_eq!(DrinkKind::from_name("Latte"), Some(DrinkKind::Latte));
    }

    #[test]
    fn test_from_name_rejects_off_menu_orders() {
        assert_eq!(DrinkKind::from_name("MATCHA"), None);
        assert_eq!(DrinkKind::from_name(""), None);
    }

    #[test]
    fn test_sample_covers_both_ends() {
        assert_eq!(DrinkKind::sample_by_frequency(0.0), DrinkKind::ColdBrew);
        assert_eq!(DrinkKind::sample_by_frequency(0.999), DrinkKind::Specialty);
        // Rolls past the cumulative total fall back to the first kind
        assert_eq!(DrinkKind::sample_by_frequency(2.0), DrinkKind::ColdBrew);
    }
}
