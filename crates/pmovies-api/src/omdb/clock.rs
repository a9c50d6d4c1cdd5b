//! Current-year source for the `year` parameter check.

use chrono::{Datelike, Local};

/// Supplies the current calendar year.
///
/// Injected into `ParamBuilder` so the upper bound of the `year`
/// check does not depend on the wall clock in tests.
pub trait Clock: Send + Sync {
    /// Returns the current year.
    fn current_year(&self) -> i32;
}

/// Local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        Local::now().year()
    }
}

/// Clock pinned to a fixed year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_returns_pinned_year() {
        // Arrange
        let clock = FixedClock(1999);

        // Act & Assert
        assert_eq!(clock.current_year(), 1999);
    }

    #[test]
    fn test_system_clock_matches_local_year() {
        // Arrange & Act
        let year = SystemClock.current_year();

        // Assert
        assert_eq!(year, Local::now().year());
    }
}
