//! Market clock snapshot.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Market session state as reported by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketClock {
    /// Whether the market is open right now
    pub is_open: bool,
    /// Seconds until the next close
    pub seconds_to_close: u64,
    /// Seconds until the next open
    pub seconds_to_open: u64,
}

impl MarketClock {
    /// Open market closing in `seconds_to_close`.
    pub fn open(seconds_to_close: u64, seconds_to_open: u64) -> Self {
        Self {
            is_open: true,
            seconds_to_close,
            seconds_to_open,
        }
    }

    /// Closed market opening in `seconds_to_open`.
    pub fn closed(seconds_to_open: u64, seconds_to_close: u64) -> Self {
        Self {
            is_open: false,
            seconds_to_close,
            seconds_to_open,
        }
    }

    /// Time until the next open.
    pub fn until_open(&self) -> Duration {
        Duration::from_secs(self.seconds_to_open)
    }

    /// Time until the next close.
    pub fn until_close(&self) -> Duration {
        Duration::from_secs(self.seconds_to_close)
    }

    /// Open, but within `buffer_secs` of the close.
    pub fn is_closing(&self, buffer_secs: u64) -> bool {
        self.is_open && self.seconds_to_close <= buffer_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_window() {
        assert!(MarketClock::open(120, 60_000).is_closing(120));
        assert!(!MarketClock::open(121, 60_000).is_closing(120));
        assert!(!MarketClock::closed(3_600, 30_000).is_closing(120));
    }

    #[test]
    fn test_durations() {
        let clock = MarketClock::closed(3_600, 27_000);
        assert_eq!(clock.until_open(), Duration::from_secs(3_600));
        assert_eq!(clock.until_close(), Duration::from_secs(27_000));
    }
}
