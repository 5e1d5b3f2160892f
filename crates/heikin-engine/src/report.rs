//! Cycle report.

use std::fmt;

use chrono::{DateTime, Utc};
use heikin_core::types::{OrderAck, OrderAction};
use serde::Serialize;

use crate::decision::{ActionReason, HoldReason};

/// Why a symbol was skipped for the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Bars or price missing
    DataUnavailable(String),
    /// Network or API failure from the data feed
    TransientFeedFailure(String),
    /// Broker position read failed
    PositionLookupFailure(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DataUnavailable(d) => write!(f, "data unavailable: {d}"),
            SkipReason::TransientFeedFailure(d) => write!(f, "feed failure: {d}"),
            SkipReason::PositionLookupFailure(d) => write!(f, "position lookup failed: {d}"),
        }
    }
}

/// What happened to one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Ordered {
        action: OrderAction,
        reason: ActionReason,
        ack: OrderAck,
    },
    OrderFailed {
        action: OrderAction,
        reason: ActionReason,
        error: String,
    },
    Held {
        reason: HoldReason,
    },
    Skipped {
        reason: SkipReason,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolOutcome {
    pub symbol: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl fmt::Display for SymbolOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Ordered { action, reason, ack } => {
                write!(f, "{:<8} ORDERED  {} [{}] id={}", self.symbol, action, reason, ack.order_id)
            }
            Outcome::OrderFailed {
                action,
                reason,
                error,
            } => write!(f, "{:<8} FAILED   {} [{}]: {}", self.symbol, action, reason, error),
            Outcome::Held { reason } => write!(f, "{:<8} HOLD     {}", self.symbol, reason),
            Outcome::Skipped { reason } => write!(f, "{:<8} SKIPPED  {}", self.symbol, reason),
        }
    }
}

/// Counts per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub symbols: usize,
    pub ordered: usize,
    pub failed: usize,
    pub held: usize,
    pub skipped: usize,
}

impl fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} symbols: {} ordered, {} failed, {} held, {} skipped",
            self.symbols, self.ordered, self.failed, self.held, self.skipped
        )
    }
}

/// Result of evaluating one cycle over the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    /// Sorted by symbol
    pub outcomes: Vec<SymbolOutcome>,
}

impl CycleReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, symbol: impl Into<String>, outcome: Outcome) {
        self.outcomes.push(SymbolOutcome {
            symbol: symbol.into(),
            outcome,
        });
    }

    pub fn outcome(&self, symbol: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|o| o.symbol == symbol)
            .map(|o| &o.outcome)
    }

    /// Orders accepted by the broker this cycle.
    pub fn orders(&self) -> impl Iterator<Item = &OrderAction> {
        self.outcomes.iter().filter_map(|o| match &o.outcome {
            Outcome::Ordered { action, .. } => Some(action),
            _ => None,
        })
    }

    pub fn summary(&self) -> CycleSummary {
        self.outcomes.iter().fold(
            CycleSummary {
                symbols: self.outcomes.len(),
                ..Default::default()
            },
            |mut s, o| {
                match o.outcome {
                    Outcome::Ordered { .. } => s.ordered += 1,
                    Outcome::OrderFailed { .. } => s.failed += 1,
                    Outcome::Held { .. } => s.held += 1,
                    Outcome::Skipped { .. } => s.skipped += 1,
                }
                s
            },
        )
    }

    /// Text rendering, one line per symbol.
    pub fn render(&self) -> String {
        let mut s = format!("Cycle {}\n", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
        for outcome in &self.outcomes {
            s.push_str(&format!("  {}\n", outcome));
        }
        s.push_str(&format!("  {}\n", self.summary()));
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn report() -> CycleReport {
        let mut report = CycleReport::new(Utc::now());
        report.push(
            "AAPL",
            Outcome::Ordered {
                action: OrderAction::buy("AAPL", dec!(2), Some(dec!(47))),
                reason: ActionReason::Entry,
                ack: OrderAck {
                    order_id: "1".into(),
                    symbol: "AAPL".into(),
                    status: "accepted".into(),
                },
            },
        );
        report.push(
            "MSFT",
            Outcome::Held {
                reason: HoldReason::NoEntry,
            },
        );
        report.push(
            "TSLA",
            Outcome::Skipped {
                reason: SkipReason::TransientFeedFailure("timeout".into()),
            },
        );
        report
    }

    #[test]
    fn test_summary() {
        let summary = report().summary();

        assert_eq!(summary.symbols, 3);
        assert_eq!(summary.ordered, 1);
        assert_eq!(summary.held, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(
            summary.to_string(),
            "3 symbols: 1 ordered, 0 failed, 1 held, 1 skipped"
        );
    }

    #[test]
    fn test_orders_and_lookup() {
        let report = report();

        assert_eq!(report.orders().count(), 1);
        assert!(matches!(report.outcome("MSFT"), Some(Outcome::Held { .. })));
        assert!(report.outcome("GOOG").is_none());
    }

    #[test]
    fn test_render() {
        let text = report().render();

        assert!(text.contains("AAPL     ORDERED  BUY 2 AAPL (stop 47) [entry] id=1"));
        assert!(text.contains("TSLA     SKIPPED  feed failure: timeout"));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(report()).unwrap();
        let first = &json["outcomes"][0];

        assert_eq!(first["symbol"], "AAPL");
        assert_eq!(first["outcome"], "ordered");
        assert_eq!(first["reason"], "entry");
        assert_eq!(json["outcomes"][2]["reason"]["kind"], "transient_feed_failure");
    }
}
