//! Per-symbol decision state machine.
//!
//! States are re-derived every cycle from the broker-held position:
//!
//! - **NoPosition**: a valid entry buys `shares_to_buy(cash, price)` shares
//!   with the signal's stop attached; anything else holds. Cash is only
//!   consulted here.
//! - **Holding**: the emergency exit is checked first and sells the full
//!   quantity regardless of the signal. Otherwise a valid exit sells the
//!   full quantity; a valid entry holds (no pyramiding).

use std::fmt;

use heikin_core::types::{OrderAction, Position, Signal};
use heikin_risk::{to_decimal_price, ExitTrigger, RiskSizer};
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything a decision is made from, read once per symbol per cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolState {
    pub symbol: String,
    /// Current market price
    pub price: f64,
    /// `None` when the history was too short for a signal
    pub signal: Option<Signal>,
    /// Broker-held position, `None` when flat
    pub position: Option<Position>,
    /// Available cash, `None` when the account read failed
    pub cash: Option<Decimal>,
}

/// Why an order was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionReason {
    Entry,
    Exit,
    Emergency(ExitTrigger),
}

impl fmt::Display for ActionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionReason::Entry => write!(f, "entry"),
            ActionReason::Exit => write!(f, "exit"),
            ActionReason::Emergency(trigger) => write!(f, "emergency {}", trigger),
        }
    }
}

/// Why no order was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldReason {
    /// Not enough history for a signal
    InsufficientData,
    /// Flat, and the signal is not a valid entry
    NoEntry,
    /// Holding, and the signal is not a valid exit
    NoExit,
    /// Holding, and the signal is a valid entry
    AlreadyHolding,
    /// Sizing produced zero shares
    ZeroQuantity,
    /// Price unusable for sizing
    InvalidPrice,
    /// Account cash could not be read for sizing
    CashUnavailable,
    /// Short positions are never traded
    ShortPosition,
}

impl fmt::Display for HoldReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HoldReason::InsufficientData => "insufficient data",
            HoldReason::NoEntry => "no valid entry",
            HoldReason::NoExit => "no valid exit",
            HoldReason::AlreadyHolding => "already holding",
            HoldReason::ZeroQuantity => "zero quantity",
            HoldReason::InvalidPrice => "invalid price",
            HoldReason::CashUnavailable => "cash unavailable",
            HoldReason::ShortPosition => "short position",
        };
        f.write_str(s)
    }
}

/// Outcome of one decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Act {
        order: OrderAction,
        reason: ActionReason,
    },
    Hold(HoldReason),
}

impl Decision {
    /// The order to submit, if any.
    pub fn order(&self) -> Option<&OrderAction> {
        match self {
            Decision::Act { order, .. } => Some(order),
            Decision::Hold(_) => None,
        }
    }

    pub fn into_order(self) -> Option<OrderAction> {
        match self {
            Decision::Act { order, .. } => Some(order),
            Decision::Hold(_) => None,
        }
    }
}

/// Turns a [`SymbolState`] into at most one order.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    risk: RiskSizer,
}

impl DecisionEngine {
    pub fn new(risk: RiskSizer) -> Self {
        Self { risk }
    }

    /// Decide for one symbol. Pure: the same state always yields the same
    /// decision.
    pub fn decide(&self, state: &SymbolState) -> Decision {
        match &state.position {
            Some(position) if position.quantity > Decimal::ZERO => {
                self.decide_holding(state, position)
            }
            Some(position) if position.quantity < Decimal::ZERO => {
                Decision::Hold(HoldReason::ShortPosition)
            }
            _ => self.decide_flat(state),
        }
    }

    fn decide_flat(&self, state: &SymbolState) -> Decision {
        let Some(signal) = &state.signal else {
            return Decision::Hold(HoldReason::InsufficientData);
        };
        if !signal.is_valid_entry() {
            return Decision::Hold(HoldReason::NoEntry);
        }

        let Some(cash) = state.cash else {
            return Decision::Hold(HoldReason::CashUnavailable);
        };
        let quantity = match to_decimal_price(state.price)
            .and_then(|price| self.risk.shares_to_buy(cash, price))
        {
            Ok(quantity) => quantity,
            Err(_) => return Decision::Hold(HoldReason::InvalidPrice),
        };
        if quantity.is_zero() {
            return Decision::Hold(HoldReason::ZeroQuantity);
        }

        let stop_loss_price = signal
            .stop_loss_price
            .and_then(|stop| Decimal::try_from(stop).ok());

        Decision::Act {
            order: OrderAction::buy(state.symbol.clone(), quantity, stop_loss_price),
            reason: ActionReason::Entry,
        }
    }

    fn decide_holding(&self, state: &SymbolState, position: &Position) -> Decision {
        let sell = |reason| Decision::Act {
            order: OrderAction::sell(state.symbol.clone(), position.quantity),
            reason,
        };

        if let Ok(current) = to_decimal_price(state.price) {
            if let Some(trigger) = self.risk.emergency_exit(position.avg_entry_price, current) {
                return sell(ActionReason::Emergency(trigger));
            }
        }

        let Some(signal) = &state.signal else {
            return Decision::Hold(HoldReason::InsufficientData);
        };
        if signal.is_valid_exit() {
            sell(ActionReason::Exit)
        } else if signal.is_valid_entry() {
            Decision::Hold(HoldReason::AlreadyHolding)
        } else {
            Decision::Hold(HoldReason::NoExit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heikin_core::types::{BarType, Side, SignalDirection, TrendVerdict};
    use heikin_risk::{RiskConfig, SizeRounding};
    use rust_decimal_macros::dec;

    fn signal(direction: SignalDirection, confirmed: bool) -> Signal {
        Signal {
            symbol: "AAPL".to_string(),
            direction,
            confirmed,
            stop_loss_price: Some(47.25),
            current_bar: BarType::Bull,
            previous_bar: BarType::Bear,
            trend: TrendVerdict::Pullback,
            price: 50.0,
            reference: 48.0,
            timestamp: 0,
        }
    }

    fn flat(price: f64, signal: Option<Signal>) -> SymbolState {
        SymbolState {
            symbol: "AAPL".to_string(),
            price,
            signal,
            position: None,
            cash: Some(dec!(1000)),
        }
    }

    fn holding(price: f64, entry: Decimal, signal: Option<Signal>) -> SymbolState {
        SymbolState {
            position: Some(Position::new("AAPL", dec!(10), entry)),
            ..flat(price, signal)
        }
    }

    #[test]
    fn test_entry_buys_with_stop() {
        let engine = DecisionEngine::default();
        let decision = engine.decide(&flat(50.0, Some(signal(SignalDirection::BuyCandidate, true))));

        assert_eq!(
            decision,
            Decision::Act {
                order: OrderAction::buy("AAPL", dec!(2), Some(dec!(47.25))),
                reason: ActionReason::Entry,
            }
        );
    }

    #[test]
    fn test_entry_without_stop() {
        let engine = DecisionEngine::default();
        let mut sig = signal(SignalDirection::BuyCandidate, true);
        sig.stop_loss_price = None;

        let order = engine.decide(&flat(23.0, Some(sig))).into_order().unwrap();
        assert_eq!(order.quantity, dec!(5));
        assert_eq!(order.stop_loss_price, None);
    }

    #[test]
    fn test_flat_holds_without_valid_entry() {
        let engine = DecisionEngine::default();

        assert_eq!(
            engine.decide(&flat(50.0, Some(signal(SignalDirection::BuyCandidate, false)))),
            Decision::Hold(HoldReason::NoEntry)
        );
        assert_eq!(
            engine.decide(&flat(50.0, Some(signal(SignalDirection::SellCandidate, true)))),
            Decision::Hold(HoldReason::NoEntry)
        );
        assert_eq!(
            engine.decide(&flat(50.0, None)),
            Decision::Hold(HoldReason::InsufficientData)
        );
    }

    #[test]
    fn test_zero_quantity_holds() {
        let engine = DecisionEngine::new(RiskSizer::new(&RiskConfig {
            rounding: SizeRounding::Down,
            ..Default::default()
        }));
        let state = flat(500.0, Some(signal(SignalDirection::BuyCandidate, true)));

        assert_eq!(engine.decide(&state), Decision::Hold(HoldReason::ZeroQuantity));
    }

    #[test]
    fn test_invalid_price_holds() {
        let engine = DecisionEngine::default();
        let state = flat(0.0, Some(signal(SignalDirection::BuyCandidate, true)));

        assert_eq!(engine.decide(&state), Decision::Hold(HoldReason::InvalidPrice));
    }

    #[test]
    fn test_entry_without_cash_holds() {
        let engine = DecisionEngine::default();
        let state = SymbolState {
            cash: None,
            ..flat(50.0, Some(signal(SignalDirection::BuyCandidate, true)))
        };

        assert_eq!(engine.decide(&state), Decision::Hold(HoldReason::CashUnavailable));
    }

    #[test]
    fn test_loss_override_without_cash() {
        let engine = DecisionEngine::default();
        let state = SymbolState {
            cash: None,
            ..holding(90.0, dec!(100), Some(signal(SignalDirection::BuyCandidate, true)))
        };

        assert_eq!(
            engine.decide(&state),
            Decision::Act {
                order: OrderAction::sell("AAPL", dec!(10)),
                reason: ActionReason::Emergency(ExitTrigger::Loss),
            }
        );
    }

    #[test]
    fn test_profit_override() {
        let engine = DecisionEngine::default();
        // Signal says buy; the emergency exit wins anyway
        let state = holding(103.5, dec!(100), Some(signal(SignalDirection::BuyCandidate, true)));

        assert_eq!(
            engine.decide(&state),
            Decision::Act {
                order: OrderAction::sell("AAPL", dec!(10)),
                reason: ActionReason::Emergency(ExitTrigger::Profit),
            }
        );
    }

    #[test]
    fn test_loss_override_without_signal() {
        let engine = DecisionEngine::default();
        let decision = engine.decide(&holding(97.0, dec!(100), None));

        assert_eq!(
            decision,
            Decision::Act {
                order: OrderAction::sell("AAPL", dec!(10)),
                reason: ActionReason::Emergency(ExitTrigger::Loss),
            }
        );
    }

    #[test]
    fn test_signal_exit() {
        let engine = DecisionEngine::default();
        let decision = engine.decide(&holding(
            101.0,
            dec!(100),
            Some(signal(SignalDirection::SellCandidate, true)),
        ));

        let order = decision.order().unwrap();
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.quantity, dec!(10));
    }

    #[test]
    fn test_no_pyramiding() {
        let engine = DecisionEngine::default();
        let state = holding(101.0, dec!(100), Some(signal(SignalDirection::BuyCandidate, true)));

        assert_eq!(engine.decide(&state), Decision::Hold(HoldReason::AlreadyHolding));
    }

    #[test]
    fn test_holding_without_exit() {
        let engine = DecisionEngine::default();
        let state = holding(101.0, dec!(100), Some(signal(SignalDirection::SellCandidate, false)));

        assert_eq!(engine.decide(&state), Decision::Hold(HoldReason::NoExit));
        assert_eq!(
            engine.decide(&holding(101.0, dec!(100), None)),
            Decision::Hold(HoldReason::InsufficientData)
        );
    }

    #[test]
    fn test_flat_position_counts_as_no_position() {
        let engine = DecisionEngine::default();
        let state = SymbolState {
            position: Some(Position::new("AAPL", dec!(0), dec!(100))),
            ..flat(50.0, Some(signal(SignalDirection::BuyCandidate, true)))
        };

        assert!(matches!(engine.decide(&state), Decision::Act { reason: ActionReason::Entry, .. }));
    }

    #[test]
    fn test_short_position_holds() {
        let engine = DecisionEngine::default();
        let state = SymbolState {
            position: Some(Position::new("AAPL", dec!(-5), dec!(100))),
            ..flat(50.0, Some(signal(SignalDirection::SellCandidate, true)))
        };

        assert_eq!(engine.decide(&state), Decision::Hold(HoldReason::ShortPosition));
    }

    #[test]
    fn test_decide_is_repeatable() {
        let engine = DecisionEngine::default();
        let state = flat(50.0, Some(signal(SignalDirection::BuyCandidate, true)));

        assert_eq!(engine.decide(&state), engine.decide(&state));
    }
}
