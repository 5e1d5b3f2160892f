//! Broker and market data integrations.

mod alpaca;
mod dry_run;
mod paper;

pub use alpaca::{AlpacaBroker, AlpacaConfig};
pub use dry_run::DryRunBroker;
pub use paper::{PaperBroker, SessionPhase};
