//! Decision engine, cycle evaluator and market-hours scheduler.

mod decision;
mod evaluator;
mod report;
mod scheduler;

pub use decision::{ActionReason, Decision, DecisionEngine, HoldReason, SymbolState};
pub use evaluator::{Evaluator, WatchlistConfig};
pub use report::{CycleReport, CycleSummary, Outcome, SkipReason, SymbolOutcome};
pub use scheduler::{RunSummary, ScheduleConfig, Scheduler, Tick};
