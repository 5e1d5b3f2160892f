//! Market-hours polling loop.
//!
//! Single task, no shared timers. Every tick re-reads the broker clock:
//!
//! - closed: sleep until the reported open
//! - open but within the close buffer: log the closing notice and sleep
//!   through the close
//! - open: evaluate one cycle, then sleep until `tick start + cadence`
//!
//! Sleeps are on the tokio clock and race a shutdown signal, so a paused
//! test runtime can drive whole sessions.

use std::time::Duration;

use heikin_core::error::BrokerError;
use heikin_core::types::Timeframe;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};
use tracing::{error, info, warn};

use crate::evaluator::Evaluator;
use crate::report::CycleReport;

/// Shortest sleep between clock reads.
const MIN_WAIT: Duration = Duration::from_secs(1);

/// Scheduling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Bar interval fetched for signals
    pub timeframe: Timeframe,
    /// Bars fetched per symbol
    pub lookback: usize,
    /// Seconds between cycle starts
    pub cadence_secs: u64,
    /// Stop evaluating this many seconds before the close
    pub close_buffer_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::Daily,
            lookback: 100,
            cadence_secs: 60,
            close_buffer_secs: 120,
        }
    }
}

/// What one tick did.
#[derive(Debug)]
pub enum Tick {
    Evaluated(CycleReport),
    MarketClosed,
    Closing,
    ClockUnavailable,
}

/// Totals for a scheduler run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub orders: usize,
    pub failed_orders: usize,
}

/// Drives [`Evaluator`] cycles while the market is open.
pub struct Scheduler {
    evaluator: Evaluator,
    cadence: Duration,
    close_buffer_secs: u64,
}

impl Scheduler {
    pub fn new(evaluator: Evaluator, config: &ScheduleConfig) -> Self {
        Self {
            evaluator,
            cadence: Duration::from_secs(config.cadence_secs.max(1)),
            close_buffer_secs: config.close_buffer_secs,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Run one tick and return when the next one is due.
    pub async fn tick(&self) -> (Tick, Instant) {
        let started = Instant::now();

        let clock = match self.evaluator.broker().market_clock().await {
            Ok(clock) => clock,
            Err(e) => {
                let wait = self.retry_wait(&e);
                if e.is_transient() {
                    warn!(error = %e, "Market clock unavailable, retrying in {}", format_wait(wait));
                } else {
                    error!(error = %e, "Market clock request failed, retrying in {}", format_wait(wait));
                }
                return (Tick::ClockUnavailable, started + wait);
            }
        };

        if !clock.is_open {
            let wait = clock.until_open().max(MIN_WAIT);
            info!("Market closed, opens in {}", format_wait(wait));
            return (Tick::MarketClosed, started + wait);
        }

        if clock.is_closing(self.close_buffer_secs) {
            let wait = clock.until_close().max(MIN_WAIT);
            info!(
                "Market closing in {}, done for the session",
                format_wait(clock.until_close())
            );
            return (Tick::Closing, started + wait);
        }

        let report = self.evaluator.evaluate_cycle().await;
        (Tick::Evaluated(report), started + self.cadence)
    }

    /// Delay before the next clock read after a failure. A rate limit is
    /// honored when it asks for longer than one cadence.
    fn retry_wait(&self, error: &BrokerError) -> Duration {
        match error {
            BrokerError::RateLimited { retry_after_secs } => {
                self.cadence.max(Duration::from_secs(*retry_after_secs))
            }
            _ => self.cadence,
        }
    }

    /// Tick until `shutdown` turns true or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> RunSummary {
        let mut summary = RunSummary::default();
        info!(cadence_secs = self.cadence.as_secs(), "Scheduler started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let (tick, next) = self.tick().await;
            if let Tick::Evaluated(report) = &tick {
                let counts = report.summary();
                summary.cycles += 1;
                summary.orders += counts.ordered;
                summary.failed_orders += counts.failed;
            }

            // Updates that leave the flag false do not shorten the sleep
            let stop = loop {
                let changed = tokio::select! {
                    _ = sleep_until(next) => break false,
                    changed = shutdown.changed() => changed,
                };
                if changed.is_err() || *shutdown.borrow() {
                    break true;
                }
            };
            if stop {
                break;
            }
        }

        info!(
            cycles = summary.cycles,
            orders = summary.orders,
            "Scheduler stopped"
        );
        summary
    }
}

fn format_wait(wait: Duration) -> String {
    let secs = wait.as_secs();
    format!("{}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}
