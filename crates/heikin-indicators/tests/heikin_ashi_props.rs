//! Property tests for the Heikin-Ashi transform.
//!
//! Verifies, for arbitrary non-empty bar histories:
//! 1. Wick bounds: HA low <= HA open, HA close <= HA high
//! 2. Seed: the first HA open is the midpoint of the first bar's open/close
//! 3. Recursion: every later HA open is the midpoint of the previous HA body
//! 4. Shape: one HA bar per input bar, timestamps preserved

use heikin_core::types::Bar;
use heikin_indicators::heikin_ashi;
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_bar(timestamp: i64) -> impl Strategy<Value = Bar> {
    (1.0..1000.0_f64, 1.0..1000.0_f64, 0.0..50.0_f64, 0.0..50.0_f64).prop_map(
        move |(open, close, up, down)| {
            let high = open.max(close) + up;
            let low = (open.min(close) - down).max(0.01);
            Bar::new(timestamp, open, high, low, close, 1000.0)
        },
    )
}

fn arb_bars() -> impl Strategy<Value = Vec<Bar>> {
    (1usize..120).prop_flat_map(|len| {
        (0..len)
            .map(|i| arb_bar(i as i64 * 60_000))
            .collect::<Vec<_>>()
    })
}

proptest! {
    #[test]
    fn ha_body_within_wicks(bars in arb_bars()) {
        let ha = heikin_ashi(&bars).unwrap();
        for bar in &ha {
            prop_assert!(bar.low <= bar.open);
            prop_assert!(bar.low <= bar.close);
            prop_assert!(bar.open <= bar.high);
            prop_assert!(bar.close <= bar.high);
        }
    }

    #[test]
    fn ha_open_seed_and_recursion(bars in arb_bars()) {
        let ha = heikin_ashi(&bars).unwrap();

        prop_assert_eq!(ha[0].open, (bars[0].open + bars[0].close) / 2.0);
        for i in 1..ha.len() {
            prop_assert_eq!(ha[i].open, (ha[i - 1].open + ha[i - 1].close) / 2.0);
        }
    }

    #[test]
    fn ha_preserves_length_and_order(bars in arb_bars()) {
        let ha = heikin_ashi(&bars).unwrap();

        prop_assert_eq!(ha.len(), bars.len());
        for (raw, smoothed) in bars.iter().zip(ha.iter()) {
            prop_assert_eq!(raw.timestamp, smoothed.timestamp);
        }
    }
}
