//! Heikin-Ashi bar classification.

use heikin_core::types::{BarType, HeikinAshiBar};

/// Label one HA bar from its own four values.
///
/// First match wins:
/// 1. no lower wick (`low == open`) and an upper wick (`high > close`): BULL
/// 2. no upper wick (`high == open`) and a lower wick (`low < close`): BEAR
/// 3. otherwise: INDECISIVE
///
/// The comparisons are exact. A wickless side is produced by the transform
/// copying the open into low/high, so equality holds bit-for-bit on that
/// path; values computed along another arithmetic path may not compare equal.
#[allow(clippy::float_cmp)]
pub fn classify(bar: &HeikinAshiBar) -> BarType {
    if bar.low == bar.open && bar.high > bar.close {
        BarType::Bull
    } else if bar.high == bar.open && bar.low < bar.close {
        BarType::Bear
    } else {
        BarType::Indecisive
    }
}

/// Attach a label to every bar.
pub fn label_bars(bars: Vec<HeikinAshiBar>) -> Vec<HeikinAshiBar> {
    bars.into_iter()
        .map(|bar| {
            let bar_type = classify(&bar);
            bar.labeled(bar_type)
        })
        .collect()
}
