use serde::{Deserialize, Serialize};

use crate::serde_util::lenient_f64;

/// Latest polled price for a market. Overwritten on every poll.
///
/// Field names follow the exchange ticker payload; rates may arrive as
/// decimal strings and a missing rate reads as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    #[serde(rename = "symbol", default)]
    pub market: String,

    #[serde(rename = "bidRate", default = "lenient_f64::nan", deserialize_with = "lenient_f64::deserialize")]
    pub bid: f64,

    #[serde(rename = "askRate", default = "lenient_f64::nan", deserialize_with = "lenient_f64::deserialize")]
    pub ask: f64,

    #[serde(rename = "lastTradeRate", default = "lenient_f64::nan", deserialize_with = "lenient_f64::deserialize")]
    pub last: f64,
}

impl TickerSnapshot {
    pub fn new(market: impl Into<String>, bid: f64, ask: f64, last: f64) -> Self {
        Self {
            market: market.into(),
            bid,
            ask,
            last,
        }
    }

    /// True when the last trade rate can be used in arithmetic.
    #[must_use]
    pub fn has_last(&self) -> bool {
        self.last.is_finite()
    }
}
