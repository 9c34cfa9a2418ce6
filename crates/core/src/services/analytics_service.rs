use crate::format::{self, FIAT_DECIMALS, VOLUME_DECIMALS};
use crate::models::analytics::{ProfitTrend, Summary, SummaryDisplay};
use crate::models::purchase::Purchase;
use crate::models::ticker::TickerSnapshot;

/// Computes the summary figures: totals, profit and break-even price.
///
/// Profit compares what the selected volume is worth at the last trade
/// rate against what it cost in dollars. Anything non-finite (no ticker
/// yet, missing rate) is reported as 0.0 with `profit_available = false`.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Summarize `included` purchases.
    ///
    /// `with_break_even` enables the break-even price (multi-market mode with
    /// at least one purchase in scope); it is computed whenever a ticker is
    /// known.
    pub fn summarize(
        &self,
        included: &[&Purchase],
        ticker: Option<&TickerSnapshot>,
        with_break_even: bool,
    ) -> Summary {
        let mut total_volume = 0.0;
        let mut total_dollars = 0.0;
        let mut total_euros = 0.0;

        for purchase in included {
            total_volume += purchase.asset_volume;
            total_dollars += purchase.dollar_value;
            total_euros += purchase.euro_value;
        }

        let (profit, profit_available) = Self::profit(total_volume, total_dollars, ticker);

        // An unavailable profit counts as zero, so a ticker without a usable
        // last rate still yields a (zero) break-even line.
        let break_even = match ticker {
            Some(t) if with_break_even => Some(Self::break_even(t.last, profit)),
            _ => None,
        };

        let display = SummaryDisplay {
            total_volume: format::trimmed(total_volume, VOLUME_DECIMALS),
            total_dollars: format::fixed(total_dollars, FIAT_DECIMALS),
            total_euros: format::fixed(total_euros, FIAT_DECIMALS),
            profit: format::fixed(profit, FIAT_DECIMALS),
            break_even: break_even.map(|b| format::fixed(b, FIAT_DECIMALS)),
        };

        Summary {
            total_volume,
            total_dollars,
            total_euros,
            profit,
            profit_available,
            break_even,
            trend: ProfitTrend::of(profit),
            display,
        }
    }

    /// `volume * last - dollars`, or `(0.0, false)` when it cannot be computed.
    pub fn profit(volume: f64, dollars: f64, ticker: Option<&TickerSnapshot>) -> (f64, bool) {
        match ticker {
            Some(t) => {
                let profit = volume * t.last - dollars;
                if profit.is_finite() {
                    (profit, true)
                } else {
                    (0.0, false)
                }
            }
            None => (0.0, false),
        }
    }

    /// The market price at which accumulated profit would be exactly zero.
    pub fn break_even(last: f64, profit: f64) -> f64 {
        format::finite_or_zero(last - profit)
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
