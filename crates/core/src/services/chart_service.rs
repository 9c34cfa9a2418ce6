use crate::format::{self, FIAT_DECIMALS, VOLUME_DECIMALS};
use crate::models::chart::{AnnotationKind, AnnotationLine, ChartData, ChartPoint, TooltipMetadata};
use crate::models::purchase::Purchase;
use crate::models::ticker::TickerSnapshot;

/// Generates chart-ready data from the included purchases.
///
/// The core computes all the numbers; the frontend only renders.
/// Chart data includes:
/// - Purchase price points in chronological order
/// - Tooltip metadata aligned with the points
/// - Ticker and break-even annotation lines with their labels
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Build the chart for `included` purchases (given in store order).
    pub fn build(
        &self,
        included: &[&Purchase],
        ticker: Option<&TickerSnapshot>,
        break_even: Option<f64>,
        hovered: Option<AnnotationKind>,
    ) -> ChartData {
        // Stable: purchases on the same instant keep their fetch order.
        let mut ordered: Vec<&Purchase> = included.to_vec();
        ordered.sort_by_key(|p| p.created_at);

        let points = ordered
            .iter()
            .map(|p| ChartPoint {
                x: p.created_at,
                y: p.asset_price,
            })
            .collect();
        let metadata = ordered.iter().map(|p| Self::tooltip(p)).collect();

        ChartData {
            points,
            metadata,
            axis_visible: !ordered.is_empty(),
            annotations: Self::annotations(ticker, break_even, hovered),
        }
    }

    fn tooltip(purchase: &Purchase) -> TooltipMetadata {
        TooltipMetadata {
            date: format::date(purchase.created_at),
            asset_price: format::trimmed(purchase.asset_price, VOLUME_DECIMALS),
            asset_volume: format::trimmed(purchase.asset_volume, VOLUME_DECIMALS),
            dollar_value: format::fixed(purchase.dollar_value, FIAT_DECIMALS),
            euro_value: format::fixed(purchase.euro_value, FIAT_DECIMALS),
            market: purchase.market.clone(),
        }
    }

    /// Ticker line whenever a ticker is known; break-even line whenever a
    /// break-even price was computed.
    pub fn annotations(
        ticker: Option<&TickerSnapshot>,
        break_even: Option<f64>,
        hovered: Option<AnnotationKind>,
    ) -> Vec<AnnotationLine> {
        let mut lines = Vec::with_capacity(2);

        if let Some(t) = ticker {
            lines.push(AnnotationLine {
                kind: AnnotationKind::Ticker,
                value: format::finite_or_zero(t.last),
                label: Self::ticker_label(t),
                label_visible: hovered == Some(AnnotationKind::Ticker),
            });
        }

        if let Some(price) = break_even {
            lines.push(AnnotationLine {
                kind: AnnotationKind::BreakEven,
                value: price,
                label: format!("Break-even ({})", format::fixed(price, FIAT_DECIMALS)),
                label_visible: hovered == Some(AnnotationKind::BreakEven),
            });
        }

        lines
    }

    /// "Bid (b), Ask (a), Last (l)" with two decimals each.
    pub fn ticker_label(ticker: &TickerSnapshot) -> String {
        format!(
            "Bid ({}), Ask ({}), Last ({})",
            format::fixed(ticker.bid, FIAT_DECIMALS),
            format::fixed(ticker.ask, FIAT_DECIMALS),
            format::fixed(ticker.last, FIAT_DECIMALS),
        )
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
