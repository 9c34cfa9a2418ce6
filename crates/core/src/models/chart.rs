use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of the purchase price line.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Purchase time (epoch millis on the wire, as the time axis expects)
    #[serde(with = "crate::serde_util::timestamp_ms")]
    pub x: DateTime<Utc>,

    /// Asset price paid
    pub y: f64,
}

/// Tooltip content for the chart point at the same index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipMetadata {
    pub date: String,
    pub asset_price: String,
    pub asset_volume: String,
    pub dollar_value: String,
    pub euro_value: String,
    pub market: Option<String>,
}

impl TooltipMetadata {
    /// `key: value` lines in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Date: {}", self.date),
            format!("Asset Price: {}", self.asset_price),
            format!("Asset Volume: {}", self.asset_volume),
            format!("Dollar Value: {}", self.dollar_value),
            format!("Euro Value: {}", self.euro_value),
        ];
        if let Some(market) = &self.market {
            lines.push(format!("Market: {market}"));
        }
        lines
    }
}

/// Horizontal reference lines drawn over the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Live ticker (last trade rate)
    Ticker,
    /// Price at which the selected purchases would break even
    BreakEven,
}

/// An annotation line and its hover label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationLine {
    pub kind: AnnotationKind,

    /// Y value the line is drawn at
    pub value: f64,

    /// Label text, e.g. "Bid (1.00), Ask (2.00), Last (1.50)"
    pub label: String,

    /// True only while the pointer is over the line
    pub label_visible: bool,
}

/// Everything the chart renderer needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Sorted by `x` ascending
    pub points: Vec<ChartPoint>,

    /// Index-aligned with `points`
    pub metadata: Vec<TooltipMetadata>,

    /// Time axis is hidden when there are no points
    pub axis_visible: bool,

    pub annotations: Vec<AnnotationLine>,
}

impl ChartData {
    #[must_use]
    pub fn annotation(&self, kind: AnnotationKind) -> Option<&AnnotationLine> {
        self.annotations.iter().find(|a| a.kind == kind)
    }
}
