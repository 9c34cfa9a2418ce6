use serde::{Deserialize, Serialize};

/// Direction of the profit figure, used for styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfitTrend {
    Gain,
    Loss,
    #[default]
    Flat,
}

impl ProfitTrend {
    #[must_use]
    pub fn of(profit: f64) -> Self {
        if profit > 0.0 {
            ProfitTrend::Gain
        } else if profit < 0.0 {
            ProfitTrend::Loss
        } else {
            ProfitTrend::Flat
        }
    }
}

/// Aggregate figures over the included, visible purchases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of asset volumes
    pub total_volume: f64,

    /// Sum of dollar cost basis
    pub total_dollars: f64,

    /// Sum of euro cost basis
    pub total_euros: f64,

    /// total_volume × ticker last − total_dollars; 0.0 when unavailable
    pub profit: f64,

    /// False when there was no ticker or the profit came out non-finite
    pub profit_available: bool,

    /// ticker last − profit (multi-market only)
    pub break_even: Option<f64>,

    pub trend: ProfitTrend,

    pub display: SummaryDisplay,
}

/// The same figures, rounded and rendered for the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDisplay {
    /// At most 10 decimals, trailing zeros dropped
    pub total_volume: String,
    /// 2 decimals
    pub total_dollars: String,
    pub total_euros: String,
    pub profit: String,
    pub break_even: Option<String>,
}

impl Default for SummaryDisplay {
    fn default() -> Self {
        Self {
            total_volume: "0".to_string(),
            total_dollars: "0.00".to_string(),
            total_euros: "0.00".to_string(),
            profit: "0.00".to_string(),
            break_even: None,
        }
    }
}
