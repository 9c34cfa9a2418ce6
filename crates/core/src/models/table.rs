use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::purchase::PurchaseId;

/// One visible row of the purchases table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Position in the purchase store (what edit/delete buttons refer to)
    pub index: usize,
    pub id: PurchaseId,
    #[serde(with = "crate::serde_util::timestamp_ms")]
    pub created_at: DateTime<Utc>,
    /// `dd/mm/yyyy`
    pub created_on: String,
    pub asset_price: f64,
    pub asset_volume: f64,
    pub dollar_value: f64,
    pub euro_value: f64,
    pub market: Option<String>,
    /// State of the row's selection checkbox
    pub included: bool,
}
