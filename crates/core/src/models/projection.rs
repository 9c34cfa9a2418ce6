use serde::{Deserialize, Serialize};

use super::analytics::Summary;
use super::chart::ChartData;
use super::table::TableRow;

/// The three read-only views handed to the rendering layer, plus the
/// market picker contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub chart: ChartData,
    pub rows: Vec<TableRow>,
    pub summary: Summary,
    pub active_market: Option<String>,
    /// Empty until the market directory has been loaded
    pub known_markets: Vec<String>,
}
