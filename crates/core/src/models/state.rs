use super::chart::AnnotationKind;
use super::market::MarketContext;
use super::purchase::{Purchase, PurchaseStore};
use super::range_filter::RangeFilter;
use super::selection::SelectionSet;
use super::settings::MarketMode;
use super::ticker::TickerSnapshot;

/// The main data container: everything the projections are derived from.
///
/// Owned by the dashboard; the projection engine only ever borrows it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub purchases: PurchaseStore,
    pub selection: SelectionSet,
    pub range: RangeFilter,
    pub market: MarketContext,
    /// Latest ticker poll, `None` until the first one lands.
    pub ticker: Option<TickerSnapshot>,
    /// Annotation line currently under the pointer.
    pub hovered: Option<AnnotationKind>,
    pub mode: MarketMode,
}

impl AppState {
    pub fn new(mode: MarketMode, market: MarketContext) -> Self {
        Self {
            mode,
            market,
            ..Self::default()
        }
    }

    /// Does `purchase` belong to what is currently projected?
    ///
    /// Single-market mode projects everything. Multi-market mode projects
    /// the active market only, and nothing while no market is active.
    #[must_use]
    pub fn in_scope(&self, purchase: &Purchase) -> bool {
        match self.mode {
            MarketMode::Single => true,
            MarketMode::Multi => match (self.market.active(), purchase.market.as_deref()) {
                (Some(active), Some(market)) => market.eq_ignore_ascii_case(active),
                _ => false,
            },
        }
    }

    /// Purchases in scope, with their store index, in store order.
    pub fn scoped(&self) -> impl Iterator<Item = (usize, &Purchase)> + '_ {
        self.purchases
            .all()
            .iter()
            .enumerate()
            .filter(move |(_, p)| self.in_scope(p))
    }

    /// Market the ticker should be polled for.
    #[must_use]
    pub fn ticker_market(&self) -> Option<&str> {
        self.market.active()
    }

    /// Market the purchase list is scoped to on the backend.
    #[must_use]
    pub fn purchases_market(&self) -> Option<&str> {
        match self.mode {
            MarketMode::Single => None,
            MarketMode::Multi => self.market.active(),
        }
    }
}
