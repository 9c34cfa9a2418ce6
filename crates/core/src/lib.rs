pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod serde_util;
pub mod services;

use models::{
    chart::AnnotationKind,
    market::MarketContext,
    projection::Projection,
    purchase::{Purchase, PurchaseId},
    range_filter::{RangeFilter, RangeInput},
    settings::{MarketMode, Settings},
    state::AppState,
    ticker::TickerSnapshot,
};
use services::projection_service::ProjectionEngine;

use errors::CoreError;

/// Main entry point for the purchase dashboard core library.
/// Holds the view state and the latest projection derived from it.
///
/// Every mutating operation re-runs the projection engine before it
/// returns, so [`projection`](Self::projection) is never stale with
/// respect to the state.
#[must_use]
pub struct PurchaseDashboard {
    state: AppState,
    engine: ProjectionEngine,
    projection: Projection,
    settings: Settings,
}

impl std::fmt::Debug for PurchaseDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PurchaseDashboard")
            .field("purchases", &self.state.purchases.len())
            .field("active_market", &self.state.market.active())
            .field("range", &self.state.range)
            .field("has_ticker", &self.state.ticker.is_some())
            .field("mode", &self.state.mode)
            .finish()
    }
}

impl PurchaseDashboard {
    /// Create an empty dashboard; `settings.default_market` starts active.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let market = MarketContext::with_active(&settings.default_market)?;
        let state = AppState::new(settings.market_mode, market);
        let engine = ProjectionEngine::new();
        let mut dashboard = Self {
            state,
            engine,
            projection: Projection::default(),
            settings,
        };
        dashboard.recompute();
        Ok(dashboard)
    }

    // ── Read Accessors ──────────────────────────────────────────────

    /// The latest projection (chart, table rows, summary).
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn mode(&self) -> MarketMode {
        self.state.mode
    }

    /// Purchase at a store index (as carried by table rows).
    #[must_use]
    pub fn purchase_at(&self, index: usize) -> Option<&Purchase> {
        self.state.purchases.all().get(index)
    }

    #[must_use]
    pub fn purchase(&self, id: &PurchaseId) -> Option<&Purchase> {
        self.state.purchases.get(id)
    }

    /// Market the purchase list should be fetched for (`None`: all).
    #[must_use]
    pub fn purchases_market(&self) -> Option<String> {
        self.state.purchases_market().map(str::to_string)
    }

    /// Market the ticker should be polled for.
    #[must_use]
    pub fn ticker_market(&self) -> Option<String> {
        self.state.ticker_market().map(str::to_string)
    }

    // ── Purchases ───────────────────────────────────────────────────

    /// Swap in a freshly fetched purchase list. New ids default to
    /// included; existing selection flags are kept.
    pub fn replace_purchases(&mut self, records: Vec<Purchase>) {
        self.state.selection.observe(&records);
        let dropped = self.state.purchases.replace(records);
        if dropped > 0 {
            log::warn!("Fetched purchase list contained {dropped} duplicate id(s)");
        }
        self.recompute();
    }

    // ── Selection ───────────────────────────────────────────────────

    /// Include or exclude a purchase from the chart and summary.
    pub fn set_included(&mut self, id: &PurchaseId, included: bool) -> Result<(), CoreError> {
        if !self.state.purchases.contains(id) {
            return Err(CoreError::PurchaseNotFound(id.to_string()));
        }
        self.state.selection.set(id, included);
        self.recompute();
        Ok(())
    }

    // ── Date Filter ─────────────────────────────────────────────────

    /// Apply the `dd/mm/yyyy` range inputs. Both empty clears the filter.
    /// On a validation error the current filter is left untouched.
    pub fn filter_by_date(&mut self, start: &str, end: &str) -> Result<(), CoreError> {
        let input = RangeFilter::parse_input(start, end)?;
        self.state.range.apply(input);
        if input == RangeInput::Clear {
            log::debug!("Date filter cleared");
        }
        self.recompute();
        Ok(())
    }

    pub fn clear_date_filter(&mut self) {
        self.state.range.clear();
        self.recompute();
    }

    // ── Markets ─────────────────────────────────────────────────────

    /// Activate a market. Returns `false` if it was already active; callers
    /// refetch purchases and ticker when it returns `true`.
    pub fn select_market(&mut self, id: &str) -> Result<bool, CoreError> {
        let changed = self.state.market.select_market(id)?;
        if changed {
            self.recompute();
        }
        Ok(changed)
    }

    /// Register a market (if unknown) and activate it.
    pub fn add_market(&mut self, id: &str) -> Result<bool, CoreError> {
        let changed = self.state.market.add_market(id)?;
        self.recompute();
        Ok(changed)
    }

    /// Claim the one-per-session directory fetch. `false`: nothing to do.
    pub fn begin_market_loading(&mut self) -> bool {
        self.state.market.begin_loading()
    }

    pub fn set_known_markets(&mut self, markets: Vec<String>) {
        self.state.market.set_known(markets);
        self.recompute();
    }

    pub fn market_loading_failed(&mut self) {
        self.state.market.loading_failed();
    }

    // ── Ticker ──────────────────────────────────────────────────────

    pub fn update_ticker(&mut self, ticker: TickerSnapshot) {
        self.state.ticker = Some(ticker);
        self.recompute();
    }

    // ── Annotation Hover ────────────────────────────────────────────

    /// Pointer entered (`true`) or left (`false`) an annotation line.
    pub fn hover_annotation(&mut self, kind: AnnotationKind, hovered: bool) {
        if hovered {
            self.state.hovered = Some(kind);
        } else if self.state.hovered == Some(kind) {
            self.state.hovered = None;
        }
        self.recompute();
    }

    // ── Internal ────────────────────────────────────────────────────

    fn recompute(&mut self) {
        self.projection = self.engine.refresh(&mut self.state);
    }
}
