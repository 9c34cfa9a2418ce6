use crate::format;
use crate::models::projection::Projection;
use crate::models::purchase::Purchase;
use crate::models::settings::MarketMode;
use crate::models::state::AppState;
use crate::models::table::TableRow;
use crate::services::analytics_service::AnalyticsService;
use crate::services::chart_service::ChartService;

/// Derives the chart, table and summary views from an [`AppState`].
///
/// Two steps:
/// 1. [`reconcile`](Self::reconcile) applies the one selection side effect:
///    purchases hidden by the date filter are forced back to included.
/// 2. [`project`](Self::project) is a pure function of the state.
///
/// [`refresh`](Self::refresh) runs both and is what callers normally use.
pub struct ProjectionEngine {
    chart_service: ChartService,
    analytics_service: AnalyticsService,
}

impl ProjectionEngine {
    pub fn new() -> Self {
        Self {
            chart_service: ChartService::new(),
            analytics_service: AnalyticsService::new(),
        }
    }

    /// Reset the selection of every in-scope purchase the range filter hides.
    /// Returns how many exclusions were reset.
    pub fn reconcile(&self, state: &mut AppState) -> usize {
        let hidden: Vec<_> = state
            .scoped()
            .filter(|(_, p)| !state.range.contains(p.created_at))
            .map(|(_, p)| p.id.clone())
            .collect();

        let mut reset = 0;
        for id in &hidden {
            if state.selection.force_included_if_hidden(id, false) {
                reset += 1;
            }
        }
        reset
    }

    /// Compute all projections. Does not touch the state.
    pub fn project(&self, state: &AppState) -> Projection {
        let scoped: Vec<(usize, &Purchase)> = state.scoped().collect();
        let visible: Vec<(usize, &Purchase)> = scoped
            .iter()
            .copied()
            .filter(|(_, p)| state.range.contains(p.created_at))
            .collect();
        let included: Vec<&Purchase> = visible
            .iter()
            .filter(|(_, p)| state.selection.is_included(&p.id))
            .map(|(_, p)| *p)
            .collect();

        let with_break_even = state.mode == MarketMode::Multi && !scoped.is_empty();
        let summary = self
            .analytics_service
            .summarize(&included, state.ticker.as_ref(), with_break_even);

        let chart = self.chart_service.build(
            &included,
            state.ticker.as_ref(),
            summary.break_even,
            state.hovered,
        );

        let rows = visible
            .iter()
            .map(|(index, p)| TableRow {
                index: *index,
                id: p.id.clone(),
                created_at: p.created_at,
                created_on: format::date(p.created_at),
                asset_price: p.asset_price,
                asset_volume: p.asset_volume,
                dollar_value: p.dollar_value,
                euro_value: p.euro_value,
                market: p.market.clone(),
                included: state.selection.is_included(&p.id),
            })
            .collect();

        let known_markets = state
            .market
            .known_markets()
            .map(|known| known.iter().cloned().collect())
            .unwrap_or_default();

        Projection {
            chart,
            rows,
            summary,
            active_market: state.market.active().map(str::to_string),
            known_markets,
        }
    }

    /// Reconcile, then project.
    pub fn refresh(&self, state: &mut AppState) -> Projection {
        let reset = self.reconcile(state);
        if reset > 0 {
            log::debug!("Reset {reset} hidden purchase(s) to included");
        }
        self.project(state)
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}
