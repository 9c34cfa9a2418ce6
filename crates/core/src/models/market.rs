use std::collections::BTreeSet;

use crate::errors::CoreError;

/// Normalize a market identifier: trimmed and uppercased (`btc-usd` -> `BTC-USD`).
pub fn normalize_market(id: &str) -> Result<String, CoreError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Market must not be empty".into()));
    }
    Ok(trimmed.to_uppercase())
}

/// The active market plus the session's directory of known markets.
///
/// The directory is fetched at most once per session. `known_markets()` is
/// `None` until the directory loads or a market is added by hand; a hand-added
/// market does not count as a loaded directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketContext {
    active: Option<String>,
    known: Option<BTreeSet<String>>,
    loaded: bool,
    loading: bool,
}

impl MarketContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that starts with `market` active.
    pub fn with_active(market: &str) -> Result<Self, CoreError> {
        Ok(Self {
            active: Some(normalize_market(market)?),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Activate `id`. Returns `false` when it already was the active market.
    pub fn select_market(&mut self, id: &str) -> Result<bool, CoreError> {
        let id = normalize_market(id)?;
        if self.active.as_deref() == Some(id.as_str()) {
            return Ok(false);
        }
        log::info!("Switching active market to {id}");
        self.active = Some(id);
        Ok(true)
    }

    /// Insert a market into the known set (creating the set if the directory
    /// was never loaded) and activate it. Returns whether the active market
    /// changed.
    pub fn add_market(&mut self, id: &str) -> Result<bool, CoreError> {
        let id = normalize_market(id)?;
        self.known.get_or_insert_with(BTreeSet::new).insert(id.clone());
        self.select_market(&id)
    }

    #[must_use]
    pub fn known_markets(&self) -> Option<&BTreeSet<String>> {
        self.known.as_ref()
    }

    /// True once the directory fetch has succeeded.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.loaded
    }

    /// Claim the directory fetch. Returns `false` when the directory is
    /// already loaded or a fetch is in flight.
    pub fn begin_loading(&mut self) -> bool {
        if self.loaded || self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Store the fetched directory, keeping markets added by hand meanwhile.
    pub fn set_known(&mut self, markets: Vec<String>) {
        let known = self.known.get_or_insert_with(BTreeSet::new);
        for market in markets {
            match normalize_market(&market) {
                Ok(id) => {
                    known.insert(id);
                }
                Err(_) => log::warn!("Ignoring blank market identifier in directory"),
            }
        }
        self.loaded = true;
        self.loading = false;
    }

    /// The directory fetch failed; allow a later retry.
    pub fn loading_failed(&mut self) {
        self.loading = false;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
