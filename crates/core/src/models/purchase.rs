use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::CoreError;
use crate::format;

/// Opaque backend identifier of a purchase (a Mongo ObjectId in practice).
/// Stable across refetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseId(pub String);

impl PurchaseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PurchaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PurchaseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PurchaseId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single recorded acquisition, exactly as the backend returned it.
///
/// Purchases are never edited in place: every mutation goes to the backend
/// and the full list is refetched afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(rename = "_id", alias = "id")]
    pub id: PurchaseId,

    /// When the purchase was recorded (epoch millis on the wire).
    #[serde(rename = "_created_at", with = "crate::serde_util::timestamp_ms")]
    pub created_at: DateTime<Utc>,

    /// Price of one asset unit in dollars at purchase time
    #[serde(rename = "bitcoin_price", alias = "asset_price")]
    pub asset_price: f64,

    /// Amount of the asset bought
    #[serde(rename = "bitcoin_volume", alias = "asset_volume")]
    pub asset_volume: f64,

    /// Cost basis in dollars
    pub dollar_value: f64,

    /// Cost basis in euros
    pub euro_value: f64,

    /// Market identifier (e.g. "BTC-USD"). Only set by multi-market backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
}

impl Purchase {
    pub fn new(
        id: impl Into<PurchaseId>,
        created_at: DateTime<Utc>,
        asset_price: f64,
        asset_volume: f64,
        dollar_value: f64,
        euro_value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            created_at,
            asset_price,
            asset_volume,
            dollar_value,
            euro_value,
            market: None,
        }
    }

    /// Builder-style market tag for multi-market records.
    #[must_use]
    pub fn in_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }
}

/// Holds the latest fetched purchase list.
///
/// Only ever swapped wholesale with what the backend returned; there is
/// no incremental update path.
#[derive(Debug, Clone, Default)]
pub struct PurchaseStore {
    records: Vec<Purchase>,
}

impl PurchaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace the full record set, keeping fetch order.
    /// A repeated id keeps its first occurrence. Returns the number of
    /// records dropped as duplicates.
    pub fn replace(&mut self, records: Vec<Purchase>) -> usize {
        let total = records.len();
        let mut seen = HashSet::with_capacity(total);
        let mut unique = Vec::with_capacity(total);
        for record in records {
            if seen.insert(record.id.clone()) {
                unique.push(record);
            } else {
                log::warn!("Dropping duplicate purchase id {} from fetched list", record.id);
            }
        }
        let dropped = total - unique.len();
        self.records = unique;
        dropped
    }

    #[must_use]
    pub fn all(&self) -> &[Purchase] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &PurchaseId) -> Option<&Purchase> {
        self.records.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &PurchaseId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Body sent to the backend when creating or updating a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseInput {
    /// Left out when the backend should stamp the record itself.
    #[serde(
        rename = "_created_at",
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::serde_util::timestamp_ms_opt"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(rename = "bitcoin_price")]
    pub asset_price: f64,

    #[serde(rename = "bitcoin_volume")]
    pub asset_volume: f64,

    pub dollar_value: f64,

    pub euro_value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
}

impl PurchaseInput {
    /// Amounts must be finite and non-negative; a market tag must not be blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("asset price", self.asset_price),
            ("asset volume", self.asset_volume),
            ("dollar value", self.dollar_value),
            ("euro value", self.euro_value),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(CoreError::Validation(format!("The {name} must be a number")));
            }
            if value < 0.0 {
                return Err(CoreError::Validation(format!(
                    "The {name} must not be negative (got {value})"
                )));
            }
        }
        if let Some(market) = &self.market {
            if market.trim().is_empty() {
                return Err(CoreError::Validation("Market must not be empty".into()));
            }
        }
        Ok(())
    }
}

/// Raw text of the add/edit row, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseForm {
    /// `dd/mm/yyyy`. `None` when the form has no date column.
    #[serde(default)]
    pub created_on: Option<String>,
    pub asset_price: String,
    pub asset_volume: String,
    pub dollar_value: String,
    pub euro_value: String,
    #[serde(default)]
    pub market: Option<String>,
}

impl PurchaseForm {
    /// Sanitize every field into a [`PurchaseInput`].
    ///
    /// Any blank field fails the whole form before anything else is checked.
    pub fn parse(&self) -> Result<PurchaseInput, CoreError> {
        let texts = [
            Some(self.asset_price.as_str()),
            Some(self.asset_volume.as_str()),
            Some(self.dollar_value.as_str()),
            Some(self.euro_value.as_str()),
            self.created_on.as_deref(),
            self.market.as_deref(),
        ];
        if texts.iter().flatten().any(|t| t.trim().is_empty()) {
            return Err(CoreError::Validation("All fields are required".into()));
        }

        let created_at = match &self.created_on {
            Some(text) => Some(format::parse_date(text)?.and_time(NaiveTime::MIN).and_utc()),
            None => None,
        };

        let input = PurchaseInput {
            created_at,
            asset_price: parse_number("asset price", &self.asset_price)?,
            asset_volume: parse_number("asset volume", &self.asset_volume)?,
            dollar_value: parse_number("dollar value", &self.dollar_value)?,
            euro_value: parse_number("euro value", &self.euro_value)?,
            market: self.market.as_ref().map(|m| m.trim().to_uppercase()),
        };
        input.validate()?;
        Ok(input)
    }
}

fn parse_number(name: &str, text: &str) -> Result<f64, CoreError> {
    let trimmed = text.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| CoreError::Validation(format!("The {name} '{trimmed}' is not a number")))
}
