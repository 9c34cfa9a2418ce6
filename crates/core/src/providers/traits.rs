use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::mutation::MutationOutcome;
use crate::models::purchase::{Purchase, PurchaseId, PurchaseInput};
use crate::models::ticker::TickerSnapshot;

/// The purchases backend as seen by the dashboard.
///
/// The REST client implements it for production; tests plug in in-memory
/// backends. Implementations must be shareable across the request tasks
/// the orchestrator spawns.
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// All purchases, newest first, optionally scoped to one market.
    async fn list_purchases(&self, market: Option<&str>) -> Result<Vec<Purchase>, CoreError>;

    /// Directory of tradable market identifiers.
    async fn list_markets(&self) -> Result<Vec<String>, CoreError>;

    /// Live bid/ask/last for a market.
    async fn get_ticker(&self, market: &str) -> Result<TickerSnapshot, CoreError>;

    async fn create_purchase(&self, input: &PurchaseInput) -> Result<MutationOutcome, CoreError>;

    async fn update_purchase(
        &self,
        id: &PurchaseId,
        input: &PurchaseInput,
    ) -> Result<MutationOutcome, CoreError>;

    async fn delete_purchase(&self, id: &PurchaseId) -> Result<MutationOutcome, CoreError>;
}
