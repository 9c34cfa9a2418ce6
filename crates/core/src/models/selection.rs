use std::collections::HashMap;

use super::purchase::{Purchase, PurchaseId};

/// Per-purchase inclusion flags for the chart and the summary.
///
/// Entries are only ever added, never dropped on refetch, so user toggles
/// survive reloads. A purchase hidden by the date filter is reset to
/// included on every visibility pass; when it shows up again it starts
/// from the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    flags: HashMap<PurchaseId, bool>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an unseen id as included. No-op for known ids.
    pub fn ensure_default(&mut self, id: &PurchaseId) {
        if !self.flags.contains_key(id) {
            self.flags.insert(id.clone(), true);
        }
    }

    /// `ensure_default` over every record of a fetched list.
    pub fn observe(&mut self, records: &[Purchase]) {
        for record in records {
            self.ensure_default(&record.id);
        }
    }

    pub fn set(&mut self, id: &PurchaseId, included: bool) {
        self.flags.insert(id.clone(), included);
    }

    /// Unknown ids read as included.
    #[must_use]
    pub fn is_included(&self, id: &PurchaseId) -> bool {
        self.flags.get(id).copied().unwrap_or(true)
    }

    /// Force the id back to included when it is not visible.
    /// Returns `true` if this flipped an exclusion.
    pub fn force_included_if_hidden(&mut self, id: &PurchaseId, visible: bool) -> bool {
        if visible {
            return false;
        }
        let previous = self.flags.insert(id.clone(), true);
        previous == Some(false)
    }

    #[must_use]
    pub fn is_known(&self, id: &PurchaseId) -> bool {
        self.flags.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
