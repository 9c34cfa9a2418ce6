use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;

/// Which CRUD call a backend response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationKind::Create => write!(f, "Create"),
            MutationKind::Update => write!(f, "Update"),
            MutationKind::Delete => write!(f, "Delete"),
        }
    }
}

/// What the backend did with a create/update/delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationOutcome {
    /// `{"success": true}`, or the stored document for a create.
    Applied,
    /// `{"success": false}`: accepted but nothing changed.
    Unchanged,
    /// `{"invalid": true}`: the backend rejected the input.
    Invalid,
}

impl MutationOutcome {
    /// Interpret a mutation response body.
    ///
    /// `{"error": true}` (the backend's catch-all 500 body) and any body
    /// without one of the known flags are reported as API errors.
    pub fn from_response(kind: MutationKind, body: &Value) -> Result<Self, CoreError> {
        let flag = |key: &str| body.get(key).and_then(Value::as_bool);

        if flag("invalid") == Some(true) {
            return Ok(MutationOutcome::Invalid);
        }
        if flag("error") == Some(true) {
            return Err(CoreError::Api {
                endpoint: kind.to_string(),
                message: "Backend reported an internal error".into(),
            });
        }
        match flag("success") {
            Some(true) => Ok(MutationOutcome::Applied),
            Some(false) => Ok(MutationOutcome::Unchanged),
            // A create answers with the stored document instead of a flag.
            None if kind == MutationKind::Create && body.get("_id").is_some() => {
                Ok(MutationOutcome::Applied)
            }
            None => Err(CoreError::Api {
                endpoint: kind.to_string(),
                message: format!("Unexpected response body: {body}"),
            }),
        }
    }
}
