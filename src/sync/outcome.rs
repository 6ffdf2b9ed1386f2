use serde::Serialize;

use crate::trip::Trip;

/// Where a write ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Confirmed by the remote store.
    Remote,

    /// Held in the local pending queue until the next successful reconcile.
    Local,
}

/// The result of a user facing operation. Operations never raise, callers branch on `success`
/// and show `message`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<WriteMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Trip>,
}

impl OperationOutcome {
    pub(crate) fn completed(mode: WriteMode, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            mode: Some(mode),
            data: None,
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            mode: None,
            data: None,
        }
    }

    pub(crate) fn with_data(mut self, trip: Trip) -> Self {
        self.data = Some(trip);
        self
    }
}

/// Counts from one pass of replaying queued trips to the remote store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub confirmed: usize,
    pub failed: usize,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.confirmed == 0 && self.failed == 0
    }
}
