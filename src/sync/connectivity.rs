use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn is_online(&self) -> bool {
        matches!(self, Connectivity::Online)
    }
}

impl From<bool> for Connectivity {
    fn from(online: bool) -> Self {
        if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }
}

/// The coordinator's belief about whether the remote store is reachable. Kept outside the
/// operation lock so status notifications never wait behind an in-flight call.
#[derive(Debug)]
pub(crate) struct ConnectivityFlag(AtomicBool);

impl ConnectivityFlag {
    pub(crate) fn new(initial: Connectivity) -> Self {
        Self(AtomicBool::new(initial.is_online()))
    }

    pub(crate) fn get(&self) -> Connectivity {
        Connectivity::from(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn is_online(&self) -> bool {
        self.get().is_online()
    }

    /// Stores the new state and returns the previous one.
    pub(crate) fn set(&self, state: Connectivity) -> Connectivity {
        let previous = Connectivity::from(self.0.swap(state.is_online(), Ordering::AcqRel));

        if previous != state {
            tracing::info!(?previous, current = ?state, "connectivity changed");
        }

        previous
    }
}
