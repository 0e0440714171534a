//! Mock navigator for testing.

use std::sync::{Arc, Mutex};

use crate::navigation::{Navigator, Route};

/// Navigator that remembers every requested route.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    visits: Arc<Mutex<Vec<Route>>>,
}

impl RecordingNavigator {
    /// Create a navigator with no visits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes requested so far, in order.
    #[must_use]
    pub fn visits(&self) -> Vec<Route> {
        self.visits
            .lock()
            .map(|visits| visits.clone())
            .unwrap_or_default()
    }

    /// Most recent route.
    #[must_use]
    pub fn last(&self) -> Option<Route> {
        self.visits().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(route);
        }
    }
}
