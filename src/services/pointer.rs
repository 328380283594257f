//! Pointer position sources for idle detection

use std::sync::{Arc, Mutex};

use crate::state::PointerPosition;

/// Anything that can report where the pointer currently is
pub trait PointerSource: Send + Sync + 'static {
    fn position(&self) -> PointerPosition;
}

/// Pointer source fed by clients over the HTTP API.
///
/// Until the first report it returns the origin, which simply reads as "not moving".
#[derive(Debug, Clone, Default)]
pub struct ReportedPointer {
    latest: Arc<Mutex<PointerPosition>>,
}

impl ReportedPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, position: PointerPosition) {
        match self.latest.lock() {
            Ok(mut latest) => *latest = position,
            Err(e) => tracing::warn!("Failed to record pointer position: {}", e),
        }
    }
}

impl PointerSource for ReportedPointer {
    fn position(&self) -> PointerPosition {
        self.latest
            .lock()
            .map(|latest| *latest)
            .unwrap_or_default()
    }
}
