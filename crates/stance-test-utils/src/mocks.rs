//! Mock implementations of core traits for testing.

use std::cell::RefCell;
use std::rc::Rc;

use stance_core::{ContactScheduleObserver, VariableError};

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

/// Schedule observer that remembers every duration update it receives.
///
/// Observers sharing one `log` append their `id` on each notification, which
/// exposes the order a schedule notifies them in.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    id: usize,
    updates: Vec<Vec<f64>>,
    log: Option<Rc<RefCell<Vec<usize>>>>,
}

impl RecordingObserver {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Observer appending `id` to the shared `log` when notified.
    pub fn with_log(id: usize, log: Rc<RefCell<Vec<usize>>>) -> Self {
        Self {
            id,
            updates: Vec::new(),
            log: Some(log),
        }
    }

    pub const fn id(&self) -> usize {
        self.id
    }

    /// Number of notifications received.
    pub fn calls(&self) -> usize {
        self.updates.len()
    }

    /// Durations from the most recent notification.
    pub fn last(&self) -> Option<Vec<f64>> {
        self.updates.last().cloned()
    }
}

impl ContactScheduleObserver for RecordingObserver {
    fn update_phase_durations(&mut self, durations: &[f64]) -> Result<(), VariableError> {
        self.updates.push(durations.to_vec());
        if let Some(log) = &self.log {
            log.borrow_mut().push(self.id);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
