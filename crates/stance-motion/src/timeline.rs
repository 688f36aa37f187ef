//! Ordered stance/swing phases of one end-effector.
//!
//! Each phase is a contact flag plus a duration. Cumulative end times are kept
//! alongside so a global time can be resolved to a phase with a binary search.

use stance_core::VariableError;

/// Where a global time falls on the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseQuery {
    /// Index of the phase containing the time.
    pub phase: usize,
    /// Time since the start of that phase, in `[0, duration]`.
    pub local_time: f64,
    /// Whether the phase is a stance phase.
    pub is_contact: bool,
}

/// Sequence of `(is_contact, duration)` phases with a running total.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhaseTimeline {
    contact: Vec<bool>,
    durations: Vec<f64>,
    /// `ends[i]` = sum of durations `0..=i`.
    ends: Vec<f64>,
}

impl PhaseTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a phase at the end.
    pub fn push(&mut self, is_contact: bool, duration: f64) {
        let end = self.total_time() + duration;
        self.contact.push(is_contact);
        self.durations.push(duration);
        self.ends.push(end);
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Sum of all durations.
    pub fn total_time(&self) -> f64 {
        self.ends.last().copied().unwrap_or(0.0)
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub fn is_contact(&self, phase: usize) -> bool {
        self.contact[phase]
    }

    /// Global time at which `phase` begins.
    pub fn phase_start(&self, phase: usize) -> f64 {
        if phase == 0 { 0.0 } else { self.ends[phase - 1] }
    }

    /// Replace every duration, keeping the contact flags.
    pub fn set_durations(&mut self, durations: &[f64]) -> Result<(), VariableError> {
        if durations.len() != self.durations.len() {
            return Err(VariableError::DimensionMismatch {
                expected: self.durations.len(),
                got: durations.len(),
            });
        }
        self.durations.copy_from_slice(durations);
        let mut end = 0.0;
        for (e, d) in self.ends.iter_mut().zip(durations) {
            end += d;
            *e = end;
        }
        Ok(())
    }

    /// Resolve a global time to a phase.
    ///
    /// A time exactly on a boundary belongs to the later phase. Times before
    /// zero clamp to the start of phase 0, times at or past the total clamp to
    /// the end of the last phase. Returns `None` only for an empty timeline.
    pub fn phase_at(&self, t_global: f64) -> Option<PhaseQuery> {
        let last = self.len().checked_sub(1)?;
        let t = t_global.max(0.0);

        let phase = self.ends.partition_point(|&end| end <= t);
        let query = if phase > last {
            PhaseQuery {
                phase: last,
                local_time: self.durations[last],
                is_contact: self.contact[last],
            }
        } else {
            PhaseQuery {
                phase,
                local_time: t - self.phase_start(phase),
                is_contact: self.contact[phase],
            }
        };
        Some(query)
    }
}
