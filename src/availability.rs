//! Capacity-aware eligibility checks against committed assignments.
//!
//! Availability is judged against the assignments already recorded on the
//! events (`Event::assigned_supervisors`), never against the candidate being
//! built or mutated. A supervisor stays eligible for every event in a week
//! until the committed schedule fills their weekly capacity.

use itertools::Itertools;
use std::collections::HashMap;

use crate::data::{Event, IsoWeek, Supervisor, SupervisorId};

/// Returns whether `supervisor` may take `event` without exceeding their
/// weekly capacity, counting the committed assignments in `reference_events`.
///
/// Rescans the events on every call. The engine asks [`AssignmentSnapshot`]
/// instead, which precomputes the same counts and is tested against this.
pub fn is_available(supervisor: &Supervisor, event: &Event, reference_events: &[Event]) -> bool {
    let week = event.week();
    let weekly = reference_events
        .iter()
        .filter(|e| e.week() == week && e.assigned_supervisors.contains(&supervisor.id))
        .count();
    weekly < supervisor.weekly_capacity as usize
}

/// Point-in-time count of committed assignments per supervisor and week.
#[derive(Debug, Clone, Default)]
pub struct AssignmentSnapshot {
    weekly: HashMap<(SupervisorId, IsoWeek), u32>,
}

impl AssignmentSnapshot {
    pub fn from_events(events: &[Event]) -> Self {
        let mut weekly = HashMap::new();
        for event in events {
            let week = event.week();
            // an event counts once per supervisor even if listed twice
            for supervisor_id in event.assigned_supervisors.iter().unique() {
                *weekly.entry((*supervisor_id, week)).or_insert(0) += 1;
            }
        }
        Self { weekly }
    }

    pub fn committed(&self, supervisor_id: SupervisorId, week: IsoWeek) -> u32 {
        self.weekly.get(&(supervisor_id, week)).copied().unwrap_or(0)
    }

    pub fn is_available(&self, supervisor: &Supervisor, event: &Event) -> bool {
        self.committed(supervisor.id, event.week()) < supervisor.weekly_capacity
    }
}
