use std::collections::{HashMap, HashSet};

use crate::availability::AssignmentSnapshot;
use crate::chromosome::Candidate;
use crate::data::{Event, EventId, Supervisor, SupervisorId};
use crate::error::SolverError;

/// Read-only supervisors, events and lookups shared by one run.
#[derive(Debug, Clone)]
pub struct Problem {
    supervisors: Vec<Supervisor>,
    events: Vec<Event>,
    supervisor_index: HashMap<SupervisorId, usize>,
    event_index: HashMap<EventId, usize>,
    snapshot: AssignmentSnapshot,
}

impl Problem {
    pub fn new(supervisors: Vec<Supervisor>, events: Vec<Event>) -> Result<Self, SolverError> {
        let mut supervisor_index = HashMap::with_capacity(supervisors.len());
        for (position, supervisor) in supervisors.iter().enumerate() {
            if supervisor_index.insert(supervisor.id, position).is_some() {
                return Err(SolverError::DuplicateSupervisor(supervisor.id));
            }
        }

        let mut event_index = HashMap::with_capacity(events.len());
        for (position, event) in events.iter().enumerate() {
            if event_index.insert(event.id, position).is_some() {
                return Err(SolverError::DuplicateEvent(event.id));
            }
        }

        let snapshot = AssignmentSnapshot::from_events(&events);
        Ok(Self {
            supervisors,
            events,
            supervisor_index,
            event_index,
            snapshot,
        })
    }

    pub fn supervisors(&self) -> &[Supervisor] {
        &self.supervisors
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn snapshot(&self) -> &AssignmentSnapshot {
        &self.snapshot
    }

    pub fn event(&self, id: EventId) -> Result<&Event, SolverError> {
        self.event_index
            .get(&id)
            .map(|&position| &self.events[position])
            .ok_or(SolverError::UnknownEvent(id))
    }

    /// Position of the supervisor in `supervisors()`.
    pub fn supervisor_position(&self, id: SupervisorId) -> Result<usize, SolverError> {
        self.supervisor_index
            .get(&id)
            .copied()
            .ok_or(SolverError::UnknownSupervisor(id))
    }

    /// Checks that `candidate` covers exactly the problem's events and never
    /// lists a supervisor twice on one event.
    pub fn check_candidate(&self, candidate: &Candidate) -> Result<(), SolverError> {
        for event in &self.events {
            if candidate.get(event.id).is_none() {
                return Err(SolverError::MissingEvent(event.id));
            }
        }
        for (event_id, assigned) in candidate.iter() {
            self.event(event_id)?;
            let mut seen = HashSet::with_capacity(assigned.len());
            for &supervisor_id in assigned {
                self.supervisor_position(supervisor_id)?;
                if !seen.insert(supervisor_id) {
                    return Err(SolverError::DuplicateAssignment {
                        event_id,
                        supervisor_id,
                    });
                }
            }
        }
        Ok(())
    }

    /// Supervisors the committed snapshot still allows on `event`.
    pub fn available_for<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a Supervisor> + 'a {
        self.supervisors
            .iter()
            .filter(move |s| self.snapshot.is_available(s, event))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    /// Event on the given day of March 2024 (4th-10th is ISO week 10).
    pub fn event(id: EventId, day: u32, required: u32) -> Event {
        Event {
            id,
            name: Some(format!("Exam {id}")),
            date: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            duration_hours: Some(2.0),
            required_supervisors: required,
            assigned_supervisors: Vec::new(),
        }
    }

    pub fn supervisor(id: SupervisorId, weekly_capacity: u32) -> Supervisor {
        Supervisor { id, weekly_capacity }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{event, supervisor};
    use super::*;

    #[test]
    fn test_rejects_duplicate_ids() {
        let dup_sup = Problem::new(vec![supervisor(1, 1), supervisor(1, 2)], vec![]);
        assert_eq!(dup_sup.unwrap_err(), SolverError::DuplicateSupervisor(1));

        let dup_event = Problem::new(vec![], vec![event(3, 4, 1), event(3, 5, 1)]);
        assert_eq!(dup_event.unwrap_err(), SolverError::DuplicateEvent(3));
    }

    #[test]
    fn test_lookups() {
        let problem =
            Problem::new(vec![supervisor(10, 1), supervisor(20, 1)], vec![event(1, 4, 1)]).unwrap();
        assert_eq!(problem.event(1).unwrap().id, 1);
        assert_eq!(problem.event(2).unwrap_err(), SolverError::UnknownEvent(2));
        assert_eq!(problem.supervisor_position(20).unwrap(), 1);
        assert_eq!(
            problem.supervisor_position(30).unwrap_err(),
            SolverError::UnknownSupervisor(30)
        );
    }

    #[test]
    fn test_check_candidate() {
        let problem =
            Problem::new(vec![supervisor(1, 1), supervisor(2, 1)], vec![event(10, 4, 1), event(11, 5, 1)])
                .unwrap();
        let full = Candidate::new([(10, vec![1]), (11, vec![])].into_iter().collect());
        assert!(problem.check_candidate(&full).is_ok());

        let stray = Candidate::new([(10, vec![1]), (11, vec![]), (12, vec![])].into_iter().collect());
        assert_eq!(problem.check_candidate(&stray).unwrap_err(), SolverError::UnknownEvent(12));

        let stranger = Candidate::new([(10, vec![9]), (11, vec![])].into_iter().collect());
        assert_eq!(
            problem.check_candidate(&stranger).unwrap_err(),
            SolverError::UnknownSupervisor(9)
        );
    }

    #[test]
    fn test_available_for_uses_committed_assignments() {
        let mut committed = event(1, 4, 1);
        committed.assigned_supervisors = vec![10];
        let problem = Problem::new(
            vec![supervisor(10, 1), supervisor(20, 1)],
            vec![committed, event(2, 5, 1)],
        )
        .unwrap();
        let target = problem.event(2).unwrap();
        let ids: Vec<_> = problem.available_for(target).map(|s| s.id).collect();
        assert_eq!(ids, vec![20]);
    }
}
