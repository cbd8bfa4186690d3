//! Candidate assignments and the random initial population.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::{EventId, Supervisor, SupervisorId};
use crate::problem::Problem;

/// One complete proposed assignment: every event id maps to the
/// supervisors put on it. Ordered by event id so seeded runs replay exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate {
    genes: BTreeMap<EventId, Vec<SupervisorId>>,
}

impl Candidate {
    pub fn new(genes: BTreeMap<EventId, Vec<SupervisorId>>) -> Self {
        Self { genes }
    }

    pub fn get(&self, event_id: EventId) -> Option<&[SupervisorId]> {
        self.genes.get(&event_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventId, &[SupervisorId])> {
        self.genes.iter().map(|(id, assigned)| (*id, assigned.as_slice()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EventId, &mut Vec<SupervisorId>)> {
        self.genes.iter_mut().map(|(id, assigned)| (*id, assigned))
    }

    pub fn event_ids(&self) -> impl Iterator<Item = EventId> + '_ {
        self.genes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn insert(&mut self, event_id: EventId, assigned: Vec<SupervisorId>) {
        self.genes.insert(event_id, assigned);
    }

    pub fn into_assignments(self) -> BTreeMap<EventId, Vec<SupervisorId>> {
        self.genes
    }
}

impl From<BTreeMap<EventId, Vec<SupervisorId>>> for Candidate {
    fn from(genes: BTreeMap<EventId, Vec<SupervisorId>>) -> Self {
        Self::new(genes)
    }
}

/// Builds `population_size` random candidates. Each event gets exactly its
/// required count drawn from the available supervisors, or every available
/// supervisor when there are not enough of them.
pub fn create_initial_population<R: Rng + ?Sized>(
    problem: &Problem,
    population_size: usize,
    rng: &mut R,
) -> Vec<Candidate> {
    let eligible: Vec<(EventId, usize, Vec<&Supervisor>)> = problem
        .events()
        .iter()
        .map(|event| {
            (
                event.id,
                event.required_supervisors as usize,
                problem.available_for(event).collect(),
            )
        })
        .collect();

    (0..population_size)
        .map(|_| {
            let mut candidate = Candidate::default();
            for (event_id, required, available) in &eligible {
                let assigned = if available.len() >= *required {
                    available
                        .choose_multiple(rng, *required)
                        .map(|s| s.id)
                        .collect()
                } else {
                    available.iter().map(|s| s.id).collect()
                };
                candidate.insert(*event_id, assigned);
            }
            candidate
        })
        .collect()
}
