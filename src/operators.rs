//! Selection, recombination and mutation.

use log::debug;
use rand::Rng;
use rand::seq::{IndexedRandom, index};

use crate::chromosome::Candidate;
use crate::data::SupervisorId;
use crate::error::SolverError;
use crate::problem::Problem;

pub const TOURNAMENT_SIZE: usize = 3;

/// Population indices ordered best first. Equal scores keep the lower index first.
pub fn rank_by_fitness(scores: &[f64]) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..scores.len()).collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    ranked
}

/// Draws up to `TOURNAMENT_SIZE` distinct indices and returns the fittest.
///
/// Populations smaller than the tournament hold one with everybody.
pub fn tournament<R: Rng + ?Sized>(scores: &[f64], rng: &mut R) -> usize {
    let size = TOURNAMENT_SIZE.min(scores.len());
    let mut winner: Option<usize> = None;
    for contender in index::sample(rng, scores.len(), size).into_iter() {
        winner = match winner {
            Some(current)
                if scores[current] > scores[contender]
                    || (scores[current] == scores[contender] && current < contender) =>
            {
                Some(current)
            }
            _ => Some(contender),
        };
    }
    // size is at least 1 for a non-empty population
    winner.unwrap_or(0)
}

/// Picks `parent_count` parent indices: the `elite_size` best first, the rest
/// by tournament. Indices may repeat.
pub fn select_parents<R: Rng + ?Sized>(
    scores: &[f64],
    elite_size: usize,
    parent_count: usize,
    rng: &mut R,
) -> Vec<usize> {
    if scores.is_empty() {
        return Vec::new();
    }
    let mut parents: Vec<usize> = rank_by_fitness(scores)
        .into_iter()
        .take(elite_size.min(parent_count))
        .collect();
    while parents.len() < parent_count {
        parents.push(tournament(scores, rng));
    }
    debug!(
        "Selected {} parents ({} elite, {} by tournament).",
        parents.len(),
        elite_size.min(parent_count),
        parent_count.saturating_sub(elite_size)
    );
    parents
}

/// Uniform crossover: each event's list comes whole from one parent, with
/// equal odds.
pub fn crossover<R: Rng + ?Sized>(
    parent_a: &Candidate,
    parent_b: &Candidate,
    rng: &mut R,
) -> Result<Candidate, SolverError> {
    let mut child = Candidate::default();
    for (event_id, from_a) in parent_a.iter() {
        let assigned = if rng.random_bool(0.5) {
            from_a
        } else {
            parent_b
                .get(event_id)
                .ok_or(SolverError::UnknownEvent(event_id))?
        };
        child.insert(event_id, assigned.to_vec());
    }
    Ok(child)
}

/// Per event, with probability `mutation_rate`: drop one assigned supervisor
/// or add one who is not yet on the event and still available in the
/// committed schedule. An empty list always takes the add branch.
pub fn mutate<R: Rng + ?Sized>(
    candidate: &mut Candidate,
    problem: &Problem,
    mutation_rate: f64,
    rng: &mut R,
) -> Result<(), SolverError> {
    for (event_id, assigned) in candidate.iter_mut() {
        if !rng.random_bool(mutation_rate) {
            continue;
        }
        let event = problem.event(event_id)?;

        if rng.random_bool(0.5) && !assigned.is_empty() {
            let victim = rng.random_range(0..assigned.len());
            assigned.remove(victim);
        } else {
            let eligible: Vec<SupervisorId> = problem
                .available_for(event)
                .map(|s| s.id)
                .filter(|id| !assigned.contains(id))
                .collect();
            if let Some(&recruit) = eligible.choose(rng) {
                assigned.push(recruit);
            }
        }
    }
    Ok(())
}
