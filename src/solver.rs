use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;

use crate::chromosome::Candidate;
use crate::data::{EvaluateOutput, EvaluateRequest, Event, GenerationStats, SolveOutput, SolveRequest};
use crate::engine::{GeneticAlgorithm, LogProgress, Tee};
use crate::error::SolverError;
use crate::fitness::{fitness, unmet_constraints};
use crate::problem::Problem;

/// Assigns supervisors to events with the genetic algorithm.
pub fn solve(input: &SolveRequest) -> Result<SolveOutput, SolverError> {
    let start_time = Instant::now();
    let problem = Problem::new(input.supervisors.clone(), input.events.clone())?;
    let ga = GeneticAlgorithm::new(&problem, input.config.clone())?;

    let mut rng = match input.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut history: Vec<GenerationStats> = Vec::with_capacity(input.config.generations);
    let mut log_progress = LogProgress;
    let evolution = ga.evolve(&mut rng, &mut Tee(&mut history, &mut log_progress))?;
    info!(
        "Solution with fitness {:.3} found in {:.2?}",
        evolution.fitness,
        start_time.elapsed()
    );

    let unmet_constraints = unmet_constraints(&evolution.best, &problem)?;
    let events = apply_solution(&input.events, &evolution.best);

    Ok(SolveOutput {
        assignments: evolution.best.into_assignments(),
        fitness: evolution.fitness,
        unmet_constraints,
        history,
        events,
    })
}

/// Scores a caller-supplied assignment.
pub fn evaluate(input: &EvaluateRequest) -> Result<EvaluateOutput, SolverError> {
    let problem = Problem::new(input.supervisors.clone(), input.events.clone())?;
    let candidate = Candidate::new(input.assignments.clone());
    problem.check_candidate(&candidate)?;
    Ok(EvaluateOutput {
        fitness: fitness(&candidate, &problem)?,
        unmet_constraints: unmet_constraints(&candidate, &problem)?,
    })
}

/// Copies `events`, replacing each assignment the candidate covers.
pub fn apply_solution(events: &[Event], candidate: &Candidate) -> Vec<Event> {
    events
        .iter()
        .map(|event| {
            let mut merged = event.clone();
            if let Some(assigned) = candidate.get(event.id) {
                merged.assigned_supervisors = assigned.to_vec();
            }
            merged
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GaConfig;
    use crate::problem::fixtures::{event, supervisor};
    use std::collections::BTreeMap;

    fn request(seed: Option<u64>) -> SolveRequest {
        SolveRequest {
            supervisors: vec![supervisor(1, 1), supervisor(2, 2), supervisor(3, 2)],
            events: vec![event(10, 4, 2), event(11, 5, 1), event(12, 11, 2)],
            config: GaConfig {
                population_size: 20,
                generations: 30,
                ..GaConfig::default()
            },
            seed,
        }
    }

    #[test]
    fn test_solve_covers_every_event() {
        let output = solve(&request(Some(8))).unwrap();
        assert_eq!(output.assignments.keys().copied().collect::<Vec<_>>(), vec![10, 11, 12]);
        assert_eq!(output.history.len(), 30);
        assert_eq!(output.events.len(), 3);
        for merged in &output.events {
            assert_eq!(merged.assigned_supervisors, output.assignments[&merged.id]);
        }
    }

    #[test]
    fn test_solve_is_reproducible_with_seed() {
        let first = solve(&request(Some(123))).unwrap();
        let second = solve(&request(Some(123))).unwrap();
        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.fitness, second.fitness);
    }

    #[test]
    fn test_solve_without_seed_runs() {
        let output = solve(&request(None)).unwrap();
        assert_eq!(output.assignments.len(), 3);
    }

    #[test]
    fn test_solve_rejects_bad_config() {
        let mut bad = request(Some(1));
        bad.config.mutation_rate = -0.5;
        assert!(matches!(solve(&bad), Err(SolverError::InvalidConfig(_))));
    }

    #[test]
    fn test_solve_empty_events() {
        let mut empty = request(Some(1));
        empty.events.clear();
        let output = solve(&empty).unwrap();
        assert!(output.assignments.is_empty());
        assert_eq!(output.fitness, 0.0);
        assert!(output.unmet_constraints.is_empty());
    }

    #[test]
    fn test_evaluate_reports_violations() {
        let input = EvaluateRequest {
            supervisors: vec![supervisor(1, 1), supervisor(2, 1)],
            events: vec![event(10, 4, 2), event(11, 5, 1)],
            assignments: BTreeMap::from([(10, vec![1]), (11, vec![1])]),
        };
        let output = evaluate(&input).unwrap();
        // shortfall 1, overrun 1, totals [2, 0]
        assert_eq!(output.fitness, -100.0 - 50.0 - 20.0);
        assert_eq!(output.unmet_constraints.len(), 2);
    }

    #[test]
    fn test_evaluate_rejects_unknown_event() {
        let input = EvaluateRequest {
            supervisors: vec![supervisor(1, 1)],
            events: vec![event(10, 4, 1)],
            assignments: BTreeMap::from([(77, vec![1])]),
        };
        assert_eq!(evaluate(&input).unwrap_err(), SolverError::UnknownEvent(77));
    }

    #[test]
    fn test_evaluate_rejects_incomplete_or_repeated_assignments() {
        let input = |assignments: BTreeMap<u32, Vec<u32>>| EvaluateRequest {
            supervisors: vec![supervisor(1, 5), supervisor(2, 5)],
            events: vec![event(10, 4, 1), event(11, 5, 1)],
            assignments,
        };

        let missing = input(BTreeMap::from([(10, vec![1])]));
        assert_eq!(evaluate(&missing).unwrap_err(), SolverError::MissingEvent(11));

        let repeated = input(BTreeMap::from([(10, vec![1, 1]), (11, vec![2])]));
        assert_eq!(
            evaluate(&repeated).unwrap_err(),
            SolverError::DuplicateAssignment {
                event_id: 10,
                supervisor_id: 1,
            }
        );

        let valid = input(BTreeMap::from([(10, vec![1]), (11, vec![2])]));
        assert_eq!(evaluate(&valid).unwrap().fitness, 0.0);
    }

    #[test]
    fn test_apply_solution_leaves_uncovered_events() {
        let mut committed = event(11, 5, 1);
        committed.assigned_supervisors = vec![9];
        let events = vec![event(10, 4, 1), committed];
        let candidate = Candidate::new(BTreeMap::from([(10, vec![3])]));
        let merged = apply_solution(&events, &candidate);
        assert_eq!(merged[0].assigned_supervisors, vec![3]);
        assert_eq!(merged[1].assigned_supervisors, vec![9]);
    }
}
