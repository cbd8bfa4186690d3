//! Fitness model: constraint penalties plus a workload-balance penalty.
//!
//! Higher is better. A candidate with every event fully staffed, no weekly
//! overrun and a perfectly even workload scores `0`.

use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::chromosome::Candidate;
use crate::data::{IsoWeek, UnmetConstraint};
use crate::error::SolverError;
use crate::problem::Problem;

pub const SHORTFALL_PENALTY: f64 = 100.0;
pub const OVER_CAPACITY_PENALTY: f64 = 50.0;
pub const IMBALANCE_PENALTY: f64 = 20.0;

/// Per-supervisor assignment counts, indexed like `Problem::supervisors()`.
struct Workload {
    totals: Vec<u32>,
    weekly: BTreeMap<(usize, IsoWeek), u32>,
    shortfalls: Vec<(u32, u32, u32)>,
}

fn tally(candidate: &Candidate, problem: &Problem) -> Result<Workload, SolverError> {
    let mut totals = vec![0u32; problem.supervisors().len()];
    let mut weekly = BTreeMap::new();
    let mut shortfalls = Vec::new();

    for (event_id, assigned) in candidate.iter() {
        let event = problem.event(event_id)?;
        let week = event.week();
        let count = assigned.len() as u32;
        if count < event.required_supervisors {
            shortfalls.push((event_id, event.required_supervisors, count));
        }
        for supervisor_id in assigned {
            let position = problem.supervisor_position(*supervisor_id)?;
            totals[position] += 1;
            *weekly.entry((position, week)).or_insert(0) += 1;
        }
    }

    Ok(Workload {
        totals,
        weekly,
        shortfalls,
    })
}

/// Scores one candidate. Fails fast if it references an event or a
/// supervisor outside the problem.
pub fn fitness(candidate: &Candidate, problem: &Problem) -> Result<f64, SolverError> {
    let workload = tally(candidate, problem)?;
    let mut score = 0.0;

    for (_, required, assigned) in &workload.shortfalls {
        score -= SHORTFALL_PENALTY * f64::from(required - assigned);
    }

    let supervisors = problem.supervisors();
    for (&(position, _), &count) in &workload.weekly {
        let capacity = supervisors[position].weekly_capacity;
        if count > capacity {
            score -= OVER_CAPACITY_PENALTY * f64::from(count - capacity);
        }
    }

    let totals: Vec<f64> = workload.totals.iter().map(|&t| f64::from(t)).collect();
    score -= IMBALANCE_PENALTY * population_std_dev(&totals);

    Ok(score)
}

/// Scores the whole population in parallel. Results keep population order.
pub fn evaluate_population(population: &[Candidate], problem: &Problem) -> Result<Vec<f64>, SolverError> {
    population
        .par_iter()
        .map(|candidate| fitness(candidate, problem))
        .collect()
}

/// Population (not sample) standard deviation; `0` for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Lists the shortfalls and weekly overruns in a candidate.
pub fn unmet_constraints(
    candidate: &Candidate,
    problem: &Problem,
) -> Result<Vec<UnmetConstraint>, SolverError> {
    let workload = tally(candidate, problem)?;
    let mut unmet = Vec::new();

    for (event_id, required, assigned) in &workload.shortfalls {
        unmet.push(UnmetConstraint {
            constraint_type: "Supervisor Shortfall".to_string(),
            description: format!(
                "Event {} needs {} supervisors but only {} are assigned.",
                event_id, required, assigned
            ),
        });
    }

    let supervisors = problem.supervisors();
    for (&(position, week), &count) in &workload.weekly {
        let supervisor = &supervisors[position];
        if count > supervisor.weekly_capacity {
            unmet.push(UnmetConstraint {
                constraint_type: "Weekly Capacity".to_string(),
                description: format!(
                    "Supervisor {} has {}/{} supervisions in week {}.",
                    supervisor.id, count, supervisor.weekly_capacity, week
                ),
            });
        }
    }

    Ok(unmet)
}
