//! The generational loop: score, select, breed, replace.
//!
//! Each generation depends on the full ranking of the previous one, so the
//! loop is strictly sequential. Scoring inside a generation fans out across
//! threads (see [`evaluate_population`]). Breeding stays on the caller's RNG
//! so seeded runs replay exactly.

use log::{info, trace};
use rand::Rng;
use rand::seq::index;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::chromosome::{Candidate, create_initial_population};
use crate::config::GaConfig;
use crate::data::GenerationStats;
use crate::error::SolverError;
use crate::fitness::evaluate_population;
use crate::operators::{crossover, mutate, rank_by_fitness, select_parents};
use crate::problem::Problem;

/// Receives one report per generation. Reports never feed back into the search.
pub trait ProgressSink {
    fn record(&mut self, stats: &GenerationStats);
}

/// Writes progress to the `log` facade at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn record(&mut self, stats: &GenerationStats) {
        trace!(
            "Generation {}: best fitness = {:.3}, mean fitness = {:.3}",
            stats.generation, stats.best_fitness, stats.mean_fitness
        );
    }
}

impl ProgressSink for Vec<GenerationStats> {
    fn record(&mut self, stats: &GenerationStats) {
        self.push(*stats);
    }
}

impl ProgressSink for () {
    fn record(&mut self, _stats: &GenerationStats) {}
}

/// Forwards every report to two sinks.
pub struct Tee<'a, A: ProgressSink + ?Sized, B: ProgressSink + ?Sized>(pub &'a mut A, pub &'a mut B);

impl<A: ProgressSink + ?Sized, B: ProgressSink + ?Sized> ProgressSink for Tee<'_, A, B> {
    fn record(&mut self, stats: &GenerationStats) {
        self.0.record(stats);
        self.1.record(stats);
    }
}

/// Where the loop stands between two generations.
#[derive(Debug, Clone)]
pub struct EvolutionState {
    pub generation: usize,
    pub population: Vec<Candidate>,
    /// Best candidate scored so far, with its fitness.
    pub best: Option<(Candidate, f64)>,
}

/// Result of a finished (or cancelled) run.
#[derive(Debug, Clone)]
pub struct Evolution {
    pub best: Candidate,
    pub fitness: f64,
    pub best_seen_fitness: f64,
    pub generations_run: usize,
}

fn empty_population() -> SolverError {
    SolverError::InvalidConfig("evolution state has an empty population".to_string())
}

pub struct GeneticAlgorithm<'a> {
    problem: &'a Problem,
    config: GaConfig,
}

impl<'a> GeneticAlgorithm<'a> {
    pub fn new(problem: &'a Problem, config: GaConfig) -> Result<Self, SolverError> {
        config.validate()?;
        Ok(Self { problem, config })
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    pub fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> EvolutionState {
        EvolutionState {
            generation: 0,
            population: create_initial_population(self.problem, self.config.population_size, rng),
            best: None,
        }
    }

    /// Runs one generation and replaces `state.population` with its offspring.
    pub fn step<R: Rng + ?Sized>(
        &self,
        state: &mut EvolutionState,
        rng: &mut R,
        sink: &mut dyn ProgressSink,
    ) -> Result<GenerationStats, SolverError> {
        let population_size = self.config.population_size;
        let elite_size = self.config.elite_size;

        let scores = evaluate_population(&state.population, self.problem)?;
        let ranked = rank_by_fitness(&scores);
        let Some(&leader) = ranked.first() else {
            return Err(empty_population());
        };
        let stats = GenerationStats {
            generation: state.generation,
            best_fitness: scores[leader],
            mean_fitness: scores.iter().sum::<f64>() / scores.len() as f64,
        };
        if state.best.as_ref().is_none_or(|(_, best)| scores[leader] > *best) {
            state.best = Some((state.population[leader].clone(), scores[leader]));
        }

        let parents = select_parents(&scores, elite_size, population_size, rng);

        let mut next = Vec::with_capacity(population_size);
        next.extend(
            ranked
                .iter()
                .take(elite_size)
                .map(|&i| state.population[i].clone()),
        );
        while next.len() < population_size {
            let pair = index::sample(rng, parents.len(), 2);
            let parent_a = &state.population[parents[pair.index(0)]];
            let parent_b = &state.population[parents[pair.index(1)]];
            let mut child = crossover(parent_a, parent_b, rng)?;
            mutate(&mut child, self.problem, self.config.mutation_rate, rng)?;
            next.push(child);
        }

        state.population = next;
        state.generation += 1;
        sink.record(&stats);
        Ok(stats)
    }

    /// Scores the final population and hands out its best candidate.
    pub fn finish(&self, state: EvolutionState) -> Result<Evolution, SolverError> {
        let scores = evaluate_population(&state.population, self.problem)?;
        let Some(&winner) = rank_by_fitness(&scores).first() else {
            return Err(empty_population());
        };
        let fitness = scores[winner];
        let best_seen_fitness = state
            .best
            .as_ref()
            .map_or(fitness, |(_, best)| best.max(fitness));
        let mut population = state.population;
        Ok(Evolution {
            best: population.swap_remove(winner),
            fitness,
            best_seen_fitness,
            generations_run: state.generation,
        })
    }

    pub fn evolve<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        sink: &mut dyn ProgressSink,
    ) -> Result<Evolution, SolverError> {
        self.evolve_until(rng, sink, &AtomicBool::new(false))
    }

    /// Like [`evolve`](Self::evolve), but stops before the next generation
    /// once `cancel` is set.
    pub fn evolve_until<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        sink: &mut dyn ProgressSink,
        cancel: &AtomicBool,
    ) -> Result<Evolution, SolverError> {
        info!(
            "Evolving {} candidates over {} generations ({} events, {} supervisors)...",
            self.config.population_size,
            self.config.generations,
            self.problem.events().len(),
            self.problem.supervisors().len()
        );

        let mut state = self.initial_state(rng);
        while state.generation < self.config.generations {
            if cancel.load(Ordering::Relaxed) {
                info!("Evolution cancelled after {} generations.", state.generation);
                break;
            }
            self.step(&mut state, rng, sink)?;
        }

        let evolution = self.finish(state)?;
        info!(
            "Evolution finished after {} generations with best fitness {:.3}.",
            evolution.generations_run, evolution.fitness
        );
        Ok(evolution)
    }
}
