use serde::{Deserialize, Serialize};
use std::env;

use crate::error::SolverError;

pub const BIND_ADDR_ENV: &str = "SUPERVISION_SOLVER_ADDR";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Tuning knobs for one genetic algorithm run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GaConfig {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub elite_size: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            elite_size: 5,
        }
    }
}

impl GaConfig {
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.population_size == 0 {
            return Err(SolverError::InvalidConfig(
                "population size must be positive".to_string(),
            ));
        }
        if self.generations == 0 {
            return Err(SolverError::InvalidConfig(
                "generation count must be positive".to_string(),
            ));
        }
        if !self.mutation_rate.is_finite() || !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SolverError::InvalidConfig(format!(
                "mutation rate {} is outside [0, 1]",
                self.mutation_rate
            )));
        }
        if self.elite_size > self.population_size {
            return Err(SolverError::InvalidConfig(format!(
                "elite size {} exceeds population size {}",
                self.elite_size, self.population_size
            )));
        }
        // offspring need two distinct parents
        if self.elite_size < self.population_size && self.population_size < 2 {
            return Err(SolverError::InvalidConfig(
                "population size must be at least 2 when offspring are bred".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for the HTTP front end.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let bind_addr = env::var(BIND_ADDR_ENV).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        Self { bind_addr }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}
