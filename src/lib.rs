//! Assigns exam supervisors to events under weekly capacity limits using a
//! genetic algorithm, plus a small HTTP front end.

pub mod availability;
pub mod chromosome;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod fitness;
pub mod operators;
pub mod problem;
pub mod server;
pub mod solver;

pub use chromosome::Candidate;
pub use config::{GaConfig, ServerConfig};
pub use engine::{Evolution, GeneticAlgorithm, ProgressSink};
pub use error::SolverError;
pub use problem::Problem;
pub use solver::{apply_solution, evaluate, solve};
