use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::GaConfig;

// Type aliases for clarity
pub type SupervisorId = u32;
pub type EventId = u32;
pub type IsoWeek = u32;

/// A person who can supervise events, bounded by a per-week capacity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Supervisor {
    pub id: SupervisorId,
    pub weekly_capacity: u32,
}

/// An event (exam) that needs a number of supervisors.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    pub required_supervisors: u32,
    /// Assignments already committed outside of any optimization run.
    #[serde(default)]
    pub assigned_supervisors: Vec<SupervisorId>,
}

impl Event {
    /// ISO week number of the event date. The ISO year is not part of it.
    pub fn week(&self) -> IsoWeek {
        self.date.iso_week().week()
    }
}

/// The complete input for one optimization run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub supervisors: Vec<Supervisor>,
    pub events: Vec<Event>,
    #[serde(default)]
    pub config: GaConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Scores a caller-supplied assignment without running the optimizer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub supervisors: Vec<Supervisor>,
    pub events: Vec<Event>,
    pub assignments: BTreeMap<EventId, Vec<SupervisorId>>,
}

/// Describes a constraint that the returned assignment violates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmetConstraint {
    pub constraint_type: String,
    pub description: String,
}

impl fmt::Display for UnmetConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.constraint_type, self.description)
    }
}

/// Fitness summary reported once per generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

/// The final output of the solver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveOutput {
    pub assignments: BTreeMap<EventId, Vec<SupervisorId>>,
    pub fitness: f64,
    pub unmet_constraints: Vec<UnmetConstraint>,
    pub history: Vec<GenerationStats>,
    /// Input events with the winning assignment merged in.
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateOutput {
    pub fitness: f64,
    pub unmet_constraints: Vec<UnmetConstraint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserializes_with_defaults() {
        let json = r#"{"id": 7, "date": "2024-03-04T09:00:00", "requiredSupervisors": 2}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, 7);
        assert_eq!(event.required_supervisors, 2);
        assert!(event.assigned_supervisors.is_empty());
        assert!(event.name.is_none());
    }

    #[test]
    fn test_event_week_is_iso_week() {
        let json = r#"{"id": 1, "date": "2024-12-30T09:00:00", "requiredSupervisors": 1}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        // 2024-12-30 falls in ISO week 1 of 2025
        assert_eq!(event.week(), 1);
    }

    #[test]
    fn test_solve_request_defaults_config() {
        let json = r#"{"supervisors": [{"id": 1, "weeklyCapacity": 2}], "events": []}"#;
        let request: SolveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.config, GaConfig::default());
        assert!(request.seed.is_none());
    }

    #[test]
    fn test_unmet_constraint_display() {
        let unmet = UnmetConstraint {
            constraint_type: "Shortfall".to_string(),
            description: "Event 3 needs 2 more supervisors.".to_string(),
        };
        assert_eq!(unmet.to_string(), "[Shortfall] Event 3 needs 2 more supervisors.");
    }
}
