use crate::data::{EventId, SupervisorId};

/// Contract violations that abort a run. Under-assignment and empty
/// inputs are scored, never raised.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown event: {0}")]
    UnknownEvent(EventId),
    #[error("Unknown supervisor: {0}")]
    UnknownSupervisor(SupervisorId),
    #[error("Duplicate event id: {0}")]
    DuplicateEvent(EventId),
    #[error("Duplicate supervisor id: {0}")]
    DuplicateSupervisor(SupervisorId),
    #[error("Event {0} is missing from the assignment")]
    MissingEvent(EventId),
    #[error("Supervisor {supervisor_id} is assigned to event {event_id} more than once")]
    DuplicateAssignment {
        event_id: EventId,
        supervisor_id: SupervisorId,
    },
}
