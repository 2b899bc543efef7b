//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from network and I/O errors, which each client module owns.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Itinerary has no segments left after dropping empty walks
    #[error("itinerary must have at least one segment")]
    EmptyItinerary,

    /// Preference string is not one of time, cost, switches
    #[error("unknown preference: {0}")]
    UnknownPreference(String),
}
