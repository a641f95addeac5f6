//! Correlation types for request tracking and call budgets
//!
//! These types let one coordinator invocation be correlated across the
//! three backing stores, and carry the caller-supplied deadline that
//! bounds each per-store call.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Unique identifier for a single request or operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trace identifier for distributed tracing across service boundaries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(String);

impl TraceId {
    /// Generate a new random TraceId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied cutoff instant for a multi-store operation
///
/// The coordinator checks the deadline before each per-store call. The
/// synchronous store clients cannot be interrupted mid-call, so an
/// elapsed deadline fails the *next* call rather than the one in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    /// Deadline a fixed budget from now
    pub fn after(budget: Duration) -> Self {
        Self(Instant::now() + budget)
    }

    /// Deadline at an absolute instant
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Whether the deadline has passed
    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.0
    }

    /// Time left before the deadline (zero once elapsed)
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }
}

/// Per-invocation context handed to every coordinator operation
///
/// Carries the correlation ids for structured logging and the optional
/// deadline bounding each per-store call.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique id for this invocation
    pub request_id: RequestId,

    /// Optional trace id propagated from the calling layer
    pub trace_id: Option<TraceId>,

    /// Optional cutoff for per-store calls
    pub deadline: Option<Deadline>,
}

impl RequestContext {
    /// Create a fresh context with a generated RequestId and no deadline
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            trace_id: None,
            deadline: None,
        }
    }

    /// Create a context with an existing RequestId
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            trace_id: None,
            deadline: None,
        }
    }

    /// Add a TraceId to the context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add a deadline to the context
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Whether the context's deadline (if any) has passed
    pub fn deadline_elapsed(&self) -> bool {
        self.deadline.map(|d| d.is_elapsed()).unwrap_or(false)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();

        // Should generate different IDs
        assert_ne!(id1, id2);

        // Should be non-empty strings
        assert!(!id1.as_str().is_empty());
        assert!(!id2.as_str().is_empty());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        let display_str = format!("{}", id);
        assert_eq!(display_str, id.as_str());
    }

    #[test]
    fn test_trace_id_generation() {
        let id1 = TraceId::new();
        let id2 = TraceId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_request_context_creation() {
        let ctx = RequestContext::new();
        assert!(!ctx.request_id.as_str().is_empty());
        assert!(ctx.trace_id.is_none());
        assert!(ctx.deadline.is_none());
        assert!(!ctx.deadline_elapsed());
    }

    #[test]
    fn test_request_context_with_trace_id() {
        let trace_id = TraceId::new();
        let ctx = RequestContext::new().with_trace_id(trace_id.clone());

        assert!(ctx.trace_id.is_some());
        assert_eq!(ctx.trace_id.unwrap(), trace_id);
    }

    #[test]
    fn test_deadline_not_elapsed_with_budget() {
        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(!deadline.is_elapsed());
        assert!(deadline.remaining() > Duration::ZERO);
    }

    #[test]
    fn test_deadline_elapsed_when_in_past() {
        let deadline = Deadline::at(Instant::now());
        // An at-now deadline is already elapsed by the time we check
        assert!(deadline.is_elapsed());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_context_deadline_elapsed() {
        let ctx = RequestContext::new().with_deadline(Deadline::at(Instant::now()));
        assert!(ctx.deadline_elapsed());
    }

    #[test]
    fn test_serialization() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
