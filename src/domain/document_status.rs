use std::fmt;
use std::str::FromStr;

/// Lifecycle of a processed document entity.
///
/// Transitions only move forward: `Pending → Processing → {Completed |
/// Failed}`. A worker may re-enter `Processing` on a redelivered job, but a
/// terminal status is never overwritten with an earlier one; only an explicit
/// user-initiated re-enqueue (outside the worker) resets an entity to
/// `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "PENDING",
            DocumentStatus::Processing => "PROCESSING",
            DocumentStatus::Completed => "COMPLETED",
            DocumentStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::Failed)
    }

    /// Whether a worker-driven transition to `next` is allowed.
    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        match self {
            DocumentStatus::Pending => matches!(next, DocumentStatus::Processing),
            DocumentStatus::Processing => matches!(
                next,
                DocumentStatus::Processing | DocumentStatus::Completed | DocumentStatus::Failed
            ),
            // Terminal states can be rewritten with a terminal state (idempotent
            // full-replace under redelivery) but never regressed.
            DocumentStatus::Completed | DocumentStatus::Failed => next.is_terminal(),
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(DocumentStatus::Pending),
            "PROCESSING" => Ok(DocumentStatus::Processing),
            "COMPLETED" => Ok(DocumentStatus::Completed),
            "FAILED" => Ok(DocumentStatus::Failed),
            _ => Err(format!("Invalid document status: {}", s)),
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
