//! Interactive drawing sessions over the geomark entity graph.
//!
//! Translates a pointer-event workflow — click to place, move to
//! preview, double-click or explicit finish to commit — into graph
//! operations. One draft (line, circle, or polygon) can be active at a
//! time; cancelling a draft leaves the graph exactly as it was before
//! the draft began.

mod session;
mod throttle;

pub use session::{
    CircleSummary, DrawingSession, LineSummary, PolygonSummary, Preview,
};
pub use throttle::PreviewThrottle;

use thiserror::Error;

/// Errors reported by drawing-session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Another draft is already in progress.
    #[error("another draft is already in progress")]
    Busy,

    /// The requested operation needs a draft of a different kind.
    #[error("no active {0} draft")]
    NoActiveDraft(&'static str),

    /// A graph mutation failed.
    #[error(transparent)]
    Graph(#[from] geomark_graph::GraphError),
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// What happens to constraint locks after a segment is committed.
///
/// Both behaviors are useful in practice, so the choice is an explicit
/// policy on the session rather than hard-coded. Locks always reset
/// when a new line begins, regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockPolicy {
    /// Keep the locks armed so consecutive segments repeat the same
    /// distance/azimuth (useful for traverse-style surveys).
    #[default]
    KeepAcrossSegments,
    /// Clear the locks after every committed segment.
    ResetAfterSegment,
}
