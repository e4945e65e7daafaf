//! Structured descriptions of what an edit touched.

use crate::entity::{CircleId, LineId, PointId, PolygonId};

/// One structure modified or destroyed by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphChange {
    /// A point's position changed.
    PointMoved(PointId),
    /// A point was removed from the arena.
    PointRemoved(PointId),
    /// A line's vertices, segments, or total changed.
    LineUpdated(LineId),
    /// A line was destroyed.
    LineRemoved(LineId),
    /// A circle's center moved or its radius changed.
    CircleUpdated(CircleId),
    /// A circle was destroyed.
    CircleRemoved(CircleId),
    /// A polygon's vertices or derived metrics changed.
    PolygonUpdated(PolygonId),
    /// A polygon was destroyed.
    PolygonRemoved(PolygonId),
}

/// Everything a single move or delete touched, in the order it happened.
///
/// The UI layer consumes this to refresh exactly the affected markers,
/// polylines, and labels; the kernel itself never touches rendering.
#[derive(Debug, Clone, Default)]
pub struct EditReport {
    /// The individual changes, oldest first.
    pub changes: Vec<GraphChange>,
}

impl EditReport {
    pub(crate) fn record(&mut self, change: GraphChange) {
        self.changes.push(change);
    }

    /// True if the edit touched nothing.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Ids of points removed by this edit.
    pub fn removed_points(&self) -> impl Iterator<Item = PointId> + '_ {
        self.changes.iter().filter_map(|c| match c {
            GraphChange::PointRemoved(id) => Some(*id),
            _ => None,
        })
    }
}
