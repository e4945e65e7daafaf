//! Entity graph for the geomark measurement kernel.
//!
//! Owns the canonical data model — points, multi-segment lines, circles,
//! polygons, and imported boundaries — and keeps every derived quantity
//! (segment distances and azimuths, running totals, areas, perimeters)
//! consistent as points are created, moved, or deleted.
//!
//! Points live in a slotmap arena; structures reference them by id so a
//! position has exactly one point of truth. Every point is either
//! standalone or owned by exactly one structure, and the graph rejects
//! any mutation that would violate that.

mod entity;
mod error;
mod graph;
mod propagate;
mod report;
pub mod snapshot;

pub use entity::{
    Boundary, BoundaryId, Circle, CircleId, Line, LineId, Ownership, PointId, PointRecord,
    Polygon, PolygonId, Segment, DEFAULT_POINT_COLOR,
};
pub use error::{GraphError, Result};
pub use graph::EntityGraph;
pub use report::{EditReport, GraphChange};
