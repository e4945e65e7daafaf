//! Snapshot document: a serde representation of the whole graph.
//!
//! The document stores geometry by value (positions, radii) plus the
//! derived measurements for the benefit of external readers. Restoring
//! rebuilds the graph through its normal operations, so every derived
//! quantity is recomputed rather than trusted from the file — except
//! legacy triangles, which keep their Heron metrics (see
//! [`TriangleDoc`]).

use geomark_geodesy::GeoPoint;
use geomark_shapes::triangle_metrics;
use serde::{Deserialize, Serialize};

use crate::entity::{Ownership, Polygon};
use crate::error::Result;
use crate::graph::EntityGraph;

/// Version string written into new snapshots.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// A standalone point in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointDoc {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Display color.
    #[serde(default)]
    pub color: String,
}

/// Derived measurements of one line segment, as exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentDoc {
    /// Great-circle length in meters.
    pub distance: f64,
    /// Initial azimuth in degrees.
    pub azimuth: f64,
}

/// A finalized multi-segment line in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineDoc {
    /// Ordered vertex positions.
    pub points: Vec<GeoPoint>,
    /// Per-segment measurements (informational; recomputed on restore).
    #[serde(default)]
    pub segments: Vec<SegmentDoc>,
    /// Derived total distance in meters (informational; recomputed on
    /// restore).
    pub total_distance: f64,
}

/// A circle in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleDoc {
    /// Center position.
    pub center: GeoPoint,
    /// Radius in meters.
    pub radius: f64,
}

/// A polygon in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonDoc {
    /// Ordered vertex positions of the closed loop.
    pub points: Vec<GeoPoint>,
    /// Derived area in square meters (informational).
    pub area: f64,
    /// Derived perimeter in meters (informational).
    pub perimeter: f64,
}

/// A legacy triangulation entry from older exports.
///
/// Never written by [`Snapshot::capture`]; accepted on read so old
/// files keep loading. Restored as a three-vertex polygon whose area
/// and perimeter come from Heron's formula on the great-circle side
/// lengths, matching what the exporting tool displayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleDoc {
    /// The three corners.
    pub points: [GeoPoint; 3],
}

/// An imported boundary in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryDoc {
    /// Human-readable label.
    pub label: String,
    /// Ordered closed loop of positions.
    pub points: Vec<GeoPoint>,
}

/// The full persistable state of an [`EntityGraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Document format version.
    pub version: String,
    /// Standalone points.
    pub points: Vec<PointDoc>,
    /// Finalized lines.
    pub lines: Vec<LineDoc>,
    /// Circles.
    pub circles: Vec<CircleDoc>,
    /// Polygons.
    pub polygons: Vec<PolygonDoc>,
    /// Legacy triangulation entries (read-only compatibility).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triangles: Vec<TriangleDoc>,
    /// Imported boundaries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boundaries: Vec<BoundaryDoc>,
}

impl Snapshot {
    /// Capture the current graph state.
    ///
    /// Unfinalized lines are drafts and are deliberately left out:
    /// nothing is persisted until finalize.
    pub fn capture(graph: &EntityGraph) -> Self {
        let points = graph
            .points()
            .filter(|(_, p)| p.owner() == Ownership::Standalone)
            .map(|(_, p)| PointDoc {
                lat: p.position.lat,
                lng: p.position.lng,
                name: p.name.clone(),
                color: p.color.clone(),
            })
            .collect();

        let lines = graph
            .lines()
            .filter(|(_, l)| l.is_finalized())
            .map(|(_, l)| LineDoc {
                points: graph.positions_of(l.points()),
                segments: l
                    .segments()
                    .iter()
                    .map(|s| SegmentDoc {
                        distance: s.distance,
                        azimuth: s.azimuth,
                    })
                    .collect(),
                total_distance: l.total_distance(),
            })
            .collect();

        let circles = graph
            .circles()
            .map(|(_, c)| CircleDoc {
                center: graph.point(c.center()).expect("center exists").position,
                radius: c.radius(),
            })
            .collect();

        let polygons = graph
            .polygons()
            .map(|(_, p)| PolygonDoc {
                points: graph.positions_of(p.points()),
                area: p.area(),
                perimeter: p.perimeter(),
            })
            .collect();

        let boundaries = graph
            .boundaries()
            .map(|(_, b)| BoundaryDoc {
                label: b.label.clone(),
                points: b.points.clone(),
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION.to_string(),
            points,
            lines,
            circles,
            polygons,
            triangles: Vec::new(),
            boundaries,
        }
    }

    /// Rebuild a graph from this document.
    ///
    /// Goes through the graph's normal creation operations, so every
    /// structural invariant is re-enforced and every derived quantity
    /// recomputed from the stored positions.
    pub fn restore(&self) -> Result<EntityGraph> {
        let mut graph = EntityGraph::new();

        for doc in &self.points {
            let id = graph.create_point(GeoPoint::new(doc.lat, doc.lng), doc.name.clone());
            if !doc.color.is_empty() {
                graph.recolor_point(id, doc.color.clone())?;
            }
        }

        for doc in &self.lines {
            if doc.points.len() < crate::graph::MIN_LINE_VERTICES {
                return Err(crate::GraphError::InsufficientVertices {
                    needed: crate::graph::MIN_LINE_VERTICES,
                    got: doc.points.len(),
                });
            }
            let ids: Vec<_> = doc.points.iter().map(|&p| graph.create_point(p, "")).collect();
            let line = graph.create_line(ids[0])?;
            for &id in &ids[1..] {
                graph.commit_segment(line, id)?;
            }
            graph.finalize_line(line)?;
        }

        for doc in &self.circles {
            let center = graph.create_point(doc.center, "");
            graph.create_circle(center, doc.radius)?;
        }

        for doc in &self.polygons {
            let ids: Vec<_> = doc.points.iter().map(|&p| graph.create_point(p, "")).collect();
            graph.finalize_polygon(&ids)?;
        }

        for doc in &self.triangles {
            let ids: Vec<_> = doc.points.iter().map(|&p| graph.create_point(p, "")).collect();
            let metrics = triangle_metrics(doc.points[0], doc.points[1], doc.points[2]);
            // Legacy metrics are preserved as exported, bypassing the
            // shoelace path used for new polygons.
            let polygon = graph.polygons.insert(Polygon {
                points: ids.clone(),
                area: metrics.area,
                perimeter: metrics.perimeter,
            });
            for id in ids {
                graph.points[id].owner = Ownership::Polygon(polygon);
            }
        }

        for doc in &self.boundaries {
            graph.create_boundary(doc.label.clone(), doc.points.clone())?;
        }

        Ok(graph)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
