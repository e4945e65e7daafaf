#![warn(missing_docs)]

//! Geodesic measurement kernel facade for interactive map tooling.
//!
//! Re-exports the whole kernel stack and adds the one integration this
//! workspace treats as external: folding an isochrone boundary computed
//! by a remote provider into the entity graph as a read-only entity.
//!
//! # Example
//!
//! ```
//! use geomark::{DrawingSession, GeoPoint};
//!
//! let mut session = DrawingSession::new();
//! let paris = GeoPoint::new(48.8566, 2.3522);
//! session.begin_line(paris).unwrap();
//! session.commit_vertex(GeoPoint::new(48.8606, 2.3376)).unwrap();
//! let summary = session.finish_line().unwrap();
//! assert!(summary.total_distance > 1000.0);
//! ```

pub use geomark_constraints;
pub use geomark_geodesy;
pub use geomark_graph;
pub use geomark_session;
pub use geomark_shapes;

pub use geomark_constraints::{resolve, ConstraintState};
pub use geomark_geodesy::{
    azimuth, bearing, destination, distance, midpoint, GeoPoint, EARTH_RADIUS_M,
};
pub use geomark_graph::{
    snapshot::Snapshot, Boundary, BoundaryId, Circle, CircleId, EditReport, EntityGraph,
    GraphChange, GraphError, Line, LineId, PointId, PointRecord, Polygon, PolygonId, Segment,
};
pub use geomark_session::{
    CircleSummary, DrawingSession, LineSummary, LockPolicy, PolygonSummary, Preview,
    PreviewThrottle, SessionError,
};
pub use geomark_shapes::{
    circle_area, circle_circumference, polygon_area, polygon_perimeter, triangle_metrics,
    TriangleMetrics,
};

use thiserror::Error;
use tracing::warn;

/// Failures from an external isochrone-boundary provider.
///
/// Kept distinct from [`GraphError`]: a provider failure asks the user
/// to retry, move the origin, or check connectivity, while a graph
/// error points at the local model.
#[derive(Error, Debug)]
pub enum BoundaryError {
    /// The origin lies outside the provider's coverage.
    #[error("origin is outside the provider's coverage")]
    OutOfCoverage,

    /// The request never produced a usable response.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// The provider answered with something that is not a closed boundary.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Parameters of an isochrone-boundary request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryRequest {
    /// Travel-time budget in seconds.
    pub travel_seconds: u32,
}

/// An external service that computes reachability boundaries.
///
/// The kernel never performs the computation itself; cancellation and
/// timeout policy live with the caller driving the provider.
pub trait BoundaryProvider {
    /// Compute the closed boundary reachable from `origin` within the
    /// requested budget, ordered as a loop.
    fn boundary(
        &self,
        origin: GeoPoint,
        request: BoundaryRequest,
    ) -> Result<Vec<GeoPoint>, BoundaryError>;
}

/// Fetch a boundary from `provider` and fold it into the graph.
///
/// The provider result is validated (at least three vertices, finite
/// coordinates) before anything touches the graph; a rejected response
/// surfaces as [`BoundaryError::InvalidResponse`] and leaves the graph
/// unchanged.
pub fn import_boundary(
    graph: &mut EntityGraph,
    provider: &dyn BoundaryProvider,
    origin: GeoPoint,
    request: BoundaryRequest,
    label: impl Into<String>,
) -> Result<BoundaryId, BoundaryError> {
    let points = provider.boundary(origin, request)?;

    if points.len() < 3 {
        warn!(vertices = points.len(), "provider boundary too small");
        return Err(BoundaryError::InvalidResponse(format!(
            "boundary has {} vertices, need at least 3",
            points.len()
        )));
    }
    if let Some(bad) = points
        .iter()
        .find(|p| !p.lat.is_finite() || !p.lng.is_finite())
    {
        return Err(BoundaryError::InvalidResponse(format!(
            "boundary contains non-finite coordinate ({}, {})",
            bad.lat, bad.lng
        )));
    }

    graph
        .create_boundary(label, points)
        .map_err(|e| BoundaryError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(Result<Vec<GeoPoint>, BoundaryError>);

    impl BoundaryProvider for FixedProvider {
        fn boundary(
            &self,
            _origin: GeoPoint,
            _request: BoundaryRequest,
        ) -> Result<Vec<GeoPoint>, BoundaryError> {
            match &self.0 {
                Ok(points) => Ok(points.clone()),
                Err(BoundaryError::OutOfCoverage) => Err(BoundaryError::OutOfCoverage),
                Err(BoundaryError::TransportFailure(m)) => {
                    Err(BoundaryError::TransportFailure(m.clone()))
                }
                Err(BoundaryError::InvalidResponse(m)) => {
                    Err(BoundaryError::InvalidResponse(m.clone()))
                }
            }
        }
    }

    const ORIGIN: GeoPoint = GeoPoint { lat: 48.85, lng: 2.35 };
    const REQUEST: BoundaryRequest = BoundaryRequest {
        travel_seconds: 900,
    };

    fn closed_loop() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(48.86, 2.34),
            GeoPoint::new(48.86, 2.36),
            GeoPoint::new(48.84, 2.36),
            GeoPoint::new(48.84, 2.34),
        ]
    }

    #[test]
    fn test_successful_import_creates_boundary() {
        let mut graph = EntityGraph::new();
        let provider = FixedProvider(Ok(closed_loop()));
        let id = import_boundary(&mut graph, &provider, ORIGIN, REQUEST, "15 min walk").unwrap();

        let boundary = graph.boundary(id).unwrap();
        assert_eq!(boundary.label, "15 min walk");
        assert_eq!(boundary.points.len(), 4);
        assert!(boundary.area() > 0.0);
        // Boundaries own no editable points
        assert_eq!(graph.points().count(), 0);
    }

    #[test]
    fn test_provider_failures_pass_through() {
        let mut graph = EntityGraph::new();
        for err in [
            BoundaryError::OutOfCoverage,
            BoundaryError::TransportFailure("timeout".into()),
            BoundaryError::InvalidResponse("garbled".into()),
        ] {
            let expect_transport = matches!(err, BoundaryError::TransportFailure(_));
            let expect_coverage = matches!(err, BoundaryError::OutOfCoverage);
            let provider = FixedProvider(Err(err));
            let got = import_boundary(&mut graph, &provider, ORIGIN, REQUEST, "x").unwrap_err();
            match got {
                BoundaryError::OutOfCoverage => assert!(expect_coverage),
                BoundaryError::TransportFailure(_) => assert!(expect_transport),
                BoundaryError::InvalidResponse(_) => {
                    assert!(!expect_transport && !expect_coverage)
                }
            }
        }
        assert!(graph.is_empty());
    }

    #[test]
    fn test_degenerate_boundary_is_invalid_response() {
        let mut graph = EntityGraph::new();
        let provider = FixedProvider(Ok(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)]));
        let err = import_boundary(&mut graph, &provider, ORIGIN, REQUEST, "x").unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidResponse(_)));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let mut graph = EntityGraph::new();
        let mut points = closed_loop();
        points[2].lat = f64::NAN;
        let provider = FixedProvider(Ok(points));
        let err = import_boundary(&mut graph, &provider, ORIGIN, REQUEST, "x").unwrap_err();
        assert!(matches!(err, BoundaryError::InvalidResponse(_)));
        assert!(graph.is_empty());
    }
}
