#![warn(missing_docs)]

//! Constrained endpoint resolution for interactive line drawing.
//!
//! A drawing session can lock the distance and/or the azimuth of the
//! segment being drawn. Given the last committed vertex and the raw
//! cursor position, [`resolve`] produces the single endpoint that
//! honors whatever locks are active.

use geomark_geodesy::{bearing, destination, distance, GeoPoint};
use serde::{Deserialize, Serialize};

/// Session-scoped lock state for the segment being drawn.
///
/// The flags and values arrive straight from UI form fields, so this
/// type tolerates missing or out-of-range values: a lock whose value
/// fails validation simply behaves as if it were off. Validation here
/// is substitution, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstraintState {
    /// Whether the distance lock checkbox is on.
    pub distance_locked: bool,
    /// Whether the azimuth lock checkbox is on.
    pub azimuth_locked: bool,
    /// Locked distance in meters; only meaningful when > 0.
    pub locked_distance: Option<f64>,
    /// Locked azimuth in degrees; only meaningful in `[0, 360)`.
    pub locked_azimuth: Option<f64>,
}

impl ConstraintState {
    /// The distance lock value, if the lock is on and the value valid.
    pub fn active_distance(&self) -> Option<f64> {
        match (self.distance_locked, self.locked_distance) {
            (true, Some(d)) if d.is_finite() && d > 0.0 => Some(d),
            _ => None,
        }
    }

    /// The azimuth lock value, if the lock is on and the value valid.
    pub fn active_azimuth(&self) -> Option<f64> {
        match (self.azimuth_locked, self.locked_azimuth) {
            (true, Some(az)) if az.is_finite() && (0.0..360.0).contains(&az) => Some(az),
            _ => None,
        }
    }

    /// True if at least one lock is active with a valid value.
    pub fn any_active(&self) -> bool {
        self.active_distance().is_some() || self.active_azimuth().is_some()
    }
}

/// Resolve the candidate next vertex from the cursor and lock state.
///
/// Precedence:
/// 1. both locks active: the cursor is ignored entirely;
/// 2. distance only: direction follows the cursor, magnitude is locked;
/// 3. azimuth only: magnitude follows the cursor, direction is locked;
/// 4. no locks: passthrough of the raw cursor position.
pub fn resolve(start: GeoPoint, cursor: GeoPoint, state: &ConstraintState) -> GeoPoint {
    match (state.active_distance(), state.active_azimuth()) {
        (Some(d), Some(az)) => destination(start, d, az.to_radians()),
        (Some(d), None) => destination(start, d, bearing(start, cursor)),
        (None, Some(az)) => destination(start, distance(start, cursor), az.to_radians()),
        (None, None) => cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geomark_geodesy::azimuth;

    fn both_locked(d: f64, az: f64) -> ConstraintState {
        ConstraintState {
            distance_locked: true,
            azimuth_locked: true,
            locked_distance: Some(d),
            locked_azimuth: Some(az),
        }
    }

    #[test]
    fn test_no_locks_passthrough() {
        let start = GeoPoint::new(48.8566, 2.3522);
        let cursor = GeoPoint::new(48.8606, 2.3376);
        let out = resolve(start, cursor, &ConstraintState::default());
        assert_eq!(out, cursor);
    }

    #[test]
    fn test_both_locks_ignore_cursor() {
        let start = GeoPoint::new(0.0, 0.0);
        let state = both_locked(100.0, 90.0);
        // Two wildly different cursor positions resolve identically
        let a = resolve(start, GeoPoint::new(50.0, 50.0), &state);
        let b = resolve(start, GeoPoint::new(-30.0, 10.0), &state);
        assert_eq!(a, b);
        assert_relative_eq!(distance(start, a), 100.0, max_relative = 1e-6);
        assert_relative_eq!(azimuth(start, a), 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_distance_lock_follows_cursor_direction() {
        let start = GeoPoint::new(0.0, 0.0);
        let cursor = GeoPoint::new(1.0, 0.0); // due north, far away
        let state = ConstraintState {
            distance_locked: true,
            locked_distance: Some(500.0),
            ..Default::default()
        };
        let out = resolve(start, cursor, &state);
        assert_relative_eq!(distance(start, out), 500.0, max_relative = 1e-6);
        assert_relative_eq!(azimuth(start, out), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_azimuth_lock_follows_cursor_distance() {
        let start = GeoPoint::new(0.0, 0.0);
        let cursor = geomark_geodesy::destination(start, 1234.0, 45.0_f64.to_radians());
        let state = ConstraintState {
            azimuth_locked: true,
            locked_azimuth: Some(180.0),
            ..Default::default()
        };
        let out = resolve(start, cursor, &state);
        assert_relative_eq!(distance(start, out), 1234.0, max_relative = 1e-6);
        assert_relative_eq!(azimuth(start, out), 180.0, epsilon = 1e-4);
    }

    #[test]
    fn test_invalid_values_deactivate_lock() {
        let start = GeoPoint::new(0.0, 0.0);
        let cursor = GeoPoint::new(0.5, 0.5);

        for state in [
            // distance lock on, but value missing / zero / negative / NaN
            ConstraintState {
                distance_locked: true,
                ..Default::default()
            },
            ConstraintState {
                distance_locked: true,
                locked_distance: Some(0.0),
                ..Default::default()
            },
            ConstraintState {
                distance_locked: true,
                locked_distance: Some(-5.0),
                ..Default::default()
            },
            ConstraintState {
                distance_locked: true,
                locked_distance: Some(f64::NAN),
                ..Default::default()
            },
            // azimuth lock on, but value out of range
            ConstraintState {
                azimuth_locked: true,
                locked_azimuth: Some(360.0),
                ..Default::default()
            },
            ConstraintState {
                azimuth_locked: true,
                locked_azimuth: Some(-1.0),
                ..Default::default()
            },
        ] {
            assert!(!state.any_active(), "{state:?} should be inactive");
            assert_eq!(resolve(start, cursor, &state), cursor);
        }
    }

    #[test]
    fn test_value_present_but_lock_off() {
        let start = GeoPoint::new(0.0, 0.0);
        let cursor = GeoPoint::new(0.5, 0.5);
        let state = ConstraintState {
            locked_distance: Some(100.0),
            locked_azimuth: Some(45.0),
            ..Default::default()
        };
        assert_eq!(resolve(start, cursor, &state), cursor);
    }
}
