//! Rate limiting for pointer-move previews.

use std::time::{Duration, Instant};

/// Minimum-interval gate for preview recomputation.
///
/// A continuous stream of pointer-move events would otherwise
/// recompute the constrained preview on every event. This is purely a
/// performance valve: skipped previews never affect what gets
/// committed.
#[derive(Debug, Clone)]
pub struct PreviewThrottle {
    min_interval: Duration,
    last: Option<Instant>,
}

impl PreviewThrottle {
    /// Default minimum interval between previews (~60 fps).
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(16);

    /// Create a throttle with the given minimum interval.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// True if enough time has passed since the last accepted preview.
    ///
    /// Accepting records `now` as the new reference instant.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the last accepted instant, so the next preview passes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for PreviewThrottle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
