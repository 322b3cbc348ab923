//! Ray descriptors and per-path payloads.
//!
//! A [`RayDesc`] is a ray plus the parameter interval in which hits are
//! accepted. During a scene query the interval's `max` only ever shrinks.

use crate::Color;
use rtw_math::{Interval, Ray};

/// Smallest accepted hit distance; avoids self-intersection on bounce rays.
pub const T_MIN: f32 = 0.001;
/// Largest accepted hit distance.
pub const T_MAX: f32 = 100_000.0;

/// A ray together with its valid `[tmin, tmax]` range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayDesc {
    pub ray: Ray,
    pub t: Interval,
}

impl RayDesc {
    /// Create a ray descriptor with the default `[T_MIN, T_MAX]` interval.
    #[inline]
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            t: Interval::new(T_MIN, T_MAX),
        }
    }

    /// Create a ray descriptor with an explicit interval.
    #[inline]
    pub fn with_interval(ray: Ray, t: Interval) -> Self {
        Self { ray, t }
    }
}

/// Carry-state for one camera path: throughput so far and bounce count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayPayload {
    pub color: Color,
    pub depth: u32,
}

impl RayPayload {
    /// Payload for a camera ray: white throughput, no bounces yet.
    pub fn primary() -> Self {
        Self {
            color: Color::ONE,
            depth: 0,
        }
    }

    /// Fresh payload for the next bounce of this path.
    pub fn child(&self) -> Self {
        Self {
            color: Color::ONE,
            depth: self.depth + 1,
        }
    }
}

impl Default for RayPayload {
    fn default() -> Self {
        Self::primary()
    }
}
