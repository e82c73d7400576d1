//! Vector helpers for building gaze rays.
//! Small guards that keep degenerate directions out of the ray queries.
use glam::Vec3;

/// Returns the unit gaze direction for the supplied forward vector.
///
/// Returns `None` when the vector has non-finite components or is too close
/// to zero to normalise, since no ray can be cast along it.
///
/// # Examples
///
/// ```
/// use focus_tracker::vector_math::gaze_direction;
/// use glam::Vec3;
///
/// let dir = gaze_direction(Vec3::new(0.0, 0.0, -4.0)).unwrap_or(Vec3::ZERO);
/// assert!((dir.z + 1.0).abs() < 1e-6);
///
/// assert_eq!(gaze_direction(Vec3::ZERO), None);
/// ```
#[must_use]
pub fn gaze_direction(forward: Vec3) -> Option<Vec3> {
    if !forward.is_finite() {
        return None;
    }
    forward.try_normalize()
}

/// Returns `true` when `value` lies within `tolerance` of `target`.
///
/// Used when comparing channel readings against fade targets, where the
/// readings have passed through clamping and interpolation.
#[must_use]
pub fn approx_eq(value: f32, target: f32, tolerance: f32) -> bool {
    (value - target).abs() <= tolerance
}
