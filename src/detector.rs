//! Gaze focus detection.
//!
//! [`FocusDetector`] casts a ray from the observer along its forward axis and
//! reports whether the nearest hit is the designated target. Geometry lives
//! behind [`SpatialQuery`]; the observer pose arrives through [`PoseSource`]
//! or directly as a snapshot.

use glam::Vec3;

use crate::settings::non_negative;
use crate::vector_math::gaze_direction;

/// Position and facing of the observer for a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverPose {
    /// World-space eye position.
    pub position: Vec3,
    /// Direction the observer faces. Need not be normalised.
    pub forward: Vec3,
}

impl ObserverPose {
    /// Creates a pose from a position and forward direction.
    #[must_use]
    pub const fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

/// Supplies the observer pose each tick.
pub trait PoseSource {
    /// Returns the current pose, or `None` while the observer is unavailable.
    fn pose(&self) -> Option<ObserverPose>;
}

impl PoseSource for Option<ObserverPose> {
    fn pose(&self) -> Option<ObserverPose> {
        *self
    }
}

/// Nearest intersection returned by a [`SpatialQuery`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<Id> {
    /// Identity of the intersected object.
    pub object: Id,
    /// Distance from the ray origin to the hit.
    pub distance: f32,
}

/// Ray intersection service provided by the host scene.
pub trait SpatialQuery {
    /// Identity handle compared against the focus target.
    type Id: PartialEq;

    /// Returns the nearest object hit by the ray within `max_distance`.
    ///
    /// `direction` is always a unit vector.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32)
        -> Option<RayHit<Self::Id>>;
}

impl<Q: SpatialQuery + ?Sized> SpatialQuery for &Q {
    type Id = Q::Id;

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit<Self::Id>> {
        (**self).raycast(origin, direction, max_distance)
    }
}

/// Boolean focus signal derived fresh each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusState {
    /// Whether the gaze currently rests on the target.
    pub focused: bool,
}

impl From<bool> for FocusState {
    fn from(focused: bool) -> Self {
        Self { focused }
    }
}

/// Decides whether the observer is looking at the target.
///
/// # Examples
///
/// ```
/// use focus_tracker::detector::{FocusDetector, ObserverPose, RayHit, SpatialQuery};
/// use glam::Vec3;
///
/// struct Wall;
///
/// impl SpatialQuery for Wall {
///     type Id = &'static str;
///     fn raycast(&self, _: Vec3, _: Vec3, max: f32) -> Option<RayHit<&'static str>> {
///         (max >= 2.0).then_some(RayHit { object: "book", distance: 2.0 })
///     }
/// }
///
/// let detector = FocusDetector::new(Wall);
/// let pose = ObserverPose::new(Vec3::ZERO, Vec3::NEG_Z);
/// assert!(detector.evaluate(Some(pose), Some(&"book"), 10.0));
/// assert!(!detector.evaluate(Some(pose), Some(&"book"), 1.0));
/// assert!(!detector.evaluate(Some(pose), None, 10.0));
/// ```
#[derive(Debug, Clone)]
pub struct FocusDetector<Q> {
    space: Q,
}

impl<Q: SpatialQuery> FocusDetector<Q> {
    /// Wraps the spatial query service used for every evaluation.
    pub const fn new(space: Q) -> Self {
        Self { space }
    }

    /// Returns `true` iff the nearest hit along the gaze ray is `target`.
    ///
    /// A missing pose, a missing target, or a forward vector that cannot be
    /// normalised all read as "not focused".
    pub fn evaluate(
        &self,
        pose: Option<ObserverPose>,
        target: Option<&Q::Id>,
        max_distance: f32,
    ) -> bool {
        let (Some(pose), Some(target)) = (pose, target) else {
            return false;
        };
        let Some(direction) = gaze_direction(pose.forward) else {
            return false;
        };
        self.space
            .raycast(pose.position, direction, non_negative(max_distance))
            .is_some_and(|hit| hit.object == *target)
    }

    /// Evaluates focus using the pose currently reported by `source`.
    pub fn evaluate_from(
        &self,
        source: &impl PoseSource,
        target: Option<&Q::Id>,
        max_distance: f32,
    ) -> FocusState {
        self.evaluate(source.pose(), target, max_distance).into()
    }
}
