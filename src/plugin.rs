//! Bevy plugin wiring focus detection and the reminder fade into the schedule.
//!
//! `FocusTrackerPlugin` reads the pose of the entity marked [`GazeObserver`],
//! casts it against every entity carrying a [`GazeCollider`], and drives the
//! [`ReminderOverlay`] and [`FogParticles`] components through the
//! [`DistractionAnimator`]. Any of those entities may be missing: the plugin
//! then behaves as if the observer were not focused, or skips the channel
//! that is absent.

use bevy::ecs::prelude::On;
use bevy::ecs::system::SystemParam;
use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::prelude::*;
use bevy::transform::plugins::TransformSystems;
use log::info;

use crate::animator::{AttentionState, DistractionAnimator};
use crate::channels::{FogChannel, FogColourOverLifetime, OutputChannels, OverlayChannel};
use crate::detector::{FocusDetector, FocusState, ObserverPose, RayHit, SpatialQuery};
use crate::settings::FocusSettings;

/// Marker for the entity whose gaze is tracked, usually the VR camera.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GazeObserver;

/// Marker for the object the observer is expected to look at.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTarget;

/// Axis-aligned box, centred on the entity's world translation, that gaze
/// rays hit.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct GazeCollider {
    /// Half the size of the box along each axis.
    pub half_extents: Vec3,
}

impl GazeCollider {
    /// Box collider with the given half extents.
    #[must_use]
    pub const fn cuboid(half_extents: Vec3) -> Self {
        Self { half_extents }
    }

    /// World-space bounds for an entity at `translation`.
    #[must_use]
    pub fn bounds(&self, translation: Vec3) -> Aabb3d {
        Aabb3d::new(translation, self.half_extents.abs())
    }
}

/// Reminder overlay whose opacity the animator drives.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct ReminderOverlay {
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl OverlayChannel for ReminderOverlay {
    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }
}

/// Fog particle effect whose lifetime alpha the animator drives.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq)]
pub struct FogParticles {
    /// Colour-over-lifetime module of the particle system.
    pub colour_over_lifetime: FogColourOverLifetime,
}

impl FogChannel for FogParticles {
    fn uniform_alpha(&self) -> f32 {
        self.colour_over_lifetime.uniform_alpha()
    }

    fn set_uniform_alpha(&mut self, alpha: f32) {
        self.colour_over_lifetime.set_uniform_alpha(alpha);
    }
}

/// Attention tracking state owned by the plugin.
#[derive(Resource, Debug, Default)]
pub struct Attention {
    animator: DistractionAnimator,
    focus: FocusState,
}

impl Attention {
    /// Focus signal computed on the most recent frame.
    #[must_use]
    pub const fn focus(&self) -> FocusState {
        self.focus
    }

    /// Current attention state.
    #[must_use]
    pub const fn state(&self) -> AttentionState {
        self.animator.state()
    }

    /// The animator driving the reminder.
    #[must_use]
    pub const fn animator(&self) -> &DistractionAnimator {
        &self.animator
    }
}

/// Raised whenever the attention state changes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttentionChanged {
    /// State before the change.
    pub from: AttentionState,
    /// State after the change.
    pub to: AttentionState,
}

/// Snapshot of gaze colliders taken once per frame.
#[derive(Debug, Clone, Default)]
pub struct SceneColliders {
    colliders: Vec<(Entity, Aabb3d)>,
}

impl SceneColliders {
    /// Builds a snapshot from precomputed bounds.
    #[must_use]
    pub const fn new(colliders: Vec<(Entity, Aabb3d)>) -> Self {
        Self { colliders }
    }

    /// Builds a snapshot from collider entities and their world transforms.
    pub fn collect<'a>(
        items: impl IntoIterator<Item = (Entity, &'a GlobalTransform, &'a GazeCollider)>,
    ) -> Self {
        Self::new(
            items
                .into_iter()
                .map(|(entity, transform, collider)| {
                    (entity, collider.bounds(transform.translation()))
                })
                .collect(),
        )
    }
}

impl SpatialQuery for SceneColliders {
    type Id = Entity;

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit<Self::Id>> {
        let heading = Dir3::new(direction).ok()?;
        let ray = RayCast3d::new(origin, heading, max_distance);
        self.colliders
            .iter()
            .filter_map(|(entity, bounds)| {
                ray.aabb_intersection_at(bounds).map(|distance| RayHit {
                    object: *entity,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// World-space gaze pose of an entity: its translation and forward axis.
///
/// Uses the propagated transform so an observer parented to a rig casts
/// from where it actually is.
#[must_use]
pub fn pose_from_transform(transform: &GlobalTransform) -> ObserverPose {
    ObserverPose::new(transform.translation(), *transform.forward())
}

/// Overlay and fog components, each expected at most once in the world.
#[derive(SystemParam)]
pub struct ReminderChannels<'w, 's> {
    overlays: Query<'w, 's, &'static mut ReminderOverlay>,
    fogs: Query<'w, 's, &'static mut FogParticles>,
}

impl ReminderChannels<'_, '_> {
    /// Runs `f` with whichever reminder channels currently exist.
    pub fn with<R>(&mut self, f: impl FnOnce(&mut OutputChannels<'_>) -> R) -> R {
        let mut overlay = self.overlays.single_mut().ok();
        let mut fog = self.fogs.single_mut().ok();
        let mut channels = OutputChannels::new(
            overlay
                .as_deref_mut()
                .map(|channel| channel as &mut dyn OverlayChannel),
            fog.as_deref_mut()
                .map(|channel| channel as &mut dyn FogChannel),
        );
        f(&mut channels)
    }
}

/// Hides the reminder once the scene has been spawned.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn init_reminder_system(
    settings: Res<FocusSettings>,
    mut attention: ResMut<Attention>,
    mut channels: ReminderChannels,
) {
    attention.animator.set_settings(settings.clone());
    channels.with(|out| attention.animator.start(out));
}

/// Evaluates focus for this frame and advances the reminder.
///
/// Triggers [`AttentionChanged`] when the attention state moves.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn focus_tracking_system(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<FocusSettings>,
    mut attention: ResMut<Attention>,
    observers: Query<&GlobalTransform, With<GazeObserver>>,
    targets: Query<Entity, With<FocusTarget>>,
    colliders: Query<(Entity, &GlobalTransform, &GazeCollider)>,
    mut channels: ReminderChannels,
) {
    if settings.is_changed() {
        attention.animator.set_settings(settings.clone());
    }

    let pose = observers.single().ok().map(pose_from_transform);
    let target = targets.single().ok();
    let scene = SceneColliders::collect(&colliders);
    let focus = FocusDetector::new(&scene).evaluate_from(
        &pose,
        target.as_ref(),
        settings.focus_check_distance(),
    );

    let delta = time.delta_secs();
    let outcome = channels.with(|out| attention.animator.tick(focus, delta, out));
    attention.focus = focus;

    if outcome.changed() {
        commands.trigger(AttentionChanged {
            from: outcome.previous,
            to: outcome.current,
        });
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_attention_change(event: On<AttentionChanged>) {
    let AttentionChanged { from, to } = event.event();
    info!("attention changed: {from:?} -> {to:?}");
}

/// Plugin installing the focus tracker.
///
/// # Responsibilities
///
/// - Initialises [`FocusSettings`] (unless the host inserted its own) and
///   the [`Attention`] resource.
/// - Hides the reminder in `PostStartup`, after scene spawning.
/// - Runs [`focus_tracking_system`] every `PostUpdate`, after transform
///   propagation, so gaze rays use this frame's world transforms.
/// - Logs [`AttentionChanged`] through an observer.
///
/// The host must add Bevy's `TransformPlugin` (part of `DefaultPlugins`);
/// without it `GlobalTransform` is never updated.
///
/// # Examples
///
/// ```ignore
/// use bevy::prelude::*;
/// use focus_tracker::FocusTrackerPlugin;
///
/// App::new()
///     .add_plugins((MinimalPlugins, TransformPlugin))
///     .add_plugins(FocusTrackerPlugin)
///     .run();
/// ```
#[derive(Debug, Default)]
pub struct FocusTrackerPlugin;

impl Plugin for FocusTrackerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FocusSettings>();
        app.init_resource::<Attention>();
        app.add_observer(log_attention_change);
        app.add_systems(PostStartup, init_reminder_system);
        app.add_systems(
            PostUpdate,
            focus_tracking_system.after(TransformSystems::Propagate),
        );
    }
}
