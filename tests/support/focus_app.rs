//! Shared headless Bevy harness for focus tracker behavioural tests.
//!
//! Each scenario rebuilds a small scene: an observer, the notes it should
//! look at, a distracting window on its right, and the reminder channels.
//! Pieces can be left out, and the observer can be mounted on a moved rig,
//! through [`SceneLayout`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::plugins::TransformPlugin;
use focus_tracker::{
    Attention, AttentionState, FocusSettings, FocusTarget, FocusTrackerPlugin, FogChannel,
    FogParticles, GazeCollider, GazeObserver, ReminderOverlay,
};
use rspec::report::Report;
use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};

/// Simulated frame length used by every scenario.
pub const FRAME: Duration = Duration::from_millis(250);

const EYE: Vec3 = Vec3::new(0.0, 1.6, 0.0);
const NOTES: Vec3 = Vec3::new(0.0, 1.6, -3.0);
const WINDOW: Vec3 = Vec3::new(4.0, 1.6, 0.0);

/// A Bevy `App` that rspec may share between its scenario closures.
struct SceneApp(App);

// SAFETY: rspec wants `Send + Sync` environments. Suites run through
// `run_serial` with parallelism off, and the app is only reached through the
// mutex in `FocusScene`.
unsafe impl Send for SceneApp {}
unsafe impl Sync for SceneApp {}

/// Entities spawned by [`FocusScene::rebuild`].
#[derive(Resource, Debug, Clone, Copy)]
struct SceneHandles {
    observer: Option<Entity>,
    target: Entity,
    overlay: Option<Entity>,
    fog: Option<Entity>,
}

/// Pieces of the scene a scenario wants present.
#[derive(Debug, Clone, Copy)]
pub struct SceneLayout {
    /// Whether a [`GazeObserver`] is spawned.
    pub with_observer: bool,
    /// Whether a [`ReminderOverlay`] is spawned.
    pub with_overlay: bool,
    /// Whether [`FogParticles`] are spawned.
    pub with_fog: bool,
    /// When set, the scene is shifted by this offset and the observer is a
    /// child of a rig placed there, with a decoy collider left where the
    /// notes would be without the shift.
    pub rig_offset: Option<Vec3>,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            with_observer: true,
            with_overlay: true,
            with_fog: true,
            rig_offset: None,
        }
    }
}

/// Headless focus tracking scene shared by the rspec scenarios.
#[derive(Clone)]
pub struct FocusScene {
    app: Arc<Mutex<SceneApp>>,
}

impl std::fmt::Debug for FocusScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusScene").finish_non_exhaustive()
    }
}

impl Default for FocusScene {
    fn default() -> Self {
        Self {
            app: Arc::new(Mutex::new(SceneApp(App::new()))),
        }
    }
}

impl FocusScene {
    fn app(&self) -> MutexGuard<'_, SceneApp> {
        self.app.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the app with a freshly built scene using `settings`.
    pub fn rebuild(&self, settings: FocusSettings, layout: SceneLayout) {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, TransformPlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
            .insert_resource(settings)
            .add_plugins(FocusTrackerPlugin);

        let offset = layout.rig_offset.unwrap_or(Vec3::ZERO);
        let world = app.world_mut();
        let observer = layout.with_observer.then(|| match layout.rig_offset {
            Some(rig_offset) => {
                let rig = world.spawn(Transform::from_translation(rig_offset)).id();
                world
                    .spawn((GazeObserver, Transform::from_translation(EYE), ChildOf(rig)))
                    .id()
            }
            None => world.spawn((GazeObserver, Transform::from_translation(EYE))).id(),
        });
        let target = world
            .spawn((
                FocusTarget,
                GazeCollider::cuboid(Vec3::new(0.6, 0.4, 0.1)),
                Transform::from_translation(NOTES + offset),
            ))
            .id();
        world.spawn((
            GazeCollider::cuboid(Vec3::new(0.1, 1.0, 1.0)),
            Transform::from_translation(WINDOW + offset),
        ));
        if layout.rig_offset.is_some() {
            world.spawn((
                GazeCollider::cuboid(Vec3::new(0.6, 0.4, 0.1)),
                Transform::from_translation(NOTES),
            ));
        }
        let overlay = layout
            .with_overlay
            .then(|| world.spawn(ReminderOverlay::default()).id());
        let fog = layout
            .with_fog
            .then(|| world.spawn(FogParticles::default()).id());
        world.insert_resource(SceneHandles {
            observer,
            target,
            overlay,
            fog,
        });

        app.finish();
        app.cleanup();
        self.app().0 = app;
    }

    /// Advances the application by `frames` updates.
    pub fn tick(&self, frames: usize) {
        let mut guard = self.app();
        for _ in 0..frames {
            guard.0.update();
        }
    }

    fn handles(&self) -> SceneHandles {
        *self.app().0.world().resource::<SceneHandles>()
    }

    /// Turns the observer to face the notes.
    pub fn look_at_notes(&self) {
        self.face(NOTES);
    }

    /// Turns the observer to face the window.
    pub fn look_at_window(&self) {
        self.face(WINDOW);
    }

    /// Points the observer at `point`, given in unshifted scene coordinates.
    ///
    /// Rigs are never rotated, so this is also the observer's local frame.
    fn face(&self, point: Vec3) {
        let Some(observer) = self.handles().observer else {
            return;
        };
        let mut guard = self.app();
        if let Some(mut transform) = guard.0.world_mut().get_mut::<Transform>(observer) {
            transform.look_at(point, Vec3::Y);
        }
    }

    /// Removes the focus target marker from the notes.
    pub fn remove_target(&self) {
        let target = self.handles().target;
        self.app()
            .0
            .world_mut()
            .entity_mut(target)
            .remove::<FocusTarget>();
    }

    /// Current overlay opacity, or `None` when the scene has no overlay.
    pub fn overlay(&self) -> Option<f32> {
        let overlay = self.handles().overlay?;
        self.app()
            .0
            .world()
            .get::<ReminderOverlay>(overlay)
            .map(|overlay| overlay.opacity)
    }

    /// Current fog alpha, or `None` when the scene has no fog.
    pub fn fog(&self) -> Option<f32> {
        let fog = self.handles().fog?;
        self.app()
            .0
            .world()
            .get::<FogParticles>(fog)
            .map(FogChannel::uniform_alpha)
    }

    /// Attention state reported by the plugin.
    pub fn attention(&self) -> AttentionState {
        self.app().0.world().resource::<Attention>().state()
    }

    /// Whether the plugin saw the target under the gaze on the last frame.
    pub fn focused(&self) -> bool {
        self.app().0.world().resource::<Attention>().focus().focused
    }

    /// Unfocused time the animator has accumulated.
    pub fn unfocused_for(&self) -> f32 {
        self.app().0.world().resource::<Attention>().animator().timer()
    }
}

/// Runs an rspec suite serially and fails the calling test when any
/// example in it failed.
///
/// # Panics
///
/// Panics if the suite reports a failure.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + std::fmt::Debug,
{
    let logger = Arc::new(Logger::new(std::io::stdout()));
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    let report = Runner::new(config, vec![logger]).run(suite);
    assert!(
        report.is_success(),
        "rspec suite failed: {} passed, {} failed",
        report.get_passed(),
        report.get_failed()
    );
}
