//! Library crate providing gaze focus tracking and the distraction reminder.
//!
//! The engine-agnostic core ([`detector`], [`animator`], [`fade`],
//! [`channels`]) is driven once per frame by a host. [`plugin`] hosts it
//! inside a Bevy app.
pub mod animator;
pub mod channels;
pub mod detector;
pub mod fade;
pub mod logging;
pub mod plugin;
pub mod settings;
pub mod vector_math;

// Re-export commonly used items
pub use animator::{AttentionState, DistractionAnimator, FadeTarget, TickOutcome};
pub use channels::{FogChannel, FogColourOverLifetime, FogGradient, OutputChannels, OverlayChannel};
pub use detector::{FocusDetector, FocusState, ObserverPose, PoseSource, RayHit, SpatialQuery};
pub use fade::{ChannelValues, FadeProgress, FadeTask};
pub use logging::init as init_logging;
pub use plugin::{
    focus_tracking_system, Attention, AttentionChanged, FocusTarget, FocusTrackerPlugin,
    FogParticles, GazeCollider, GazeObserver, ReminderOverlay,
};
pub use settings::{FocusSettings, SettingsError};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use focus_tracker::prelude::*;
    //! ```

    pub use crate::FocusSettings;
    pub use crate::FocusTrackerPlugin;
    pub use crate::{FocusTarget, FogParticles, GazeCollider, GazeObserver, ReminderOverlay};
    pub use crate::{AttentionState, DistractionAnimator, FocusDetector};
}
