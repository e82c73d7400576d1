//! Distraction timer and reminder crossfade.
//!
//! [`DistractionAnimator`] consumes one [`FocusState`] per frame. Unfocused
//! time accumulates until it crosses the configured delay, at which point the
//! reminder fades in; looking back at the target fades it out again. The
//! animator owns at most one [`FadeTask`] and replaces it whenever the fade
//! direction changes, starting the new fade from whatever the channels show
//! at that instant.

use log::debug;

use crate::channels::OutputChannels;
use crate::detector::FocusState;
use crate::fade::{ChannelValues, FadeProgress, FadeTask};
use crate::settings::FocusSettings;
use crate::vector_math::approx_eq;

/// Tolerance used when deciding the channels already show a fade target.
const SETTLED_EPSILON: f32 = 1e-6;

/// Coarse attention state exposed to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AttentionState {
    /// Looking at the target; the reminder is hidden or fading out.
    #[default]
    Calm,
    /// Looking away, but not yet for long enough to show the reminder.
    Waiting,
    /// Looked away past the delay; the reminder is shown or fading in.
    Distracted,
}

/// Direction the reminder is being driven towards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FadeTarget {
    /// Overlay and fog fully transparent.
    #[default]
    Calm,
    /// Overlay opaque, fog at its configured ceiling.
    Distracted,
}

impl FadeTarget {
    /// Channel values this target corresponds to.
    #[must_use]
    pub const fn values(self, fog_max_alpha: f32) -> ChannelValues {
        match self {
            Self::Calm => ChannelValues::ZERO,
            Self::Distracted => ChannelValues::new(1.0, fog_max_alpha),
        }
    }
}

/// Summary of a single [`DistractionAnimator::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// State before the tick.
    pub previous: AttentionState,
    /// State after the tick.
    pub current: AttentionState,
    /// Whether this tick replaced the fade with a new one.
    pub fade_started: bool,
}

impl TickOutcome {
    /// Returns `true` when the attention state changed during the tick.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Timer plus single-slot fade engine driving the reminder channels.
#[derive(Debug, Clone)]
pub struct DistractionAnimator {
    settings: FocusSettings,
    timer: f32,
    state: AttentionState,
    target: FadeTarget,
    fade: Option<FadeTask>,
}

impl Default for DistractionAnimator {
    fn default() -> Self {
        Self::new(FocusSettings::default())
    }
}

impl DistractionAnimator {
    /// Creates an animator in the calm state.
    #[must_use]
    pub const fn new(settings: FocusSettings) -> Self {
        Self {
            settings,
            timer: 0.0,
            state: AttentionState::Calm,
            target: FadeTarget::Calm,
            fade: None,
        }
    }

    /// Resets the animator and hides the reminder immediately.
    pub fn start(&mut self, channels: &mut OutputChannels<'_>) {
        self.timer = 0.0;
        self.state = AttentionState::Calm;
        self.target = FadeTarget::Calm;
        self.fade = None;
        channels.write(0.0, 0.0);
    }

    /// Configuration currently in use.
    #[must_use]
    pub const fn settings(&self) -> &FocusSettings {
        &self.settings
    }

    /// Replaces the configuration. Takes effect from the next fade started.
    pub fn set_settings(&mut self, settings: FocusSettings) {
        self.settings = settings;
    }

    /// Seconds spent unfocused since the last focused tick.
    #[must_use]
    pub const fn timer(&self) -> f32 {
        self.timer
    }

    /// Current attention state.
    #[must_use]
    pub const fn state(&self) -> AttentionState {
        self.state
    }

    /// Target the reminder channels were last driven towards.
    #[must_use]
    pub const fn target(&self) -> FadeTarget {
        self.target
    }

    /// The in-flight fade, if any.
    #[must_use]
    pub const fn fade(&self) -> Option<&FadeTask> {
        self.fade.as_ref()
    }

    /// Returns `true` while a fade is still running.
    #[must_use]
    pub const fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Advances the animator by one frame.
    ///
    /// The running fade moves forward by `delta` first; the focus signal is
    /// then applied, which may start a fade from the values just written.
    /// Negative or non-finite deltas count as zero.
    pub fn tick(
        &mut self,
        focus: FocusState,
        delta: f32,
        channels: &mut OutputChannels<'_>,
    ) -> TickOutcome {
        let step = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let previous = self.state;
        self.advance_fade(step, channels);

        let fade_started = if focus.focused {
            self.timer = 0.0;
            self.state = AttentionState::Calm;
            self.fade_to(FadeTarget::Calm, channels)
        } else {
            let delay = self.settings.distraction_delay();
            // Only the threshold crossing matters, so the timer saturates.
            self.timer = (self.timer + step).min(delay);
            if self.timer >= delay {
                self.state = AttentionState::Distracted;
                self.fade_to(FadeTarget::Distracted, channels)
            } else {
                self.state = if self.timer > 0.0 {
                    AttentionState::Waiting
                } else {
                    AttentionState::Calm
                };
                false
            }
        };

        TickOutcome {
            previous,
            current: self.state,
            fade_started,
        }
    }

    fn advance_fade(&mut self, delta: f32, channels: &mut OutputChannels<'_>) {
        let Some(task) = self.fade.as_mut() else {
            return;
        };
        if task.advance(delta, channels) == FadeProgress::Finished {
            debug!("fade to {:?} finished", self.target);
            self.fade = None;
        }
    }

    /// Points the reminder at `target`, returning `true` if a new fade began.
    ///
    /// Repeating the current target leaves any running fade untouched.
    fn fade_to(&mut self, target: FadeTarget, channels: &mut OutputChannels<'_>) -> bool {
        if self.target == target {
            return false;
        }
        self.fade = None;
        // The target is only recorded once a channel can show it, so
        // channels spawned later still receive this fade.
        if channels.is_empty() {
            return false;
        }
        self.target = target;

        let start = ChannelValues::read(channels);
        let goal = target.values(self.settings.fog_max_alpha());
        if is_settled(start, goal) {
            return false;
        }

        let mut task = FadeTask::new(start, goal, self.settings.fade_duration());
        debug!(
            "fading to {target:?}: overlay {:.3} -> {:.3}, fog {:.3} -> {:.3} over {:.3}s",
            start.overlay,
            goal.overlay,
            start.fog,
            goal.fog,
            task.duration()
        );
        if task.advance(0.0, channels) == FadeProgress::Running {
            self.fade = Some(task);
        }
        true
    }
}

fn is_settled(current: ChannelValues, goal: ChannelValues) -> bool {
    approx_eq(current.overlay, goal.overlay, SETTLED_EPSILON)
        && approx_eq(current.fog, goal.fog, SETTLED_EPSILON)
}
