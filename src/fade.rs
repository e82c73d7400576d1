//! Linear crossfade of the overlay and fog channels.
//!
//! A [`FadeTask`] interpolates both channels from their start values to
//! their targets over a shared duration. Both channels use the same
//! fraction, so they always move in lockstep. The task is advanced by the
//! host once per frame and reports when it has finished.

use crate::channels::OutputChannels;
use crate::settings::non_negative;

/// Overlay and fog values written together.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelValues {
    /// Overlay opacity.
    pub overlay: f32,
    /// Fog alpha.
    pub fog: f32,
}

impl ChannelValues {
    /// Both channels fully transparent.
    pub const ZERO: Self = Self {
        overlay: 0.0,
        fog: 0.0,
    };

    /// Creates a value pair.
    #[must_use]
    pub const fn new(overlay: f32, fog: f32) -> Self {
        Self { overlay, fog }
    }

    /// Reads the current values from `channels`.
    #[must_use]
    pub fn read(channels: &OutputChannels<'_>) -> Self {
        Self::new(channels.overlay_opacity(), channels.fog_alpha())
    }

    /// Linear blend towards `target` at `fraction`, clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, target: Self, fraction: f32) -> Self {
        let t = fraction.clamp(0.0, 1.0);
        Self::new(
            self.overlay + (target.overlay - self.overlay) * t,
            self.fog + (target.fog - self.fog) * t,
        )
    }
}

/// Whether a fade still has frames left to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeProgress {
    /// The fade wrote an intermediate value and continues next frame.
    Running,
    /// The fade snapped to its target and is done.
    Finished,
}

/// An in-flight interpolation between two [`ChannelValues`].
#[derive(Debug, Clone, PartialEq)]
pub struct FadeTask {
    start: ChannelValues,
    target: ChannelValues,
    elapsed: f32,
    duration: f32,
}

impl FadeTask {
    /// Creates a fade from `start` to `target` over `duration` seconds.
    ///
    /// A negative or NaN duration is treated as zero.
    #[must_use]
    pub fn new(start: ChannelValues, target: ChannelValues, duration: f32) -> Self {
        Self {
            start,
            target,
            elapsed: 0.0,
            duration: non_negative(duration),
        }
    }

    /// Values the fade began from.
    #[must_use]
    pub const fn start(&self) -> ChannelValues {
        self.start
    }

    /// Values the fade ends at.
    #[must_use]
    pub const fn target(&self) -> ChannelValues {
        self.target
    }

    /// Seconds advanced so far.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Total length of the fade in seconds.
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    /// Interpolation fraction at the current elapsed time.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Values the fade writes at the current elapsed time.
    #[must_use]
    pub fn current(&self) -> ChannelValues {
        if self.is_complete() {
            self.target
        } else {
            self.start.lerp(self.target, self.fraction())
        }
    }

    /// Returns `true` once the elapsed time has reached the duration.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advances by `delta` seconds and writes the resulting values.
    ///
    /// Once the elapsed time reaches the duration the channels receive the
    /// exact target values and [`FadeProgress::Finished`] is returned.
    /// Passing a zero `delta` evaluates the fade without moving it, which
    /// is how a freshly started fade writes its first frame.
    pub fn advance(&mut self, delta: f32, channels: &mut OutputChannels<'_>) -> FadeProgress {
        self.elapsed += non_negative(delta);
        let values = self.current();
        channels.write(values.overlay, values.fog);
        if self.is_complete() {
            FadeProgress::Finished
        } else {
            FadeProgress::Running
        }
    }
}
