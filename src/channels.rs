//! Output channels driven by the distraction animator.
//!
//! The reminder has two visible parts: an overlay whose opacity is set
//! directly, and a fog effect whose density is the alpha of a "colour over
//! lifetime" gradient. Both are reached through traits so hosts and tests can
//! substitute their own implementations.

use crate::settings::unit_interval;

/// A UI layer whose visibility is controlled by opacity.
pub trait OverlayChannel {
    /// Current opacity in `[0, 1]`.
    fn opacity(&self) -> f32;
    /// Sets the opacity. Callers pass values in `[0, 1]`.
    fn set_opacity(&mut self, opacity: f32);
}

/// A fog effect whose density is controlled by a uniform alpha.
pub trait FogChannel {
    /// Current alpha shared by every point of the fog lifetime.
    fn uniform_alpha(&self) -> f32;
    /// Sets the same alpha across the whole fog lifetime.
    fn set_uniform_alpha(&mut self, alpha: f32);
}

/// RGB colour key of a gradient. The fog only ever uses white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColourKey {
    /// Linear RGB components.
    pub rgb: [f32; 3],
    /// Position along the particle lifetime in `[0, 1]`.
    pub time: f32,
}

/// Alpha key of a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaKey {
    /// Alpha at this key.
    pub alpha: f32,
    /// Position along the particle lifetime in `[0, 1]`.
    pub time: f32,
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Two-keyframe gradient with the same alpha at birth and death.
///
/// There is no way to build a gradient with differing alpha keys, so the
/// uniform-alpha reading of [`FogGradient::uniform_alpha`] always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogGradient {
    colour_keys: [ColourKey; 2],
    alpha_keys: [AlphaKey; 2],
}

impl FogGradient {
    /// White gradient with `alpha` at both ends of the lifetime.
    #[must_use]
    pub fn uniform(alpha: f32) -> Self {
        let clamped = unit_interval(alpha);
        Self {
            colour_keys: [
                ColourKey {
                    rgb: WHITE,
                    time: 0.0,
                },
                ColourKey {
                    rgb: WHITE,
                    time: 1.0,
                },
            ],
            alpha_keys: [
                AlphaKey {
                    alpha: clamped,
                    time: 0.0,
                },
                AlphaKey {
                    alpha: clamped,
                    time: 1.0,
                },
            ],
        }
    }

    /// Alpha read from the first key.
    #[must_use]
    pub const fn uniform_alpha(&self) -> f32 {
        self.alpha_keys[0].alpha
    }

    /// Colour keys at 0% and 100% of the lifetime.
    #[must_use]
    pub const fn colour_keys(&self) -> &[ColourKey; 2] {
        &self.colour_keys
    }

    /// Alpha keys at 0% and 100% of the lifetime.
    #[must_use]
    pub const fn alpha_keys(&self) -> &[AlphaKey; 2] {
        &self.alpha_keys
    }
}

/// Colour-over-lifetime module of a fog particle system.
///
/// A disabled module, or one that has never been given a gradient, reads as
/// transparent. Writing an alpha enables the module.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FogColourOverLifetime {
    /// Whether the module affects the particles.
    pub enabled: bool,
    /// Gradient applied over each particle's lifetime.
    pub gradient: Option<FogGradient>,
}

impl FogChannel for FogColourOverLifetime {
    fn uniform_alpha(&self) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        self.gradient.as_ref().map_or(0.0, FogGradient::uniform_alpha)
    }

    fn set_uniform_alpha(&mut self, alpha: f32) {
        self.enabled = true;
        self.gradient = Some(FogGradient::uniform(alpha));
    }
}

/// Optional overlay and fog handles written by a fade.
///
/// An absent channel reads as zero and swallows writes, so a scene with only
/// one of the two still fades the one it has.
#[derive(Default)]
pub struct OutputChannels<'a> {
    overlay: Option<&'a mut dyn OverlayChannel>,
    fog: Option<&'a mut dyn FogChannel>,
}

impl<'a> OutputChannels<'a> {
    /// Bundles whichever channels the scene provides.
    #[must_use]
    pub fn new(
        overlay: Option<&'a mut dyn OverlayChannel>,
        fog: Option<&'a mut dyn FogChannel>,
    ) -> Self {
        Self { overlay, fog }
    }

    /// Returns `true` when neither channel is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.overlay.is_none() && self.fog.is_none()
    }

    /// Current overlay opacity, or `0.0` without an overlay.
    #[must_use]
    pub fn overlay_opacity(&self) -> f32 {
        self.overlay.as_deref().map_or(0.0, OverlayChannel::opacity)
    }

    /// Current fog alpha, or `0.0` without a fog effect.
    #[must_use]
    pub fn fog_alpha(&self) -> f32 {
        self.fog.as_deref().map_or(0.0, FogChannel::uniform_alpha)
    }

    /// Writes both channels, clamping each value to `[0, 1]`.
    pub fn write(&mut self, overlay: f32, fog: f32) {
        if let Some(channel) = self.overlay.as_deref_mut() {
            channel.set_opacity(unit_interval(overlay));
        }
        if let Some(channel) = self.fog.as_deref_mut() {
            channel.set_uniform_alpha(unit_interval(fog));
        }
    }
}

impl std::fmt::Debug for OutputChannels<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputChannels")
            .field("overlay", &self.overlay.as_ref().map(|c| c.opacity()))
            .field("fog", &self.fog.as_ref().map(|c| c.uniform_alpha()))
            .finish()
    }
}
