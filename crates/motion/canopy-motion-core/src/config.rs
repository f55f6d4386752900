//! Core configuration for canopy-motion-core.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;

/// Top-level configuration accepted by [`Motion`](crate::Motion) and the wasm
/// constructor. Every field is optional in serialized form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub smooth: SmoothScrollConfig,
    /// Defaults for effects created without explicit timing.
    pub defaults: EffectDefaults,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureOrientation {
    #[default]
    Vertical,
    Horizontal,
    Both,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothScrollConfig {
    /// Damping factor per 60 Hz frame for input-driven scrolling.
    pub lerp: f32,
    /// Seconds for programmatic scrolls that do not specify a duration.
    pub duration: f32,
    pub easing: Ease,
    pub orientation: Orientation,
    pub gesture_orientation: GestureOrientation,
    /// When false, wheel input moves the offset immediately.
    pub smooth_wheel: bool,
    pub wheel_multiplier: f32,
    pub touch_multiplier: f32,
    /// Disables clamping to `[0, limit]`.
    pub infinite: bool,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            lerp: 0.1,
            duration: 1.2,
            easing: Ease::SoftLanding,
            orientation: Orientation::Vertical,
            gesture_orientation: GestureOrientation::Vertical,
            smooth_wheel: true,
            wheel_multiplier: 1.0,
            touch_multiplier: 2.0,
            infinite: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDefaults {
    pub duration: f32,
    pub ease: Ease,
}

impl Default for EffectDefaults {
    fn default() -> Self {
        Self {
            duration: 1.0,
            ease: Ease::SOFT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: MotionConfig =
            serde_json::from_str(r#"{ "smooth": { "touch_multiplier": 1.5 } }"#).unwrap();
        assert_eq!(cfg.smooth.touch_multiplier, 1.5);
        assert_eq!(cfg.smooth.lerp, 0.1);
        assert_eq!(cfg.smooth.easing, Ease::SoftLanding);
        assert_eq!(cfg.defaults.ease, Ease::Power3Out);
    }
}
