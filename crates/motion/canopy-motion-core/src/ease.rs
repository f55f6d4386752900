//! Easing curves.
//!
//! Names follow the `family.out` convention used in the site markup
//! (`power3.out`, `expo.out`, `elastic.out(1, 0.5)`), plus the four motion
//! tokens of the design language: `gentle`, `soft`, `organic`, `bounce`.

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

const DEFAULT_ELASTIC_PERIOD: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    Linear,
    Power1Out,
    Power2Out,
    Power3Out,
    Power4Out,
    ExpoOut,
    ElasticOut { amplitude: f32, period: f32 },
    /// `min(1, 1.001 - 2^(-10 t))`, the smooth-scroll landing curve.
    SoftLanding,
}

impl Ease {
    /// `gentle` token.
    pub const GENTLE: Ease = Ease::Power2Out;
    /// `soft` token.
    pub const SOFT: Ease = Ease::Power3Out;
    /// `organic` token.
    pub const ORGANIC: Ease = Ease::ExpoOut;
    /// `bounce` token.
    pub const BOUNCE: Ease = Ease::ElasticOut {
        amplitude: 1.0,
        period: 0.5,
    };

    /// Map linear progress `t` to eased progress. `t` is clamped into [0, 1].
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1Out => 1.0 - (1.0 - t).powi(2),
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power3Out => 1.0 - (1.0 - t).powi(4),
            Self::Power4Out => 1.0 - (1.0 - t).powi(5),
            Self::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            Self::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
            Self::SoftLanding => (1.001 - 2f32.powf(-10.0 * t)).min(1.0),
        }
    }
}

impl Default for Ease {
    fn default() -> Self {
        Self::SOFT
    }
}

fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let amplitude = if amplitude > 0.0 { amplitude } else { 1.0 };
    let period = if period > 0.0 {
        period
    } else {
        DEFAULT_ELASTIC_PERIOD
    };
    let p1 = amplitude.max(1.0);
    let p3 = period / amplitude.min(1.0);
    let p2 = p3 / TAU * (1.0 / p1).asin();
    let omega = TAU / p3;
    p1 * 2f32.powf(-10.0 * t) * ((t - p2) * omega).sin() + 1.0
}

fn parse_elastic(src: &str, args: &str) -> Result<Ease, ParseError> {
    let malformed = || ParseError::MalformedEase(src.to_string());
    let inner = args
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(malformed)?;
    let mut values = inner.split(',').map(|part| part.trim());
    let amplitude = match values.next() {
        Some("") | None => 1.0,
        Some(v) => v.parse::<f32>().map_err(|_| malformed())?,
    };
    let period = match values.next() {
        Some("") | None => DEFAULT_ELASTIC_PERIOD,
        Some(v) => v.parse::<f32>().map_err(|_| malformed())?,
    };
    if values.next().is_some() {
        return Err(malformed());
    }
    Ok(Ease::ElasticOut { amplitude, period })
}

impl FromStr for Ease {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let ease = match name.as_str() {
            "none" | "linear" | "power0" | "power0.out" => Self::Linear,
            "power1" | "power1.out" | "quad.out" => Self::Power1Out,
            "power2" | "power2.out" | "cubic.out" | "gentle" => Self::Power2Out,
            "power3" | "power3.out" | "quart.out" | "soft" => Self::Power3Out,
            "power4" | "power4.out" | "quint.out" | "strong.out" => Self::Power4Out,
            "expo" | "expo.out" | "organic" => Self::ExpoOut,
            "bounce" => Self::BOUNCE,
            "soft-landing" => Self::SoftLanding,
            "elastic" | "elastic.out" => Self::ElasticOut {
                amplitude: 1.0,
                period: DEFAULT_ELASTIC_PERIOD,
            },
            other => match other.strip_prefix("elastic.out") {
                Some(args) => return parse_elastic(s, args.trim()),
                None => return Err(ParseError::UnknownEase(s.to_string())),
            },
        };
        Ok(ease)
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("none"),
            Self::Power1Out => f.write_str("power1.out"),
            Self::Power2Out => f.write_str("power2.out"),
            Self::Power3Out => f.write_str("power3.out"),
            Self::Power4Out => f.write_str("power4.out"),
            Self::ExpoOut => f.write_str("expo.out"),
            Self::ElasticOut { amplitude, period } => {
                write!(f, "elastic.out({amplitude}, {period})")
            }
            Self::SoftLanding => f.write_str("soft-landing"),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(value: Ease) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Ease; 7] = [
        Ease::Linear,
        Ease::Power1Out,
        Ease::Power2Out,
        Ease::Power3Out,
        Ease::Power4Out,
        Ease::ExpoOut,
        Ease::BOUNCE,
    ];

    #[test]
    fn endpoints_are_stable() {
        for ease in CURVES {
            assert!(ease.apply(0.0).abs() < 1e-6, "{ease} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease} at 1");
        }
        // The landing curve starts just above zero and settles exactly on 1.
        assert!(Ease::SoftLanding.apply(0.0) < 0.01);
        assert_eq!(Ease::SoftLanding.apply(1.0), 1.0);
    }

    #[test]
    fn out_curves_are_monotonic() {
        for ease in CURVES.into_iter().filter(|e| !matches!(e, Ease::ElasticOut { .. })) {
            let a = ease.apply(0.25);
            let b = ease.apply(0.5);
            let c = ease.apply(0.75);
            assert!(a < b && b < c, "{ease}");
        }
    }

    #[test]
    fn elastic_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::BOUNCE.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn tokens_parse_to_their_curves() {
        assert_eq!("gentle".parse::<Ease>().unwrap(), Ease::GENTLE);
        assert_eq!("soft".parse::<Ease>().unwrap(), Ease::SOFT);
        assert_eq!("organic".parse::<Ease>().unwrap(), Ease::ORGANIC);
        assert_eq!("bounce".parse::<Ease>().unwrap(), Ease::BOUNCE);
        assert_eq!(
            "elastic.out(1, 0.5)".parse::<Ease>().unwrap(),
            Ease::ElasticOut {
                amplitude: 1.0,
                period: 0.5
            }
        );
        assert_eq!("Power3.Out".parse::<Ease>().unwrap(), Ease::Power3Out);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(matches!(
            "wobbly".parse::<Ease>(),
            Err(ParseError::UnknownEase(_))
        ));
        assert!(matches!(
            "elastic.out(1, x)".parse::<Ease>(),
            Err(ParseError::MalformedEase(_))
        ));
    }

    #[test]
    fn serde_uses_the_string_form() {
        let json = serde_json::to_string(&Ease::ExpoOut).unwrap();
        assert_eq!(json, "\"expo.out\"");
        let back: Ease = serde_json::from_str("\"elastic.out(1, 0.5)\"").unwrap();
        assert_eq!(back, Ease::BOUNCE);
    }
}
