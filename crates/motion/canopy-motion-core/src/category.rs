//! Marker categories and per-element overrides.
//!
//! Each category is recognized by a marker attribute on the page. Animate
//! categories share the `data-animate` attribute and differ by value; the rest
//! own a dedicated attribute whose value carries a parameter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ease::Ease;
use crate::error::ParseError;
use crate::geometry::TriggerPosition;
use crate::ids::ElementId;
use crate::markup::Markup;
use crate::trigger::ToggleActions;

/// Marker and override attribute names.
pub mod attr {
    pub const ANIMATE: &str = "data-animate";
    pub const STAGGER: &str = "data-stagger";
    pub const PARALLAX: &str = "data-parallax";
    pub const PARALLAX_DIRECTION: &str = "data-parallax-direction";
    pub const PARALLAX_BG: &str = "data-parallax-bg";
    pub const HERO: &str = "data-hero";
    pub const HERO_TITLE: &str = "data-hero-title";
    pub const HERO_SUBTITLE: &str = "data-hero-subtitle";
    pub const HERO_BUTTON: &str = "data-hero-button";
    pub const HERO_SCROLL: &str = "data-hero-scroll";
    pub const HERO_BG: &str = "data-hero-bg";

    pub const START: &str = "data-animate-start";
    pub const END: &str = "data-animate-end";
    pub const EASE: &str = "data-animate-ease";
    pub const DURATION: &str = "data-animate-duration";
    pub const ACTIONS: &str = "data-animate-actions";
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    FadeUp,
    FadeIn,
    ScaleUp,
    SlideLeft,
    SlideRight,
    Stagger,
    Parallax,
    ParallaxBackground,
    Hero,
}

impl Category {
    /// Scan order used by the registry.
    pub const ALL: [Category; 9] = [
        Category::FadeUp,
        Category::FadeIn,
        Category::ScaleUp,
        Category::SlideLeft,
        Category::SlideRight,
        Category::Stagger,
        Category::Parallax,
        Category::ParallaxBackground,
        Category::Hero,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::FadeUp => "fade-up",
            Self::FadeIn => "fade-in",
            Self::ScaleUp => "scale-up",
            Self::SlideLeft => "slide-left",
            Self::SlideRight => "slide-right",
            Self::Stagger => "stagger",
            Self::Parallax => "parallax",
            Self::ParallaxBackground => "parallax-bg",
            Self::Hero => "hero",
        }
    }

    /// Attribute that marks elements of this category.
    pub fn marker_attribute(self) -> &'static str {
        match self {
            Self::FadeUp | Self::FadeIn | Self::ScaleUp | Self::SlideLeft | Self::SlideRight => {
                attr::ANIMATE
            }
            Self::Stagger => attr::STAGGER,
            Self::Parallax => attr::PARALLAX,
            Self::ParallaxBackground => attr::PARALLAX_BG,
            Self::Hero => attr::HERO,
        }
    }

    /// True for categories selected by a `data-animate` value.
    pub fn is_animate(self) -> bool {
        self.marker_attribute() == attr::ANIMATE
    }

    /// Elements of this category in document order. Only the first hero
    /// container counts.
    pub fn discover(self, markup: &dyn Markup) -> Vec<ElementId> {
        let candidates = markup.select_all(self.marker_attribute());
        if self.is_animate() {
            candidates
                .into_iter()
                .filter(|&el| {
                    markup
                        .attribute(el, attr::ANIMATE)
                        .and_then(|v| v.parse::<Category>().ok())
                        == Some(self)
                })
                .collect()
        } else if self == Self::Hero {
            candidates.into_iter().take(1).collect()
        } else {
            candidates
        }
    }
}

/// Parses `data-animate` values; only animate categories are accepted.
impl FromStr for Category {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .filter(|c| c.is_animate())
            .find(|c| c.name() == value)
            .ok_or_else(|| ParseError::Category(value.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inline per-element settings that take precedence over category defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    pub start: Option<TriggerPosition>,
    pub end: Option<TriggerPosition>,
    pub ease: Option<Ease>,
    pub duration: Option<f32>,
    pub actions: Option<ToggleActions>,
}

impl Overrides {
    /// Read override attributes from `element`. Malformed values are logged
    /// and ignored so the category default stays in effect.
    pub fn read(markup: &dyn Markup, element: ElementId) -> Self {
        Self {
            start: read_attr(markup, element, attr::START),
            end: read_attr(markup, element, attr::END),
            ease: read_attr(markup, element, attr::EASE),
            duration: read_number(markup, element, attr::DURATION)
                .filter(|d| *d >= 0.0 && d.is_finite()),
            actions: read_attr(markup, element, attr::ACTIONS),
        }
    }
}

fn read_attr<T>(markup: &dyn Markup, element: ElementId, name: &str) -> Option<T>
where
    T: FromStr<Err = ParseError>,
{
    let raw = markup.attribute(element, name)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("ignoring {name} on element {}: {err}", element.0);
            None
        }
    }
}

/// Numeric attribute value. Absent or empty yields `None`; malformed input is
/// logged and yields `None`.
pub fn read_number(markup: &dyn Markup, element: ElementId, name: &str) -> Option<f32> {
    let raw = markup.attribute(element, name)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f32>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            let err = ParseError::Number {
                attribute: name.to_string(),
                value: raw.clone(),
            };
            log::warn!("element {}: {err}", element.0);
            None
        }
    }
}
