//! Layout measurements and trigger boundary positions.
//!
//! A [`TriggerPosition`] such as `"top 85%"` names an edge of the trigger
//! element and an edge of the viewport; the boundary is the scroll offset at
//! which the two meet.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Vertical extent of an element in document space (scroll offset 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Full scrollable height of the document.
    pub document_height: f32,
}

impl Viewport {
    /// Largest reachable scroll offset.
    pub fn scroll_limit(&self) -> f32 {
        (self.document_height - self.height).max(0.0)
    }
}

/// A point along an element or viewport, measured from its top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    Start,
    Center,
    End,
    Percent(f32),
    Pixels(f32),
}

impl Anchor {
    /// Distance from the leading edge for a box of `length`.
    pub fn resolve(self, length: f32) -> f32 {
        match self {
            Self::Start => 0.0,
            Self::Center => length * 0.5,
            Self::End => length,
            Self::Percent(p) => length * p / 100.0,
            Self::Pixels(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let anchor = match token.as_str() {
            "top" | "left" | "start" => Self::Start,
            "center" => Self::Center,
            "bottom" | "right" | "end" => Self::End,
            other => {
                let number = |text: &str| match text.trim().parse::<f32>() {
                    Ok(v) if v.is_finite() => Ok(v),
                    _ => Err(ParseError::Anchor(s.to_string())),
                };
                if let Some(pct) = other.strip_suffix('%') {
                    Self::Percent(number(pct)?)
                } else if let Some(px) = other.strip_suffix("px") {
                    Self::Pixels(number(px)?)
                } else {
                    Self::Pixels(number(other)?)
                }
            }
        };
        Ok(anchor)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("top"),
            Self::Center => f.write_str("center"),
            Self::End => f.write_str("bottom"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Pixels(px) => write!(f, "{px}px"),
        }
    }
}

/// `"<element-edge> <viewport-edge>"`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerPosition {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl TriggerPosition {
    pub const fn new(element: Anchor, viewport: Anchor) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which the element anchor meets the viewport anchor.
    pub fn resolve(&self, rect: Rect, viewport_height: f32) -> f32 {
        rect.top + self.element.resolve(rect.height) - self.viewport.resolve(viewport_height)
    }
}

impl FromStr for TriggerPosition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(element), Some(viewport), None) => Ok(Self {
                element: element.parse()?,
                viewport: viewport.parse()?,
            }),
            _ => Err(ParseError::Position(s.to_string())),
        }
    }
}

impl fmt::Display for TriggerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl TryFrom<String> for TriggerPosition {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TriggerPosition> for String {
    fn from(value: TriggerPosition) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyword_and_percent_forms() {
        let p: TriggerPosition = "top 85%".parse().unwrap();
        assert_eq!(p, TriggerPosition::new(Anchor::Start, Anchor::Percent(85.0)));
        let p: TriggerPosition = "bottom top".parse().unwrap();
        assert_eq!(p, TriggerPosition::new(Anchor::End, Anchor::Start));
        let p: TriggerPosition = "center 120px".parse().unwrap();
        assert_eq!(p, TriggerPosition::new(Anchor::Center, Anchor::Pixels(120.0)));
    }

    #[test]
    fn rejects_wrong_token_count() {
        assert!(matches!(
            "top".parse::<TriggerPosition>(),
            Err(ParseError::Position(_))
        ));
        assert!(matches!(
            "top 80% extra".parse::<TriggerPosition>(),
            Err(ParseError::Position(_))
        ));
        assert!(matches!(
            "top lots%".parse::<TriggerPosition>(),
            Err(ParseError::Anchor(_))
        ));
    }

    #[test]
    fn rejects_non_finite_anchors() {
        for raw in ["top nan%", "top inf", "NaN top", "top -infpx"] {
            assert!(
                matches!(raw.parse::<TriggerPosition>(), Err(ParseError::Anchor(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn resolves_against_layout() {
        // Element at 2000..2400, viewport 1000 tall.
        let rect = Rect::new(2000.0, 400.0);
        let start: TriggerPosition = "top 85%".parse().unwrap();
        let end: TriggerPosition = "top 50%".parse().unwrap();
        assert_eq!(start.resolve(rect, 1000.0), 1150.0);
        assert_eq!(end.resolve(rect, 1000.0), 1500.0);
        let leave: TriggerPosition = "bottom top".parse().unwrap();
        assert_eq!(leave.resolve(rect, 1000.0), 2400.0);
    }

    #[test]
    fn scroll_limit_never_negative() {
        let v = Viewport {
            width: 1280.0,
            height: 900.0,
            document_height: 600.0,
        };
        assert_eq!(v.scroll_limit(), 0.0);
    }
}
