//! Animatable style properties.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    Opacity,
    /// Horizontal translation in px.
    X,
    /// Vertical translation in px.
    Y,
    /// Horizontal translation as a percentage of the element width.
    XPercent,
    /// Vertical translation as a percentage of the element height.
    YPercent,
    Scale,
}

impl Property {
    /// Value of the property on an unstyled element.
    pub fn identity(self) -> f32 {
        match self {
            Self::Opacity | Self::Scale => 1.0,
            Self::X | Self::Y | Self::XPercent | Self::YPercent => 0.0,
        }
    }
}

/// Ordered property → value map used for effect endpoints and frame styles.
pub type PropertyMap = IndexMap<Property, f32>;

pub fn props(pairs: &[(Property, f32)]) -> PropertyMap {
    pairs.iter().copied().collect()
}

/// CSS `transform` for the translation/scale entries of `values`, or `None`
/// when the map carries no transform property.
pub fn transform_css(values: &PropertyMap) -> Option<String> {
    let get = |p: Property| values.get(&p).copied();
    let mut parts = Vec::new();
    if get(Property::XPercent).is_some() || get(Property::YPercent).is_some() {
        parts.push(format!(
            "translate({}%, {}%)",
            get(Property::XPercent).unwrap_or(0.0),
            get(Property::YPercent).unwrap_or(0.0)
        ));
    }
    if get(Property::X).is_some() || get(Property::Y).is_some() {
        parts.push(format!(
            "translate3d({}px, {}px, 0px)",
            get(Property::X).unwrap_or(0.0),
            get(Property::Y).unwrap_or(0.0)
        ));
    }
    if let Some(scale) = get(Property::Scale) {
        parts.push(format!("scale({scale})"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
