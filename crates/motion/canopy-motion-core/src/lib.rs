//! Canopy Motion Core (engine-agnostic)
//!
//! Scroll-driven motion for the Canopy site: a smooth-scroll driver that owns a
//! virtual scroll offset, and a trigger registry that binds declaratively marked
//! elements to scroll-position observers. The crate never touches a browser API;
//! hosts reach the page through [`Markup`] and apply the per-frame [`Outputs`].

pub mod builders;
pub mod category;
pub mod config;
pub mod ease;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod markup;
pub mod motion;
pub mod outputs;
pub mod property;
pub mod registry;
pub mod scroll;
pub mod trigger;

// Re-exports for consumers (adapters)
pub use builders::Binding;
pub use category::{Category, Overrides};
pub use config::{EffectDefaults, GestureOrientation, MotionConfig, Orientation, SmoothScrollConfig};
pub use ease::Ease;
pub use effect::{AnimationEffect, Playhead, PlayheadDirection};
pub use error::ParseError;
pub use geometry::{Anchor, Rect, TriggerPosition, Viewport};
pub use ids::{ElementId, SubscriptionId, TriggerId};
pub use markup::{Markup, MarkupError, StaticMarkup};
pub use motion::Motion;
pub use outputs::{MotionEvent, Outputs, StyleChange};
pub use property::{Property, PropertyMap};
pub use registry::TriggerRegistry;
pub use scroll::{ScrollDirection, ScrollState, ScrollTarget, ScrollToOptions, SmoothScroll};
pub use trigger::{
    Bounds, Callback, ToggleAction, ToggleActions, TriggerDefinition, TriggerMode,
    TriggerObserver, TriggerStart,
};
