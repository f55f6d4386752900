//! Output contracts from the trigger registry.
//!
//! Outputs carry only the style changes of this frame, keyed by element, and
//! a separate list of semantic events. Adapters apply changes to the page and
//! forward events to whoever listens.

use serde::{Deserialize, Serialize};

use crate::ids::{ElementId, TriggerId};
use crate::property::PropertyMap;
use crate::trigger::{Callback, ToggleAction};

/// Full computed style of one element whose values changed this frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleChange {
    pub element: ElementId,
    pub values: PropertyMap,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionEvent {
    /// A trigger band edge was crossed.
    Toggled {
        trigger: TriggerId,
        callback: Callback,
        action: ToggleAction,
    },
    /// Forward playback reached the end of the clock.
    Completed { trigger: TriggerId },
    /// Backward playback reached the start of the clock.
    Reversed { trigger: TriggerId },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    pub changes: Vec<StyleChange>,
    pub events: Vec<MotionEvent>,
}

impl Outputs {
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    pub fn push_change(&mut self, change: StyleChange) {
        self.changes.push(change);
    }

    pub fn push_event(&mut self, event: MotionEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Latest change for `element`, if it changed this frame.
    pub fn change_for(&self, element: ElementId) -> Option<&StyleChange> {
        self.changes.iter().rev().find(|c| c.element == element)
    }
}
