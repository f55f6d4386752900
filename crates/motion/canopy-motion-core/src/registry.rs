//! Trigger registry: owns every active trigger, its effects and playhead.
//!
//! Lifecycle: `initialize` (scan markers once) → `update` each frame →
//! `refresh` after layout changes → `dispose_all` before navigating away.

use hashbrown::HashMap;
use indexmap::IndexMap;

use crate::builders::{self, Binding};
use crate::category::{attr, Category, Overrides};
use crate::config::EffectDefaults;
use crate::effect::{AnimationEffect, Playhead, PlayheadEvent};
use crate::ids::{ElementId, IdAllocator, TriggerId};
use crate::markup::Markup;
use crate::outputs::{MotionEvent, Outputs, StyleChange};
use crate::property::PropertyMap;
use crate::scroll::ScrollState;
use crate::trigger::{Bounds, ToggleAction, TriggerDefinition, TriggerMode, TriggerObserver};

/// One trigger with the effects it governs.
#[derive(Debug)]
struct Registration {
    id: TriggerId,
    category: Option<Category>,
    trigger: TriggerDefinition,
    effects: Vec<AnimationEffect>,
    bounds: Bounds,
    observer: TriggerObserver,
    playhead: Playhead,
}

#[derive(Debug, Default)]
pub struct TriggerRegistry {
    defaults: EffectDefaults,
    ids: IdAllocator,
    registrations: Vec<Registration>,
    initialized: bool,
    /// Last values written per element, used to emit only real changes.
    rendered: HashMap<ElementId, PropertyMap>,
    outputs: Outputs,
}

impl TriggerRegistry {
    pub fn new(defaults: EffectDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Scan the markup once per category and register every marked element.
    /// A second call before [`dispose_all`](Self::dispose_all) does nothing.
    /// Returns the number of registered triggers.
    pub fn initialize(&mut self, markup: &dyn Markup) -> usize {
        if self.initialized {
            log::debug!("scroll triggers already initialized; skipping scan");
            return self.len();
        }
        warn_unknown_markers(markup);
        for category in Category::ALL {
            for element in category.discover(markup) {
                for binding in builders::build(category, markup, element) {
                    self.register(binding, markup);
                }
            }
        }
        self.initialized = true;
        log::debug!("initialized {} scroll triggers", self.len());
        self.len()
    }

    /// Add one binding and measure its band against the current layout.
    pub fn register(&mut self, binding: Binding, markup: &dyn Markup) -> TriggerId {
        let id = self.ids.alloc_trigger();
        let total = binding
            .effects
            .iter()
            .map(AnimationEffect::total_duration)
            .fold(0.0, f32::max);
        let bounds = binding.trigger.measure(markup);
        self.registrations.push(Registration {
            id,
            category: binding.category,
            trigger: binding.trigger,
            effects: binding.effects,
            bounds,
            observer: TriggerObserver::default(),
            playhead: Playhead::new(total),
        });
        id
    }

    /// Discrete reveal of `element` between `from` and `to`.
    pub fn create_scroll_animation(
        &mut self,
        markup: &dyn Markup,
        element: ElementId,
        from: PropertyMap,
        to: PropertyMap,
        overrides: &Overrides,
    ) -> TriggerId {
        let binding = builders::scroll_animation(element, from, to, &self.defaults, overrides);
        self.register(binding, markup)
    }

    /// Scrubbed vertical parallax of `element` at `speed`.
    pub fn create_parallax(
        &mut self,
        markup: &dyn Markup,
        element: ElementId,
        speed: f32,
        overrides: &Overrides,
    ) -> TriggerId {
        let binding = builders::custom_parallax(markup, element, speed, overrides);
        self.register(binding, markup)
    }

    /// Re-measure every band against the current layout. Does not rescan.
    pub fn refresh(&mut self, markup: &dyn Markup) {
        for reg in &mut self.registrations {
            reg.bounds = reg.trigger.measure(markup);
        }
        log::debug!("refreshed {} scroll triggers", self.registrations.len());
    }

    /// Drop every registration. Safe to call repeatedly.
    pub fn dispose_all(&mut self) {
        if !self.registrations.is_empty() {
            log::debug!("disposing {} scroll triggers", self.registrations.len());
        }
        self.registrations.clear();
        self.rendered.clear();
        self.outputs.clear();
        self.initialized = false;
    }

    /// Drop a single registration. Returns false for unknown ids.
    pub fn remove(&mut self, id: TriggerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        before != self.registrations.len()
    }

    /// Evaluate every trigger against the current offset, advance playheads by
    /// `dt` seconds and collect the style changes of this frame.
    pub fn update(&mut self, scroll: &ScrollState, dt: f32) -> &Outputs {
        self.outputs.clear();
        let offset = scroll.offset;
        let mut frame: IndexMap<ElementId, PropertyMap> = IndexMap::new();

        for reg in &mut self.registrations {
            let discrete = reg.trigger.mode == TriggerMode::Discrete;
            for callback in reg.observer.observe(&reg.bounds, offset) {
                let action = if discrete {
                    reg.trigger.actions.action(callback)
                } else {
                    ToggleAction::None
                };
                log::trace!("trigger {} {callback:?} -> {action}", reg.id.0);
                reg.playhead.apply(action);
                self.outputs.push_event(MotionEvent::Toggled {
                    trigger: reg.id,
                    callback,
                    action,
                });
            }

            if discrete {
                match reg.playhead.advance(dt) {
                    Some(PlayheadEvent::Completed) => {
                        self.outputs.push_event(MotionEvent::Completed { trigger: reg.id })
                    }
                    Some(PlayheadEvent::Reversed) => {
                        self.outputs.push_event(MotionEvent::Reversed { trigger: reg.id })
                    }
                    None => {}
                }
            } else {
                reg.playhead.seek_progress(reg.bounds.progress(offset));
            }

            let time = reg.playhead.time();
            for effect in &reg.effects {
                for (index, &target) in effect.targets.iter().enumerate() {
                    frame
                        .entry(target)
                        .or_default()
                        .extend(effect.sample(index, time));
                }
            }
        }

        for (element, values) in frame {
            if self.rendered.get(&element) != Some(&values) {
                self.rendered.insert(element, values.clone());
                self.outputs.push_change(StyleChange { element, values });
            }
        }
        &self.outputs
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn trigger_ids(&self) -> Vec<TriggerId> {
        self.registrations.iter().map(|r| r.id).collect()
    }

    /// Triggers registered by the scan for `category`.
    pub fn ids_for(&self, category: Category) -> Vec<TriggerId> {
        self.registrations
            .iter()
            .filter(|r| r.category == Some(category))
            .map(|r| r.id)
            .collect()
    }

    fn find(&self, id: TriggerId) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.id == id)
    }

    pub fn definition(&self, id: TriggerId) -> Option<&TriggerDefinition> {
        self.find(id).map(|r| &r.trigger)
    }

    pub fn effects(&self, id: TriggerId) -> Option<&[AnimationEffect]> {
        self.find(id).map(|r| r.effects.as_slice())
    }

    pub fn bounds(&self, id: TriggerId) -> Option<Bounds> {
        self.find(id).map(|r| r.bounds)
    }

    pub fn playhead(&self, id: TriggerId) -> Option<&Playhead> {
        self.find(id).map(|r| &r.playhead)
    }

    pub fn is_active(&self, id: TriggerId) -> bool {
        self.find(id).is_some_and(|r| r.observer.is_active())
    }

    /// Last values written for `element`.
    pub fn rendered(&self, element: ElementId) -> Option<&PropertyMap> {
        self.rendered.get(&element)
    }
}

fn warn_unknown_markers(markup: &dyn Markup) {
    for element in markup.select_all(attr::ANIMATE) {
        if let Some(value) = markup.attribute(element, attr::ANIMATE) {
            if let Err(err) = value.parse::<Category>() {
                log::warn!("element {}: {err}", element.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Viewport};
    use crate::markup::StaticMarkup;
    use crate::property::{props, Property};

    fn at(offset: f32) -> ScrollState {
        ScrollState {
            offset,
            ..ScrollState::default()
        }
    }

    fn page() -> StaticMarkup {
        StaticMarkup::new(Viewport {
            width: 1280.0,
            height: 1000.0,
            document_height: 6000.0,
        })
    }

    #[test]
    fn initialize_twice_is_a_no_op() {
        let mut m = page();
        m.push(None, &[(attr::ANIMATE, "fade-up")], Rect::new(2000.0, 200.0));
        let mut reg = TriggerRegistry::default();
        assert_eq!(reg.initialize(&m), 1);
        assert_eq!(reg.initialize(&m), 1);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn first_frame_renders_from_state() {
        let mut m = page();
        let el = m.push(None, &[(attr::ANIMATE, "fade-up")], Rect::new(2000.0, 200.0));
        let mut reg = TriggerRegistry::default();
        reg.initialize(&m);
        let out = reg.update(&at(0.0), 0.0);
        let change = out.change_for(el).unwrap();
        assert_eq!(change.values[&Property::Opacity], 0.0);
        assert_eq!(change.values[&Property::Y], 60.0);
        // Nothing moved, nothing to report.
        assert!(reg.update(&at(0.0), 0.016).changes.is_empty());
    }

    #[test]
    fn unknown_markers_are_skipped() {
        let mut m = page();
        m.push(None, &[(attr::ANIMATE, "wiggle")], Rect::default());
        let mut reg = TriggerRegistry::default();
        assert_eq!(reg.initialize(&m), 0);
        assert!(reg.is_initialized());
    }

    #[test]
    fn remove_single_trigger() {
        let mut m = page();
        let el = m.push(None, &[], Rect::new(3000.0, 100.0));
        let mut reg = TriggerRegistry::default();
        let id = reg.create_scroll_animation(
            &m,
            el,
            props(&[(Property::Opacity, 0.0)]),
            props(&[(Property::Opacity, 1.0)]),
            &Overrides::default(),
        );
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.effects(id).unwrap()[0].duration, 1.0);
        assert!(reg.remove(id));
        assert!(!reg.remove(id));
        assert!(reg.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_dispose() {
        let mut m = page();
        m.push(None, &[(attr::ANIMATE, "fade-up")], Rect::new(2000.0, 200.0));
        let mut reg = TriggerRegistry::default();
        reg.initialize(&m);
        let first = reg.trigger_ids();
        reg.dispose_all();
        reg.initialize(&m);
        let second = reg.trigger_ids();
        assert_eq!(first.len(), second.len());
        assert!(second.iter().all(|id| !first.contains(id)));
    }

    #[test]
    fn later_registration_wins_shared_properties() {
        let mut m = page();
        let el = m.push(None, &[], Rect::new(0.0, 100.0));
        let mut reg = TriggerRegistry::default();
        reg.create_parallax(&m, el, 0.5, &Overrides::default());
        reg.create_scroll_animation(
            &m,
            el,
            props(&[(Property::Opacity, 0.2)]),
            props(&[(Property::Opacity, 1.0)]),
            &Overrides::default(),
        );
        let out = reg.update(&at(0.0), 0.0);
        let values = &out.change_for(el).unwrap().values;
        assert!(values.contains_key(&Property::Y));
        assert!(values.contains_key(&Property::Opacity));
    }
}
