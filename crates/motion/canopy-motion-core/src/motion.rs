//! The motion context: one smooth-scroll driver plus one trigger registry.
//!
//! Hosts create a single [`Motion`] per page and pass it explicitly; there is
//! no global instance. Within a frame the driver ticks first so every trigger
//! observes the offset of the current frame.

use crate::category::Overrides;
use crate::config::MotionConfig;
use crate::ids::{ElementId, TriggerId};
use crate::markup::Markup;
use crate::outputs::Outputs;
use crate::property::PropertyMap;
use crate::registry::TriggerRegistry;
use crate::scroll::{ScrollState, ScrollTarget, ScrollToOptions, SmoothScroll};

#[derive(Debug)]
pub struct Motion {
    scroll: SmoothScroll,
    registry: TriggerRegistry,
    destroyed: bool,
}

impl Motion {
    pub fn new(cfg: MotionConfig) -> Self {
        Self {
            scroll: SmoothScroll::new(cfg.smooth),
            registry: TriggerRegistry::new(cfg.defaults),
            destroyed: false,
        }
    }

    pub fn scroll(&self) -> &SmoothScroll {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut SmoothScroll {
        &mut self.scroll
    }

    pub fn scroll_state(&self) -> &ScrollState {
        self.scroll.state()
    }

    pub fn registry(&self) -> &TriggerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TriggerRegistry {
        &mut self.registry
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Scan the page and apply every `from` state. Call after first paint.
    /// Returns the number of registered triggers.
    pub fn init_animations(&mut self, markup: &dyn Markup) -> usize {
        if self.destroyed {
            return 0;
        }
        self.scroll.set_limit(markup.viewport().scroll_limit());
        let count = self.registry.initialize(markup);
        self.registry.update(self.scroll.state(), 0.0);
        count
    }

    /// Re-measure after layout changes.
    pub fn refresh(&mut self, markup: &dyn Markup) {
        if self.destroyed {
            return;
        }
        self.scroll.set_limit(markup.viewport().scroll_limit());
        self.registry.refresh(markup);
    }

    pub fn dispose_all(&mut self) {
        self.registry.dispose_all();
    }

    /// Register a reveal of `element` from `from` to `to` and render its
    /// start state. `None` once destroyed.
    pub fn create_scroll_animation(
        &mut self,
        markup: &dyn Markup,
        element: ElementId,
        from: PropertyMap,
        to: PropertyMap,
        overrides: &Overrides,
    ) -> Option<TriggerId> {
        if self.destroyed {
            return None;
        }
        let id = self
            .registry
            .create_scroll_animation(markup, element, from, to, overrides);
        self.registry.update(self.scroll.state(), 0.0);
        Some(id)
    }

    /// Register a scrubbed parallax of `element` at `speed`.
    pub fn create_parallax(
        &mut self,
        markup: &dyn Markup,
        element: ElementId,
        speed: f32,
        overrides: &Overrides,
    ) -> Option<TriggerId> {
        if self.destroyed {
            return None;
        }
        let id = self
            .registry
            .create_parallax(markup, element, speed, overrides);
        self.registry.update(self.scroll.state(), 0.0);
        Some(id)
    }

    pub fn remove_trigger(&mut self, id: TriggerId) -> bool {
        self.registry.remove(id)
    }

    /// Scroll to `target`. Elements resolve to their top edge; an element
    /// with no layout box is ignored.
    pub fn scroll_to(
        &mut self,
        markup: &dyn Markup,
        target: ScrollTarget,
        options: &ScrollToOptions,
    ) {
        if self.destroyed {
            return;
        }
        let destination = match target {
            ScrollTarget::Element(element) => markup.measure(element).map(|rect| rect.top),
            other => self.scroll.resolve(other),
        };
        match destination {
            Some(offset) => self.scroll.scroll_to(offset, options),
            None => log::debug!("scroll_to: unresolved target {target:?}"),
        }
    }

    /// Per-frame tick at host timestamp `time_ms`.
    pub fn frame(&mut self, time_ms: f64) -> &Outputs {
        if self.destroyed {
            return self.registry.outputs();
        }
        let dt = self.scroll.raf(time_ms);
        self.registry.update(self.scroll.state(), dt)
    }

    pub fn outputs(&self) -> &Outputs {
        self.registry.outputs()
    }

    pub fn start(&mut self) {
        self.scroll.start();
    }

    pub fn stop(&mut self) {
        self.scroll.stop();
    }

    /// Tear everything down. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.registry.dispose_all();
        self.scroll.destroy();
        self.destroyed = true;
        log::debug!("motion context destroyed");
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}
