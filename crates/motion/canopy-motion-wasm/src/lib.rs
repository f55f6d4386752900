use std::cell::RefCell;
use std::rc::Rc;

use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Element, Event, EventTarget, WheelEvent};

use canopy_motion_core::{
    ElementId, Motion, MotionConfig, Orientation, Overrides, PropertyMap, ScrollTarget,
    ScrollToOptions, TriggerId,
};

mod dom;
mod raf;

pub use dom::{apply_changes, DomMarkup};
pub use raf::RafLoop;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Motion context bound to the live page.
struct Runtime {
    motion: Motion,
    markup: DomMarkup,
    /// Last offset written to the native scroll position.
    written: f32,
}

impl Runtime {
    fn horizontal(&self) -> bool {
        self.motion.scroll().config().orientation == Orientation::Horizontal
    }

    fn native_position(&self) -> f32 {
        let window = self.markup.window();
        let pos = if self.horizontal() {
            window.scroll_x()
        } else {
            window.scroll_y()
        };
        pos.unwrap_or(0.0) as f32
    }

    fn frame(&mut self, time_ms: f64) {
        let outputs = self.motion.frame(time_ms);
        apply_changes(&self.markup, &outputs.changes);
        let offset = self.motion.scroll_state().offset;
        if offset != self.written {
            self.written = offset;
            let offset = f64::from(offset);
            if self.horizontal() {
                self.markup.window().scroll_to_with_x_and_y(offset, 0.0);
            } else {
                self.markup.window().scroll_to_with_x_and_y(0.0, offset);
            }
        }
    }

    fn native_scroll(&mut self) {
        let pos = self.native_position();
        self.motion.scroll_mut().on_native_scroll(pos);
        if !self.motion.scroll().is_animating() {
            self.written = self.motion.scroll_state().offset;
        }
    }

    fn wheel(&mut self, event: &WheelEvent) {
        // Pinch-zoom arrives as ctrl+wheel; leave it to the browser.
        if event.ctrl_key() {
            return;
        }
        let consumed = self
            .motion
            .scroll_mut()
            .on_wheel(event.delta_x() as f32, event.delta_y() as f32);
        if consumed {
            event.prevent_default();
        }
    }

    fn resolve_target(&self, target: &JsValue) -> Result<ScrollTarget, JsError> {
        if let Some(offset) = target.as_f64() {
            return Ok(ScrollTarget::Offset(offset as f32));
        }
        match target.as_string().as_deref() {
            Some("top" | "start") => Ok(ScrollTarget::Top),
            Some("bottom" | "end") => Ok(ScrollTarget::Bottom),
            _ => self
                .resolve_element("scrollTo", target)
                .map(ScrollTarget::Element),
        }
    }

    /// A CSS selector or an element.
    fn resolve_element(&self, caller: &str, target: &JsValue) -> Result<ElementId, JsError> {
        if let Some(selector) = target.as_string() {
            return self.markup.query(&selector).ok_or_else(|| {
                JsError::new(&format!("{caller}: no element matches `{selector}`"))
            });
        }
        if let Some(el) = target.dyn_ref::<Element>() {
            return Ok(self.markup.intern(el.clone()));
        }
        Err(JsError::new(&format!("{caller}: expected a selector or an element")))
    }
}

fn overrides_from(caller: &str, options: JsValue) -> Result<Overrides, JsError> {
    if jsvalue_is_undefined_or_null(&options) {
        return Ok(Overrides::default());
    }
    swb::from_value(options).map_err(|e| JsError::new(&format!("{caller} options error: {e}")))
}

fn properties_from(caller: &str, value: JsValue) -> Result<PropertyMap, JsError> {
    swb::from_value(value).map_err(|e| JsError::new(&format!("{caller} properties error: {e}")))
}

/// DOM listener removed again on destroy.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        passive: bool,
        closure: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target,
            kind,
            closure,
        })
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

struct Attached {
    runtime: Rc<RefCell<Runtime>>,
    listeners: Vec<Listener>,
    frames: RafLoop,
}

#[wasm_bindgen]
pub struct CanopyMotion {
    /// `None` without a rendering environment, and after destroy.
    inner: Option<Attached>,
}

#[wasm_bindgen]
impl CanopyMotion {
    /// Create the motion context and start the frame loop. Pass a config
    /// object or undefined/null for defaults.
    /// Example:
    ///   new CanopyMotion({ smooth: { lerp: 0.08 } })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CanopyMotion, JsError> {
        console_error_panic_hook::set_once();

        let cfg: MotionConfig = if jsvalue_is_undefined_or_null(&config) {
            MotionConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let Some(window) = web_sys::window() else {
            log::warn!("no window; motion is disabled");
            return Ok(CanopyMotion { inner: None });
        };
        let Some(document) = window.document() else {
            log::warn!("no document; motion is disabled");
            return Ok(CanopyMotion { inner: None });
        };

        let runtime = Rc::new(RefCell::new(Runtime {
            motion: Motion::new(cfg),
            markup: DomMarkup::new(window.clone(), document),
            written: 0.0,
        }));
        {
            let mut rt = runtime.borrow_mut();
            let pos = rt.native_position();
            rt.motion.scroll_mut().on_native_scroll(pos);
            rt.written = pos;
        }

        let listeners = attach_listeners(&window, &runtime)
            .map_err(|e| JsError::new(&format!("listener error: {e:?}")))?;

        let frame_rt = Rc::clone(&runtime);
        let frames = RafLoop::new(move |time_ms| {
            if let Ok(mut rt) = frame_rt.try_borrow_mut() {
                rt.frame(time_ms);
            }
        });
        frames.start();

        Ok(CanopyMotion {
            inner: Some(Attached {
                runtime,
                listeners,
                frames,
            }),
        })
    }

    fn with_runtime<R>(&self, f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
        let attached = self.inner.as_ref()?;
        let mut rt = attached.runtime.try_borrow_mut().ok()?;
        Some(f(&mut rt))
    }

    /// Scan the page for animation markers and apply their start states.
    /// Returns the number of triggers.
    #[wasm_bindgen(js_name = initAnimations)]
    pub fn init_animations(&mut self) -> u32 {
        self.with_runtime(|rt| {
            let Runtime { motion, markup, .. } = rt;
            let count = motion.init_animations(markup);
            apply_changes(markup, &motion.outputs().changes);
            count as u32
        })
        .unwrap_or(0)
    }

    /// Re-measure trigger boundaries after layout changes.
    #[wasm_bindgen]
    pub fn refresh(&mut self) {
        self.with_runtime(|rt| {
            let Runtime { motion, markup, .. } = rt;
            motion.refresh(markup);
        });
    }

    #[wasm_bindgen(js_name = disposeAll)]
    pub fn dispose_all(&mut self) {
        self.with_runtime(|rt| {
            rt.motion.dispose_all();
            rt.markup.clear();
        });
    }

    #[wasm_bindgen]
    pub fn start(&mut self) {
        self.with_runtime(|rt| rt.motion.start());
    }

    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.with_runtime(|rt| rt.motion.stop());
    }

    /// Scroll to a number (px), `"top"`, `"bottom"`, a CSS selector or an
    /// element. `options` matches ScrollToOptions; undefined for defaults.
    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(&mut self, target: JsValue, options: JsValue) -> Result<(), JsError> {
        let opts: ScrollToOptions = if jsvalue_is_undefined_or_null(&options) {
            ScrollToOptions::default()
        } else {
            swb::from_value(options)
                .map_err(|e| JsError::new(&format!("scrollTo options error: {e}")))?
        };
        self.with_runtime(|rt| {
            let target = rt.resolve_target(&target)?;
            let Runtime { motion, markup, .. } = rt;
            motion.scroll_to(markup, target, &opts);
            Ok(())
        })
        .unwrap_or(Ok(()))
    }

    /// Animate `target` (selector or element) between two property objects
    /// such as `{ opacity: 0, y: 40 }` when it scrolls into view. `options`
    /// takes `start`, `end`, `ease`, `duration` and `actions`. Returns the
    /// trigger id, or undefined when detached.
    #[wasm_bindgen(js_name = createScrollAnimation)]
    pub fn create_scroll_animation(
        &mut self,
        target: JsValue,
        from: JsValue,
        to: JsValue,
        options: JsValue,
    ) -> Result<Option<u32>, JsError> {
        const CALLER: &str = "createScrollAnimation";
        let from = properties_from(CALLER, from)?;
        let to = properties_from(CALLER, to)?;
        let overrides = overrides_from(CALLER, options)?;
        self.with_runtime(|rt| {
            let element = rt.resolve_element(CALLER, &target)?;
            let Runtime { motion, markup, .. } = &mut *rt;
            let id = motion.create_scroll_animation(markup, element, from, to, &overrides);
            apply_changes(markup, &motion.outputs().changes);
            Ok(id.map(|id| id.0))
        })
        .unwrap_or(Ok(None))
    }

    /// Scrubbed vertical parallax of `target` moving `speed * 100` px across
    /// its parent's pass through the viewport.
    #[wasm_bindgen(js_name = createParallax)]
    pub fn create_parallax(
        &mut self,
        target: JsValue,
        speed: f32,
        options: JsValue,
    ) -> Result<Option<u32>, JsError> {
        const CALLER: &str = "createParallax";
        if !speed.is_finite() {
            return Err(JsError::new("createParallax: speed must be a finite number"));
        }
        let overrides = overrides_from(CALLER, options)?;
        self.with_runtime(|rt| {
            let element = rt.resolve_element(CALLER, &target)?;
            let Runtime { motion, markup, .. } = &mut *rt;
            let id = motion.create_parallax(markup, element, speed, &overrides);
            apply_changes(markup, &motion.outputs().changes);
            Ok(id.map(|id| id.0))
        })
        .unwrap_or(Ok(None))
    }

    /// Drop one trigger created by a scan or a `create*` call. Styles it
    /// already wrote stay in place.
    #[wasm_bindgen(js_name = removeTrigger)]
    pub fn remove_trigger(&mut self, id: u32) -> bool {
        self.with_runtime(|rt| rt.motion.remove_trigger(TriggerId(id)))
            .unwrap_or(false)
    }

    /// Stop the frame loop, remove listeners and drop every trigger.
    /// Safe to call more than once.
    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        let Some(attached) = self.inner.take() else {
            return;
        };
        attached.frames.stop();
        for listener in &attached.listeners {
            listener.detach();
        }
        if let Ok(mut rt) = attached.runtime.try_borrow_mut() {
            rt.motion.destroy();
            rt.markup.clear();
        };
    }

    #[wasm_bindgen(js_name = isDestroyed)]
    pub fn is_destroyed(&self) -> bool {
        self.inner.is_none()
    }

    #[wasm_bindgen(js_name = triggerCount)]
    pub fn trigger_count(&self) -> u32 {
        self.with_runtime(|rt| rt.motion.registry().len() as u32)
            .unwrap_or(0)
    }

    /// Current ScrollState as a plain object, or undefined when detached.
    #[wasm_bindgen(js_name = scrollState)]
    pub fn scroll_state(&self) -> Result<JsValue, JsError> {
        match self.with_runtime(|rt| swb::to_value(rt.motion.scroll_state())) {
            Some(value) => value.map_err(|e| JsError::new(&format!("scrollState error: {e}"))),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

fn attach_listeners(
    window: &web_sys::Window,
    runtime: &Rc<RefCell<Runtime>>,
) -> Result<Vec<Listener>, JsValue> {
    let target: EventTarget = window.clone().into();

    let rt = Rc::clone(runtime);
    let wheel = Closure::wrap(Box::new(move |event: Event| {
        let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        if let Ok(mut rt) = rt.try_borrow_mut() {
            rt.wheel(wheel);
        }
    }) as Box<dyn FnMut(Event)>);

    let rt = Rc::clone(runtime);
    let scroll = Closure::wrap(Box::new(move |_event: Event| {
        if let Ok(mut rt) = rt.try_borrow_mut() {
            rt.native_scroll();
        }
    }) as Box<dyn FnMut(Event)>);

    let rt = Rc::clone(runtime);
    let resize = Closure::wrap(Box::new(move |_event: Event| {
        if let Ok(mut rt) = rt.try_borrow_mut() {
            let Runtime { motion, markup, .. } = &mut *rt;
            motion.refresh(markup);
        }
    }) as Box<dyn FnMut(Event)>);

    Ok(vec![
        // Not passive: consumed wheel input cancels native scrolling.
        Listener::attach(target.clone(), "wheel", false, wheel)?,
        Listener::attach(target.clone(), "scroll", true, scroll)?,
        Listener::attach(target, "resize", true, resize)?,
    ])
}

/// ABI version for the JS wrapper.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
