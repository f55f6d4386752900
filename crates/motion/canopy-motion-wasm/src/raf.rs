//! `requestAnimationFrame` loop guarded by a liveness flag.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type FrameClosure = Closure<dyn FnMut(f64)>;

struct Inner {
    closure: RefCell<Option<FrameClosure>>,
    callback: RefCell<Box<dyn FnMut(f64)>>,
    running: Cell<bool>,
    raf_id: Cell<i32>,
}

/// Calls its callback with the rAF timestamp (ms) every display frame until
/// stopped or dropped.
pub struct RafLoop {
    inner: Rc<Inner>,
}

impl RafLoop {
    pub fn new(callback: impl FnMut(f64) + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            // A frame already queued when the loop stopped must not run.
            if !inner.running.get() {
                return;
            }
            inner.callback.borrow_mut()(timestamp_ms);
            if inner.running.get() {
                if let Some(ref closure) = *inner.closure.borrow() {
                    inner
                        .raf_id
                        .set(request_animation_frame(closure.as_ref().unchecked_ref()));
                }
            }
        }) as Box<dyn FnMut(f64)>);

        self.inner
            .raf_id
            .set(request_animation_frame(closure.as_ref().unchecked_ref()));
        *self.inner.closure.borrow_mut() = Some(closure);
    }

    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.raf_id.get());
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        // Breaks the closure -> inner -> closure cycle.
        self.inner.closure.borrow_mut().take();
    }
}

impl std::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .finish()
    }
}
