//! Smooth-scroll driver.
//!
//! Owns a virtual scroll offset decoupled from native scrolling. User input
//! moves a target and the offset follows it with exponential damping; a
//! programmatic [`scroll_to`](SmoothScroll::scroll_to) runs a timed, eased
//! animation instead. Hosts call [`raf`](SmoothScroll::raf) once per display
//! frame and write the resulting offset back to the page.

use serde::{Deserialize, Serialize};

use crate::config::{GestureOrientation, SmoothScrollConfig};
use crate::ease::Ease;
use crate::ids::{ElementId, IdAllocator, SubscriptionId};

/// Offsets closer than this to their target snap onto it.
const SETTLE_EPSILON: f32 = 0.5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    #[default]
    Forward,
    Backward,
}

/// Snapshot of the driver, shared read-only with observers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub offset: f32,
    /// Offset change during the last frame.
    pub velocity: f32,
    pub direction: ScrollDirection,
    /// False while stopped (modal/overlay) or after destroy.
    pub is_running: bool,
    /// True while a scroll animation is in flight.
    pub is_scrolling: bool,
    /// Largest reachable offset.
    pub limit: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0.0,
            velocity: 0.0,
            direction: ScrollDirection::Forward,
            is_running: true,
            is_scrolling: false,
            limit: f32::INFINITY,
        }
    }
}

/// Destination of a programmatic scroll.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollTarget {
    Offset(f32),
    Top,
    Bottom,
    /// Resolved through the page's markup by [`Motion`](crate::Motion).
    Element(ElementId),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollToOptions {
    /// Added to the resolved destination.
    pub offset: f32,
    /// Seconds; zero or less jumps immediately. Unset uses the driver's
    /// configured duration.
    pub duration: Option<f32>,
    /// Unset uses the driver's configured easing.
    pub easing: Option<Ease>,
    pub immediate: bool,
    /// Ignore user input until the animation finishes.
    pub lock: bool,
}

impl Default for ScrollToOptions {
    fn default() -> Self {
        Self {
            offset: 0.0,
            duration: None,
            easing: None,
            immediate: false,
            lock: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum ScrollAnimation {
    /// Input-driven: follow `to` with exponential damping.
    Damped { to: f32, lerp: f32 },
    /// Programmatic: eased interpolation over a fixed duration.
    Timed {
        from: f32,
        to: f32,
        duration: f32,
        elapsed: f32,
        easing: Ease,
        lock: bool,
    },
}

impl ScrollAnimation {
    fn destination(&self) -> f32 {
        match *self {
            Self::Damped { to, .. } | Self::Timed { to, .. } => to,
        }
    }

    fn is_locked(&self) -> bool {
        matches!(self, Self::Timed { lock: true, .. })
    }

    /// Step by `dt` seconds; returns the new offset and whether it settled.
    fn advance(&mut self, current: f32, dt: f32) -> (f32, bool) {
        match self {
            Self::Damped { to, lerp } => {
                let value = damp(current, *to, *lerp * 60.0, dt);
                if (value - *to).abs() < SETTLE_EPSILON {
                    (*to, true)
                } else {
                    (value, false)
                }
            }
            Self::Timed {
                from,
                to,
                duration,
                elapsed,
                easing,
                ..
            } => {
                *elapsed += dt;
                let linear = if *duration > 0.0 {
                    (*elapsed / *duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                if linear >= 1.0 {
                    (*to, true)
                } else {
                    (*from + (*to - *from) * easing.apply(linear), false)
                }
            }
        }
    }
}

/// Frame-rate independent exponential approach of `current` toward `target`.
fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    let t = 1.0 - (-lambda * dt).exp();
    current + (target - current) * t
}

type Subscriber = Box<dyn FnMut(&ScrollState)>;

pub struct SmoothScroll {
    cfg: SmoothScrollConfig,
    state: ScrollState,
    /// Where input has asked the offset to go.
    target: f32,
    animation: Option<ScrollAnimation>,
    last_time: Option<f64>,
    destroyed: bool,
    ids: IdAllocator,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl std::fmt::Debug for SmoothScroll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmoothScroll")
            .field("state", &self.state)
            .field("target", &self.target)
            .field("animation", &self.animation)
            .field("destroyed", &self.destroyed)
            .field("subscribers_len", &self.subscribers.len())
            .finish()
    }
}

impl SmoothScroll {
    pub fn new(cfg: SmoothScrollConfig) -> Self {
        Self {
            cfg,
            state: ScrollState::default(),
            target: 0.0,
            animation: None,
            last_time: None,
            destroyed: false,
            ids: IdAllocator::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn config(&self) -> &SmoothScrollConfig {
        &self.cfg
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn offset(&self) -> f32 {
        self.state.offset
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Final offset of the in-flight animation, if any.
    pub fn destination(&self) -> Option<f32> {
        self.animation.as_ref().map(ScrollAnimation::destination)
    }

    /// Resume input handling after [`stop`](Self::stop).
    pub fn start(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.is_running = true;
    }

    /// Freeze the offset (modal/overlay). State stays readable.
    pub fn stop(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.is_running = false;
        self.cancel_animation();
    }

    /// Record the scrollable range after layout changes.
    pub fn set_limit(&mut self, limit: f32) {
        if self.destroyed {
            return;
        }
        self.state.limit = limit.max(0.0);
        if !self.cfg.infinite && self.state.offset > self.state.limit {
            self.state.offset = self.state.limit;
            self.target = self.state.limit;
        }
    }

    fn clamp(&self, offset: f32) -> f32 {
        if self.cfg.infinite {
            offset
        } else {
            offset.clamp(0.0, self.state.limit)
        }
    }

    fn cancel_animation(&mut self) {
        self.animation = None;
        self.target = self.state.offset;
        self.state.is_scrolling = false;
    }

    /// Register a hook called with the new state whenever the offset moves.
    pub fn on_scroll(&mut self, callback: impl FnMut(&ScrollState) + 'static) -> SubscriptionId {
        let id = self.ids.alloc_subscription();
        if !self.destroyed {
            self.subscribers.push((id, Box::new(callback)));
        }
        id
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    fn gesture_delta(&self, dx: f32, dy: f32) -> f32 {
        match self.cfg.gesture_orientation {
            GestureOrientation::Vertical => dy,
            GestureOrientation::Horizontal => dx,
            GestureOrientation::Both => {
                if dx.abs() > dy.abs() {
                    dx
                } else {
                    dy
                }
            }
        }
    }

    /// Feed a wheel delta in px. Returns true when the driver consumed the
    /// input, in which case the host should suppress native scrolling.
    pub fn on_wheel(&mut self, dx: f32, dy: f32) -> bool {
        let delta = self.gesture_delta(dx, dy) * self.cfg.wheel_multiplier;
        self.user_input(delta, self.cfg.smooth_wheel)
    }

    /// Feed a touch drag delta in px.
    pub fn on_touch(&mut self, dx: f32, dy: f32) -> bool {
        let delta = self.gesture_delta(dx, dy) * self.cfg.touch_multiplier;
        self.user_input(delta, true)
    }

    fn user_input(&mut self, delta: f32, smooth: bool) -> bool {
        if self.destroyed || !self.state.is_running {
            return false;
        }
        if self.animation.as_ref().is_some_and(ScrollAnimation::is_locked) {
            return true;
        }
        if delta == 0.0 {
            return false;
        }
        // User input replaces any programmatic scroll.
        let base = match self.animation {
            Some(ScrollAnimation::Damped { to, .. }) => to,
            _ => self.state.offset,
        };
        self.target = self.clamp(base + delta);
        if smooth {
            self.animation = Some(ScrollAnimation::Damped {
                to: self.target,
                lerp: self.cfg.lerp,
            });
            self.state.is_scrolling = true;
        } else {
            self.animation = None;
            self.jump(self.target);
        }
        true
    }

    /// Sync with a native scroll position (keyboard, scrollbar, anchor jump).
    /// Ignored while an animation is in flight, since the host echoes our own
    /// writes back as native scroll events.
    pub fn on_native_scroll(&mut self, position: f32) {
        if self.destroyed || self.animation.is_some() {
            return;
        }
        let position = self.clamp(position);
        if position != self.state.offset {
            self.target = position;
            self.jump(position);
        }
    }

    /// Animate to absolute `destination` (plus `options.offset`). Replaces any
    /// in-flight animation.
    pub fn scroll_to(&mut self, destination: f32, options: &ScrollToOptions) {
        if self.destroyed || !self.state.is_running {
            return;
        }
        let to = self.clamp(destination + options.offset);
        let duration = options.duration.unwrap_or(self.cfg.duration);
        self.target = to;
        if options.immediate || duration <= 0.0 {
            self.animation = None;
            self.state.is_scrolling = false;
            self.jump(to);
            return;
        }
        self.animation = Some(ScrollAnimation::Timed {
            from: self.state.offset,
            to,
            duration,
            elapsed: 0.0,
            easing: options.easing.unwrap_or(self.cfg.easing),
            lock: options.lock,
        });
        self.state.is_scrolling = true;
    }

    /// Offset for `Top`/`Bottom`/`Offset`; elements need markup and return `None`.
    pub fn resolve(&self, target: ScrollTarget) -> Option<f32> {
        match target {
            ScrollTarget::Offset(offset) => Some(offset),
            ScrollTarget::Top => Some(0.0),
            ScrollTarget::Bottom => Some(if self.state.limit.is_finite() {
                self.state.limit
            } else {
                self.state.offset
            }),
            ScrollTarget::Element(_) => None,
        }
    }

    /// Per-frame tick at host timestamp `time_ms`. Returns the elapsed seconds
    /// since the previous tick (zero on the first).
    pub fn raf(&mut self, time_ms: f64) -> f32 {
        if self.destroyed {
            return 0.0;
        }
        let dt = match self.last_time {
            Some(prev) => ((time_ms - prev) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(time_ms);

        let previous = self.state.offset;
        if self.state.is_running {
            if let Some(animation) = self.animation.as_mut() {
                let (value, settled) = animation.advance(previous, dt);
                self.state.offset = value;
                if settled {
                    self.animation = None;
                    self.target = value;
                }
            }
        }
        self.state.is_scrolling = self.animation.is_some();
        self.record_motion(previous);
        dt
    }

    fn jump(&mut self, to: f32) {
        let previous = self.state.offset;
        self.state.offset = to;
        self.record_motion(previous);
    }

    fn record_motion(&mut self, previous: f32) {
        self.state.velocity = self.state.offset - previous;
        if self.state.velocity > 0.0 {
            self.state.direction = ScrollDirection::Forward;
        } else if self.state.velocity < 0.0 {
            self.state.direction = ScrollDirection::Backward;
        }
        if self.state.velocity != 0.0 {
            let state = self.state.clone();
            for (_, subscriber) in &mut self.subscribers {
                subscriber(&state);
            }
        }
    }

    /// Stop the driver and release subscribers. Idempotent; every later call
    /// on the driver is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.animation = None;
        self.subscribers.clear();
        self.state.is_running = false;
        self.state.is_scrolling = false;
        self.state.velocity = 0.0;
    }
}
