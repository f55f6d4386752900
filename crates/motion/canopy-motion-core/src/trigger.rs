//! Scroll trigger definitions and the per-trigger observer state machine.
//!
//! A trigger watches one element. Its start/end positions resolve to a band
//! `[start, end)` of scroll offsets; crossing the band edges fires one of four
//! callbacks, each mapped to a [`ToggleAction`] on the governed playhead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::geometry::{Rect, TriggerPosition};
use crate::ids::ElementId;
use crate::markup::Markup;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Band crossings toggle time-based playback.
    Discrete,
    /// Playback progress follows the scroll offset.
    Scrubbed,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerStart {
    /// Active from the first evaluation on; never left.
    PageLoad,
    At(TriggerPosition),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Callback {
    Enter,
    Leave,
    EnterBack,
    LeaveBack,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

impl FromStr for ToggleAction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "play" => Self::Play,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "reverse" => Self::Reverse,
            "restart" => Self::Restart,
            "reset" => Self::Reset,
            "complete" => Self::Complete,
            "none" => Self::None,
            _ => return Err(ParseError::ToggleAction(s.to_string())),
        })
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reverse => "reverse",
            Self::Restart => "restart",
            Self::Reset => "reset",
            Self::Complete => "complete",
            Self::None => "none",
        })
    }
}

/// Actions for `onEnter onLeave onEnterBack onLeaveBack`, in that order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl ToggleActions {
    pub fn action(&self, callback: Callback) -> ToggleAction {
        match callback {
            Callback::Enter => self.on_enter,
            Callback::Leave => self.on_leave,
            Callback::EnterBack => self.on_enter_back,
            Callback::LeaveBack => self.on_leave_back,
        }
    }
}

/// `play none none reverse`
impl Default for ToggleActions {
    fn default() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::Reverse,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [enter, leave, enter_back, leave_back] = tokens[..] else {
            return Err(ParseError::ToggleActionCount(tokens.len()));
        };
        Ok(Self {
            on_enter: enter.parse()?,
            on_leave: leave.parse()?,
            on_enter_back: enter_back.parse()?,
            on_leave_back: leave_back.parse()?,
        })
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter, self.on_leave, self.on_enter_back, self.on_leave_back
        )
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToggleActions> for String {
    fn from(value: ToggleActions) -> Self {
        value.to_string()
    }
}

/// Immutable description of one trigger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerDefinition {
    pub target: ElementId,
    pub start: TriggerStart,
    /// Without an end the band stays open to the bottom of the page.
    pub end: Option<TriggerPosition>,
    pub mode: TriggerMode,
    pub actions: ToggleActions,
}

impl TriggerDefinition {
    pub fn discrete(
        target: ElementId,
        start: TriggerPosition,
        end: Option<TriggerPosition>,
    ) -> Self {
        Self {
            target,
            start: TriggerStart::At(start),
            end,
            mode: TriggerMode::Discrete,
            actions: ToggleActions::default(),
        }
    }

    pub fn scrubbed(target: ElementId, start: TriggerPosition, end: TriggerPosition) -> Self {
        Self {
            target,
            start: TriggerStart::At(start),
            end: Some(end),
            mode: TriggerMode::Scrubbed,
            actions: ToggleActions::default(),
        }
    }

    pub fn on_page_load(target: ElementId) -> Self {
        Self {
            target,
            start: TriggerStart::PageLoad,
            end: None,
            mode: TriggerMode::Discrete,
            actions: ToggleActions::default(),
        }
    }

    /// Resolve the band against the current layout. A target the markup
    /// cannot measure is treated as a zero-height box at the top of the page.
    pub fn measure(&self, markup: &dyn Markup) -> Bounds {
        let rect = markup.measure(self.target).unwrap_or(Rect::default());
        let viewport_height = markup.viewport().height;
        let start = match self.start {
            TriggerStart::PageLoad => f32::NEG_INFINITY,
            TriggerStart::At(position) => position.resolve(rect, viewport_height),
        };
        let end = self
            .end
            .map(|position| position.resolve(rect, viewport_height))
            .unwrap_or(f32::INFINITY);
        Bounds {
            start,
            end: end.max(start),
        }
    }
}

/// Resolved scroll band `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub start: f32,
    pub end: f32,
}

impl Bounds {
    pub fn contains(&self, offset: f32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Scrub progress, clamped to [0, 1]. A band without a finite, positive
    /// length degrades to a step at `start`.
    pub fn progress(&self, offset: f32) -> f32 {
        let span = self.end - self.start;
        if !span.is_finite() || span <= 0.0 {
            return if offset >= self.start { 1.0 } else { 0.0 };
        }
        ((offset - self.start) / span).clamp(0.0, 1.0)
    }
}

/// Tracks band membership across evaluations and reports crossings.
#[derive(Clone, Debug, Default)]
pub struct TriggerObserver {
    active: bool,
    last_offset: Option<f32>,
}

impl TriggerObserver {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Evaluate `offset` against `bounds`; returns the callbacks that fire, in
    /// order. The first evaluation behaves as if scrolling down from above the
    /// band, so a page loaded past a trigger reports it as entered.
    pub fn observe(&mut self, bounds: &Bounds, offset: f32) -> Vec<Callback> {
        let now = bounds.contains(offset);
        let past_end = offset >= bounds.end;
        let before_start = offset < bounds.start;
        let mut fired = Vec::new();

        match self.last_offset {
            None => {
                if now {
                    fired.push(Callback::Enter);
                } else if past_end {
                    fired.extend([Callback::Enter, Callback::Leave]);
                }
            }
            Some(prev) => {
                let was = self.active;
                if !was && now {
                    fired.push(if prev < bounds.start {
                        Callback::Enter
                    } else {
                        Callback::EnterBack
                    });
                } else if was && !now {
                    fired.push(if past_end {
                        Callback::Leave
                    } else {
                        Callback::LeaveBack
                    });
                } else if !was && !now {
                    // Jumped across the whole band within one frame.
                    if prev < bounds.start && past_end {
                        fired.extend([Callback::Enter, Callback::Leave]);
                    } else if prev >= bounds.end && before_start {
                        fired.extend([Callback::EnterBack, Callback::LeaveBack]);
                    }
                }
            }
        }

        self.active = now;
        self.last_offset = Some(offset);
        fired
    }
}
