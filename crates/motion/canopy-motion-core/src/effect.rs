//! Animation effects and their playheads.
//!
//! An effect interpolates a set of properties from `from` to `to` on one or
//! more targets. Stagger groups offset each target's start by `stagger`
//! seconds on a shared clock; `delay` shifts the whole effect.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;
use crate::ids::ElementId;
use crate::property::PropertyMap;
use crate::trigger::ToggleAction;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationEffect {
    pub targets: Vec<ElementId>,
    pub from: PropertyMap,
    pub to: PropertyMap,
    /// Per-target duration in seconds.
    pub duration: f32,
    pub ease: Ease,
    #[serde(default)]
    pub delay: f32,
    #[serde(default)]
    pub stagger: Option<f32>,
}

impl AnimationEffect {
    pub fn new(
        target: ElementId,
        from: PropertyMap,
        to: PropertyMap,
        duration: f32,
        ease: Ease,
    ) -> Self {
        Self {
            targets: vec![target],
            from,
            to,
            duration,
            ease,
            delay: 0.0,
            stagger: None,
        }
    }

    fn stagger_step(&self) -> f32 {
        self.stagger.unwrap_or(0.0).max(0.0)
    }

    /// Length of the effect's clock: delay + duration + stagger spread.
    pub fn total_duration(&self) -> f32 {
        let spread = self.targets.len().saturating_sub(1) as f32 * self.stagger_step();
        self.delay.max(0.0) + self.duration.max(0.0) + spread
    }

    /// Linear progress of target `index` at clock `time`.
    pub fn target_progress(&self, index: usize, time: f32) -> f32 {
        let local = time - self.delay.max(0.0) - index as f32 * self.stagger_step();
        if self.duration <= 0.0 {
            return if local >= 0.0 { 1.0 } else { 0.0 };
        }
        (local / self.duration).clamp(0.0, 1.0)
    }

    /// Property values of target `index` at clock `time`.
    pub fn sample(&self, index: usize, time: f32) -> PropertyMap {
        let t = self.ease.apply(self.target_progress(index, time));
        let mut out = PropertyMap::new();
        for (&prop, &from) in &self.from {
            let to = self.to.get(&prop).copied().unwrap_or(from);
            out.insert(prop, lerp(from, to, t));
        }
        for (&prop, &to) in &self.to {
            if !out.contains_key(&prop) {
                out.insert(prop, lerp(prop.identity(), to, t));
            }
        }
        out
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayheadDirection {
    Forward,
    Backward,
}

/// Notable playhead transitions reported by [`Playhead::advance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayheadEvent {
    Completed,
    Reversed,
}

/// Clock shared by the effects of one trigger.
#[derive(Clone, Debug, PartialEq)]
pub struct Playhead {
    time: f32,
    total: f32,
    direction: PlayheadDirection,
    playing: bool,
}

impl Playhead {
    pub fn new(total: f32) -> Self {
        Self {
            time: 0.0,
            total: total.max(0.0),
            direction: PlayheadDirection::Forward,
            playing: false,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    pub fn direction(&self) -> PlayheadDirection {
        self.direction
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn progress(&self) -> f32 {
        // Zero-length effects render their end state, so their clock reads as done.
        if self.total <= 0.0 {
            return 1.0;
        }
        (self.time / self.total).clamp(0.0, 1.0)
    }

    pub fn apply(&mut self, action: ToggleAction) {
        match action {
            ToggleAction::Play => {
                self.direction = PlayheadDirection::Forward;
                self.playing = self.time < self.total || self.total <= 0.0;
            }
            ToggleAction::Reverse => {
                self.direction = PlayheadDirection::Backward;
                self.playing = self.time > 0.0;
            }
            ToggleAction::Restart => {
                self.time = 0.0;
                self.direction = PlayheadDirection::Forward;
                self.playing = true;
            }
            ToggleAction::Reset => {
                self.time = 0.0;
                self.direction = PlayheadDirection::Forward;
                self.playing = false;
            }
            ToggleAction::Complete => {
                self.time = self.total;
                self.playing = false;
            }
            ToggleAction::Pause => self.playing = false,
            ToggleAction::Resume => self.playing = true,
            ToggleAction::None => {}
        }
    }

    /// Advance by `dt` seconds in the current direction.
    pub fn advance(&mut self, dt: f32) -> Option<PlayheadEvent> {
        if !self.playing {
            return None;
        }
        match self.direction {
            PlayheadDirection::Forward => {
                self.time = (self.time + dt.max(0.0)).min(self.total);
                if self.time >= self.total {
                    self.playing = false;
                    return Some(PlayheadEvent::Completed);
                }
            }
            PlayheadDirection::Backward => {
                self.time = (self.time - dt.max(0.0)).max(0.0);
                if self.time <= 0.0 {
                    self.playing = false;
                    return Some(PlayheadEvent::Reversed);
                }
            }
        }
        None
    }

    /// Place the clock at `progress` of its length (scrubbing).
    pub fn seek_progress(&mut self, progress: f32) {
        self.time = progress.clamp(0.0, 1.0) * self.total;
        self.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{props, Property};

    fn fade(duration: f32) -> AnimationEffect {
        AnimationEffect::new(
            ElementId(0),
            props(&[(Property::Opacity, 0.0), (Property::Y, 60.0)]),
            props(&[(Property::Opacity, 1.0), (Property::Y, 0.0)]),
            duration,
            Ease::Linear,
        )
    }

    #[test]
    fn sample_interpolates_all_properties() {
        let e = fade(1.0);
        let mid = e.sample(0, 0.5);
        assert_eq!(mid[&Property::Opacity], 0.5);
        assert_eq!(mid[&Property::Y], 30.0);
        let end = e.sample(0, 5.0);
        assert_eq!(end[&Property::Opacity], 1.0);
    }

    #[test]
    fn stagger_offsets_each_target() {
        let mut e = fade(0.8);
        e.targets = vec![ElementId(0), ElementId(1), ElementId(2)];
        e.stagger = Some(0.1);
        assert!((e.total_duration() - 1.0).abs() < 1e-6);
        assert_eq!(e.target_progress(2, 0.2), 0.0);
        assert!((e.target_progress(0, 0.4) - 0.5).abs() < 1e-6);
        assert!((e.target_progress(2, 1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn delay_holds_the_from_state() {
        let mut e = fade(1.0);
        e.delay = 0.3;
        assert_eq!(e.sample(0, 0.2)[&Property::Opacity], 0.0);
        assert!((e.total_duration() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn to_only_properties_start_from_identity() {
        let e = AnimationEffect::new(
            ElementId(0),
            PropertyMap::new(),
            props(&[(Property::YPercent, 30.0)]),
            1.0,
            Ease::Linear,
        );
        assert_eq!(e.sample(0, 0.0)[&Property::YPercent], 0.0);
        assert_eq!(e.sample(0, 1.0)[&Property::YPercent], 30.0);
    }

    #[test]
    fn reverse_runs_back_from_the_current_time() {
        let mut p = Playhead::new(1.0);
        p.apply(ToggleAction::Play);
        assert_eq!(p.advance(0.4), None);
        p.apply(ToggleAction::Reverse);
        assert_eq!(p.direction(), PlayheadDirection::Backward);
        assert_eq!(p.advance(0.1), None);
        assert!((p.time() - 0.3).abs() < 1e-6);
        assert_eq!(p.advance(1.0), Some(PlayheadEvent::Reversed));
        assert_eq!(p.time(), 0.0);
        assert!(!p.is_playing());
    }

    #[test]
    fn play_at_end_is_idle() {
        let mut p = Playhead::new(1.0);
        p.apply(ToggleAction::Complete);
        p.apply(ToggleAction::Play);
        assert!(!p.is_playing());
        assert_eq!(p.advance(0.1), None);
    }

    #[test]
    fn reset_and_restart() {
        let mut p = Playhead::new(2.0);
        p.apply(ToggleAction::Play);
        p.advance(1.0);
        p.apply(ToggleAction::Reset);
        assert_eq!(p.time(), 0.0);
        assert!(!p.is_playing());
        p.apply(ToggleAction::Restart);
        assert!(p.is_playing());
        assert_eq!(p.advance(5.0), Some(PlayheadEvent::Completed));
        assert_eq!(p.progress(), 1.0);
    }
}
