//! Per-category builders: marker element → trigger + effects.
//!
//! Builders are pure; they read the markup and return [`Binding`]s without
//! touching registry state.

use crate::category::{attr, read_number, Category, Overrides};
use crate::config::EffectDefaults;
use crate::ease::Ease;
use crate::effect::AnimationEffect;
use crate::geometry::{Anchor, TriggerPosition};
use crate::ids::ElementId;
use crate::markup::Markup;
use crate::property::{props, Property, PropertyMap};
use crate::trigger::{TriggerDefinition, TriggerMode, TriggerStart};

const TOP_85: TriggerPosition = TriggerPosition::new(Anchor::Start, Anchor::Percent(85.0));
const TOP_80: TriggerPosition = TriggerPosition::new(Anchor::Start, Anchor::Percent(80.0));
const TOP_50: TriggerPosition = TriggerPosition::new(Anchor::Start, Anchor::Percent(50.0));
const TOP_BOTTOM: TriggerPosition = TriggerPosition::new(Anchor::Start, Anchor::End);
const TOP_TOP: TriggerPosition = TriggerPosition::new(Anchor::Start, Anchor::Start);
const BOTTOM_TOP: TriggerPosition = TriggerPosition::new(Anchor::End, Anchor::Start);

pub const DEFAULT_STAGGER: f32 = 0.1;
pub const DEFAULT_PARALLAX_SPEED: f32 = 0.5;
pub const DEFAULT_PARALLAX_BG_SPEED: f32 = 0.3;

/// Hero sub-roles: attribute, delay on the reveal clock, duration.
const HERO_STEPS: [(&str, f32, f32); 4] = [
    (attr::HERO_TITLE, 0.3, 1.2),
    (attr::HERO_SUBTITLE, 0.6, 1.0),
    (attr::HERO_BUTTON, 0.9, 0.8),
    (attr::HERO_SCROLL, 1.2, 0.8),
];

/// A trigger and the effects it governs.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub category: Option<Category>,
    pub trigger: TriggerDefinition,
    pub effects: Vec<AnimationEffect>,
}

struct Reveal {
    from: PropertyMap,
    to: PropertyMap,
    duration: f32,
    ease: Ease,
    start: TriggerPosition,
    end: Option<TriggerPosition>,
}

/// Build the bindings for one discovered element of `category`.
pub fn build(category: Category, markup: &dyn Markup, element: ElementId) -> Vec<Binding> {
    use Property::*;
    match category {
        Category::FadeUp => vec![reveal(
            category,
            markup,
            element,
            Reveal {
                from: props(&[(Y, 60.0), (Opacity, 0.0)]),
                to: props(&[(Y, 0.0), (Opacity, 1.0)]),
                duration: 1.0,
                ease: Ease::SOFT,
                start: TOP_85,
                end: Some(TOP_50),
            },
        )],
        Category::FadeIn => vec![reveal(
            category,
            markup,
            element,
            Reveal {
                from: props(&[(Opacity, 0.0)]),
                to: props(&[(Opacity, 1.0)]),
                duration: 1.2,
                ease: Ease::GENTLE,
                start: TOP_80,
                end: None,
            },
        )],
        Category::ScaleUp => vec![reveal(
            category,
            markup,
            element,
            Reveal {
                from: props(&[(Scale, 0.9), (Opacity, 0.0)]),
                to: props(&[(Scale, 1.0), (Opacity, 1.0)]),
                duration: 1.0,
                ease: Ease::ORGANIC,
                start: TOP_80,
                end: None,
            },
        )],
        Category::SlideLeft | Category::SlideRight => {
            let x = if category == Category::SlideLeft { 60.0 } else { -60.0 };
            vec![reveal(
                category,
                markup,
                element,
                Reveal {
                    from: props(&[(X, x), (Opacity, 0.0)]),
                    to: props(&[(X, 0.0), (Opacity, 1.0)]),
                    duration: 1.0,
                    ease: Ease::SOFT,
                    start: TOP_80,
                    end: None,
                },
            )]
        }
        Category::Stagger => stagger(markup, element).into_iter().collect(),
        Category::Parallax => vec![parallax(markup, element)],
        Category::ParallaxBackground => vec![parallax_background(markup, element)],
        Category::Hero => hero(markup, element),
    }
}

fn reveal(category: Category, markup: &dyn Markup, element: ElementId, preset: Reveal) -> Binding {
    let overrides = Overrides::read(markup, element);
    let trigger = TriggerDefinition {
        target: element,
        start: TriggerStart::At(overrides.start.unwrap_or(preset.start)),
        end: overrides.end.or(preset.end),
        mode: TriggerMode::Discrete,
        actions: overrides.actions.unwrap_or_default(),
    };
    let effect = AnimationEffect::new(
        element,
        preset.from,
        preset.to,
        overrides.duration.unwrap_or(preset.duration),
        overrides.ease.unwrap_or(preset.ease),
    );
    Binding {
        category: Some(category),
        trigger,
        effects: vec![effect],
    }
}

/// Children of `container` revealed one after another. Containers without
/// children produce nothing.
pub fn stagger(markup: &dyn Markup, container: ElementId) -> Option<Binding> {
    let children = markup.children(container);
    if children.is_empty() {
        log::debug!("stagger container {} has no children", container.0);
        return None;
    }
    let step = read_number(markup, container, attr::STAGGER).unwrap_or(DEFAULT_STAGGER);
    let overrides = Overrides::read(markup, container);
    let effect = AnimationEffect {
        targets: children,
        from: props(&[(Property::Y, 30.0), (Property::Opacity, 0.0)]),
        to: props(&[(Property::Y, 0.0), (Property::Opacity, 1.0)]),
        duration: overrides.duration.unwrap_or(0.8),
        ease: overrides.ease.unwrap_or(Ease::SOFT),
        delay: 0.0,
        stagger: Some(step.max(0.0)),
    };
    Some(Binding {
        category: Some(Category::Stagger),
        trigger: TriggerDefinition {
            target: container,
            start: TriggerStart::At(overrides.start.unwrap_or(TOP_80)),
            end: overrides.end,
            mode: TriggerMode::Discrete,
            actions: overrides.actions.unwrap_or_default(),
        },
        effects: vec![effect],
    })
}

/// Speed attribute where zero and malformed values fall back to `default`.
fn speed(markup: &dyn Markup, element: ElementId, name: &str, default: f32) -> f32 {
    read_number(markup, element, name)
        .filter(|v| *v != 0.0)
        .unwrap_or(default)
}

fn parallax_axis(markup: &dyn Markup, element: ElementId) -> Property {
    match markup.attribute(element, attr::PARALLAX_DIRECTION).as_deref() {
        None | Some("y") => Property::Y,
        Some("x") => Property::X,
        Some(other) => {
            log::warn!(
                "element {}: unsupported parallax direction `{other}`, using y",
                element.0
            );
            Property::Y
        }
    }
}

fn scrub_binding(
    category: Category,
    markup: &dyn Markup,
    element: ElementId,
    trigger_target: ElementId,
    to: PropertyMap,
    defaults: (TriggerPosition, TriggerPosition),
) -> Binding {
    let overrides = Overrides::read(markup, element);
    let effect = AnimationEffect::new(
        element,
        to.keys().map(|&p| (p, p.identity())).collect(),
        to,
        1.0,
        overrides.ease.unwrap_or(Ease::Linear),
    );
    Binding {
        category: Some(category),
        trigger: TriggerDefinition::scrubbed(
            trigger_target,
            overrides.start.unwrap_or(defaults.0),
            overrides.end.unwrap_or(defaults.1),
        ),
        effects: vec![effect],
    }
}

/// Moves the element along its axis by `speed × 100` px while its parent
/// crosses the viewport.
pub fn parallax(markup: &dyn Markup, element: ElementId) -> Binding {
    let speed = speed(markup, element, attr::PARALLAX, DEFAULT_PARALLAX_SPEED);
    let axis = parallax_axis(markup, element);
    let trigger_target = markup.parent(element).unwrap_or(element);
    scrub_binding(
        Category::Parallax,
        markup,
        element,
        trigger_target,
        props(&[(axis, speed * 100.0)]),
        (TOP_BOTTOM, BOTTOM_TOP),
    )
}

/// Background layers always move vertically, by `speed × 30` percent of their
/// own height, whatever `data-parallax-direction` says.
pub fn parallax_background(markup: &dyn Markup, element: ElementId) -> Binding {
    let speed = speed(markup, element, attr::PARALLAX_BG, DEFAULT_PARALLAX_BG_SPEED);
    let trigger_target = markup.parent(element).unwrap_or(element);
    scrub_binding(
        Category::ParallaxBackground,
        markup,
        element,
        trigger_target,
        props(&[(Property::YPercent, speed * 30.0)]),
        (TOP_BOTTOM, BOTTOM_TOP),
    )
}

/// Timed reveal of the hero sub-roles that exist, plus a scrubbed background
/// drift over the container's own scroll range.
pub fn hero(markup: &dyn Markup, container: ElementId) -> Vec<Binding> {
    let mut bindings = Vec::new();

    let effects: Vec<AnimationEffect> = HERO_STEPS
        .iter()
        .filter_map(|&(role, delay, duration)| {
            let el = markup.select_within(container, role)?;
            let mut effect = AnimationEffect::new(
                el,
                props(&[(Property::Opacity, 0.0), (Property::Y, 40.0)]),
                props(&[(Property::Opacity, 1.0), (Property::Y, 0.0)]),
                duration,
                Ease::ORGANIC,
            );
            effect.delay = delay;
            Some(effect)
        })
        .collect();
    if !effects.is_empty() {
        bindings.push(Binding {
            category: Some(Category::Hero),
            trigger: TriggerDefinition::on_page_load(container),
            effects,
        });
    }

    if let Some(bg) = markup.select_within(container, attr::HERO_BG) {
        bindings.push(Binding {
            category: Some(Category::Hero),
            trigger: TriggerDefinition::scrubbed(container, TOP_TOP, BOTTOM_TOP),
            effects: vec![AnimationEffect::new(
                bg,
                props(&[(Property::YPercent, 0.0)]),
                props(&[(Property::YPercent, 30.0)]),
                1.0,
                Ease::Linear,
            )],
        });
    }

    bindings
}

/// A discrete reveal with custom endpoints: `top 80%`, `play none none
/// reverse` and the configured duration/ease unless overridden.
pub fn scroll_animation(
    element: ElementId,
    from: PropertyMap,
    to: PropertyMap,
    defaults: &EffectDefaults,
    overrides: &Overrides,
) -> Binding {
    Binding {
        category: None,
        trigger: TriggerDefinition {
            target: element,
            start: TriggerStart::At(overrides.start.unwrap_or(TOP_80)),
            end: overrides.end,
            mode: TriggerMode::Discrete,
            actions: overrides.actions.unwrap_or_default(),
        },
        effects: vec![AnimationEffect::new(
            element,
            from,
            to,
            overrides.duration.unwrap_or(defaults.duration),
            overrides.ease.unwrap_or(defaults.ease),
        )],
    }
}

/// Vertical parallax with an explicit speed.
pub fn custom_parallax(
    markup: &dyn Markup,
    element: ElementId,
    speed: f32,
    overrides: &Overrides,
) -> Binding {
    let to = props(&[(Property::Y, speed * 100.0)]);
    Binding {
        category: None,
        trigger: TriggerDefinition::scrubbed(
            markup.parent(element).unwrap_or(element),
            overrides.start.unwrap_or(TOP_BOTTOM),
            overrides.end.unwrap_or(BOTTOM_TOP),
        ),
        effects: vec![AnimationEffect::new(
            element,
            props(&[(Property::Y, 0.0)]),
            to,
            1.0,
            overrides.ease.unwrap_or(Ease::Linear),
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Viewport};
    use crate::markup::StaticMarkup;

    fn page() -> StaticMarkup {
        StaticMarkup::new(Viewport {
            width: 1280.0,
            height: 1000.0,
            document_height: 5000.0,
        })
    }

    #[test]
    fn fade_up_defaults() {
        let mut m = page();
        let el = m.push(None, &[(attr::ANIMATE, "fade-up")], Rect::new(2000.0, 300.0));
        let b = build(Category::FadeUp, &m, el);
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].trigger.start, TriggerStart::At(TOP_85));
        assert_eq!(b[0].trigger.end, Some(TOP_50));
        assert_eq!(b[0].effects[0].ease, Ease::Power3Out);
        assert_eq!(b[0].effects[0].from[&Property::Y], 60.0);
    }

    #[test]
    fn inline_overrides_win() {
        let mut m = page();
        let el = m.push(
            None,
            &[
                (attr::ANIMATE, "fade-in"),
                (attr::START, "top 60%"),
                (attr::EASE, "bounce"),
                (attr::DURATION, "2"),
                (attr::ACTIONS, "play reverse play reverse"),
            ],
            Rect::default(),
        );
        let b = build(Category::FadeIn, &m, el).remove(0);
        assert_eq!(
            b.trigger.start,
            TriggerStart::At(TriggerPosition::new(Anchor::Start, Anchor::Percent(60.0)))
        );
        assert_eq!(b.effects[0].ease, Ease::BOUNCE);
        assert_eq!(b.effects[0].duration, 2.0);
        assert_eq!(b.trigger.actions.on_leave, crate::ToggleAction::Reverse);
    }

    #[test]
    fn slide_directions_mirror() {
        let mut m = page();
        let l = m.push(None, &[(attr::ANIMATE, "slide-left")], Rect::default());
        let r = m.push(None, &[(attr::ANIMATE, "slide-right")], Rect::default());
        assert_eq!(build(Category::SlideLeft, &m, l)[0].effects[0].from[&Property::X], 60.0);
        assert_eq!(build(Category::SlideRight, &m, r)[0].effects[0].from[&Property::X], -60.0);
    }

    #[test]
    fn stagger_reads_delay_and_children() {
        let mut m = page();
        let c = m.push(None, &[(attr::STAGGER, "0.25")], Rect::new(1000.0, 400.0));
        for i in 0..3 {
            m.push(Some(c), &[], Rect::new(1000.0 + i as f32 * 100.0, 100.0));
        }
        let empty = m.push(None, &[(attr::STAGGER, "")], Rect::default());
        let b = stagger(&m, c).unwrap();
        assert_eq!(b.effects[0].targets.len(), 3);
        assert_eq!(b.effects[0].stagger, Some(0.25));
        assert!(stagger(&m, empty).is_none());
    }

    #[test]
    fn stagger_defaults_when_value_missing() {
        let mut m = page();
        let c = m.push(None, &[(attr::STAGGER, "")], Rect::default());
        m.push(Some(c), &[], Rect::default());
        assert_eq!(stagger(&m, c).unwrap().effects[0].stagger, Some(DEFAULT_STAGGER));
    }

    #[test]
    fn parallax_uses_parent_and_axis() {
        let mut m = page();
        let parent = m.push(None, &[], Rect::new(1000.0, 600.0));
        let el = m.push(
            Some(parent),
            &[(attr::PARALLAX, "0.8"), (attr::PARALLAX_DIRECTION, "x")],
            Rect::default(),
        );
        let b = parallax(&m, el);
        assert_eq!(b.trigger.target, parent);
        assert_eq!(b.trigger.mode, TriggerMode::Scrubbed);
        assert!((b.effects[0].to[&Property::X] - 80.0).abs() < 1e-4);
    }

    #[test]
    fn parallax_zero_speed_falls_back() {
        let mut m = page();
        let el = m.push(None, &[(attr::PARALLAX, "0")], Rect::default());
        let b = parallax(&m, el);
        assert_eq!(b.trigger.target, el);
        assert_eq!(b.effects[0].to[&Property::Y], 50.0);
    }

    #[test]
    fn background_parallax_ignores_direction() {
        let mut m = page();
        let parent = m.push(None, &[], Rect::new(0.0, 800.0));
        let el = m.push(
            Some(parent),
            &[(attr::PARALLAX_BG, ""), (attr::PARALLAX_DIRECTION, "x")],
            Rect::default(),
        );
        let b = parallax_background(&m, el);
        let to = &b.effects[0].to;
        assert_eq!(to.len(), 1);
        assert!((to[&Property::YPercent] - 9.0).abs() < 1e-4);
    }

    #[test]
    fn hero_skips_missing_roles() {
        let mut m = page();
        let hero_el = m.push(None, &[(attr::HERO, "")], Rect::new(0.0, 1000.0));
        let title = m.push(Some(hero_el), &[(attr::HERO_TITLE, "")], Rect::default());
        let bindings = hero(&m, hero_el);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].trigger.start, TriggerStart::PageLoad);
        assert_eq!(bindings[0].effects.len(), 1);
        assert_eq!(bindings[0].effects[0].targets, vec![title]);
        assert_eq!(bindings[0].effects[0].delay, 0.3);
    }

    #[test]
    fn hero_background_scrubs_over_container() {
        let mut m = page();
        let hero_el = m.push(None, &[(attr::HERO, "")], Rect::new(0.0, 1000.0));
        m.push(Some(hero_el), &[(attr::HERO_BG, "")], Rect::default());
        let bindings = hero(&m, hero_el);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].trigger.mode, TriggerMode::Scrubbed);
        assert_eq!(bindings[0].trigger.target, hero_el);
    }
}
