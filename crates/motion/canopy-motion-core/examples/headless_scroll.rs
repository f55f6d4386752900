use canopy_motion_core::{Motion, MotionConfig, ScrollTarget, ScrollToOptions, StaticMarkup};

/// Scroll a static page from top to bottom and print what changes per frame.
/// Usage: headless_scroll [markup.json]
fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fixtures/markup/landing.json".to_string());
    let json = std::fs::read_to_string(&path)?;
    let markup = StaticMarkup::from_json(&json)?;

    let mut motion = Motion::new(MotionConfig::default());
    let triggers = motion.init_animations(&markup);
    println!("{triggers} triggers on {path}");

    motion.frame(0.0);
    motion.scroll_to(&markup, ScrollTarget::Bottom, &ScrollToOptions::default());

    let mut t = 0.0;
    while motion.scroll().is_animating() {
        t += 1000.0 / 60.0;
        let out = motion.frame(t);
        if !out.is_empty() {
            println!(
                "t={t:>7.1}ms offset={:>7.1} changes={} events={}",
                motion.scroll_state().offset,
                motion.outputs().changes.len(),
                motion.outputs().events.len()
            );
        }
    }
    println!("{}", serde_json::to_string_pretty(motion.scroll_state())?);
    Ok(())
}
