use criterion::{black_box, criterion_group, criterion_main, Criterion};

use canopy_motion_core::{category::attr, Motion, Rect, StaticMarkup, Viewport};

/// Long page: 40 sections, each with a reveal, a stagger list and a parallax layer.
fn long_page() -> StaticMarkup {
    let mut m = StaticMarkup::new(Viewport {
        width: 1440.0,
        height: 900.0,
        document_height: 40.0 * 1000.0,
    });
    for i in 0..40 {
        let top = i as f32 * 1000.0;
        let section = m.push(None, &[], Rect::new(top, 1000.0));
        m.push(Some(section), &[(attr::ANIMATE, "fade-up")], Rect::new(top + 80.0, 120.0));
        let list = m.push(Some(section), &[(attr::STAGGER, "0.1")], Rect::new(top + 240.0, 400.0));
        for j in 0..4 {
            m.push(Some(list), &[], Rect::new(top + 240.0 + j as f32 * 100.0, 90.0));
        }
        m.push(Some(section), &[(attr::PARALLAX, "0.4")], Rect::new(top + 700.0, 300.0));
    }
    m
}

fn bench_frame(c: &mut Criterion) {
    let markup = long_page();
    let mut motion = Motion::default();
    motion.init_animations(&markup);
    let limit = motion.scroll_state().limit;

    let mut t = 0.0f64;
    c.bench_function("frame_tick_120_triggers", |b| {
        b.iter(|| {
            t += 1000.0 / 60.0;
            if motion.scroll().offset() >= limit {
                motion.scroll_mut().on_native_scroll(0.0);
            }
            motion.scroll_mut().on_wheel(0.0, 90.0);
            black_box(motion.frame(t).changes.len());
        })
    });
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
