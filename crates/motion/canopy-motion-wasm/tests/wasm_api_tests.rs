#![cfg(target_arch = "wasm32")]
use canopy_motion_wasm::{abi_version, CanopyMotion};
use serde_wasm_bindgen as swb;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

use serde_json::json;

wasm_bindgen_test_configure!(run_in_browser);

fn body_with(html: &str) {
    let document = web_sys::window().unwrap().document().unwrap();
    document.body().unwrap().set_inner_html(html);
}

fn html_by_id(id: &str) -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    document.get_element_by_id(id).unwrap().dyn_into().unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    let motion = CanopyMotion::new(JsValue::UNDEFINED);
    assert!(motion.is_ok());
}

#[wasm_bindgen_test]
fn rejects_malformed_config() {
    let cfg = swb::to_value(&json!({ "smooth": { "easing": "wobble" } })).unwrap();
    assert!(CanopyMotion::new(cfg).is_err());
}

#[wasm_bindgen_test]
fn init_counts_markers_and_dispose_resets() {
    body_with(
        r#"<section style="height:2000px">
             <h2 data-animate="fade-up">Why</h2>
             <p data-animate="fade-in">Text</p>
             <ul data-stagger="0.2"><li>a</li><li>b</li></ul>
             <div data-animate="wiggle"></div>
           </section>"#,
    );
    let mut motion = CanopyMotion::new(JsValue::NULL).unwrap();
    assert_eq!(motion.init_animations(), 3);
    // Second call is a no-op.
    assert_eq!(motion.init_animations(), 3);
    assert_eq!(motion.trigger_count(), 3);
    motion.dispose_all();
    assert_eq!(motion.trigger_count(), 0);
    assert_eq!(motion.init_animations(), 3);
    motion.destroy();
}

#[wasm_bindgen_test]
fn start_state_is_written_to_inline_style() {
    body_with(
        r#"<div style="height:3000px">
             <h2 id="t" data-animate="fade-up" style="margin-top:2500px">T</h2>
           </div>"#,
    );
    let mut motion = CanopyMotion::new(JsValue::UNDEFINED).unwrap();
    motion.init_animations();
    let el = html_by_id("t");
    assert_eq!(el.style().get_property_value("opacity").unwrap(), "0");
    assert!(el
        .style()
        .get_property_value("transform")
        .unwrap()
        .contains("60px"));
    motion.destroy();
}

#[wasm_bindgen_test]
fn scroll_to_accepts_numbers_keywords_and_selectors() {
    body_with(r#"<div style="height:4000px"><p id="target">x</p></div>"#);
    let mut motion = CanopyMotion::new(JsValue::UNDEFINED).unwrap();
    assert!(motion.scroll_to(JsValue::from_f64(200.0), JsValue::UNDEFINED).is_ok());
    assert!(motion.scroll_to(JsValue::from_str("bottom"), JsValue::UNDEFINED).is_ok());
    assert!(motion.scroll_to(JsValue::from_str("#target"), JsValue::UNDEFINED).is_ok());
    assert!(motion.scroll_to(JsValue::from_str("#missing"), JsValue::UNDEFINED).is_err());
    let opts = swb::to_value(&json!({ "immediate": true })).unwrap();
    assert!(motion.scroll_to(JsValue::from_f64(0.0), opts).is_ok());
    motion.destroy();
}

#[wasm_bindgen_test]
fn destroy_is_idempotent_and_detaches() {
    let mut motion = CanopyMotion::new(JsValue::UNDEFINED).unwrap();
    assert!(!motion.is_destroyed());
    motion.destroy();
    motion.destroy();
    assert!(motion.is_destroyed());
    assert_eq!(motion.init_animations(), 0);
    assert!(motion.scroll_state().unwrap().is_undefined());
    motion.start();
    motion.stop();
    motion.refresh();
}

#[wasm_bindgen_test]
fn create_scroll_animation_writes_from_state() {
    body_with(
        r#"<div style="height:4000px">
             <div id="card" style="margin-top:3000px;height:200px">card</div>
           </div>"#,
    );
    let mut motion = CanopyMotion::new(JsValue::UNDEFINED).unwrap();
    let from = swb::to_value(&json!({ "opacity": 0.0, "scale": 0.8 })).unwrap();
    let to = swb::to_value(&json!({ "opacity": 1.0, "scale": 1.0 })).unwrap();
    let opts = swb::to_value(&json!({ "start": "top 70%", "ease": "bounce" })).unwrap();
    let id = motion
        .create_scroll_animation(JsValue::from_str("#card"), from, to, opts)
        .unwrap();
    assert!(id.is_some());
    assert_eq!(motion.trigger_count(), 1);
    let card = html_by_id("card");
    assert_eq!(card.style().get_property_value("opacity").unwrap(), "0");
    assert!(card
        .style()
        .get_property_value("transform")
        .unwrap()
        .contains("scale(0.8)"));
    motion.destroy();
}

#[wasm_bindgen_test]
fn create_scroll_animation_rejects_bad_input() {
    body_with(r#"<div id="card">card</div>"#);
    let mut motion = CanopyMotion::new(JsValue::UNDEFINED).unwrap();
    let to = || swb::to_value(&json!({ "opacity": 1.0 })).unwrap();
    let bad_props = swb::to_value(&json!({ "rotation": 90.0 })).unwrap();
    assert!(motion
        .create_scroll_animation(JsValue::from_str("#card"), bad_props, to(), JsValue::UNDEFINED)
        .is_err());
    let from = swb::to_value(&json!({ "opacity": 0.0 })).unwrap();
    assert!(motion
        .create_scroll_animation(JsValue::from_str("#nowhere"), from, to(), JsValue::UNDEFINED)
        .is_err());
    assert_eq!(motion.trigger_count(), 0);
    motion.destroy();
}

#[wasm_bindgen_test]
fn create_parallax_accepts_elements() {
    body_with(
        r#"<section style="height:3000px">
             <div id="layer" style="margin-top:1500px;height:400px">layer</div>
           </section>"#,
    );
    let mut motion = CanopyMotion::new(JsValue::UNDEFINED).unwrap();
    let layer: JsValue = html_by_id("layer").into();
    let id = motion.create_parallax(layer, 0.3, JsValue::NULL).unwrap();
    assert!(id.is_some());
    assert_eq!(motion.trigger_count(), 1);
    assert!(motion
        .create_parallax(JsValue::from_str("#layer"), f32::NAN, JsValue::UNDEFINED)
        .is_err());
    motion.destroy();
    assert_eq!(
        motion
            .create_parallax(JsValue::from_str("#layer"), 0.3, JsValue::UNDEFINED)
            .unwrap(),
        None
    );
}

#[wasm_bindgen_test]
fn remove_trigger_drops_one_trigger() {
    body_with(
        r#"<div style="height:3000px">
             <p id="a" style="margin-top:2000px">a</p>
             <p id="b">b</p>
           </div>"#,
    );
    let mut motion = CanopyMotion::new(JsValue::UNDEFINED).unwrap();
    let fade = |motion: &mut CanopyMotion, sel: &str| {
        let from = swb::to_value(&json!({ "opacity": 0.0 })).unwrap();
        let to = swb::to_value(&json!({ "opacity": 1.0 })).unwrap();
        motion
            .create_scroll_animation(JsValue::from_str(sel), from, to, JsValue::UNDEFINED)
            .unwrap()
            .unwrap()
    };
    let a = fade(&mut motion, "#a");
    let b = fade(&mut motion, "#b");
    assert_ne!(a, b);
    assert!(motion.remove_trigger(a));
    assert!(!motion.remove_trigger(a));
    assert_eq!(motion.trigger_count(), 1);
    motion.destroy();
    assert!(!motion.remove_trigger(b));
}
