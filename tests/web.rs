#![cfg(target_arch = "wasm32")]

use heart_tree::render::{CanvasSurface, Surface, TextSlot};
use heart_tree::{HeartTreeScene, Phase, PhaseOrchestrator, SceneConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(800);
    canvas.set_height(900);
    canvas
}

#[wasm_bindgen_test]
fn scene_starts_idle() {
    let scene = HeartTreeScene::new(canvas(), None).unwrap();
    assert_eq!(scene.phase(), "idle");
    assert_eq!(scene.cycles(), 0);
}

#[wasm_bindgen_test]
fn bad_config_is_rejected() {
    let yaml = Some("stream: { fall_rate: 0 }".to_string());
    assert!(HeartTreeScene::new(canvas(), yaml).is_err());
}

#[wasm_bindgen_test]
fn second_activation_is_refused() {
    let mut scene = HeartTreeScene::new(canvas(), Some("seed: 4".to_string())).unwrap();
    scene.activate().unwrap();
    scene.render(1.0 / 60.0).unwrap();
    assert_eq!(scene.phase(), "drop");
    assert!(scene.activate().is_err());
}

#[wasm_bindgen_test]
fn canvas_reaches_the_stream() {
    let mut surface = CanvasSurface::new(canvas()).unwrap();
    let config = SceneConfig {
        stream_count: 2,
        ..SceneConfig::default()
    };
    let mut scene = PhaseOrchestrator::new(config, surface.viewport(), 9);
    scene.prepare(&mut surface);
    scene.activate(&mut surface).unwrap();

    for _ in 0..2_000 {
        if scene.phase() == Phase::Stream {
            break;
        }
        scene.tick(1.0 / 60.0, js_sys::Date::now(), &mut surface);
        surface.present().unwrap();
    }
    assert_eq!(scene.phase(), Phase::Stream);
    let anchor = surface.anchor_of(TextSlot::Timer).unwrap();
    assert_eq!(scene.stream_target().unwrap().window.center(), anchor);
}
