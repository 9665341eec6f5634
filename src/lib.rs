use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub mod animation;
pub mod config;
pub mod error;
pub mod growth;
pub mod logging;
pub mod math;
pub mod particles;
pub mod render;
pub mod reveal;
pub mod scene;
pub mod shape;

pub use config::SceneConfig;
pub use error::{ConfigError, PhaseError, SurfaceError};
pub use scene::{Phase, PhaseOrchestrator};

use math::Vec2;
use render::{CanvasSurface, Surface};

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    logging::init(log::LevelFilter::Info);
}

/// Scene state exposed to JavaScript
#[wasm_bindgen]
pub struct HeartTreeScene {
    surface: CanvasSurface,
    scene: PhaseOrchestrator,
    hovering: bool,
}

#[wasm_bindgen]
impl HeartTreeScene {
    /// Create a scene on `canvas`, optionally configured from YAML
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_yaml: Option<String>) -> Result<HeartTreeScene, JsValue> {
        let config = match config_yaml {
            Some(yaml) => SceneConfig::from_yaml(&yaml).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => SceneConfig::default(),
        };
        let seed = config
            .seed
            .unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64);

        let mut surface = CanvasSurface::new(canvas).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut scene = PhaseOrchestrator::new(config, surface.viewport(), seed);
        scene.prepare(&mut surface);

        Ok(Self {
            surface,
            scene,
            hovering: false,
        })
    }

    /// Start a growth cycle; fails while one is still running
    #[wasm_bindgen]
    pub fn activate(&mut self) -> Result<(), JsValue> {
        self.scene
            .activate(&mut self.surface)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn hover(&mut self, inside: bool) {
        self.hovering = inside;
        self.scene.hover(inside, &mut self.surface);
    }

    /// Track the pointer; returns whether it is over the trigger
    #[wasm_bindgen]
    pub fn on_mouse_move(&mut self, x: f32, y: f32) -> bool {
        let inside = self.scene.hits_trigger(Vec2::new(x, y));
        if inside != self.hovering {
            self.hover(inside);
        }
        inside
    }

    /// Advance by `dt` seconds and repaint
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) -> Result<(), JsValue> {
        self.scene.tick(dt, js_sys::Date::now(), &mut self.surface);
        self.surface
            .present()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Resize the canvas. The trigger re-centres now; the tree follows at the next growth cycle
    #[wasm_bindgen]
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.scene.relayout(&mut self.surface);
    }

    /// Name of the current phase
    #[wasm_bindgen]
    pub fn phase(&self) -> String {
        self.scene.phase().to_string()
    }

    /// Growth cycles started so far
    #[wasm_bindgen]
    pub fn cycles(&self) -> u32 {
        self.scene.cycles() as u32
    }
}
