//! [`Surface`] backed by a 2D canvas
//!
//! The surface keeps the latest polygons, sprites and text in memory and
//! repaints everything in [`CanvasSurface::present`], once per frame.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};
use crate::error::SurfaceError;
use crate::math::Vec2;
use super::{AssetId, Layer, Sprite, SpriteId, Surface, TextSlot, Viewport};

const INK: &str = "#111";
const LETTER_WIDTH: f64 = 0.4;
const LETTER_LINE_HEIGHT: f64 = 22.0;
const LETTER_PADDING: f64 = 24.0;

struct Polygon {
    key: String,
    points: Vec<Vec2>,
    fill: String,
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
    images: HashMap<AssetId, HtmlImageElement>,
    failed: HashSet<AssetId>,
    polygons: Vec<Polygon>,
    sprites: BTreeMap<SpriteId, Sprite>,
    texts: HashMap<TextSlot, String>,
    backdrops: HashMap<TextSlot, AssetId>,
    visible: HashSet<TextSlot>,
    ground_line: Option<f32>,
    scene_offset: Vec2,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| SurfaceError::Context("2D context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Context("context is not a CanvasRenderingContext2d".to_string()))?;

        let mut images = HashMap::new();
        for asset in AssetId::PHOTOS
            .iter()
            .chain([AssetId::LetterBox, AssetId::Placeholder].iter())
        {
            let image = HtmlImageElement::new()?;
            image.set_src(asset.src());
            images.insert(*asset, image);
        }

        let viewport = Viewport::new(canvas.width() as f32, canvas.height() as f32);
        Ok(Self {
            canvas,
            ctx,
            viewport,
            images,
            failed: HashSet::new(),
            polygons: Vec::new(),
            sprites: BTreeMap::new(),
            texts: HashMap::new(),
            backdrops: HashMap::new(),
            visible: HashSet::new(),
            ground_line: None,
            scene_offset: Vec2::ZERO,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.viewport = Viewport::new(width as f32, height as f32);
    }

    /// Repaint the whole canvas from the retained state
    pub fn present(&mut self) -> Result<(), SurfaceError> {
        let width = self.viewport.width as f64;
        let height = self.viewport.height as f64;
        self.ctx.clear_rect(0.0, 0.0, width, height);

        self.ctx.save();
        self.ctx
            .translate(self.scene_offset.x as f64, self.scene_offset.y as f64)?;
        for polygon in &self.polygons {
            self.fill_polygon(polygon);
        }
        let shifted: Vec<Sprite> = self
            .sprites
            .values()
            .filter(|s| s.id.layer.follows_scene_offset())
            .cloned()
            .collect();
        for sprite in &shifted {
            self.draw_sprite(sprite)?;
        }
        self.ctx.restore();

        if let Some(y) = self.ground_line {
            self.ctx.set_stroke_style_str(INK);
            self.ctx.set_line_width(2.0);
            self.ctx.begin_path();
            self.ctx.move_to(0.0, y as f64);
            self.ctx.line_to(width, y as f64);
            self.ctx.stroke();
        }

        let fixed: Vec<Sprite> = self
            .sprites
            .values()
            .filter(|s| !s.id.layer.follows_scene_offset())
            .cloned()
            .collect();
        for sprite in &fixed {
            self.draw_sprite(sprite)?;
        }

        self.draw_texts()
    }

    fn fill_polygon(&self, polygon: &Polygon) {
        let Some((first, rest)) = polygon.points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(&polygon.fill);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for point in rest {
            self.ctx.line_to(point.x as f64, point.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    /// Image to draw for `asset`, falling back to the placeholder once a photo fails
    fn image_for(&mut self, asset: AssetId) -> Option<HtmlImageElement> {
        let image = self.images.get(&asset)?;
        if !image.complete() {
            return None;
        }
        if image.natural_width() > 0 {
            return Some(image.clone());
        }

        let fallback = if self.failed.insert(asset) {
            asset.on_load_error()
        } else {
            AssetId::Placeholder
        };
        if fallback == asset {
            return None;
        }
        self.images
            .get(&fallback)
            .filter(|p| p.complete() && p.natural_width() > 0)
            .cloned()
    }

    fn draw_sprite(&mut self, sprite: &Sprite) -> Result<(), SurfaceError> {
        if sprite.opacity <= 0.0 || sprite.scale <= 0.0 {
            return Ok(());
        }
        let size = (sprite.size * sprite.scale) as f64;

        if sprite.asset == AssetId::Seed {
            self.ctx.save();
            self.ctx.set_global_alpha(sprite.opacity.min(1.0) as f64);
            self.ctx.set_fill_style_str("#e0245e");
            self.ctx.begin_path();
            self.ctx
                .arc(sprite.center.x as f64, sprite.center.y as f64, size / 2.0, 0.0, TAU)?;
            self.ctx.fill();
            self.ctx.restore();
            return Ok(());
        }

        let Some(image) = self.image_for(sprite.asset) else {
            return Ok(());
        };
        self.ctx.save();
        self.ctx.set_global_alpha(sprite.opacity.min(1.0) as f64);
        self.ctx
            .translate(sprite.center.x as f64, sprite.center.y as f64)?;
        self.ctx.rotate((sprite.rotation_deg as f64).to_radians())?;
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(&image, -size / 2.0, -size / 2.0, size, size)?;
        self.ctx.restore();
        Ok(())
    }

    fn draw_texts(&mut self) -> Result<(), SurfaceError> {
        self.ctx.set_fill_style_str(INK);
        self.ctx.set_text_baseline("middle");

        for slot in [TextSlot::Hint, TextSlot::Timer, TextSlot::Caption] {
            let (Some(text), Some(anchor)) = (self.shown(slot), self.anchor_of(slot)) else {
                continue;
            };
            self.ctx.set_font(match slot {
                TextSlot::Timer => "bold 20px sans-serif",
                _ => "16px sans-serif",
            });
            self.ctx.set_text_align("center");
            self.ctx.fill_text(text, anchor.x as f64, anchor.y as f64)?;
        }

        let letter = self.shown(TextSlot::Letter).map(str::to_string);
        if let (Some(text), Some(anchor)) = (letter, self.anchor_of(TextSlot::Letter)) {
            self.ctx.set_font("15px serif");
            self.ctx.set_text_align("left");
            let max_width = self.viewport.width as f64 * LETTER_WIDTH;
            let lines = self.wrap(&text, max_width)?;

            let backdrop = self.backdrops.get(&TextSlot::Letter).copied();
            if let Some(image) = backdrop.and_then(|asset| self.image_for(asset)) {
                let x = anchor.x as f64 - LETTER_PADDING;
                let top = anchor.y as f64 - LETTER_LINE_HEIGHT / 2.0 - LETTER_PADDING;
                let height = lines.len() as f64 * LETTER_LINE_HEIGHT + 2.0 * LETTER_PADDING;
                self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &image,
                    x,
                    top,
                    max_width + 2.0 * LETTER_PADDING,
                    height,
                )?;
            }

            let mut y = anchor.y as f64;
            for line in lines {
                self.ctx.fill_text(&line, anchor.x as f64, y)?;
                y += LETTER_LINE_HEIGHT;
            }
        }
        Ok(())
    }

    fn shown(&self, slot: TextSlot) -> Option<&str> {
        if !self.visible.contains(&slot) {
            return None;
        }
        self.texts.get(&slot).map(String::as_str)
    }

    /// Break `text` into lines no wider than `max_width`, keeping explicit newlines
    fn wrap(&self, text: &str, max_width: f64) -> Result<Vec<String>, SurfaceError> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut line = String::new();
            for word in paragraph.split(' ') {
                let candidate = if line.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", line, word)
                };
                if !line.is_empty() && self.ctx.measure_text(&candidate)?.width() > max_width {
                    lines.push(std::mem::replace(&mut line, word.to_string()));
                } else {
                    line = candidate;
                }
            }
            lines.push(line);
        }
        Ok(lines)
    }
}

impl Surface for CanvasSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_polygon(&mut self, key: &str, points: &[Vec2], fill: &str) {
        match self.polygons.iter_mut().find(|p| p.key == key) {
            Some(polygon) => {
                polygon.points.clear();
                polygon.points.extend_from_slice(points);
                if polygon.fill != fill {
                    polygon.fill = fill.to_string();
                }
            }
            None => self.polygons.push(Polygon {
                key: key.to_string(),
                points: points.to_vec(),
                fill: fill.to_string(),
            }),
        }
    }

    fn clear_polygons(&mut self) {
        self.polygons.clear();
    }

    fn place_sprite(&mut self, sprite: &Sprite) {
        self.sprites.insert(sprite.id, sprite.clone());
    }

    fn remove_sprite(&mut self, id: SpriteId) {
        self.sprites.remove(&id);
    }

    fn clear_layer(&mut self, layer: Layer) {
        self.sprites.retain(|id, _| id.layer != layer);
    }

    fn set_ground_line(&mut self, y: Option<f32>) {
        self.ground_line = y;
    }

    fn set_scene_offset(&mut self, offset: Vec2) {
        self.scene_offset = offset;
    }

    fn set_text(&mut self, slot: TextSlot, text: &str) {
        self.texts.insert(slot, text.to_string());
    }

    fn set_text_visible(&mut self, slot: TextSlot, visible: bool) {
        if visible {
            self.visible.insert(slot);
        } else {
            self.visible.remove(&slot);
        }
    }

    fn set_text_backdrop(&mut self, slot: TextSlot, asset: Option<AssetId>) {
        match asset {
            Some(asset) => self.backdrops.insert(slot, asset),
            None => self.backdrops.remove(&slot),
        };
    }

    fn anchor_of(&self, slot: TextSlot) -> Option<Vec2> {
        let Viewport { width, height } = self.viewport;
        Some(match slot {
            TextSlot::Hint => Vec2::new(width / 2.0, height / 2.0 + 60.0),
            TextSlot::Timer => Vec2::new(width / 2.0, height - 35.0),
            TextSlot::Caption => Vec2::new(width / 2.0, height - 110.0),
            TextSlot::Letter => Vec2::new(40.0, 80.0),
        })
    }
}
