//! In-memory surface that records everything drawn to it

use std::collections::{BTreeMap, HashMap};
use crate::math::Vec2;
use super::{AssetId, Layer, Sprite, SpriteId, Surface, TextSlot, Viewport};

/// Headless [`Surface`] keeping the latest state plus a few write counters
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: Viewport,
    pub polygons: BTreeMap<String, (Vec<Vec2>, String)>,
    pub sprites: BTreeMap<SpriteId, Sprite>,
    pub texts: HashMap<TextSlot, String>,
    pub visible: HashMap<TextSlot, bool>,
    pub backdrops: HashMap<TextSlot, AssetId>,
    pub ground_line: Option<f32>,
    pub scene_offset: Vec2,
    /// Order in which polygons were written, one entry per write
    pub polygon_writes: Vec<String>,
    /// Every sprite removal, in order
    pub removed: Vec<SpriteId>,
    /// Last state of each removed sprite, in removal order
    pub removed_sprites: Vec<Sprite>,
    anchors: HashMap<TextSlot, Vec2>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            polygons: BTreeMap::new(),
            sprites: BTreeMap::new(),
            texts: HashMap::new(),
            visible: HashMap::new(),
            backdrops: HashMap::new(),
            ground_line: None,
            scene_offset: Vec2::ZERO,
            polygon_writes: Vec::new(),
            removed: Vec::new(),
            removed_sprites: Vec::new(),
            anchors: HashMap::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Lay out a text slot at a fixed position
    pub fn with_anchor(mut self, slot: TextSlot, position: Vec2) -> Self {
        self.anchors.insert(slot, position);
        self
    }

    pub fn polygon(&self, key: &str) -> Option<&[Vec2]> {
        self.polygons.get(key).map(|(points, _)| points.as_slice())
    }

    pub fn layer_count(&self, layer: Layer) -> usize {
        self.sprites.keys().filter(|id| id.layer == layer).count()
    }

    pub fn text(&self, slot: TextSlot) -> Option<&str> {
        self.texts.get(&slot).map(String::as_str)
    }

    pub fn is_visible(&self, slot: TextSlot) -> bool {
        self.visible.get(&slot).copied().unwrap_or(false)
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_polygon(&mut self, key: &str, points: &[Vec2], fill: &str) {
        self.polygon_writes.push(key.to_string());
        self.polygons
            .insert(key.to_string(), (points.to_vec(), fill.to_string()));
    }

    fn clear_polygons(&mut self) {
        self.polygons.clear();
    }

    fn place_sprite(&mut self, sprite: &Sprite) {
        self.sprites.insert(sprite.id, sprite.clone());
    }

    fn remove_sprite(&mut self, id: SpriteId) {
        if let Some(sprite) = self.sprites.remove(&id) {
            self.removed_sprites.push(sprite);
        }
        self.removed.push(id);
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
        self.visible.insert(slot, visible);
    }

    fn set_text_backdrop(&mut self, slot: TextSlot, asset: Option<AssetId>) {
        match asset {
            Some(asset) => self.backdrops.insert(slot, asset),
            None => self.backdrops.remove(&slot),
        };
    }

    fn anchor_of(&self, slot: TextSlot) -> Option<Vec2> {
        self.anchors.get(&slot).copied()
    }
}
