//! Rendering surface abstraction
//!
//! The engine never draws directly. It pushes polygons, sprites and text to
//! a [`Surface`]; the browser build backs it with a 2D canvas and tests use
//! [`RecordingSurface`].

pub mod assets;
pub mod canvas;
pub mod recording;

pub use assets::AssetId;
pub use canvas::CanvasSurface;
pub use recording::RecordingSurface;

use serde::{Deserialize, Serialize};
use crate::math::Vec2;

/// Size of the drawing area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Sprite groups that can be cleared together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// The falling seed of the drop phase
    Seed,
    /// Ring of sprites on the heart outline
    Boundary,
    /// Sprites filling the heart
    Interior,
    /// Particles flying to the timer
    Stream,
}

impl Layer {
    /// Whether the layer moves with the tree when the scene shifts
    pub fn follows_scene_offset(&self) -> bool {
        matches!(self, Layer::Boundary | Layer::Interior)
    }
}

/// Sprite identity, unique within its layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId {
    pub layer: Layer,
    pub serial: u64,
}

impl SpriteId {
    pub fn new(layer: Layer, serial: u64) -> Self {
        Self { layer, serial }
    }
}

/// A bounded-lifetime image element
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub id: SpriteId,
    pub asset: AssetId,
    pub center: Vec2,
    /// Edge length in pixels before scaling
    pub size: f32,
    pub rotation_deg: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Sprite {
    pub fn new(id: SpriteId, asset: AssetId, center: Vec2, size: f32) -> Self {
        Self {
            id,
            asset,
            center,
            size,
            rotation_deg: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

/// Text regions owned by collaborators outside the growth engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextSlot {
    /// Hover hint next to the trigger
    Hint,
    /// Elapsed-time display the particle stream flies to
    Timer,
    /// Caption shown with the timer
    Caption,
    /// Typewriter letter box
    Letter,
}

/// Mutable drawing target shared by every component
pub trait Surface {
    fn viewport(&self) -> Viewport;

    /// Replace the vertex list of polygon `key`, creating it if needed
    fn set_polygon(&mut self, key: &str, points: &[Vec2], fill: &str);

    fn clear_polygons(&mut self);

    /// Insert or update a sprite
    fn place_sprite(&mut self, sprite: &Sprite);

    fn remove_sprite(&mut self, id: SpriteId);

    fn clear_layer(&mut self, layer: Layer);

    /// Show the ground line at `y`, or hide it
    fn set_ground_line(&mut self, y: Option<f32>);

    /// Translation applied to the tree and the bloom
    fn set_scene_offset(&mut self, offset: Vec2);

    fn set_text(&mut self, slot: TextSlot, text: &str);

    fn set_text_visible(&mut self, slot: TextSlot, visible: bool);

    /// Image drawn behind a text region, or none
    fn set_text_backdrop(&mut self, slot: TextSlot, asset: Option<AssetId>);

    /// Screen position of a text region, if the surface lays it out
    fn anchor_of(&self, slot: TextSlot) -> Option<Vec2>;
}
