//! Scene configuration
//!
//! Every field has a default matching the stock scene, so an empty YAML
//! document (or none at all) yields a complete configuration.

use serde::{Deserialize, Serialize};
use crate::error::{ConfigError, Result};
use crate::growth::TreeSpec;
use crate::math::Vec2;
use crate::particles::{BloomSettings, StreamSettings};
use crate::render::AssetId;
use crate::scene::DropSettings;

/// 2024-12-31T04:51:00Z
pub const DEFAULT_SINCE_MS: f64 = 1_735_620_660_000.0;

const DEFAULT_LETTER: &str = "I really appreciate the time we spend together. \
Whether we're talking for hours or just seeing each other, it always feels comforting. \
You have this calm and sweet vibe that makes everything feel better. \
I admire how caring and understanding you are, it makes being around you so easy and peaceful. \
I'm genuinely thankful for all the moments we share and for having you in my life..";

/// Where the heart sits and how the scene moves once it has bloomed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartSettings {
    /// Heart center relative to the trunk tip
    pub offset: Vec2,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Wait after the bloom before the scene shifts
    pub shift_delay: f32,
    pub shift_duration: f32,
    /// Wait after the shift starts before the reveal
    pub reveal_delay: f32,
}

impl Default for HeartSettings {
    fn default() -> Self {
        Self {
            offset: Vec2::new(40.0, 100.0),
            scale_x: 19.0,
            scale_y: 19.0,
            shift_delay: 1.2,
            shift_duration: 1.0,
            reveal_delay: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub drop: DropSettings,
    /// Horizontal scene shift after the bloom; also offsets the stream source
    pub tree_x_offset: f32,
    pub heart: HeartSettings,
    pub bloom: BloomSettings,
    pub stream: StreamSettings,
    pub stream_count: usize,
    /// Start of the elapsed-time display, epoch milliseconds
    pub since_ms: f64,
    /// Seconds between timer refreshes
    pub timer_refresh: f32,
    pub letter: String,
    /// Image drawn behind the letter
    pub letter_image: AssetId,
    pub caption: String,
    pub hint: String,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    pub tree: TreeSpec,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            drop: DropSettings::default(),
            tree_x_offset: 140.0,
            heart: HeartSettings::default(),
            bloom: BloomSettings::default(),
            stream: StreamSettings::default(),
            stream_count: 35,
            since_ms: DEFAULT_SINCE_MS,
            timer_refresh: 1.0,
            letter: DEFAULT_LETTER.to_string(),
            letter_image: AssetId::LetterBox,
            caption: "Your Kuchu Puchu, since.....".to_string(),
            hint: "Click me".to_string(),
            seed: None,
            tree: TreeSpec::default(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a YAML scene configuration
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("drop.hide_delay", self.drop.hide_delay),
            ("drop.fall_duration", self.drop.fall_duration),
            ("drop.settle_delay", self.drop.settle_delay),
            ("heart.shift_delay", self.heart.shift_delay),
            ("heart.shift_duration", self.heart.shift_duration),
            ("heart.reveal_delay", self.heart.reveal_delay),
            ("bloom.stagger", self.bloom.stagger),
            ("bloom.jitter", self.bloom.jitter),
            ("bloom.fade_duration", self.bloom.fade_duration),
            ("bloom.pop_duration", self.bloom.pop_duration),
            ("stream.launch_interval", self.stream.launch_interval),
            ("stream.launch_jitter", self.stream.launch_jitter),
        ];
        for (field, value) in durations {
            non_negative(field, value)?;
        }

        let positive = [
            ("stream.fall_rate", self.stream.fall_rate),
            ("stream.fade_distance", self.stream.fade_distance),
            ("timer_refresh", self.timer_refresh),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if !self.tree_x_offset.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "tree_x_offset".to_string(),
                value: self.tree_x_offset,
            });
        }
        if !self.heart.offset.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "heart.offset".to_string(),
                value: f32::NAN,
            });
        }

        self.tree.validate()
    }
}

fn non_negative(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        })
    }
}
