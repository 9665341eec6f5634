//! Declarative tree description
//!
//! The spec tree is immutable configuration. Which branches have started in
//! the current cycle is tracked by the cycle itself, never on the spec.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::error::{ConfigError, Result};

fn default_color() -> String {
    "#000".to_string()
}

/// One branch (or sub-branch) of the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSpec {
    pub id: String,
    /// Attachment point along the parent, in percent of its length
    pub attach_percent: f32,
    /// Target length in pixels
    pub length: f32,
    /// Horizontal bend applied toward the tip
    #[serde(default)]
    pub bend: f32,
    /// Stroke width at the base
    pub start_width: f32,
    /// Angle in degrees relative to the parent's tangent at the attachment point
    #[serde(default)]
    pub angle: f32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub children: Vec<GrowthSpec>,
}

impl GrowthSpec {
    pub fn new(id: &str, attach_percent: f32, length: f32, start_width: f32) -> Self {
        Self {
            id: id.to_string(),
            attach_percent,
            length,
            bend: 0.0,
            start_width,
            angle: 0.0,
            color: default_color(),
            children: Vec::new(),
        }
    }

    pub fn with_bend(mut self, bend: f32) -> Self {
        self.bend = bend;
        self
    }

    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = degrees;
        self
    }

    pub fn with_children(mut self, children: Vec<GrowthSpec>) -> Self {
        self.children = children;
        self
    }

    /// Attachment as a fraction of the parent, clamped to [0, 1]
    pub fn attachment(&self) -> f32 {
        (self.attach_percent / 100.0).clamp(0.0, 1.0)
    }

    pub fn angle_radians(&self) -> f32 {
        self.angle.to_radians()
    }

    /// Number of specs below this one, at any depth
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

/// The trunk every branch ultimately hangs from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrunkSpec {
    /// Trunk height as a fraction of the viewport height
    pub height_fraction: f32,
    /// Distance between the trunk base and the bottom of the viewport
    pub bottom_margin: f32,
    pub start_width: f32,
    pub tip_width: f32,
    /// Fraction of the height that grows straight before bending
    pub straight_fraction: f32,
    pub bend: f32,
    pub segments: usize,
    pub taper_exponent: f32,
    /// Growth duration in seconds
    pub duration: f32,
    pub color: String,
}

impl Default for TrunkSpec {
    fn default() -> Self {
        Self {
            height_fraction: 1.0 / 1.5,
            bottom_margin: 70.0,
            start_width: 50.0,
            tip_width: 4.0,
            straight_fraction: 0.7,
            bend: -60.0,
            segments: 60,
            taper_exponent: 1.2,
            duration: 1.5,
            color: default_color(),
        }
    }
}

/// Timing and shape constants shared by all branches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthTuning {
    pub branch_segments: usize,
    /// Width a branch never thins below
    pub min_width: f32,
    pub taper_exponent: f32,
    /// Duration factor for branches hanging off the trunk
    pub trunk_child_duration: f32,
    /// Duration factor for every deeper level
    pub nested_child_duration: f32,
    /// Delay in seconds between crossing the attachment point and the child starting
    pub trunk_child_lag: f32,
    pub nested_child_lag: f32,
}

impl Default for GrowthTuning {
    fn default() -> Self {
        Self {
            branch_segments: 20,
            min_width: 4.0,
            taper_exponent: 1.5,
            trunk_child_duration: 0.8,
            nested_child_duration: 0.7,
            trunk_child_lag: 0.1,
            nested_child_lag: 0.05,
        }
    }
}

impl GrowthTuning {
    /// Duration factor applied to a child whose parent sits at `parent_depth`
    pub fn duration_factor(&self, parent_depth: usize) -> f32 {
        if parent_depth == 0 {
            self.trunk_child_duration
        } else {
            self.nested_child_duration
        }
    }

    pub fn spawn_lag(&self, parent_depth: usize) -> f32 {
        if parent_depth == 0 {
            self.trunk_child_lag
        } else {
            self.nested_child_lag
        }
    }
}

/// Full tree: trunk, branch hierarchy and shared tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    #[serde(default)]
    pub trunk: TrunkSpec,
    #[serde(default)]
    pub tuning: GrowthTuning,
    #[serde(default)]
    pub branches: Vec<GrowthSpec>,
}

impl TreeSpec {
    /// Parse and validate from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let tree: TreeSpec = serde_yaml::from_str(yaml)?;
        tree.validate()?;
        Ok(tree)
    }

    /// Every branch spec at any depth
    pub fn branch_count(&self) -> usize {
        self.branches.iter().map(|b| 1 + b.descendant_count()).sum()
    }

    /// Number of growth elements in one cycle: every branch plus the trunk
    pub fn element_count(&self) -> usize {
        self.branch_count() + 1
    }

    /// Iterate over all branch specs in pre-order
    pub fn iter_preorder(&self) -> PreorderIter<'_> {
        PreorderIter {
            stack: self.branches.iter().rev().collect(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&GrowthSpec> {
        self.iter_preorder().find(|s| s.id == id)
    }

    pub fn validate(&self) -> Result<()> {
        check_non_negative("trunk.height_fraction", self.trunk.height_fraction)?;
        check_non_negative("trunk.start_width", self.trunk.start_width)?;
        check_non_negative("trunk.tip_width", self.trunk.tip_width)?;
        check_non_negative("trunk.duration", self.trunk.duration)?;
        check_non_negative("tuning.min_width", self.tuning.min_width)?;
        check_non_negative("tuning.trunk_child_duration", self.tuning.trunk_child_duration)?;
        check_non_negative("tuning.nested_child_duration", self.tuning.nested_child_duration)?;
        check_non_negative("tuning.trunk_child_lag", self.tuning.trunk_child_lag)?;
        check_non_negative("tuning.nested_child_lag", self.tuning.nested_child_lag)?;

        let mut seen = HashSet::new();
        for spec in self.iter_preorder() {
            if !seen.insert(spec.id.as_str()) {
                return Err(ConfigError::DuplicateId(spec.id.clone()));
            }
            if !(0.0..=100.0).contains(&spec.attach_percent) {
                return Err(ConfigError::AttachmentOutOfRange {
                    id: spec.id.clone(),
                    value: spec.attach_percent,
                });
            }
            check_non_negative(&format!("{}.length", spec.id), spec.length)?;
            check_non_negative(&format!("{}.start_width", spec.id), spec.start_width)?;
            check_finite(&format!("{}.bend", spec.id), spec.bend)?;
            check_finite(&format!("{}.angle", spec.id), spec.angle)?;
        }

        Ok(())
    }
}

fn check_finite(field: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        })
    }
}

fn check_non_negative(field: &str, value: f32) -> Result<()> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

impl Default for TreeSpec {
    /// Two branches on the left, three on the right, each with a few twigs
    fn default() -> Self {
        let branches = vec![
            GrowthSpec::new("b1", 25.0, 250.0, 15.0)
                .with_bend(-40.0)
                .with_angle(-55.0)
                .with_children(vec![
                    GrowthSpec::new("b1small1", 50.0, 70.0, 4.0).with_bend(-10.0).with_angle(-25.0),
                    GrowthSpec::new("b1small2", 85.0, 50.0, 2.0).with_bend(10.0).with_angle(30.0),
                ]),
            GrowthSpec::new("b2", 50.0, 180.0, 12.0)
                .with_bend(-50.0)
                .with_angle(-55.0)
                .with_children(vec![
                    GrowthSpec::new("b2small1", 50.0, 70.0, 5.0).with_bend(-15.0).with_angle(-30.0),
                    GrowthSpec::new("b2small2", 80.0, 55.0, 2.0).with_bend(10.0).with_angle(20.0),
                ]),
            GrowthSpec::new("b3", 35.0, 210.0, 14.0)
                .with_bend(45.0)
                .with_angle(45.0)
                .with_children(vec![
                    GrowthSpec::new("b3small1", 50.0, 75.0, 5.0).with_bend(10.0).with_angle(25.0),
                ]),
            GrowthSpec::new("b4", 70.0, 145.0, 12.0)
                .with_bend(55.0)
                .with_angle(35.0)
                .with_children(vec![
                    GrowthSpec::new("b4small1", 60.0, 60.0, 4.0).with_bend(-10.0).with_angle(-15.0),
                ]),
            GrowthSpec::new("b5", 85.0, 65.0, 2.0)
                .with_bend(15.0)
                .with_angle(20.0),
        ];

        Self {
            trunk: TrunkSpec::default(),
            tuning: GrowthTuning::default(),
            branches,
        }
    }
}

pub struct PreorderIter<'a> {
    stack: Vec<&'a GrowthSpec>,
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = &'a GrowthSpec;

    fn next(&mut self) -> Option<Self::Item> {
        let spec = self.stack.pop()?;
        for child in spec.children.iter().rev() {
            self.stack.push(child);
        }
        Some(spec)
    }
}
