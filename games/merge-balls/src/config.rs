//! Tunables for the merge game, loadable from JSON before `game_init`.
//!
//! Every field has a default, so a JSON document only needs the keys it changes:
//! ```json
//! { "respawn_delay": 0.5, "tiers": [{ "radius": 20, "color": "#FF0000" }] }
//! ```

use anyhow::{bail, ensure, Context, Result};
use merge_engine::ColliderMaterial;
use serde::{Deserialize, Serialize};

use crate::tiers::{default_tiers, TierDef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Size classes, smallest first.
    pub tiers: Vec<TierDef>,
    /// Previews are drawn from this many of the smallest tiers.
    pub preview_tiers: usize,
    /// Height of the preview and of freshly dropped balls.
    pub spawn_y: f32,
    /// Seconds of simulated time between a drop and the next preview.
    pub respawn_delay: f32,
    pub base_air_friction: f32,
    /// Air friction shrinks by this much per pixel of radius.
    pub air_friction_scale: f32,
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
    /// Downward acceleration in px/s².
    pub gravity: f32,
    pub wall_thickness: f32,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            preview_tiers: 3,
            spawn_y: 40.0,
            respawn_delay: 1.0,
            base_air_friction: 0.01,
            air_friction_scale: 0.0001,
            restitution: 0.3,
            friction: 0.1,
            density: 1.0,
            gravity: 1000.0,
            wall_thickness: 50.0,
        }
    }
}

impl MergeConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("parsing merge config JSON")?;
        config.validate().context("validating merge config")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.tiers.is_empty(), "at least one tier is required");

        let mut previous = 0.0;
        for (index, tier) in self.tiers.iter().enumerate() {
            ensure!(
                tier.radius.is_finite() && tier.radius > 0.0,
                "tier {index}: radius must be positive, got {}",
                tier.radius
            );
            if tier.radius <= previous {
                bail!(
                    "tier {index}: radii must be strictly ascending ({} after {previous})",
                    tier.radius
                );
            }
            previous = tier.radius;

            let friction = self.air_friction(tier.radius);
            ensure!(
                (0.0..1.0).contains(&friction),
                "tier {index}: air friction {friction} outside [0, 1)"
            );
        }

        ensure!(self.preview_tiers >= 1, "preview_tiers must be at least 1");
        ensure!(
            self.respawn_delay.is_finite() && self.respawn_delay > 0.0,
            "respawn_delay must be positive, got {}",
            self.respawn_delay
        );
        ensure!(self.spawn_y.is_finite(), "spawn_y must be finite");
        ensure!(self.gravity.is_finite(), "gravity must be finite");
        ensure!(
            self.wall_thickness.is_finite() && self.wall_thickness > 0.0,
            "wall_thickness must be positive"
        );
        ensure!(self.restitution >= 0.0, "restitution must not be negative");
        ensure!(self.friction >= 0.0, "friction must not be negative");
        ensure!(self.density > 0.0, "density must be positive");
        Ok(())
    }

    /// Per-step air friction of a ball: bigger balls fall with less drag.
    pub fn air_friction(&self, radius: f32) -> f32 {
        self.base_air_friction - self.air_friction_scale * radius
    }

    pub fn material(&self) -> ColliderMaterial {
        ColliderMaterial {
            restitution: self.restitution,
            friction: self.friction,
            density: self.density,
        }
    }
}
