//! Ball size classes: radius and colour per tier, ordered smallest first.

use merge_engine::SDFColor;
use serde::{Deserialize, Serialize};

/// One size class. Colours are `#RRGGBB` strings in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierDef {
    pub radius: f32,
    pub color: SDFColor,
}

impl TierDef {
    pub fn new(radius: f32, hex: &str) -> Self {
        Self {
            radius,
            color: SDFColor::from_hex(hex).unwrap_or_default(),
        }
    }
}

/// Ordered tier list. Indices are the `tier` carried by `EntityKind::Ball`.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<TierDef>,
}

impl TierTable {
    pub fn new(tiers: Vec<TierDef>) -> Self {
        Self { tiers }
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn get(&self, tier: usize) -> Option<&TierDef> {
        self.tiers.get(tier)
    }

    /// Largest tier index.
    pub fn max_tier(&self) -> usize {
        self.tiers.len().saturating_sub(1)
    }

    /// The tier a merge of two `tier` balls produces, `None` at the top.
    pub fn next(&self, tier: usize) -> Option<usize> {
        let next = tier + 1;
        (next < self.tiers.len()).then_some(next)
    }

    /// How many of the smallest tiers a preview may be drawn from.
    pub fn preview_count(&self, preview_tiers: usize) -> usize {
        preview_tiers.clamp(1, self.tiers.len().max(1))
    }
}

/// The eight sizes and colours of the classic game.
pub fn default_tiers() -> Vec<TierDef> {
    vec![
        TierDef::new(20.0, "#FF0000"),
        TierDef::new(25.0, "#FF7F00"),
        TierDef::new(35.0, "#F0E68C"),
        TierDef::new(45.0, "#00FF00"),
        TierDef::new(55.0, "#00FFFF"),
        TierDef::new(70.0, "#0000FF"),
        TierDef::new(80.0, "#8B00FF"),
        TierDef::new(95.0, "#40E0D0"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_sizes() {
        let table = TierTable::new(default_tiers());
        assert_eq!(table.len(), 8);
        assert_eq!(table.max_tier(), 7);
        assert_eq!(table.get(0).unwrap().radius, 20.0);
        assert_eq!(table.get(7).unwrap().radius, 95.0);
        assert_eq!(table.get(2).unwrap().color.to_hex(), "#F0E68C");
    }

    #[test]
    fn next_stops_at_max() {
        let table = TierTable::new(default_tiers());
        assert_eq!(table.next(0), Some(1));
        assert_eq!(table.next(6), Some(7));
        assert_eq!(table.next(7), None);
    }

    #[test]
    fn preview_count_is_clamped() {
        let table = TierTable::new(default_tiers()[..2].to_vec());
        assert_eq!(table.preview_count(3), 2);
        assert_eq!(table.preview_count(0), 1);
        assert_eq!(TierTable::new(default_tiers()).preview_count(3), 3);
    }
}
