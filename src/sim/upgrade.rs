//! Between-level upgrades
//!
//! Flat-bonus model: every health upgrade adds +5 max health, every damage
//! upgrade adds +0.5 per-tile damage. Bonuses are additive, uncapped, never
//! reversed within a run, and reset only when a new game starts. (An older
//! multiplicative diminishing-returns ruleset existed; this crate implements
//! the flat model throughout, see DESIGN.md.)

use serde::{Deserialize, Serialize};

use crate::consts::{DAMAGE_UPGRADE_BONUS, HEALTH_UPGRADE_BONUS};

/// The two upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Health,
    Damage,
}

/// Cumulative upgrade state for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpgradeProgress {
    pub health_upgrade_count: u32,
    pub damage_upgrade_count: u32,
    /// Total bonus added to player max health
    pub health_bonus: i32,
    /// Total bonus added to per-tile damage
    pub damage_bonus: f32,
}

impl UpgradeProgress {
    /// Apply one upgrade of the given kind
    pub fn apply(&mut self, kind: UpgradeKind) {
        match kind {
            UpgradeKind::Health => {
                self.health_upgrade_count += 1;
                self.health_bonus += HEALTH_UPGRADE_BONUS;
            }
            UpgradeKind::Damage => {
                self.damage_upgrade_count += 1;
                self.damage_bonus += DAMAGE_UPGRADE_BONUS;
            }
        }
    }
}
