//! Player/enemy health and the attack timer
//!
//! Health is clamped into `0..=max` on every mutation. The enemy attack is
//! a fixed 8 damage every 8000 ms regardless of difficulty; difficulty
//! shapes player max health, per-tile damage, and enemy max health (scaled
//! so the number of matches needed to win is difficulty-invariant).

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Difficulty;
use crate::sim::upgrade::UpgradeProgress;

/// Combat state for one level of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatState {
    pub player_health: i32,
    pub player_max_health: i32,
    pub enemy_health: i32,
    pub enemy_max_health: i32,
    /// Time accumulated toward the next enemy attack
    pub enemy_attack_timer: f32,
    /// Per-tile damage base for the current difficulty
    pub damage_base: f32,
    /// Cumulative per-tile damage bonus from upgrades
    pub damage_bonus: f32,
}

impl CombatState {
    /// Fresh combat state for a level, applying difficulty and upgrades
    pub fn new(difficulty: Difficulty, level: u32, upgrades: &UpgradeProgress) -> Self {
        let player_max = difficulty.player_max_health() + upgrades.health_bonus;
        let enemy_max = Self::enemy_max_health(difficulty, level);
        Self {
            player_health: player_max,
            player_max_health: player_max,
            enemy_health: enemy_max,
            enemy_max_health: enemy_max,
            enemy_attack_timer: 0.0,
            damage_base: difficulty.damage_base(),
            damage_bonus: upgrades.damage_bonus,
        }
    }

    /// Enemy max health: level-scaled base times the per-tile damage ratio,
    /// keeping hits-to-kill constant across difficulties
    pub fn enemy_max_health(difficulty: Difficulty, level: u32) -> i32 {
        let base = ENEMY_BASE_HEALTH + ENEMY_HEALTH_PER_LEVEL * (level.saturating_sub(1)) as f32;
        let ratio = difficulty.damage_base() / Difficulty::Normal.damage_base();
        (base * ratio).round() as i32
    }

    /// Advance the attack timer; returns the damage applied to the player
    /// if the interval elapsed this tick
    pub fn tick(&mut self, dt: f32) -> Option<i32> {
        self.enemy_attack_timer += dt;
        if self.enemy_attack_timer >= ENEMY_ATTACK_INTERVAL_MS {
            self.enemy_attack_timer = 0.0;
            self.damage_player(ENEMY_ATTACK_DAMAGE);
            Some(ENEMY_ATTACK_DAMAGE)
        } else {
            None
        }
    }

    /// Damage from a successful match: `round(tiles * (base + bonus))`
    pub fn match_damage(&self, tiles_with_value: u32) -> i32 {
        (tiles_with_value as f32 * (self.damage_base + self.damage_bonus)).round() as i32
    }

    /// Apply damage to the enemy, clamped at 0
    pub fn damage_enemy(&mut self, amount: i32) {
        self.enemy_health = (self.enemy_health - amount).clamp(0, self.enemy_max_health);
    }

    /// Apply damage to the player, clamped at 0
    pub fn damage_player(&mut self, amount: i32) {
        self.player_health = (self.player_health - amount).clamp(0, self.player_max_health);
    }

    pub fn enemy_defeated(&self) -> bool {
        self.enemy_health <= 0
    }

    pub fn player_defeated(&self) -> bool {
        self.player_health <= 0
    }

    /// Player health as a 0..=1 fraction, for the win bonus
    pub fn player_health_fraction(&self) -> f32 {
        if self.player_max_health == 0 {
            0.0
        } else {
            self.player_health as f32 / self.player_max_health as f32
        }
    }
}
