//! Grid Clash - simulation core for a grid sum-matching combat game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, shuffle, combat, upgrades, session)
//! - `game`: Top-level screen state machine and per-tick update order
//! - `assets`: Resilient asset-loading gate with per-group timeouts
//! - `audio`: Background-music crossfade bookkeeping
//! - `settings`: Difficulty and volume preferences
//! - `leaderboard`: Scoring service boundary
//!
//! The host delivers elapsed time via [`game::Game::update`] and discrete
//! input via [`game::Game::handle`]; rendering consumes [`game::Snapshot`].
//! No internal threading, no blocking calls - all waiting is state plus
//! elapsed-time bookkeeping checked on the next tick.

pub mod assets;
pub mod audio;
pub mod game;
pub mod leaderboard;
pub mod settings;
pub mod sim;

pub use game::{Command, Game, GameEvent, Screen, Snapshot};
pub use settings::{Difficulty, Settings};

/// Game tuning constants
///
/// One canonical ruleset; all timers are milliseconds.
pub mod consts {
    /// Grid is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: u8 = 10;
    /// Score per non-empty tile in a successful match
    pub const POINTS_PER_TILE: u32 = 10;
    /// Score per already-empty tile swept up in a successful match
    pub const EMPTY_TILE_BONUS: u32 = 1;

    /// Enemy attack interval (difficulty-independent)
    pub const ENEMY_ATTACK_INTERVAL_MS: f32 = 8000.0;
    /// Enemy attack damage (difficulty-independent, see DESIGN.md)
    pub const ENEMY_ATTACK_DAMAGE: i32 = 8;
    /// Enemy max health at level 1 on Normal, before difficulty scaling
    pub const ENEMY_BASE_HEALTH: f32 = 120.0;
    /// Additional enemy base health per level past the first
    pub const ENEMY_HEALTH_PER_LEVEL: f32 = 30.0;

    /// Flat health bonus per health upgrade
    pub const HEALTH_UPGRADE_BONUS: i32 = 5;
    /// Flat per-tile damage bonus per damage upgrade
    pub const DAMAGE_UPGRADE_BONUS: f32 = 0.5;

    /// Base component of every target number
    pub const TARGET_BASE: u32 = 9;
    /// Upper bound (inclusive) of the random component of a target number
    pub const TARGET_RANDOM_MAX: u32 = 6;
    /// Scrambles granted at the start of each level
    pub const SCRAMBLES_PER_LEVEL: u32 = 3;
    /// Score awarded per unused scramble when a level is won
    pub const SCRAMBLE_BONUS_POINTS: u32 = 50;

    /// Scramble animation window; combat timers are suspended while it runs
    pub const SCRAMBLE_DURATION_MS: f32 = 2000.0;
    /// Attack animation window (render-facing flag only)
    pub const ATTACK_ANIM_MS: f32 = 450.0;
    /// Per-group asset load deadline; a group is force-settled after this
    pub const ASSET_TIMEOUT_MS: f32 = 5000.0;
    /// Background music crossfade duration
    pub const BGM_FADE_MS: f32 = 1000.0;

    /// Leaderboard keeps this many entries
    pub const LEADERBOARD_SIZE: usize = 10;
}
