//! The aggregate root for one run
//!
//! Owns the grid, combat state, upgrade progress, selection lifecycle,
//! level/target/score bookkeeping, and the seeded RNG. All mutation comes
//! from the per-tick update or from synchronously handled input commands;
//! there is no other mutation path.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Difficulty;

use super::combat::CombatState;
use super::grid::{Grid, Rect};
use super::shuffle::{self, Relocation};
use super::upgrade::{UpgradeKind, UpgradeProgress};

/// In-flight selection rectangle (created on press, consumed on release)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Selection {
    pub start: (u8, u8),
    pub end: (u8, u8),
}

impl Selection {
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}

/// Outcome of releasing a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// No selection was active (stray release) - nothing happened
    NoSelection,
    /// Sum did not equal the target; only the highlight was cleared
    Miss { sum: u32 },
    /// Sum equalled the target: cells cleared, score and damage applied
    Hit {
        tiles_with_value: u32,
        empty_tiles: u32,
        damage: i32,
        enemy_defeated: bool,
    },
}

/// One run of the game, from "start" until game over or restart
#[derive(Debug, Clone)]
pub struct GameSession {
    pub seed: u64,
    rng: Pcg32,
    pub difficulty: Difficulty,
    pub grid: Grid,
    pub combat: CombatState,
    pub upgrades: UpgradeProgress,
    pub level: u32,
    pub score: u32,
    pub target_number: u32,
    /// Target for the next level, rolled when the current level is won
    next_target: u32,
    pub scrambles_remaining: u32,
    selection: Option<Selection>,
    /// Remaining scramble animation time; combat is suspended while > 0
    pub scramble_timer: f32,
    /// Endpoints for the presentation layer's scramble animation
    pub scramble_relocations: Vec<Relocation>,
    /// Remaining attack animation time (render-facing only)
    pub attack_anim_timer: f32,
    /// Win bonuses from the most recent level clear, for display
    pub last_health_bonus: u32,
    pub last_scramble_bonus: u32,
}

impl GameSession {
    /// Start a fresh run: level 1, zero score, full allotments
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::generate(&mut rng);
        let upgrades = UpgradeProgress::default();
        let combat = CombatState::new(difficulty, 1, &upgrades);
        let target_number = roll_target(&mut rng, 1);
        log::info!(
            "new session: difficulty={} seed={seed} target={target_number}",
            difficulty.as_str()
        );
        Self {
            seed,
            rng,
            difficulty,
            grid,
            combat,
            upgrades,
            level: 1,
            score: 0,
            target_number,
            next_target: 0,
            scrambles_remaining: SCRAMBLES_PER_LEVEL,
            selection: None,
            scramble_timer: 0.0,
            scramble_relocations: Vec::new(),
            attack_anim_timer: 0.0,
            last_health_bonus: 0,
            last_scramble_bonus: 0,
        }
    }

    /// Begin a selection at (x, y); out-of-grid coordinates are a no-op
    pub fn start_selection(&mut self, x: u8, y: u8) {
        if !Grid::in_bounds(x, y) || self.scramble_in_progress() {
            return;
        }
        self.selection = Some(Selection {
            start: (x, y),
            end: (x, y),
        });
        self.refresh_highlight();
    }

    /// Extend the active selection to (x, y); no-op without a selection
    pub fn update_selection(&mut self, x: u8, y: u8) {
        if !Grid::in_bounds(x, y) {
            return;
        }
        if let Some(selection) = &mut self.selection {
            selection.end = (x, y);
        }
        self.refresh_highlight();
    }

    /// Release the selection and resolve it against the target number
    pub fn end_selection(&mut self) -> MatchResult {
        let Some(selection) = self.selection.take() else {
            return MatchResult::NoSelection;
        };
        self.grid.deselect_all();

        let rect = selection.rect();
        let range = self.grid.range_sum(rect);
        if range.sum != self.target_number {
            return MatchResult::Miss { sum: range.sum };
        }

        self.grid.clear(rect);
        self.score +=
            range.tiles_with_value * POINTS_PER_TILE + range.empty_tiles * EMPTY_TILE_BONUS;
        let damage = self.combat.match_damage(range.tiles_with_value);
        self.combat.damage_enemy(damage);
        self.attack_anim_timer = ATTACK_ANIM_MS;

        let enemy_defeated = self.combat.enemy_defeated();
        if enemy_defeated {
            self.award_win_bonuses();
        }
        MatchResult::Hit {
            tiles_with_value: range.tiles_with_value,
            empty_tiles: range.empty_tiles,
            damage,
            enemy_defeated,
        }
    }

    fn refresh_highlight(&mut self) {
        self.grid.deselect_all();
        if let Some(selection) = &self.selection {
            self.grid.select(selection.rect());
        }
    }

    /// Reshuffle all non-zero values, consuming one scramble
    ///
    /// Returns the relocation list if a scramble actually happened.
    pub fn scramble(&mut self) -> Option<&[Relocation]> {
        if self.scrambles_remaining == 0 || self.scramble_in_progress() {
            return None;
        }
        self.scrambles_remaining -= 1;
        self.selection = None;
        self.grid.deselect_all();
        self.scramble_relocations = shuffle::scramble(&mut self.grid, &mut self.rng);
        self.scramble_timer = SCRAMBLE_DURATION_MS;
        log::info!(
            "scramble: {} values relocated, {} left",
            self.scramble_relocations.len(),
            self.scrambles_remaining
        );
        Some(&self.scramble_relocations)
    }

    /// Combat timers are suspended while the scramble window runs
    pub fn scramble_in_progress(&self) -> bool {
        self.scramble_timer > 0.0
    }

    /// Fraction of the scramble animation completed, 0..=1
    pub fn scramble_progress(&self) -> f32 {
        1.0 - (self.scramble_timer / SCRAMBLE_DURATION_MS).clamp(0.0, 1.0)
    }

    /// Advance animation timers; runs every tick regardless of screen.
    /// Returns true on the tick the scramble window finishes.
    pub fn tick_animations(&mut self, dt: f32) -> bool {
        if self.attack_anim_timer > 0.0 {
            self.attack_anim_timer = (self.attack_anim_timer - dt).max(0.0);
        }
        if self.scramble_timer > 0.0 {
            self.scramble_timer -= dt;
            if self.scramble_timer <= 0.0 {
                self.scramble_timer = 0.0;
                self.scramble_relocations.clear();
                return true;
            }
        }
        false
    }

    /// Advance combat; returns the enemy attack damage if one landed
    pub fn tick_combat(&mut self, dt: f32) -> Option<i32> {
        self.combat.tick(dt)
    }

    /// One-shot win bonuses, applied at the moment the enemy falls
    fn award_win_bonuses(&mut self) {
        let health_bonus =
            (self.score as f32 * self.combat.player_health_fraction() * 0.5).floor() as u32;
        let scramble_bonus = self.scrambles_remaining * SCRAMBLE_BONUS_POINTS;
        self.score += health_bonus + scramble_bonus;
        self.last_health_bonus = health_bonus;
        self.last_scramble_bonus = scramble_bonus;
        self.next_target = roll_target(&mut self.rng, self.level + 1);
        log::info!(
            "level {} won: +{health_bonus} health bonus, +{scramble_bonus} scramble bonus",
            self.level
        );
    }

    /// Apply the chosen upgrade and roll over to the next level
    pub fn next_level(&mut self, upgrade: UpgradeKind) {
        self.upgrades.apply(upgrade);
        self.level += 1;
        self.target_number = self.next_target;
        self.scrambles_remaining = SCRAMBLES_PER_LEVEL;
        self.combat = CombatState::new(self.difficulty, self.level, &self.upgrades);
        self.grid = Grid::generate(&mut self.rng);
        self.selection = None;
        self.scramble_timer = 0.0;
        self.scramble_relocations.clear();
        self.attack_anim_timer = 0.0;
        log::info!(
            "level {} started: target={} enemy_hp={}",
            self.level,
            self.target_number,
            self.combat.enemy_max_health
        );
    }

    /// Final score after the difficulty multiplier
    pub fn final_score(&self) -> u32 {
        (self.score as f32 * self.difficulty.score_multiplier()).round() as u32
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }
}

/// Target number for a level: base 9 + level + a small random component
fn roll_target(rng: &mut impl Rng, level: u32) -> u32 {
    TARGET_BASE + level + rng.random_range(0..=TARGET_RANDOM_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(Difficulty::Normal, 42)
    }

    /// Overwrite a rectangle of cell values directly (test scaffolding)
    fn paint(session: &mut GameSession, rect: Rect, value: u8) {
        for cell in session.grid.cells_mut() {
            if cell.x >= rect.x0 && cell.x <= rect.x1 && cell.y >= rect.y0 && cell.y <= rect.y1 {
                cell.value = value;
            }
        }
    }

    #[test]
    fn test_target_is_in_expected_range() {
        for seed in 0..20 {
            let session = GameSession::new(Difficulty::Normal, seed);
            assert!((10..=16).contains(&session.target_number));
        }
    }

    #[test]
    fn test_successful_match_scores_and_damages() {
        let mut session = session();
        // A 2x3 block of fresh cells summing exactly to the target:
        // lay down 6 values that add up to it.
        let rect = Rect::from_points((1, 1), (2, 3));
        session.target_number = 15;
        paint(&mut session, rect, 2);
        // bump one cell to make the sum 15: five 2s + one 5
        for cell in session.grid.cells_mut() {
            if (cell.x, cell.y) == (1, 1) {
                cell.value = 5;
            }
        }
        let enemy_before = session.combat.enemy_health;

        session.start_selection(1, 1);
        session.update_selection(2, 3);
        let result = session.end_selection();

        assert_eq!(
            result,
            MatchResult::Hit {
                tiles_with_value: 6,
                empty_tiles: 0,
                damage: 60,
                enemy_defeated: false,
            }
        );
        assert_eq!(session.score, 60); // 6 tiles * 10
        assert_eq!(session.combat.enemy_health, enemy_before - 60);
        for (x, y) in rect.coords() {
            assert_eq!(session.grid.cell(x, y).map(|c| c.value), Some(0));
        }
    }

    #[test]
    fn test_failed_match_leaves_grid_untouched() {
        let mut session = session();
        session.target_number = 1_000; // unreachable
        let values_before: Vec<u8> = session.grid.cells().iter().map(|c| c.value).collect();
        let enemy_before = session.combat.enemy_health;

        session.start_selection(0, 0);
        session.update_selection(9, 9);
        let result = session.end_selection();

        assert!(matches!(result, MatchResult::Miss { .. }));
        let values_after: Vec<u8> = session.grid.cells().iter().map(|c| c.value).collect();
        assert_eq!(values_before, values_after);
        assert_eq!(session.combat.enemy_health, enemy_before);
        assert_eq!(session.score, 0);
        assert!(session.grid.cells().iter().all(|c| !c.selected));
    }

    #[test]
    fn test_empty_tile_bonus() {
        let mut session = session();
        let rect = Rect::from_points((0, 0), (2, 0));
        paint(&mut session, rect, 0);
        for cell in session.grid.cells_mut() {
            if (cell.x, cell.y) == (0, 0) {
                cell.value = 9;
            }
            if (cell.x, cell.y) == (1, 0) {
                cell.value = 6;
            }
        }
        session.target_number = 15;

        session.start_selection(0, 0);
        session.update_selection(2, 0);
        let result = session.end_selection();
        assert_eq!(
            result,
            MatchResult::Hit {
                tiles_with_value: 2,
                empty_tiles: 1,
                damage: 20,
                enemy_defeated: false,
            }
        );
        // 2 tiles * 10 + 1 empty * 1
        assert_eq!(session.score, 21);
    }

    #[test]
    fn test_release_without_selection_is_noop() {
        let mut session = session();
        assert_eq!(session.end_selection(), MatchResult::NoSelection);
    }

    #[test]
    fn test_out_of_range_selection_is_noop() {
        let mut session = session();
        session.start_selection(12, 3);
        assert!(session.selection().is_none());
        assert_eq!(session.end_selection(), MatchResult::NoSelection);
    }

    #[test]
    fn test_win_bonuses_applied_exactly_once() {
        let mut session = session();
        session.target_number = 15;
        let rect = Rect::from_points((0, 0), (2, 0));
        paint(&mut session, rect, 5);
        // Drop the enemy to exactly the incoming damage (3 tiles * 10)
        session.combat.enemy_health = 30;

        session.start_selection(0, 0);
        session.update_selection(2, 0);
        let result = session.end_selection();
        assert!(matches!(result, MatchResult::Hit { enemy_defeated: true, .. }));
        assert_eq!(session.combat.enemy_health, 0);

        // score = 30 match points, health bonus floor(30 * 1.0 * 0.5) = 15,
        // scramble bonus 3 * 50 = 150
        assert_eq!(session.last_health_bonus, 15);
        assert_eq!(session.last_scramble_bonus, 150);
        assert_eq!(session.score, 30 + 15 + 150);

        // Ticking while the win is pending must not re-award anything
        let score_after_win = session.score;
        for _ in 0..10 {
            session.tick_animations(100.0);
        }
        assert_eq!(session.score, score_after_win);
    }

    #[test]
    fn test_next_level_rolls_everything_over() {
        let mut session = session();
        session.target_number = 15;
        let rect = Rect::from_points((0, 0), (2, 0));
        paint(&mut session, rect, 5);
        session.combat.enemy_health = 1;
        session.start_selection(0, 0);
        session.update_selection(2, 0);
        session.end_selection();

        session.next_level(UpgradeKind::Damage);
        assert_eq!(session.level, 2);
        assert_eq!(session.scrambles_remaining, SCRAMBLES_PER_LEVEL);
        assert_eq!(session.combat.player_health, session.combat.player_max_health);
        assert_eq!(session.combat.enemy_health, session.combat.enemy_max_health);
        assert!((session.combat.damage_bonus - 0.5).abs() < f32::EPSILON);
        assert_eq!(session.grid.non_zero_count(), 100);
        // target for level 2: 9 + 2 + 0..=6
        assert!((11..=17).contains(&session.target_number));
    }

    #[test]
    fn test_scramble_consumes_allotment_and_suspends() {
        let mut session = session();
        assert_eq!(session.scrambles_remaining, SCRAMBLES_PER_LEVEL);
        assert!(session.scramble().is_some());
        assert_eq!(session.scrambles_remaining, SCRAMBLES_PER_LEVEL - 1);
        assert!(session.scramble_in_progress());

        // A second scramble mid-window is refused
        assert!(session.scramble().is_none());
        assert_eq!(session.scrambles_remaining, SCRAMBLES_PER_LEVEL - 1);

        // Window elapses; finish signal fires exactly once
        assert!(!session.tick_animations(1999.0));
        assert!(session.tick_animations(1.0));
        assert!(!session.scramble_in_progress());
        assert!(!session.tick_animations(16.0));
    }

    #[test]
    fn test_scrambles_exhaust() {
        let mut session = session();
        for _ in 0..SCRAMBLES_PER_LEVEL {
            assert!(session.scramble().is_some());
            session.tick_animations(SCRAMBLE_DURATION_MS);
        }
        assert!(session.scramble().is_none());
    }

    #[test]
    fn test_final_score_applies_difficulty_multiplier() {
        let mut easy = GameSession::new(Difficulty::Easy, 1);
        easy.score = 100;
        assert_eq!(easy.final_score(), 75);
        let mut hard = GameSession::new(Difficulty::Hard, 1);
        hard.score = 100;
        assert_eq!(hard.final_score(), 125);
    }

    #[test]
    fn test_same_seed_same_session() {
        let a = GameSession::new(Difficulty::Normal, 999);
        let b = GameSession::new(Difficulty::Normal, 999);
        assert_eq!(a.target_number, b.target_number);
        let va: Vec<u8> = a.grid.cells().iter().map(|c| c.value).collect();
        let vb: Vec<u8> = b.grid.cells().iter().map(|c| c.value).collect();
        assert_eq!(va, vb);
    }
}
