//! Top-level game state machine
//!
//! One explicit transition table: current screen x command/condition ->
//! next screen + effects. The host drives [`Game::update`] with elapsed
//! milliseconds and feeds discrete [`Command`]s; render state comes out as
//! a [`Snapshot`] and gameplay beats as drained [`GameEvent`]s.
//!
//! Per-tick order (single-threaded, cooperative):
//! 1. audio crossfade and animation timers, unconditionally
//! 2. on Loading: asset gate advancement and the settled check
//! 3. on Playing, when no scramble was in progress at tick start:
//!    combat timers, then the defeat check

use serde::Serialize;

use crate::assets::AssetLoadGate;
use crate::audio::AudioCrossfade;
use crate::leaderboard::{self, Entry, LeaderboardService};
use crate::settings::{Difficulty, Settings};
use crate::sim::{Cell, GameSession, MatchResult, Relocation, UpgradeKind};

/// Which screen/ruleset is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Screen {
    Loading,
    Menu,
    Playing,
    Options,
    GameOver,
    ChooseUpgrade,
    Leaderboard,
    LeaderboardNameInput,
}

/// Buttons the presentation layer can activate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Start,
    Options,
    Leaderboard,
    Back,
    Scramble,
    UpgradeHealth,
    UpgradeDamage,
    Menu,
}

/// Discrete input commands from the presentation/input layer
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartSelection { x: u8, y: u8 },
    UpdateSelection { x: u8, y: u8 },
    EndSelection,
    ActivateButton(ButtonId),
    SetDifficulty(Difficulty),
    SetVolumes { bgm: f32, sfx: f32 },
    ToggleMute,
    SubmitName(String),
    SkipName,
}

/// Gameplay beats for the host (animations, sounds, page chrome)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LoadingComplete,
    GameStarted { difficulty: Difficulty },
    LevelStarted { level: u32, target: u32 },
    MatchSucceeded { tiles: u32, damage: i32 },
    MatchFailed { sum: u32 },
    EnemyAttacked { damage: i32 },
    EnemyDefeated { health_bonus: u32, scramble_bonus: u32 },
    PlayerDefeated { final_score: u32 },
    ScrambleStarted,
    ScrambleFinished,
    ScoreSubmitted,
}

/// Scramble animation state for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct ScrambleView {
    /// 0..=1 fraction of the animation window elapsed
    pub progress: f32,
    pub relocations: Vec<Relocation>,
}

/// Render-relevant state, rebuilt on demand
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub screen: Screen,
    /// Row-major grid cells; empty outside a run
    pub grid: Vec<Cell>,
    pub player_health: i32,
    pub player_max_health: i32,
    pub enemy_health: i32,
    pub enemy_max_health: i32,
    pub score: u32,
    /// Multiplier-adjusted score, present once the run has ended
    pub final_score: Option<u32>,
    pub level: u32,
    pub target_number: u32,
    pub scrambles_remaining: u32,
    pub health_upgrade_count: u32,
    pub damage_upgrade_count: u32,
    pub health_bonus: i32,
    pub damage_bonus: f32,
    pub last_health_bonus: u32,
    pub last_scramble_bonus: u32,
    /// Loading progress, 0.0 - 100.0
    pub loading_progress: f32,
    /// Current bgm playback volume
    pub bgm_level: f32,
    pub attack_anim_active: bool,
    pub scramble: Option<ScrambleView>,
    pub leaderboard_available: bool,
}

/// The whole game: screens, session, settings, and external boundaries
pub struct Game {
    screen: Screen,
    /// Where Options/Leaderboard return to on Back
    return_to: Screen,
    pub settings: Settings,
    assets: AssetLoadGate,
    bgm: AudioCrossfade,
    session: Option<GameSession>,
    leaderboard: Box<dyn LeaderboardService>,
    events: Vec<GameEvent>,
    /// Final score awaiting a leaderboard name, or shown on GameOver
    final_score: Option<u32>,
    seed: u64,
    runs: u64,
    /// Milliseconds since construction; stamps leaderboard entries
    clock_ms: f64,
}

impl Game {
    /// Build a game waiting on the given asset groups
    pub fn new<S: AsRef<str>>(
        asset_groups: &[S],
        leaderboard: Box<dyn LeaderboardService>,
        seed: u64,
    ) -> Self {
        Self {
            screen: Screen::Loading,
            return_to: Screen::Menu,
            settings: Settings::default(),
            assets: AssetLoadGate::new(asset_groups),
            bgm: AudioCrossfade::default(),
            session: None,
            leaderboard,
            events: Vec::new(),
            final_score: None,
            seed,
            runs: 0,
            clock_ms: 0.0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The asset gate, for the host's load callbacks
    pub fn assets_mut(&mut self) -> &mut AssetLoadGate {
        &mut self.assets
    }

    /// Drain pending gameplay events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the simulation by `dt` milliseconds
    pub fn update(&mut self, dt: f32) {
        self.clock_ms += f64::from(dt);

        // 1. Continuous timers, regardless of screen
        self.bgm.set_target(self.bgm_target());
        self.bgm.tick(dt);
        let was_scrambling = self
            .session
            .as_ref()
            .is_some_and(GameSession::scramble_in_progress);
        if let Some(session) = &mut self.session {
            if session.tick_animations(dt) {
                self.events.push(GameEvent::ScrambleFinished);
            }
        }

        // 2. Loading gate
        if self.screen == Screen::Loading {
            self.assets.tick(dt);
            if self.assets.poll_all_settled() {
                self.events.push(GameEvent::LoadingComplete);
                self.transition(Screen::Menu);
            }
            return;
        }

        // 3. Combat, suspended while a scramble window runs
        if self.screen == Screen::Playing && !was_scrambling {
            let Some(session) = &mut self.session else {
                return;
            };
            if let Some(damage) = session.tick_combat(dt) {
                self.events.push(GameEvent::EnemyAttacked { damage });
            }
            if session.combat.player_defeated() {
                self.handle_defeat();
            }
        }
    }

    /// Handle a discrete input command; invalid commands are no-ops
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::SetDifficulty(difficulty) => {
                // Applies to the next new game; never touches a live run
                self.settings.difficulty = difficulty;
            }
            Command::SetVolumes { bgm, sfx } => self.settings.set_volumes(bgm, sfx),
            Command::ToggleMute => self.settings.toggle_mute(),
            Command::StartSelection { x, y } => {
                if self.screen == Screen::Playing {
                    if let Some(session) = &mut self.session {
                        session.start_selection(x, y);
                    }
                }
            }
            Command::UpdateSelection { x, y } => {
                if self.screen == Screen::Playing {
                    if let Some(session) = &mut self.session {
                        session.update_selection(x, y);
                    }
                }
            }
            Command::EndSelection => {
                if self.screen == Screen::Playing {
                    self.resolve_selection();
                }
            }
            Command::ActivateButton(button) => self.activate(button),
            Command::SubmitName(name) => self.submit_name(&name),
            Command::SkipName => {
                if self.screen == Screen::LeaderboardNameInput {
                    self.transition(Screen::GameOver);
                }
            }
        }
    }

    fn activate(&mut self, button: ButtonId) {
        match (self.screen, button) {
            (Screen::Menu, ButtonId::Start) | (Screen::GameOver, ButtonId::Start) => {
                self.start_game();
            }
            (Screen::Menu | Screen::Playing | Screen::GameOver, ButtonId::Options) => {
                self.return_to = self.screen;
                self.transition(Screen::Options);
            }
            (Screen::Menu | Screen::GameOver, ButtonId::Leaderboard) => {
                self.return_to = self.screen;
                self.transition(Screen::Leaderboard);
            }
            (Screen::Options | Screen::Leaderboard, ButtonId::Back) => {
                self.transition(self.return_to);
            }
            (Screen::Playing, ButtonId::Scramble) => {
                if let Some(session) = &mut self.session {
                    if session.scramble().is_some() {
                        self.events.push(GameEvent::ScrambleStarted);
                    }
                }
            }
            (Screen::ChooseUpgrade, ButtonId::UpgradeHealth) => {
                self.choose_upgrade(UpgradeKind::Health);
            }
            (Screen::ChooseUpgrade, ButtonId::UpgradeDamage) => {
                self.choose_upgrade(UpgradeKind::Damage);
            }
            (Screen::GameOver, ButtonId::Menu) => {
                self.session = None;
                self.final_score = None;
                self.transition(Screen::Menu);
            }
            _ => {} // no-op for everything else
        }
    }

    /// Reset score, level, timers, upgrades; regenerate grid; apply difficulty
    fn start_game(&mut self) {
        self.runs += 1;
        let run_seed = self
            .seed
            .wrapping_add(self.runs.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let session = GameSession::new(self.settings.difficulty, run_seed);
        self.events.push(GameEvent::GameStarted {
            difficulty: self.settings.difficulty,
        });
        self.events.push(GameEvent::LevelStarted {
            level: session.level,
            target: session.target_number,
        });
        self.session = Some(session);
        self.final_score = None;
        self.transition(Screen::Playing);
    }

    fn resolve_selection(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        match session.end_selection() {
            MatchResult::NoSelection => {}
            MatchResult::Miss { sum } => self.events.push(GameEvent::MatchFailed { sum }),
            MatchResult::Hit {
                tiles_with_value,
                damage,
                enemy_defeated,
                ..
            } => {
                self.events.push(GameEvent::MatchSucceeded {
                    tiles: tiles_with_value,
                    damage,
                });
                if enemy_defeated {
                    self.events.push(GameEvent::EnemyDefeated {
                        health_bonus: session.last_health_bonus,
                        scramble_bonus: session.last_scramble_bonus,
                    });
                    self.transition(Screen::ChooseUpgrade);
                }
            }
        }
    }

    fn choose_upgrade(&mut self, kind: UpgradeKind) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.next_level(kind);
        self.events.push(GameEvent::LevelStarted {
            level: session.level,
            target: session.target_number,
        });
        self.transition(Screen::Playing);
    }

    fn handle_defeat(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let final_score = session.final_score();
        self.final_score = Some(final_score);
        self.events.push(GameEvent::PlayerDefeated { final_score });

        let qualifies = self.leaderboard.is_available()
            && leaderboard::qualifies(
                &self
                    .leaderboard
                    .top_entries(crate::consts::LEADERBOARD_SIZE),
                final_score,
            );
        if qualifies {
            self.transition(Screen::LeaderboardNameInput);
        } else {
            if !self.leaderboard.is_available() {
                log::warn!("leaderboard unavailable; skipping name entry");
            }
            self.transition(Screen::GameOver);
        }
    }

    fn submit_name(&mut self, name: &str) {
        if self.screen != Screen::LeaderboardNameInput {
            return;
        }
        let name = name.trim();
        // Empty or filter-rejected names degrade to skip; GameOver either way
        if !name.is_empty() && self.leaderboard.accepts_name(name) {
            if let (Some(score), Some(session)) = (self.final_score, &self.session) {
                self.leaderboard.add_entry(Entry {
                    name: name.to_string(),
                    score,
                    difficulty: session.difficulty,
                    level: session.level,
                    date: self.clock_ms,
                });
                self.events.push(GameEvent::ScoreSubmitted);
            }
        }
        self.transition(Screen::GameOver);
    }

    fn transition(&mut self, next: Screen) {
        if self.screen != next {
            log::info!("screen: {:?} -> {:?}", self.screen, next);
            self.screen = next;
        }
    }

    /// Background-music level for the current screen
    fn bgm_target(&self) -> f32 {
        let scale = match self.screen {
            Screen::Loading => 0.0,
            Screen::Menu | Screen::Options | Screen::Leaderboard => 0.6,
            Screen::Playing => 1.0,
            Screen::ChooseUpgrade => 0.8,
            Screen::GameOver | Screen::LeaderboardNameInput => 0.3,
        };
        scale * self.settings.effective_bgm()
    }

    /// Build the render snapshot
    pub fn snapshot(&self) -> Snapshot {
        let session = self.session.as_ref();
        Snapshot {
            screen: self.screen,
            grid: session.map(|s| s.grid.cells().to_vec()).unwrap_or_default(),
            player_health: session.map_or(0, |s| s.combat.player_health),
            player_max_health: session.map_or(0, |s| s.combat.player_max_health),
            enemy_health: session.map_or(0, |s| s.combat.enemy_health),
            enemy_max_health: session.map_or(0, |s| s.combat.enemy_max_health),
            score: session.map_or(0, |s| s.score),
            final_score: self.final_score,
            level: session.map_or(0, |s| s.level),
            target_number: session.map_or(0, |s| s.target_number),
            scrambles_remaining: session.map_or(0, |s| s.scrambles_remaining),
            health_upgrade_count: session.map_or(0, |s| s.upgrades.health_upgrade_count),
            damage_upgrade_count: session.map_or(0, |s| s.upgrades.damage_upgrade_count),
            health_bonus: session.map_or(0, |s| s.upgrades.health_bonus),
            damage_bonus: session.map_or(0.0, |s| s.upgrades.damage_bonus),
            last_health_bonus: session.map_or(0, |s| s.last_health_bonus),
            last_scramble_bonus: session.map_or(0, |s| s.last_scramble_bonus),
            loading_progress: self.assets.progress(),
            bgm_level: self.bgm.level(),
            attack_anim_active: session.is_some_and(|s| s.attack_anim_timer > 0.0),
            scramble: session.and_then(|s| {
                if s.scramble_in_progress() {
                    Some(ScrambleView {
                        progress: s.scramble_progress(),
                        relocations: s.scramble_relocations.clone(),
                    })
                } else {
                    None
                }
            }),
            leaderboard_available: self.leaderboard.is_available(),
        }
    }
}
