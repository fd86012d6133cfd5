//! Game settings and preferences
//!
//! Difficulty plus audio preferences. Changing settings never touches an
//! in-flight combat state; difficulty takes effect on the next new game.

use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Base player max health
    pub fn player_max_health(&self) -> i32 {
        match self {
            Difficulty::Easy => 150,
            Difficulty::Normal => 120,
            Difficulty::Hard => 75,
        }
    }

    /// Base damage dealt per matched tile
    pub fn damage_base(&self) -> f32 {
        match self {
            Difficulty::Easy => 8.0,
            Difficulty::Normal => 10.0,
            Difficulty::Hard => 12.0,
        }
    }

    /// Multiplier applied to the final score
    pub fn score_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
        }
    }
}

/// Player-adjustable settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Background music volume (0.0 - 1.0)
    pub bgm_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            bgm_volume: 0.7,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Set both volumes, clamped into range
    pub fn set_volumes(&mut self, bgm: f32, sfx: f32) {
        self.bgm_volume = bgm.clamp(0.0, 1.0);
        self.sfx_volume = sfx.clamp(0.0, 1.0);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Music volume after mute
    pub fn effective_bgm(&self) -> f32 {
        if self.muted { 0.0 } else { self.bgm_volume }
    }

    /// SFX volume after mute
    pub fn effective_sfx(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volumes_clamp() {
        let mut settings = Settings::default();
        settings.set_volumes(1.7, -0.3);
        assert_eq!(settings.bgm_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_mute_zeroes_effective_volumes() {
        let mut settings = Settings::default();
        settings.toggle_mute();
        assert_eq!(settings.effective_bgm(), 0.0);
        assert_eq!(settings.effective_sfx(), 0.0);
        settings.toggle_mute();
        assert_eq!(settings.effective_bgm(), 0.7);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("Medium"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_settings_json_round_trip() {
        let mut settings = Settings::default();
        settings.difficulty = Difficulty::Hard;
        settings.set_volumes(0.4, 0.9);
        let json = serde_json::to_string(&settings).expect("serialize");
        let back: Settings = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.difficulty, Difficulty::Hard);
        assert_eq!(back.bgm_volume, 0.4);
    }
}
