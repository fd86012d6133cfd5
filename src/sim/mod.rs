//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-driven timesteps only
//! - Seeded RNG only
//! - Row-major iteration order everywhere
//! - No rendering or platform dependencies

pub mod combat;
pub mod grid;
pub mod session;
pub mod shuffle;
pub mod upgrade;

pub use combat::CombatState;
pub use grid::{Cell, Grid, RangeSum, Rect};
pub use session::{GameSession, MatchResult, Selection};
pub use shuffle::{Relocation, scramble};
pub use upgrade::{UpgradeKind, UpgradeProgress};
