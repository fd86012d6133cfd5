//! Headless demo driver
//!
//! Runs the simulation core end to end without a renderer: settles the
//! asset gate, starts a run, and autoplays by brute-force searching the
//! grid for rectangles that sum to the target. Useful for eyeballing the
//! rules and as a living example of the host contract.

use grid_clash::consts::GRID_SIZE;
use grid_clash::game::ButtonId;
use grid_clash::leaderboard::InMemoryLeaderboard;
use grid_clash::{Command, Game, Screen, Snapshot};

const FRAME_MS: f32 = 16.0;
const ASSET_GROUPS: [&str; 4] = ["sprites", "backgrounds", "audio", "fonts"];
/// Stop the demo once this level is reached
const MAX_LEVEL: u32 = 4;

fn main() {
    env_logger::init();

    let mut game = Game::new(&ASSET_GROUPS, Box::new(InMemoryLeaderboard::new()), 2024);

    // Simulate the host's loaders: most groups land quickly, one fails
    game.assets_mut().resolve("sprites");
    game.assets_mut().resolve("backgrounds");
    game.assets_mut().resolve("fonts");
    game.assets_mut().fail("audio");

    let mut frames: u64 = 0;
    loop {
        game.update(FRAME_MS);
        frames += 1;
        for event in game.take_events() {
            log::info!("event: {event:?}");
        }

        match game.screen() {
            Screen::Menu => game.handle(Command::ActivateButton(ButtonId::Start)),
            Screen::Playing => autoplay(&mut game),
            Screen::ChooseUpgrade => {
                let snapshot = game.snapshot();
                if snapshot.level >= MAX_LEVEL {
                    log::info!("reached level {MAX_LEVEL}, stopping demo");
                    break;
                }
                let pick = if snapshot.level % 2 == 0 {
                    ButtonId::UpgradeHealth
                } else {
                    ButtonId::UpgradeDamage
                };
                game.handle(Command::ActivateButton(pick));
            }
            Screen::LeaderboardNameInput => {
                game.handle(Command::SubmitName("ACE".to_string()));
            }
            Screen::GameOver => break,
            _ => {}
        }

        if frames > 10_000_000 {
            log::warn!("frame cap reached, stopping");
            break;
        }
    }

    let snapshot = game.snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("snapshot serialization failed: {err}"),
    }
    log::info!(
        "done after {frames} frames: level={} score={} final={:?}",
        snapshot.level,
        snapshot.score,
        snapshot.final_score
    );
}

/// Play one move: match a rectangle if one exists, otherwise scramble
fn autoplay(game: &mut Game) {
    let snapshot = game.snapshot();
    if snapshot.scramble.is_some() {
        return; // wait out the scramble window
    }
    if let Some((start, end)) = find_match(&snapshot) {
        game.handle(Command::StartSelection { x: start.0, y: start.1 });
        game.handle(Command::UpdateSelection { x: end.0, y: end.1 });
        game.handle(Command::EndSelection);
    } else if snapshot.scrambles_remaining > 0 {
        game.handle(Command::ActivateButton(ButtonId::Scramble));
    }
    // No match and no scrambles left: ride out the enemy attacks
}

/// Brute-force search for a rectangle summing to the target number
fn find_match(snapshot: &Snapshot) -> Option<((u8, u8), (u8, u8))> {
    let size = GRID_SIZE;
    let value = |x: u8, y: u8| -> u32 {
        u32::from(snapshot.grid[usize::from(y) * usize::from(size) + usize::from(x)].value)
    };
    for y0 in 0..size {
        for x0 in 0..size {
            for y1 in y0..size {
                for x1 in x0..size {
                    let mut sum = 0;
                    for y in y0..=y1 {
                        for x in x0..=x1 {
                            sum += value(x, y);
                        }
                    }
                    if sum == snapshot.target_number {
                        return Some(((x0, y0), (x1, y1)));
                    }
                }
            }
        }
    }
    None
}
