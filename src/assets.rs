//! Asset-loading gate
//!
//! Tracks a fixed set of named resource groups. Each group settles exactly
//! once: success, explicit failure, or a 5000 ms timeout. Failures and
//! timeouts are logged and then treated like success for progression - the
//! resilience contract is that one broken resource can never keep the game
//! on the loading screen forever.

use crate::consts::ASSET_TIMEOUT_MS;

/// Terminal outcome for a resource group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Success,
    Failed,
    TimedOut,
}

#[derive(Debug, Clone)]
enum GroupState {
    /// Still loading; tracks time waited so far
    Pending { elapsed: f32 },
    Settled(LoadOutcome),
}

#[derive(Debug, Clone)]
struct Group {
    name: String,
    state: GroupState,
}

/// Aggregates loading progress over named resource groups
///
/// Created once at session start; groups are never removed once registered.
#[derive(Debug, Clone)]
pub struct AssetLoadGate {
    groups: Vec<Group>,
    /// Latch so the all-settled signal fires exactly once
    signalled: bool,
}

impl AssetLoadGate {
    /// Register the fixed set of groups, all pending
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            groups: names
                .iter()
                .map(|n| Group {
                    name: n.as_ref().to_string(),
                    state: GroupState::Pending { elapsed: 0.0 },
                })
                .collect(),
            signalled: false,
        }
    }

    /// Mark a group as loaded; no-op for unknown or already-settled groups
    pub fn resolve(&mut self, name: &str) {
        self.settle(name, LoadOutcome::Success);
    }

    /// Mark a group as failed; it still counts as settled
    pub fn fail(&mut self, name: &str) {
        self.settle(name, LoadOutcome::Failed);
    }

    fn settle(&mut self, name: &str, outcome: LoadOutcome) {
        let Some(group) = self.groups.iter_mut().find(|g| g.name == name) else {
            log::warn!("asset gate: unknown group {name:?}");
            return;
        };
        if let GroupState::Pending { .. } = group.state {
            match outcome {
                LoadOutcome::Success => log::info!("asset group {name:?} loaded"),
                LoadOutcome::Failed => log::warn!("asset group {name:?} failed, continuing"),
                LoadOutcome::TimedOut => log::warn!("asset group {name:?} timed out, continuing"),
            }
            group.state = GroupState::Settled(outcome);
        }
    }

    /// Advance per-group deadlines; groups past the timeout are force-settled
    pub fn tick(&mut self, dt: f32) {
        let mut timed_out = Vec::new();
        for group in &mut self.groups {
            if let GroupState::Pending { elapsed } = &mut group.state {
                *elapsed += dt;
                if *elapsed >= ASSET_TIMEOUT_MS {
                    timed_out.push(group.name.clone());
                }
            }
        }
        for name in timed_out {
            self.settle(&name, LoadOutcome::TimedOut);
        }
    }

    fn settled_count(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| matches!(g.state, GroupState::Settled(_)))
            .count()
    }

    /// Loading progress, 0.0 - 100.0
    pub fn progress(&self) -> f32 {
        if self.groups.is_empty() {
            return 100.0;
        }
        self.settled_count() as f32 / self.groups.len() as f32 * 100.0
    }

    /// Whether every group has settled
    pub fn is_done(&self) -> bool {
        self.settled_count() == self.groups.len()
    }

    /// True exactly once: on the first call after all groups settled
    pub fn poll_all_settled(&mut self) -> bool {
        if !self.signalled && self.is_done() {
            self.signalled = true;
            log::info!("asset gate: all {} groups settled", self.groups.len());
            true
        } else {
            false
        }
    }

    /// Settled outcome for a group, if it has one
    pub fn outcome(&self, name: &str) -> Option<LoadOutcome> {
        self.groups.iter().find(|g| g.name == name).and_then(|g| {
            if let GroupState::Settled(outcome) = g.state {
                Some(outcome)
            } else {
                None
            }
        })
    }
}
