// src/sheets/save_state.rs
//! Debounced auto-save state machine.
//!
//! The model is in exactly one `SaveState`. Inputs are fed through the pure
//! `SaveState::next`; the only side effect it can request is a write of a given
//! edit generation, which the caller performs and reports back with
//! `SaveInput::WriteFinished`.

use bevy::prelude::{debug, info, warn, Resource};
use bevy::time::{Timer, TimerMode};
use std::time::Duration;

use super::host::SaveOutcome;
use crate::settings::AutosaveConfig;

/// Status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Pending,
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTiming {
    pub debounce: Duration,
    pub saved_display: Duration,
}

impl Default for SaveTiming {
    fn default() -> Self {
        let config = AutosaveConfig::default();
        Self::from(&config)
    }
}

impl From<&AutosaveConfig> for SaveTiming {
    fn from(config: &AutosaveConfig) -> Self {
        Self {
            debounce: config.debounce(),
            saved_display: config.saved_display(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    /// Nothing in flight. Without `local_edits` this is the state before the first
    /// host load; `local_edits` is set after a failed save, when the model holds
    /// edits the host has not acknowledged.
    Idle { local_edits: bool },
    /// The model mirrors the last value loaded from the host.
    Loaded,
    /// Edits are waiting for the debounce timer.
    Editing { generation: u64, debounce: Timer },
    /// A write of `generation` is in progress; `queued` holds an edit that arrived meanwhile.
    Saving { generation: u64, queued: Option<u64> },
    /// Write and commit succeeded; reverts to `Loaded` when `revert` finishes.
    Saved { revert: Timer },
    /// Torn down; every input is ignored.
    Detached,
}

impl Default for SaveState {
    fn default() -> Self {
        SaveState::Idle { local_edits: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveInput {
    /// The model was replaced from a host value.
    HostLoaded,
    /// The model was changed locally; `generation` is the new edit counter.
    LocalEdit { generation: u64 },
    Elapsed(Duration),
    WriteFinished(SaveOutcome),
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveEffect {
    None,
    /// Serialize the current model and run the write sequence.
    Write { generation: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SaveState,
    pub effect: SaveEffect,
}

impl Transition {
    fn to(state: SaveState) -> Self {
        Transition {
            state,
            effect: SaveEffect::None,
        }
    }
}

fn once(duration: Duration) -> Timer {
    Timer::new(duration, TimerMode::Once)
}

impl SaveState {
    pub fn status(&self) -> SaveStatus {
        match self {
            SaveState::Editing { .. } | SaveState::Saving { .. } => SaveStatus::Pending,
            SaveState::Saved { .. } => SaveStatus::Committed,
            SaveState::Idle { .. } | SaveState::Loaded | SaveState::Detached => SaveStatus::Idle,
        }
    }

    /// True while the model holds edits the host has not acknowledged.
    /// Host reloads must be ignored in that case.
    pub fn local_edits_pending(&self) -> bool {
        matches!(
            self,
            SaveState::Editing { .. } | SaveState::Saving { .. } | SaveState::Idle { local_edits: true }
        )
    }

    pub fn next(self, input: SaveInput, timing: &SaveTiming) -> Transition {
        match (self, input) {
            (SaveState::Detached, _) | (_, SaveInput::Teardown) => Transition::to(SaveState::Detached),

            (state, SaveInput::HostLoaded) => {
                if state.local_edits_pending() {
                    Transition::to(state)
                } else {
                    Transition::to(SaveState::Loaded)
                }
            }

            (SaveState::Saving { generation, .. }, SaveInput::LocalEdit { generation: newer }) => {
                Transition::to(SaveState::Saving {
                    generation,
                    queued: Some(newer),
                })
            }
            (SaveState::Editing { mut debounce, .. }, SaveInput::LocalEdit { generation }) => {
                debounce.reset();
                Transition::to(SaveState::Editing { generation, debounce })
            }
            (_, SaveInput::LocalEdit { generation }) => Transition::to(SaveState::Editing {
                generation,
                debounce: once(timing.debounce),
            }),

            (SaveState::Editing { generation, mut debounce }, SaveInput::Elapsed(delta)) => {
                debounce.tick(delta);
                if debounce.finished() {
                    Transition {
                        state: SaveState::Saving {
                            generation,
                            queued: None,
                        },
                        effect: SaveEffect::Write { generation },
                    }
                } else {
                    Transition::to(SaveState::Editing { generation, debounce })
                }
            }
            (SaveState::Saved { mut revert }, SaveInput::Elapsed(delta)) => {
                revert.tick(delta);
                if revert.finished() {
                    Transition::to(SaveState::Loaded)
                } else {
                    Transition::to(SaveState::Saved { revert })
                }
            }
            (state, SaveInput::Elapsed(_)) => Transition::to(state),

            (SaveState::Saving { queued: Some(newer), .. }, SaveInput::WriteFinished(_)) => {
                Transition::to(SaveState::Editing {
                    generation: newer,
                    debounce: once(timing.debounce),
                })
            }
            (SaveState::Saving { queued: None, .. }, SaveInput::WriteFinished(outcome)) => {
                if outcome.is_committed() {
                    Transition::to(SaveState::Saved {
                        revert: once(timing.saved_display),
                    })
                } else {
                    Transition::to(SaveState::Idle { local_edits: true })
                }
            }
            (state, SaveInput::WriteFinished(_)) => Transition::to(state),
        }
    }
}

/// Outcome of offering a host value to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRefreshDecision {
    Accept,
    /// Local edits are outstanding; the in-memory model stays authoritative.
    IgnoredLocalEdits,
    /// Identical to the last value loaded or written.
    Duplicate,
    IgnoredDetached,
}

/// Bevy resource wrapping the state machine with the bookkeeping around it:
/// the last edit generation seen and the last value exchanged with the host.
#[derive(Debug, Resource)]
pub struct SaveCoordinator {
    state: SaveState,
    timing: SaveTiming,
    seen_generation: u64,
    last_host_value: Option<String>,
    last_outcome: Option<SaveOutcome>,
}

impl Default for SaveCoordinator {
    fn default() -> Self {
        Self::new(SaveTiming::default())
    }
}

impl SaveCoordinator {
    pub fn new(timing: SaveTiming) -> Self {
        Self {
            state: SaveState::default(),
            timing,
            seen_generation: 0,
            last_host_value: None,
            last_outcome: None,
        }
    }

    pub fn state(&self) -> &SaveState {
        &self.state
    }

    pub fn status(&self) -> SaveStatus {
        self.state.status()
    }

    pub fn local_edits_pending(&self) -> bool {
        self.state.local_edits_pending()
    }

    pub fn seen_generation(&self) -> u64 {
        self.seen_generation
    }

    pub fn last_outcome(&self) -> Option<&SaveOutcome> {
        self.last_outcome.as_ref()
    }

    fn apply(&mut self, input: SaveInput) -> SaveEffect {
        let current = std::mem::replace(&mut self.state, SaveState::Detached);
        let transition = current.next(input, &self.timing);
        self.state = transition.state;
        transition.effect
    }

    fn awaiting_first_load(&self) -> bool {
        matches!(self.state, SaveState::Idle { local_edits: false })
    }

    /// Decides whether a host value should replace the model.
    pub fn review_host_value(&self, value: Option<&str>) -> HostRefreshDecision {
        if self.state == SaveState::Detached {
            HostRefreshDecision::IgnoredDetached
        } else if self.local_edits_pending() {
            HostRefreshDecision::IgnoredLocalEdits
        } else if !self.awaiting_first_load() && self.last_host_value.as_deref() == value {
            HostRefreshDecision::Duplicate
        } else {
            HostRefreshDecision::Accept
        }
    }

    /// Records that the model was replaced from `value`. Does not count as an edit.
    pub fn on_host_loaded(&mut self, value: Option<&str>) {
        self.last_host_value = value.map(str::to_string);
        self.apply(SaveInput::HostLoaded);
    }

    /// Feeds the model's edit counter; only a change of generation counts as an edit.
    pub fn observe_generation(&mut self, generation: u64) {
        if generation == self.seen_generation || self.state == SaveState::Detached {
            return;
        }
        self.seen_generation = generation;
        self.apply(SaveInput::LocalEdit { generation });
        debug!("Autosave: edit generation {} observed; debounce restarted.", generation);
    }

    /// Advances timers. Returns the generation to write when the debounce fires.
    pub fn tick(&mut self, delta: Duration) -> Option<u64> {
        match self.apply(SaveInput::Elapsed(delta)) {
            SaveEffect::Write { generation } => Some(generation),
            SaveEffect::None => None,
        }
    }

    /// Reports the result of the write sequence started by `tick`.
    pub fn finish_write(&mut self, written: &str, outcome: SaveOutcome) {
        if outcome.value_reached_host() {
            self.last_host_value = Some(written.to_string());
        }
        match &outcome {
            SaveOutcome::Committed => info!("Autosave: changes written and committed."),
            SaveOutcome::WrittenNotCommitted(e) => {
                warn!("Autosave: changes held by host but not committed: {}", e)
            }
            SaveOutcome::NotWritten(e) => warn!("Autosave: changes not written: {}", e),
        }
        self.last_outcome = Some(outcome.clone());
        self.apply(SaveInput::WriteFinished(outcome));
    }

    /// Cancels every timer; nothing fires afterwards.
    pub fn teardown(&mut self) {
        if self.local_edits_pending() {
            warn!("Autosave: torn down with unsaved local edits.");
        }
        self.apply(SaveInput::Teardown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::error::{InvokeError, WriteError};

    fn timing() -> SaveTiming {
        SaveTiming {
            debounce: Duration::from_millis(800),
            saved_display: Duration::from_millis(2000),
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drive(state: SaveState, inputs: Vec<SaveInput>) -> (SaveState, Vec<SaveEffect>) {
        let mut effects = Vec::new();
        let mut state = state;
        for input in inputs {
            let t = state.next(input, &timing());
            if t.effect != SaveEffect::None {
                effects.push(t.effect);
            }
            state = t.state;
        }
        (state, effects)
    }

    #[test]
    fn host_load_is_not_an_edit() {
        let (state, effects) = drive(
            SaveState::default(),
            vec![SaveInput::HostLoaded, SaveInput::Elapsed(ms(5000))],
        );
        assert_eq!(state, SaveState::Loaded);
        assert!(effects.is_empty());
    }

    #[test]
    fn burst_of_edits_collapses_into_one_write_of_the_last_generation() {
        let (state, effects) = drive(
            SaveState::Loaded,
            vec![
                SaveInput::LocalEdit { generation: 1 },
                SaveInput::Elapsed(ms(500)),
                SaveInput::LocalEdit { generation: 2 },
                SaveInput::Elapsed(ms(500)),
                SaveInput::LocalEdit { generation: 3 },
                SaveInput::Elapsed(ms(799)),
                SaveInput::Elapsed(ms(1)),
            ],
        );
        assert_eq!(effects, vec![SaveEffect::Write { generation: 3 }]);
        assert_eq!(
            state,
            SaveState::Saving {
                generation: 3,
                queued: None
            }
        );
    }

    #[test]
    fn success_shows_saved_then_reverts() {
        let (state, _) = drive(
            SaveState::Loaded,
            vec![
                SaveInput::LocalEdit { generation: 1 },
                SaveInput::Elapsed(ms(800)),
                SaveInput::WriteFinished(SaveOutcome::Committed),
            ],
        );
        assert_eq!(state.status(), SaveStatus::Committed);
        assert!(!state.local_edits_pending());
        let (state, _) = drive(state, vec![SaveInput::Elapsed(ms(1999))]);
        assert_eq!(state.status(), SaveStatus::Committed);
        let (state, _) = drive(state, vec![SaveInput::Elapsed(ms(1))]);
        assert_eq!(state, SaveState::Loaded);
    }

    #[test]
    fn failures_return_to_idle_but_keep_the_guard() {
        for outcome in [
            SaveOutcome::NotWritten(WriteError::NotReady),
            SaveOutcome::WrittenNotCommitted(InvokeError::NotConfigured),
        ] {
            let (state, _) = drive(
                SaveState::Loaded,
                vec![
                    SaveInput::LocalEdit { generation: 1 },
                    SaveInput::Elapsed(ms(800)),
                    SaveInput::WriteFinished(outcome),
                ],
            );
            assert_eq!(state, SaveState::Idle { local_edits: true });
            assert_eq!(state.status(), SaveStatus::Idle);
            assert!(state.local_edits_pending());
            let (state, _) = drive(state, vec![SaveInput::HostLoaded]);
            assert_eq!(state, SaveState::Idle { local_edits: true });
        }
    }

    #[test]
    fn edit_during_write_is_queued_not_dropped() {
        let (state, effects) = drive(
            SaveState::Loaded,
            vec![
                SaveInput::LocalEdit { generation: 1 },
                SaveInput::Elapsed(ms(800)),
                SaveInput::LocalEdit { generation: 2 },
                SaveInput::WriteFinished(SaveOutcome::Committed),
            ],
        );
        assert_eq!(effects, vec![SaveEffect::Write { generation: 1 }]);
        assert!(matches!(state, SaveState::Editing { generation: 2, .. }));
        let (_, effects) = drive(state, vec![SaveInput::Elapsed(ms(800))]);
        assert_eq!(effects, vec![SaveEffect::Write { generation: 2 }]);
    }

    #[test]
    fn guard_blocks_host_loads_while_editing() {
        let (state, _) = drive(
            SaveState::Loaded,
            vec![SaveInput::LocalEdit { generation: 1 }, SaveInput::HostLoaded],
        );
        assert!(matches!(state, SaveState::Editing { .. }));
    }

    #[test]
    fn teardown_cancels_pending_timer() {
        let (state, effects) = drive(
            SaveState::Loaded,
            vec![
                SaveInput::LocalEdit { generation: 1 },
                SaveInput::Teardown,
                SaveInput::Elapsed(ms(10_000)),
                SaveInput::LocalEdit { generation: 2 },
                SaveInput::Elapsed(ms(10_000)),
            ],
        );
        assert_eq!(state, SaveState::Detached);
        assert!(effects.is_empty());
    }

    #[test]
    fn coordinator_dedups_echoed_host_values() {
        let mut coordinator = SaveCoordinator::new(timing());
        assert_eq!(coordinator.review_host_value(None), HostRefreshDecision::Accept);
        coordinator.on_host_loaded(Some("[]"));
        assert_eq!(coordinator.review_host_value(Some("[]")), HostRefreshDecision::Duplicate);
        assert_eq!(coordinator.review_host_value(Some("[1]")), HostRefreshDecision::Accept);

        coordinator.observe_generation(1);
        assert_eq!(
            coordinator.review_host_value(Some("[1]")),
            HostRefreshDecision::IgnoredLocalEdits
        );
        assert_eq!(coordinator.tick(ms(800)), Some(1));
        coordinator.finish_write("[\"x\"]", SaveOutcome::Committed);
        assert_eq!(coordinator.status(), SaveStatus::Committed);
        assert_eq!(
            coordinator.review_host_value(Some("[\"x\"]")),
            HostRefreshDecision::Duplicate
        );
        assert_eq!(coordinator.review_host_value(Some("[2]")), HostRefreshDecision::Accept);
    }

    #[test]
    fn coordinator_ignores_repeated_generation() {
        let mut coordinator = SaveCoordinator::new(timing());
        coordinator.on_host_loaded(Some("[]"));
        coordinator.observe_generation(0);
        assert_eq!(*coordinator.state(), SaveState::Loaded);
        coordinator.observe_generation(4);
        assert_eq!(coordinator.seen_generation(), 4);
        assert_eq!(coordinator.status(), SaveStatus::Pending);
    }
}
