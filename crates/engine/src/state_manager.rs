//! The state manager: single owner of the canonical `GameState`.
//!
//! All mutation flows through `dispatch`; external readers only ever receive
//! deep copies, never the live reference. That isolation is the
//! concurrency-safety substitute for true immutability in a cooperative
//! single-threaded session: no subscriber or UI callback can tear the
//! manager's state through a stale handle.

use std::sync::Arc;

use wayfarer_domain::{GameAction, GameEvent, GameState};

use crate::event_bus::EventBus;
use crate::infrastructure::ports::{ClockPort, PersistenceError, PersistencePort};
use crate::reducer::reduce;

/// Published on the bus after every dispatch: before/after snapshots plus
/// the causing action.
#[derive(Debug, Clone)]
pub struct StateChange {
    pub old_state: GameState,
    pub new_state: GameState,
    pub action: GameAction,
}

pub struct StateManager {
    state: GameState,
    bus: Arc<EventBus<StateChange>>,
    clock: Arc<dyn ClockPort>,
}

impl StateManager {
    pub fn new(initial: GameState, bus: Arc<EventBus<StateChange>>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            state: initial,
            bus,
            clock,
        }
    }

    /// Run an action through the reducer, commit the new state, and notify
    /// subscribers. Synchronous from the caller's perspective: a batch of
    /// dispatches from one caller is strictly ordered.
    pub fn dispatch(&mut self, action: GameAction) -> Vec<GameEvent> {
        let (new_state, events) = reduce(&self.state, &action, self.clock.now());
        let old_state = std::mem::replace(&mut self.state, new_state);
        self.bus.publish(&StateChange {
            old_state,
            new_state: self.state.clone(),
            action,
        });
        events
    }

    /// Deep copy of the current state. Mutating the returned value never
    /// affects the manager.
    pub fn state(&self) -> GameState {
        self.state.clone()
    }

    /// Serialize the current state to the persistence collaborator.
    pub async fn save(
        &self,
        persistence: &dyn PersistencePort,
        key: &str,
    ) -> Result<bool, PersistenceError> {
        persistence.save(key, &self.state.snapshot()).await
    }

    /// Rehydrate a manager from a stored snapshot. `Ok(None)` when the key
    /// has never been saved.
    pub async fn load(
        persistence: &dyn PersistencePort,
        key: &str,
        bus: Arc<EventBus<StateChange>>,
        clock: Arc<dyn ClockPort>,
    ) -> Result<Option<Self>, PersistenceError> {
        let Some(snapshot) = persistence.load(key).await? else {
            return Ok(None);
        };
        Ok(Some(Self::new(GameState::from_snapshot(snapshot), bus, clock)))
    }
}
