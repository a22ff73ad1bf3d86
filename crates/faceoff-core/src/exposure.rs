use crate::errors::EngineResult;
use crate::storage::store::COUNTER_TOTAL_GAMES;
use crate::storage::Store;

/// Read-only view of how often each origin has played.
///
/// Writes happen only inside the rating engine's atomic commit; the sampler
/// reads these numbers without any linearizability guarantee versus
/// concurrent games.
#[derive(Clone)]
pub struct ExposureTracker {
    store: Store,
}

impl ExposureTracker {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// 0 for origins that have never played.
    pub fn games_played(&self, origin: &str) -> EngineResult<i64> {
        Ok(self
            .store
            .model_source(origin)?
            .map(|m| m.games_played)
            .unwrap_or(0))
    }

    pub fn total_games(&self) -> EngineResult<i64> {
        self.store.counter(COUNTER_TOTAL_GAMES)
    }
}
