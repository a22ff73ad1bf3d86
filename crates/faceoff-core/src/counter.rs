use rusqlite::Transaction;

use crate::errors::EngineResult;
use crate::storage::store::COUNTER_GAME_NO;
use crate::storage::Store;

/// Process-wide game sequence: 1, 2, 3, ... with no duplicates and no gaps,
/// regardless of how many callers race.
#[derive(Clone)]
pub struct GameCounter {
    store: Store,
}

impl GameCounter {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Reserve and return the next game number in its own transaction.
    pub fn next_game_number(&self) -> EngineResult<i64> {
        self.store.with_tx(Self::advance)
    }

    /// Advance the sequence inside an already-open transaction, so a game
    /// number can be reserved atomically with the rest of a game commit.
    pub(crate) fn advance(tx: &Transaction) -> EngineResult<i64> {
        Store::bump_counter(tx, COUNTER_GAME_NO)
    }
}
