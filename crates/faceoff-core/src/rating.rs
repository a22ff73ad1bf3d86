use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rusqlite::Transaction;

use crate::errors::EngineResult;
use crate::model::{ModelSource, Outcome};
use crate::storage::store::COUNTER_TOTAL_GAMES;
use crate::storage::Store;

pub const K_FACTOR: f64 = 30.0;

/// Probability that `rating` beats `opponent` under the logistic Elo model.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// One-sided Elo update from the pre-game ratings.
pub fn rate(rating: f64, opponent: f64, score: f64) -> f64 {
    rating + K_FACTOR * (score - expected_score(rating, opponent))
}

/// Applies outcome judgments to the persistent rating state.
///
/// Both sides of a game commit together: ratings, both `games_played`
/// increments and the total-games counter land in one transaction, so a
/// half-updated pair is never observable. A per-origin lock table keeps
/// overlapping pairs serialized while disjoint pairs proceed independently.
#[derive(Clone)]
pub struct RatingEngine {
    store: Store,
    locks: OriginLocks,
}

impl RatingEngine {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            locks: OriginLocks::default(),
        }
    }

    /// Apply `outcome` (relative to A) and return both new ratings.
    ///
    /// Unseen origins enter at the initial rating before the update.
    pub fn apply_outcome(
        &self,
        model_a: &str,
        model_b: &str,
        outcome: Outcome,
    ) -> EngineResult<(f64, f64)> {
        let ratings = self.with_pair_locked(model_a, model_b, || {
            self.store
                .with_tx(|tx| Self::apply_in_tx(tx, model_a, model_b, outcome))
        })?;
        tracing::debug!(
            model_a,
            model_b,
            outcome = outcome.as_str(),
            rating_a = ratings.0,
            rating_b = ratings.1,
            "ratings updated"
        );
        Ok(ratings)
    }

    /// Transaction body of the update, shared with the engine facade so the
    /// rating commit can ride in the same transaction as the game append.
    pub(crate) fn apply_in_tx(
        tx: &Transaction,
        model_a: &str,
        model_b: &str,
        outcome: Outcome,
    ) -> EngineResult<(f64, f64)> {
        let a = Store::model_in_tx(tx, model_a)?.unwrap_or_else(|| ModelSource::unrated(model_a));
        let b = Store::model_in_tx(tx, model_b)?.unwrap_or_else(|| ModelSource::unrated(model_b));

        // Both updates read the pre-game ratings.
        let (score_a, score_b) = outcome.scores();
        let new_a = rate(a.rating, b.rating, score_a);
        let new_b = rate(b.rating, a.rating, score_b);

        Store::put_model(
            tx,
            &ModelSource {
                origin: a.origin,
                rating: new_a,
                games_played: a.games_played + 1,
            },
        )?;
        Store::put_model(
            tx,
            &ModelSource {
                origin: b.origin,
                rating: new_b,
                games_played: b.games_played + 1,
            },
        )?;
        Store::bump_counter(tx, COUNTER_TOTAL_GAMES)?;
        Ok((new_a, new_b))
    }

    /// Hold both origins' locks, in sorted order, while `f` runs.
    pub(crate) fn with_pair_locked<T>(
        &self,
        model_a: &str,
        model_b: &str,
        f: impl FnOnce() -> EngineResult<T>,
    ) -> EngineResult<T> {
        let (first, second) = if model_a <= model_b {
            (model_a, model_b)
        } else {
            (model_b, model_a)
        };
        let lock_first = self.locks.handle(first);
        let _guard_first = lock_first.lock().unwrap();
        if first == second {
            return f();
        }
        let lock_second = self.locks.handle(second);
        let _guard_second = lock_second.lock().unwrap();
        f()
    }
}

/// Lazily-populated map of one mutex per origin.
#[derive(Clone, Default)]
struct OriginLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl OriginLocks {
    fn handle(&self, origin: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap();
        map.entry(origin.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
