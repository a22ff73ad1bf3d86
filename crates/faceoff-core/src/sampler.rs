use rand::Rng;

use crate::errors::{EngineError, EngineResult};
use crate::exposure::ExposureTracker;
use crate::model::Candidate;
use crate::registry::VersionedRegistry;

/// Selects the next two contenders for a use case, weighted to equalize
/// long-run exposure across origins.
///
/// Weight per origin is `1 - games_played / total_games` (uniform while no
/// games exist), so under-played origins are favored and per-origin play
/// counts converge toward uniform. Stale reads can push an origin's count
/// past the recorded total; the resulting negative weight clips to zero, and
/// a fully-clipped pool falls back to uniform. Read-only: no sampler call
/// mutates any state.
#[derive(Clone)]
pub struct MatchSampler {
    registry: VersionedRegistry,
    exposure: ExposureTracker,
}

impl MatchSampler {
    pub fn new(registry: VersionedRegistry, exposure: ExposureTracker) -> Self {
        Self { registry, exposure }
    }

    /// Two distinct-origin candidates, or `InsufficientCandidates` when the
    /// pool has fewer than two origins.
    pub fn select_pair(&self, use_case: &str) -> EngineResult<(Candidate, Candidate)> {
        let mut pool = self.registry.latest_by_origin(use_case)?;
        if pool.len() < 2 {
            return Err(EngineError::InsufficientCandidates {
                use_case: use_case.to_string(),
                found: pool.len(),
            });
        }

        let weights = self.exposure_weights(&pool)?;
        let mut rng = rand::rng();
        let (i, j) = pick_two(&weights, &mut rng);
        tracing::debug!(
            use_case,
            first = pool[i].origin(),
            second = pool[j].origin(),
            "pair selected"
        );

        // Remove the higher index first so the lower one stays valid.
        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
        let second = pool.swap_remove(hi);
        let first = pool.swap_remove(lo);
        if i > j {
            Ok((second, first))
        } else {
            Ok((first, second))
        }
    }

    fn exposure_weights(&self, pool: &[Candidate]) -> EngineResult<Vec<f64>> {
        let total = self.exposure.total_games()?;
        if total == 0 {
            return Ok(vec![1.0; pool.len()]);
        }
        let mut weights = Vec::with_capacity(pool.len());
        for candidate in pool {
            let played = self.exposure.games_played(candidate.origin())?;
            // Clip: an over-played origin stops being favored but is never
            // excluded by a negative weight.
            weights.push((1.0 - played as f64 / total as f64).max(0.0));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            weights.fill(1.0);
        }
        Ok(weights)
    }
}

/// Draw two distinct indices without replacement, probability proportional
/// to weight. `weights` must have length >= 2, entries >= 0, positive sum.
fn pick_two(weights: &[f64], rng: &mut impl Rng) -> (usize, usize) {
    let total: f64 = weights.iter().sum();
    let first = weighted_random_select(weights, total, rng);

    let mut opponents = Vec::with_capacity(weights.len() - 1);
    let mut opp_weights = Vec::with_capacity(weights.len() - 1);
    for (idx, &w) in weights.iter().enumerate() {
        if idx == first {
            continue;
        }
        opponents.push(idx);
        opp_weights.push(w);
    }

    let opp_total: f64 = opp_weights.iter().sum();
    let second_local = if opp_total <= 0.0 {
        // All remaining weight was on the first pick; fall back to uniform.
        rng.random_range(0..opponents.len())
    } else {
        weighted_random_select(&opp_weights, opp_total, rng)
    };

    (first, opponents[second_local])
}

fn weighted_random_select(weights: &[f64], total_weight: f64, rng: &mut impl Rng) -> usize {
    let mut r = rng.random::<f64>() * total_weight;
    for (j, &w) in weights.iter().enumerate() {
        r -= w;
        if r < 1e-10 {
            return j;
        }
    }
    weights.len() - 1
}
