use std::cmp::Ordering;

use crate::counter::GameCounter;
use crate::errors::EngineResult;
use crate::exposure::ExposureTracker;
use crate::model::{
    AssistantSpec, AssistantVersion, Candidate, GameRecord, LeaderboardRow, ModelSource,
    OutcomeReport, PromptVersion,
};
use crate::rating::RatingEngine;
use crate::registry::VersionedRegistry;
use crate::sampler::MatchSampler;
use crate::storage::Store;

/// Facade over the rating & matchmaking components.
///
/// Every component receives the shared store handle at construction; there
/// is no process-wide state, so two engines over two stores are fully
/// independent (and tests run against `Store::memory()`).
#[derive(Clone)]
pub struct Engine {
    store: Store,
    registry: VersionedRegistry,
    exposure: ExposureTracker,
    sampler: MatchSampler,
    rating: RatingEngine,
    counter: GameCounter,
}

impl Engine {
    pub fn new(store: Store) -> Self {
        let registry = VersionedRegistry::new(store.clone());
        let exposure = ExposureTracker::new(store.clone());
        let sampler = MatchSampler::new(registry.clone(), exposure.clone());
        let rating = RatingEngine::new(store.clone());
        let counter = GameCounter::new(store.clone());
        Self {
            store,
            registry,
            exposure,
            sampler,
            rating,
            counter,
        }
    }

    /// Two distinct candidates for `use_case`, exposure-weighted.
    pub fn get_match(&self, use_case: &str) -> EngineResult<(Candidate, Candidate)> {
        self.sampler.select_pair(use_case)
    }

    /// Commit a judged comparison: rating update for both sides, both
    /// counters, and the game record land in one transaction. Returns the
    /// game number stored in the record.
    pub fn record_outcome(&self, report: &OutcomeReport) -> EngineResult<i64> {
        let game_no = self
            .rating
            .with_pair_locked(&report.model_a, &report.model_b, || {
                self.store.with_tx(|tx| {
                    RatingEngine::apply_in_tx(tx, &report.model_a, &report.model_b, report.outcome)?;
                    let game_no = GameCounter::advance(tx)?;
                    Store::insert_game(
                        tx,
                        &GameRecord {
                            game_no,
                            query: report.query.clone(),
                            use_case: report.use_case.clone(),
                            model_a: report.model_a.clone(),
                            model_b: report.model_b.clone(),
                            response_a: report.response_a.clone(),
                            response_b: report.response_b.clone(),
                            outcome: report.outcome,
                            created_at: chrono::Utc::now().to_rfc3339(),
                        },
                    )?;
                    Ok(game_no)
                })
            })?;
        tracing::info!(
            game_no,
            use_case = %report.use_case,
            model_a = %report.model_a,
            model_b = %report.model_b,
            outcome = report.outcome.as_str(),
            "game recorded"
        );
        Ok(game_no)
    }

    pub fn add_prompt_version(
        &self,
        origin: &str,
        use_case: &str,
        prompt: &str,
    ) -> EngineResult<i64> {
        self.registry.add_prompt_version(origin, use_case, prompt)
    }

    pub fn add_assistant_version(&self, spec: &AssistantSpec) -> EngineResult<i64> {
        self.registry.add_assistant_version(spec)
    }

    pub fn add_use_case(&self, name: &str) -> EngineResult<()> {
        self.registry.add_use_case(name)
    }

    pub fn use_cases(&self) -> EngineResult<Vec<String>> {
        self.registry.use_cases()
    }

    pub fn origins(&self) -> EngineResult<Vec<String>> {
        self.registry.origins()
    }

    /// Rating table for the origins active in `use_case`, rating descending.
    /// Origins that have not played yet appear with the unrated defaults.
    pub fn leaderboard(&self, use_case: &str) -> EngineResult<Vec<LeaderboardRow>> {
        let pool = self.registry.latest_by_origin(use_case)?;
        let mut rows = Vec::with_capacity(pool.len());
        for candidate in &pool {
            let model = self
                .store
                .model_source(candidate.origin())?
                .unwrap_or_else(|| ModelSource::unrated(candidate.origin()));
            rows.push(LeaderboardRow {
                origin: model.origin,
                rating: model.rating,
                games_played: model.games_played,
            });
        }
        rows.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        Ok(rows)
    }

    pub fn total_games(&self) -> EngineResult<i64> {
        self.exposure.total_games()
    }

    pub fn next_game_number(&self) -> EngineResult<i64> {
        self.counter.next_game_number()
    }

    pub fn prompt_history(&self, origin: &str, use_case: &str) -> EngineResult<Vec<PromptVersion>> {
        self.registry.prompt_history(origin, use_case)
    }

    pub fn list_assistants(&self) -> EngineResult<Vec<AssistantVersion>> {
        self.registry.list_assistants()
    }

    /// Stored game record, for audit reads.
    pub fn game(&self, game_no: i64) -> EngineResult<Option<GameRecord>> {
        self.store.game(game_no)
    }
}
