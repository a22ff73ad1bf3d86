use std::collections::BTreeMap;

use crate::errors::EngineResult;
use crate::model::{AssistantSpec, AssistantVersion, Candidate, PromptVersion, ASSISTANT_ORIGIN};
use crate::storage::Store;

/// Append-only, monotonically-versioned store of prompt and assistant
/// definitions.
///
/// Versions are assigned as `max(existing) + 1` inside a single transaction,
/// so concurrent writers to the same key serialize and the sequence per
/// `(origin, use_case)` stays gap-free. Old versions are never rewritten.
#[derive(Clone)]
pub struct VersionedRegistry {
    store: Store,
}

impl VersionedRegistry {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Store a new prompt revision and return its assigned version (1-based).
    pub fn add_prompt_version(
        &self,
        origin: &str,
        use_case: &str,
        prompt: &str,
    ) -> EngineResult<i64> {
        let version = self.store.with_tx(|tx| {
            let version = Store::max_prompt_version(tx, origin, use_case)? + 1;
            Store::insert_prompt(
                tx,
                &PromptVersion {
                    origin: origin.to_string(),
                    use_case: use_case.to_string(),
                    prompt: prompt.to_string(),
                    version,
                    created_at: chrono::Utc::now().to_rfc3339(),
                },
            )?;
            Ok(version)
        })?;
        tracing::info!(origin, use_case, version, "prompt version added");
        Ok(version)
    }

    /// Store a new assistant revision under the fixed assistant origin tag
    /// and return its assigned version.
    pub fn add_assistant_version(&self, spec: &AssistantSpec) -> EngineResult<i64> {
        let version = self.store.with_tx(|tx| {
            let version = Store::max_assistant_version(tx, ASSISTANT_ORIGIN, &spec.use_case)? + 1;
            Store::insert_assistant(
                tx,
                &AssistantVersion {
                    assistant_id: spec.assistant_id.clone(),
                    api_key: spec.api_key.clone(),
                    assistant_version: spec.assistant_version.clone(),
                    use_case: spec.use_case.clone(),
                    origin: ASSISTANT_ORIGIN.to_string(),
                    version,
                    created_at: chrono::Utc::now().to_rfc3339(),
                },
            )?;
            Ok(version)
        })?;
        tracing::info!(use_case = %spec.use_case, version, "assistant version added");
        Ok(version)
    }

    /// Latest payload per origin active in `use_case`, prompts and assistants
    /// merged into one pool. If an origin somehow carries both, the assistant
    /// payload wins so the origin is weighted once at selection time.
    pub fn latest_by_origin(&self, use_case: &str) -> EngineResult<Vec<Candidate>> {
        let mut pool: BTreeMap<String, Candidate> = BTreeMap::new();
        for p in self.store.latest_prompts(use_case)? {
            pool.insert(p.origin.clone(), Candidate::Prompt(p));
        }
        for a in self.store.latest_assistants(use_case)? {
            pool.insert(a.origin.clone(), Candidate::Assistant(a));
        }
        Ok(pool.into_values().collect())
    }

    /// All revisions for one prompt key, newest first (audit trail).
    pub fn prompt_history(&self, origin: &str, use_case: &str) -> EngineResult<Vec<PromptVersion>> {
        self.store.prompt_history(origin, use_case)
    }

    pub fn list_assistants(&self) -> EngineResult<Vec<AssistantVersion>> {
        self.store.all_assistants()
    }

    /// Idempotent; registering an existing name is a no-op.
    pub fn add_use_case(&self, name: &str) -> EngineResult<()> {
        self.store.with_tx(|tx| Store::insert_use_case(tx, name))
    }

    pub fn use_cases(&self) -> EngineResult<Vec<String>> {
        self.store.use_cases()
    }

    pub fn origins(&self) -> EngineResult<Vec<String>> {
        self.store.origins()
    }
}
