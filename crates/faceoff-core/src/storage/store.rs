use crate::errors::{is_busy, EngineError, EngineResult};
use crate::model::{AssistantVersion, GameRecord, ModelSource, Outcome, PromptVersion};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const COUNTER_GAME_NO: &str = "game_no";
pub const COUNTER_TOTAL_GAMES: &str = "total_games";

const MAX_TX_ATTEMPTS: u32 = 5;
const BACKOFF_BASE_MS: u64 = 10;

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> EngineResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// SQLite in-memory DB, used by tests and throwaway arenas.
    pub fn memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> EngineResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// Busy/locked failures are retried with exponential backoff up to a
    /// fixed cap, then surfaced as `ConcurrentUpdateConflict`. The closure
    /// may run more than once and must not carry side effects outside the
    /// transaction.
    pub fn with_tx<T>(&self, mut f: impl FnMut(&Transaction) -> EngineResult<T>) -> EngineResult<T> {
        let mut conn = self.conn.lock().unwrap();
        for attempt in 1..=MAX_TX_ATTEMPTS {
            let tx = match conn.transaction_with_behavior(TransactionBehavior::Immediate) {
                Ok(tx) => tx,
                Err(e) if is_busy(&e) => {
                    backoff(attempt);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            match f(&tx) {
                Ok(value) => match tx.commit() {
                    Ok(()) => return Ok(value),
                    Err(e) if is_busy(&e) => backoff(attempt),
                    Err(e) => return Err(e.into()),
                },
                Err(EngineError::StoreUnavailable(e)) if is_busy(&e) => {
                    // drop(tx) rolls back
                    drop(tx);
                    backoff(attempt);
                }
                Err(e) => return Err(e),
            }
        }
        tracing::warn!(attempts = MAX_TX_ATTEMPTS, "transaction retries exhausted");
        Err(EngineError::ConcurrentUpdateConflict {
            attempts: MAX_TX_ATTEMPTS,
        })
    }

    // --- plain reads (snapshot semantics are fine for these) ---

    pub fn model_source(&self, origin: &str) -> EngineResult<Option<ModelSource>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT origin, rating, games_played FROM models WHERE origin = ?1",
                params![origin],
                |r| {
                    Ok(ModelSource {
                        origin: r.get(0)?,
                        rating: r.get(1)?,
                        games_played: r.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn counter(&self, name: &str) -> EngineResult<i64> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row(
                "SELECT value FROM counters WHERE name = ?1",
                params![name],
                |r| r.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0))
    }

    /// Highest-versioned prompt per origin active in `use_case`.
    pub fn latest_prompts(&self, use_case: &str) -> EngineResult<Vec<PromptVersion>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT origin, use_case, prompt, version, created_at
             FROM prompts p
             WHERE use_case = ?1
               AND version = (SELECT MAX(version) FROM prompts
                              WHERE origin = p.origin AND use_case = p.use_case)
             ORDER BY origin",
        )?;
        let rows = stmt.query_map(params![use_case], prompt_from_row)?;
        collect(rows)
    }

    /// Highest-versioned assistant per origin active in `use_case`.
    pub fn latest_assistants(&self, use_case: &str) -> EngineResult<Vec<AssistantVersion>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT assistant_id, api_key, assistant_version, use_case, origin, version, created_at
             FROM assistants a
             WHERE use_case = ?1
               AND version = (SELECT MAX(version) FROM assistants
                              WHERE origin = a.origin AND use_case = a.use_case)
             ORDER BY origin",
        )?;
        let rows = stmt.query_map(params![use_case], assistant_from_row)?;
        collect(rows)
    }

    /// Full version history for one prompt key, newest first.
    pub fn prompt_history(&self, origin: &str, use_case: &str) -> EngineResult<Vec<PromptVersion>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT origin, use_case, prompt, version, created_at
             FROM prompts
             WHERE origin = ?1 AND use_case = ?2
             ORDER BY version DESC",
        )?;
        let rows = stmt.query_map(params![origin, use_case], prompt_from_row)?;
        collect(rows)
    }

    pub fn all_assistants(&self) -> EngineResult<Vec<AssistantVersion>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT assistant_id, api_key, assistant_version, use_case, origin, version, created_at
             FROM assistants
             ORDER BY use_case, version",
        )?;
        let rows = stmt.query_map([], assistant_from_row)?;
        collect(rows)
    }

    pub fn use_cases(&self) -> EngineResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT name FROM use_cases ORDER BY name")?;
        let rows = stmt.query_map([], |r| r.get(0))?;
        collect(rows)
    }

    pub fn origins(&self) -> EngineResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT origin FROM prompts
             UNION
             SELECT DISTINCT origin FROM assistants
             ORDER BY origin",
        )?;
        let rows = stmt.query_map([], |r| r.get(0))?;
        collect(rows)
    }

    pub fn game(&self, game_no: i64) -> EngineResult<Option<GameRecord>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT game_no, query, use_case, model_a, model_b,
                        response_a, response_b, outcome, created_at
                 FROM games WHERE game_no = ?1",
                params![game_no],
                |r| {
                    Ok((
                        r.get::<_, i64>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, String>(3)?,
                        r.get::<_, String>(4)?,
                        r.get::<_, String>(5)?,
                        r.get::<_, String>(6)?,
                        r.get::<_, String>(7)?,
                        r.get::<_, String>(8)?,
                    ))
                },
            )
            .optional()?;
        match row {
            None => Ok(None),
            Some((game_no, query, use_case, model_a, model_b, response_a, response_b, outcome, created_at)) => {
                Ok(Some(GameRecord {
                    game_no,
                    query,
                    use_case,
                    model_a,
                    model_b,
                    response_a,
                    response_b,
                    outcome: Outcome::parse(&outcome)?,
                    created_at,
                }))
            }
        }
    }

    // --- transaction-scoped writes ---

    pub(crate) fn max_prompt_version(
        tx: &Transaction,
        origin: &str,
        use_case: &str,
    ) -> EngineResult<i64> {
        let max: Option<i64> = tx.query_row(
            "SELECT MAX(version) FROM prompts WHERE origin = ?1 AND use_case = ?2",
            params![origin, use_case],
            |r| r.get(0),
        )?;
        Ok(max.unwrap_or(0))
    }

    pub(crate) fn insert_prompt(tx: &Transaction, row: &PromptVersion) -> EngineResult<()> {
        tx.execute(
            "INSERT INTO prompts(origin, use_case, prompt, version, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row.origin, row.use_case, row.prompt, row.version, row.created_at],
        )?;
        Ok(())
    }

    pub(crate) fn max_assistant_version(
        tx: &Transaction,
        origin: &str,
        use_case: &str,
    ) -> EngineResult<i64> {
        let max: Option<i64> = tx.query_row(
            "SELECT MAX(version) FROM assistants WHERE origin = ?1 AND use_case = ?2",
            params![origin, use_case],
            |r| r.get(0),
        )?;
        Ok(max.unwrap_or(0))
    }

    pub(crate) fn insert_assistant(tx: &Transaction, row: &AssistantVersion) -> EngineResult<()> {
        tx.execute(
            "INSERT INTO assistants(assistant_id, api_key, assistant_version,
                                    use_case, origin, version, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.assistant_id,
                row.api_key,
                row.assistant_version,
                row.use_case,
                row.origin,
                row.version,
                row.created_at
            ],
        )?;
        Ok(())
    }

    /// Idempotent: inserting an existing name is a no-op.
    pub(crate) fn insert_use_case(tx: &Transaction, name: &str) -> EngineResult<()> {
        tx.execute(
            "INSERT OR IGNORE INTO use_cases(name) VALUES (?1)",
            params![name],
        )?;
        Ok(())
    }

    pub(crate) fn model_in_tx(tx: &Transaction, origin: &str) -> EngineResult<Option<ModelSource>> {
        let row = tx
            .query_row(
                "SELECT origin, rating, games_played FROM models WHERE origin = ?1",
                params![origin],
                |r| {
                    Ok(ModelSource {
                        origin: r.get(0)?,
                        rating: r.get(1)?,
                        games_played: r.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub(crate) fn put_model(tx: &Transaction, model: &ModelSource) -> EngineResult<()> {
        tx.execute(
            "INSERT INTO models(origin, rating, games_played) VALUES (?1, ?2, ?3)
             ON CONFLICT(origin) DO UPDATE SET rating = excluded.rating,
                                               games_played = excluded.games_played",
            params![model.origin, model.rating, model.games_played],
        )?;
        Ok(())
    }

    /// Increment a named counter and return the new value. First bump yields 1.
    pub(crate) fn bump_counter(tx: &Transaction, name: &str) -> EngineResult<i64> {
        let value = tx.query_row(
            "INSERT INTO counters(name, value) VALUES (?1, 1)
             ON CONFLICT(name) DO UPDATE SET value = value + 1
             RETURNING value",
            params![name],
            |r| r.get(0),
        )?;
        Ok(value)
    }

    pub(crate) fn insert_game(tx: &Transaction, record: &GameRecord) -> EngineResult<()> {
        tx.execute(
            "INSERT INTO games(game_no, query, use_case, model_a, model_b,
                               response_a, response_b, outcome, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.game_no,
                record.query,
                record.use_case,
                record.model_a,
                record.model_b,
                record.response_a,
                record.response_b,
                record.outcome.as_str(),
                record.created_at
            ],
        )?;
        Ok(())
    }
}

fn backoff(attempt: u32) {
    std::thread::sleep(Duration::from_millis(BACKOFF_BASE_MS << (attempt - 1)));
}

fn prompt_from_row(r: &rusqlite::Row) -> rusqlite::Result<PromptVersion> {
    Ok(PromptVersion {
        origin: r.get(0)?,
        use_case: r.get(1)?,
        prompt: r.get(2)?,
        version: r.get(3)?,
        created_at: r.get(4)?,
    })
}

fn assistant_from_row(r: &rusqlite::Row) -> rusqlite::Result<AssistantVersion> {
    Ok(AssistantVersion {
        assistant_id: r.get(0)?,
        api_key: r.get(1)?,
        assistant_version: r.get(2)?,
        use_case: r.get(3)?,
        origin: r.get(4)?,
        version: r.get(5)?,
        created_at: r.get(6)?,
    })
}

fn collect<T>(rows: impl Iterator<Item = rusqlite::Result<T>>) -> EngineResult<Vec<T>> {
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
