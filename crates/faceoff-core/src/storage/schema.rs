pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS prompts (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  origin TEXT NOT NULL,
  use_case TEXT NOT NULL,
  prompt TEXT NOT NULL,
  version INTEGER NOT NULL,
  created_at TEXT NOT NULL,
  UNIQUE (origin, use_case, version)
);

CREATE TABLE IF NOT EXISTS assistants (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  assistant_id TEXT NOT NULL,
  api_key TEXT NOT NULL,
  assistant_version TEXT NOT NULL,
  use_case TEXT NOT NULL,
  origin TEXT NOT NULL,
  version INTEGER NOT NULL,
  created_at TEXT NOT NULL,
  UNIQUE (origin, use_case, version)
);

CREATE TABLE IF NOT EXISTS use_cases (
  name TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS models (
  origin TEXT PRIMARY KEY,
  rating REAL NOT NULL,
  games_played INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS games (
  game_no INTEGER PRIMARY KEY,
  query TEXT NOT NULL,
  use_case TEXT NOT NULL,
  model_a TEXT NOT NULL,
  model_b TEXT NOT NULL,
  response_a TEXT NOT NULL,
  response_b TEXT NOT NULL,
  outcome TEXT NOT NULL,
  created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS counters (
  name TEXT PRIMARY KEY,
  value INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_prompts_key ON prompts(origin, use_case);
CREATE INDEX IF NOT EXISTS idx_assistants_key ON assistants(origin, use_case);
CREATE INDEX IF NOT EXISTS idx_games_use_case ON games(use_case);
"#;
