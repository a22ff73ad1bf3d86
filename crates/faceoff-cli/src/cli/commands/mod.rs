pub mod admin;
pub mod arena;
pub mod board;

use std::path::Path;

use faceoff_core::engine::Engine;
use faceoff_core::errors::EngineError;
use faceoff_core::storage::Store;

use crate::cli::args::{Cli, Command};

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Match(args) => arena::cmd_match(&cli.db, args),
        Command::Record(args) => arena::cmd_record(&cli.db, args),
        Command::AddPrompt(args) => admin::cmd_add_prompt(&cli.db, args),
        Command::AddAssistant(args) => admin::cmd_add_assistant(&cli.db, args),
        Command::AddUseCase(args) => admin::cmd_add_use_case(&cli.db, args),
        Command::Seed(args) => admin::cmd_seed(&cli.db, args),
        Command::Leaderboard(args) => board::cmd_leaderboard(&cli.db, args),
        Command::UseCases(args) => board::cmd_use_cases(&cli.db, args),
        Command::Origins(args) => board::cmd_origins(&cli.db, args),
        Command::TotalGames(args) => board::cmd_total_games(&cli.db, args),
        Command::Prompts(args) => board::cmd_prompts(&cli.db, args),
        Command::Assistants(args) => board::cmd_assistants(&cli.db, args),
    }
}

pub(crate) fn open_engine(db: &Path) -> anyhow::Result<Engine> {
    if let Some(dir) = db.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let store = Store::open(db)?;
    store.init_schema()?;
    Ok(Engine::new(store))
}

/// Expected engine failures print and exit 1; anything else is fatal.
pub(crate) fn surface(err: EngineError) -> anyhow::Result<i32> {
    match err {
        e @ (EngineError::InsufficientCandidates { .. }
        | EngineError::UnknownOutcome(_)
        | EngineError::ConcurrentUpdateConflict { .. }) => {
            eprintln!("error: {e}");
            Ok(1)
        }
        e @ EngineError::StoreUnavailable(_) => Err(e.into()),
    }
}
