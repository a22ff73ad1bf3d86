use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "faceoff",
    version,
    about = "Pairwise preference arena for prompts and assistants"
)]
pub struct Cli {
    /// SQLite database path
    #[arg(
        long,
        global = true,
        env = "FACEOFF_DB",
        default_value = ".faceoff/arena.db"
    )]
    pub db: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Select two candidates for a use case
    Match(MatchArgs),
    /// Record a judged comparison and update ratings
    Record(RecordArgs),
    /// Register a new prompt revision
    AddPrompt(AddPromptArgs),
    /// Register a new assistant revision
    AddAssistant(AddAssistantArgs),
    /// Register a use case (no-op if it exists)
    AddUseCase(AddUseCaseArgs),
    /// Bulk-register use cases, prompts and assistants from a roster file
    Seed(SeedArgs),
    /// Rating table for a use case, best first
    Leaderboard(LeaderboardArgs),
    /// List registered use cases
    UseCases(FormatArgs),
    /// List known origins
    Origins(FormatArgs),
    /// Total number of recorded games
    TotalGames(FormatArgs),
    /// Version history for one prompt key, newest first
    Prompts(PromptsArgs),
    /// List every stored assistant revision
    Assistants(FormatArgs),
}

#[derive(clap::Args, Clone)]
pub struct FormatArgs {
    /// Output format: text|json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Clone)]
pub struct MatchArgs {
    pub use_case: String,

    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Clone)]
pub struct RecordArgs {
    #[arg(long)]
    pub use_case: String,

    #[arg(long)]
    pub model_a: String,

    #[arg(long)]
    pub model_b: String,

    #[arg(long)]
    pub query: String,

    #[arg(long)]
    pub response_a: String,

    #[arg(long)]
    pub response_b: String,

    /// win|loss|both_good|both_bad, relative to model A
    #[arg(long)]
    pub outcome: String,

    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Clone)]
pub struct AddPromptArgs {
    #[arg(long)]
    pub origin: String,

    #[arg(long)]
    pub use_case: String,

    #[arg(long)]
    pub prompt: String,

    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Clone)]
pub struct AddAssistantArgs {
    #[arg(long)]
    pub assistant_id: String,

    #[arg(long, env = "FACEOFF_ASSISTANT_KEY")]
    pub api_key: String,

    /// Upstream vendor version string (not the registry version)
    #[arg(long)]
    pub assistant_version: String,

    #[arg(long)]
    pub use_case: String,

    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Clone)]
pub struct AddUseCaseArgs {
    pub name: String,
}

#[derive(clap::Args, Clone)]
pub struct SeedArgs {
    /// Roster YAML file
    pub roster: PathBuf,

    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Clone)]
pub struct LeaderboardArgs {
    pub use_case: String,

    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Clone)]
pub struct PromptsArgs {
    pub origin: String,
    pub use_case: String,

    #[arg(long, default_value = "text")]
    pub format: String,
}
