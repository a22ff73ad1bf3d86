use std::path::Path;

use crate::cli::args::{FormatArgs, LeaderboardArgs, PromptsArgs};
use crate::cli::commands::open_engine;

pub fn cmd_leaderboard(db: &Path, args: LeaderboardArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    let board = engine.leaderboard(&args.use_case)?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else if board.is_empty() {
        println!("no origins registered for '{}'", args.use_case);
    } else {
        println!("{:<4} {:<24} {:>8} {:>7}", "#", "origin", "rating", "games");
        for (i, row) in board.iter().enumerate() {
            println!(
                "{:<4} {:<24} {:>8.1} {:>7}",
                i + 1,
                row.origin,
                row.rating,
                row.games_played
            );
        }
    }
    Ok(0)
}

pub fn cmd_use_cases(db: &Path, args: FormatArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    let names = engine.use_cases()?;
    print_list(&names, &args.format)
}

pub fn cmd_origins(db: &Path, args: FormatArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    let origins = engine.origins()?;
    print_list(&origins, &args.format)
}

pub fn cmd_total_games(db: &Path, args: FormatArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    let total = engine.total_games()?;
    if args.format == "json" {
        println!("{}", serde_json::json!({ "total_games": total }));
    } else {
        println!("{}", total);
    }
    Ok(0)
}

pub fn cmd_prompts(db: &Path, args: PromptsArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    let history = engine.prompt_history(&args.origin, &args.use_case)?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else if history.is_empty() {
        println!("no prompts for {} / {}", args.origin, args.use_case);
    } else {
        for p in &history {
            println!("v{} ({}): {}", p.version, p.created_at, p.prompt);
        }
    }
    Ok(0)
}

pub fn cmd_assistants(db: &Path, args: FormatArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    let assistants = engine.list_assistants()?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&assistants)?);
    } else if assistants.is_empty() {
        println!("no assistants registered");
    } else {
        for a in &assistants {
            println!(
                "{} v{} ({} @ {}) use case {}",
                a.origin, a.version, a.assistant_id, a.assistant_version, a.use_case
            );
        }
    }
    Ok(0)
}

fn print_list(items: &[String], format: &str) -> anyhow::Result<i32> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        for item in items {
            println!("{}", item);
        }
    }
    Ok(0)
}
