use std::path::Path;

use faceoff_core::model::AssistantSpec;
use faceoff_core::roster;

use crate::cli::args::{AddAssistantArgs, AddPromptArgs, AddUseCaseArgs, SeedArgs};
use crate::cli::commands::open_engine;

pub fn cmd_add_prompt(db: &Path, args: AddPromptArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    let version = engine.add_prompt_version(&args.origin, &args.use_case, &args.prompt)?;
    if args.format == "json" {
        println!("{}", serde_json::json!({ "version": version }));
    } else {
        println!(
            "stored prompt for {} / {} as version {}",
            args.origin, args.use_case, version
        );
    }
    Ok(0)
}

pub fn cmd_add_assistant(db: &Path, args: AddAssistantArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    let version = engine.add_assistant_version(&AssistantSpec {
        assistant_id: args.assistant_id.clone(),
        api_key: args.api_key,
        assistant_version: args.assistant_version,
        use_case: args.use_case.clone(),
    })?;
    if args.format == "json" {
        println!("{}", serde_json::json!({ "version": version }));
    } else {
        println!(
            "stored assistant {} for {} as version {}",
            args.assistant_id, args.use_case, version
        );
    }
    Ok(0)
}

pub fn cmd_add_use_case(db: &Path, args: AddUseCaseArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    engine.add_use_case(&args.name)?;
    println!("use case '{}' registered", args.name);
    Ok(0)
}

pub fn cmd_seed(db: &Path, args: SeedArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    let roster = roster::load_roster(&args.roster)?;
    let summary = roster::apply_roster(&engine, &roster)?;
    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "seeded {} use cases, {} prompts, {} assistants from {}",
            summary.use_cases,
            summary.prompts,
            summary.assistants,
            args.roster.display()
        );
    }
    Ok(0)
}
