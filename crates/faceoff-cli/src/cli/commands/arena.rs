use std::path::Path;

use faceoff_core::model::{Candidate, Outcome, OutcomeReport};

use crate::cli::args::{MatchArgs, RecordArgs};
use crate::cli::commands::{open_engine, surface};

pub fn cmd_match(db: &Path, args: MatchArgs) -> anyhow::Result<i32> {
    let engine = open_engine(db)?;
    let (a, b) = match engine.get_match(&args.use_case) {
        Ok(pair) => pair,
        Err(e) => return surface(e),
    };

    if args.format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "candidate_a": a,
                "candidate_b": b,
            }))?
        );
    } else {
        println!("A: {}", describe(&a));
        println!("B: {}", describe(&b));
    }
    Ok(0)
}

pub fn cmd_record(db: &Path, args: RecordArgs) -> anyhow::Result<i32> {
    let outcome = match Outcome::parse(&args.outcome) {
        Ok(o) => o,
        Err(e) => return surface(e),
    };

    let engine = open_engine(db)?;
    let report = OutcomeReport {
        use_case: args.use_case,
        model_a: args.model_a,
        model_b: args.model_b,
        query: args.query,
        response_a: args.response_a,
        response_b: args.response_b,
        outcome,
    };
    let game_no = match engine.record_outcome(&report) {
        Ok(n) => n,
        Err(e) => return surface(e),
    };

    if args.format == "json" {
        println!("{}", serde_json::json!({ "game_no": game_no }));
    } else {
        println!("recorded game {}", game_no);
    }
    Ok(0)
}

fn describe(candidate: &Candidate) -> String {
    match candidate {
        Candidate::Prompt(p) => format!("{} v{} (prompt) {}", p.origin, p.version, p.prompt),
        Candidate::Assistant(a) => format!(
            "{} v{} (assistant {} @ {})",
            a.origin, a.version, a.assistant_id, a.assistant_version
        ),
    }
}
