//! End-to-end flows through the engine facade: matchmaking, rating updates,
//! counters and the append-only game log over one shared store.

use faceoff_core::engine::Engine;
use faceoff_core::errors::EngineError;
use faceoff_core::model::{AssistantSpec, Outcome, OutcomeReport, ASSISTANT_ORIGIN};
use faceoff_core::storage::Store;

fn engine() -> Engine {
    let store = Store::memory().unwrap();
    store.init_schema().unwrap();
    Engine::new(store)
}

fn report(use_case: &str, model_a: &str, model_b: &str, outcome: Outcome) -> OutcomeReport {
    OutcomeReport {
        use_case: use_case.to_string(),
        model_a: model_a.to_string(),
        model_b: model_b.to_string(),
        query: "capital of France?".to_string(),
        response_a: "Paris".to_string(),
        response_b: "Paris.".to_string(),
        outcome,
    }
}

#[test]
fn test_first_recorded_game_moves_fresh_ratings_by_fifteen() {
    let eng = engine();
    eng.add_use_case("qa").unwrap();
    eng.add_prompt_version("gpt", "qa", "Answer: {query}").unwrap();
    eng.add_prompt_version("claude", "qa", "Q/A").unwrap();

    // gpt (A) loses to claude (B), both entering at 1600.
    let game_no = eng
        .record_outcome(&report("qa", "gpt", "claude", Outcome::Loss))
        .unwrap();
    assert_eq!(game_no, 1);

    let board = eng.leaderboard("qa").unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].origin, "claude");
    assert!((board[0].rating - 1615.0).abs() < 1e-9);
    assert_eq!(board[0].games_played, 1);
    assert_eq!(board[1].origin, "gpt");
    assert!((board[1].rating - 1585.0).abs() < 1e-9);
    assert_eq!(board[1].games_played, 1);

    assert_eq!(eng.total_games().unwrap(), 1);
}

#[test]
fn test_game_record_appended_with_returned_number() {
    let eng = engine();
    let game_no = eng
        .record_outcome(&report("qa", "gpt", "claude", Outcome::BothGood))
        .unwrap();

    let record = eng.game(game_no).unwrap().expect("record stored");
    assert_eq!(record.game_no, game_no);
    assert_eq!(record.use_case, "qa");
    assert_eq!(record.model_a, "gpt");
    assert_eq!(record.model_b, "claude");
    assert_eq!(record.query, "capital of France?");
    assert_eq!(record.response_a, "Paris");
    assert_eq!(record.response_b, "Paris.");
    assert_eq!(record.outcome, Outcome::BothGood);
}

#[test]
fn test_game_numbers_are_sequential() {
    let eng = engine();
    for expected in 1..=5 {
        let game_no = eng
            .record_outcome(&report("qa", "gpt", "claude", Outcome::Win))
            .unwrap();
        assert_eq!(game_no, expected);
    }
    assert_eq!(eng.total_games().unwrap(), 5);
}

#[test]
fn test_both_good_lifts_both_and_drifts_total() {
    let eng = engine();
    eng.record_outcome(&report("qa", "gpt", "claude", Outcome::BothGood))
        .unwrap();
    eng.add_prompt_version("gpt", "qa", "p").unwrap();
    eng.add_prompt_version("claude", "qa", "p").unwrap();

    let board = eng.leaderboard("qa").unwrap();
    let sum: f64 = board.iter().map(|r| r.rating).sum();
    for row in &board {
        assert!(row.rating > 1600.0, "{} should gain", row.origin);
    }
    assert!(sum > 3200.0, "pair total drifts upward on both_good");
}

#[test]
fn test_match_fails_with_single_origin() {
    let eng = engine();
    eng.add_use_case("qa").unwrap();
    eng.add_prompt_version("gpt", "qa", "solo").unwrap();

    match eng.get_match("qa") {
        Err(EngineError::InsufficientCandidates { use_case, found }) => {
            assert_eq!(use_case, "qa");
            assert_eq!(found, 1);
        }
        other => panic!("expected InsufficientCandidates, got {other:?}"),
    }
}

#[test]
fn test_match_returns_latest_versions_of_distinct_origins() {
    let eng = engine();
    eng.add_prompt_version("gpt", "qa", "old").unwrap();
    eng.add_prompt_version("gpt", "qa", "new").unwrap();
    eng.add_prompt_version("claude", "qa", "only").unwrap();

    for _ in 0..50 {
        let (a, b) = eng.get_match("qa").unwrap();
        assert_ne!(a.origin(), b.origin());
        for c in [&a, &b] {
            if c.origin() == "gpt" {
                assert_eq!(c.version(), 2);
            }
        }
    }
}

#[test]
fn test_match_pool_spans_prompts_and_assistants() {
    let eng = engine();
    eng.add_prompt_version("gpt", "qa", "p").unwrap();
    eng.add_assistant_version(&AssistantSpec {
        assistant_id: "asst_1".into(),
        api_key: "sk-test".into(),
        assistant_version: "2.0".into(),
        use_case: "qa".into(),
    })
    .unwrap();

    let (a, b) = eng.get_match("qa").unwrap();
    let origins = [a.origin().to_string(), b.origin().to_string()];
    assert!(origins.contains(&"gpt".to_string()));
    assert!(origins.contains(&ASSISTANT_ORIGIN.to_string()));
}

#[test]
fn test_unknown_outcome_rejected_before_any_mutation() {
    let eng = engine();
    let err = Outcome::parse("draw").unwrap_err();
    assert!(matches!(err, EngineError::UnknownOutcome(_)));

    // Nothing was touched: no games, no counters, no model rows.
    assert_eq!(eng.total_games().unwrap(), 0);
    assert!(eng.game(1).unwrap().is_none());
}

#[test]
fn test_leaderboard_includes_unplayed_origins_at_defaults() {
    let eng = engine();
    eng.add_prompt_version("gpt", "qa", "p").unwrap();
    eng.add_prompt_version("claude", "qa", "p").unwrap();
    eng.add_prompt_version("mistral", "qa", "p").unwrap();

    eng.record_outcome(&report("qa", "gpt", "claude", Outcome::Win))
        .unwrap();

    let board = eng.leaderboard("qa").unwrap();
    assert_eq!(board.len(), 3);
    // Rating-descending: winner, unplayed default, loser.
    assert_eq!(board[0].origin, "gpt");
    assert_eq!(board[1].origin, "mistral");
    assert_eq!(board[1].rating, 1600.0);
    assert_eq!(board[1].games_played, 0);
    assert_eq!(board[2].origin, "claude");
}

#[test]
fn test_leaderboard_scoped_to_use_case() {
    let eng = engine();
    eng.add_prompt_version("gpt", "qa", "p").unwrap();
    eng.add_prompt_version("claude", "qa", "p").unwrap();
    eng.add_prompt_version("mistral", "summarize", "p").unwrap();

    let qa = eng.leaderboard("qa").unwrap();
    assert_eq!(qa.len(), 2);
    assert!(qa.iter().all(|r| r.origin != "mistral"));

    let summarize = eng.leaderboard("summarize").unwrap();
    assert_eq!(summarize.len(), 1);
    assert_eq!(summarize[0].origin, "mistral");
}

#[test]
fn test_ratings_are_global_across_use_cases() {
    let eng = engine();
    eng.add_prompt_version("gpt", "qa", "p").unwrap();
    eng.add_prompt_version("claude", "qa", "p").unwrap();
    eng.add_prompt_version("gpt", "summarize", "p").unwrap();
    eng.add_prompt_version("claude", "summarize", "p").unwrap();

    eng.record_outcome(&report("qa", "gpt", "claude", Outcome::Win))
        .unwrap();

    // The qa game is visible on the summarize board: one record per origin.
    let board = eng.leaderboard("summarize").unwrap();
    let gpt = board.iter().find(|r| r.origin == "gpt").unwrap();
    assert!(gpt.rating > 1600.0);
    assert_eq!(gpt.games_played, 1);
}

#[test]
fn test_total_games_never_below_any_games_played() {
    let eng = engine();
    eng.add_prompt_version("gpt", "qa", "p").unwrap();
    eng.add_prompt_version("claude", "qa", "p").unwrap();
    eng.add_prompt_version("mistral", "qa", "p").unwrap();

    eng.record_outcome(&report("qa", "gpt", "claude", Outcome::Win))
        .unwrap();
    eng.record_outcome(&report("qa", "gpt", "mistral", Outcome::Loss))
        .unwrap();

    let total = eng.total_games().unwrap();
    for row in eng.leaderboard("qa").unwrap() {
        assert!(total >= row.games_played);
    }
}

#[test]
fn test_persists_across_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("arena.db");

    {
        let store = Store::open(&path).unwrap();
        store.init_schema().unwrap();
        let eng = Engine::new(store);
        eng.add_prompt_version("gpt", "qa", "p").unwrap();
        eng.add_prompt_version("claude", "qa", "p").unwrap();
        eng.record_outcome(&report("qa", "gpt", "claude", Outcome::Win))
            .unwrap();
    }

    let store = Store::open(&path).unwrap();
    store.init_schema().unwrap();
    let eng = Engine::new(store);
    assert_eq!(eng.total_games().unwrap(), 1);
    let board = eng.leaderboard("qa").unwrap();
    assert_eq!(board[0].origin, "gpt");
    // The next game continues the sequence.
    let game_no = eng
        .record_outcome(&report("qa", "gpt", "claude", Outcome::Loss))
        .unwrap();
    assert_eq!(game_no, 2);
}
