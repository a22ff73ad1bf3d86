use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::errors::EngineResult;
use crate::model::AssistantSpec;

/// Bulk-registration file: use cases, prompts and assistants to seed an
/// arena in one pass. Every prompt/assistant entry still goes through the
/// registry, so each insert gets the next version for its key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub prompts: Vec<RosterPrompt>,
    #[serde(default)]
    pub assistants: Vec<AssistantSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterPrompt {
    pub origin: String,
    pub use_case: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RosterSummary {
    pub use_cases: usize,
    pub prompts: usize,
    pub assistants: usize,
}

pub fn load_roster(path: &Path) -> anyhow::Result<Roster> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    let roster: Roster = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse roster {}", path.display()))?;
    Ok(roster)
}

pub fn apply_roster(engine: &Engine, roster: &Roster) -> EngineResult<RosterSummary> {
    for name in &roster.use_cases {
        engine.add_use_case(name)?;
    }
    for p in &roster.prompts {
        engine.add_prompt_version(&p.origin, &p.use_case, &p.prompt)?;
    }
    for a in &roster.assistants {
        engine.add_assistant_version(a)?;
    }
    tracing::info!(
        use_cases = roster.use_cases.len(),
        prompts = roster.prompts.len(),
        assistants = roster.assistants.len(),
        "roster applied"
    );
    Ok(RosterSummary {
        use_cases: roster.use_cases.len(),
        prompts: roster.prompts.len(),
        assistants: roster.assistants.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Store;

    const ROSTER_YAML: &str = r#"
use_cases:
  - qa
  - summarize
prompts:
  - origin: gpt
    use_case: qa
    prompt: "Answer concisely: {query}"
  - origin: claude
    use_case: qa
    prompt: "Q: {query}\nA:"
assistants:
  - assistant_id: asst_1
    api_key: sk-test
    assistant_version: "2.0"
    use_case: qa
"#;

    #[test]
    fn test_roster_parses_and_applies() {
        let roster: Roster = serde_yaml::from_str(ROSTER_YAML).unwrap();
        assert_eq!(roster.use_cases.len(), 2);
        assert_eq!(roster.prompts.len(), 2);
        assert_eq!(roster.assistants.len(), 1);

        let store = Store::memory().unwrap();
        store.init_schema().unwrap();
        let engine = Engine::new(store);
        let summary = apply_roster(&engine, &roster).unwrap();
        assert_eq!(summary.prompts, 2);

        assert_eq!(engine.use_cases().unwrap(), vec!["qa", "summarize"]);
        let history = engine.prompt_history("gpt", "qa").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].version, 1);
        assert_eq!(engine.list_assistants().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let roster: Roster = serde_yaml::from_str("use_cases: [qa]").unwrap();
        assert_eq!(roster.use_cases, vec!["qa"]);
        assert!(roster.prompts.is_empty());
        assert!(roster.assistants.is_empty());
    }

    #[test]
    fn test_reapplying_roster_bumps_versions() {
        let roster: Roster = serde_yaml::from_str(ROSTER_YAML).unwrap();
        let store = Store::memory().unwrap();
        store.init_schema().unwrap();
        let engine = Engine::new(store);
        apply_roster(&engine, &roster).unwrap();
        apply_roster(&engine, &roster).unwrap();

        let history = engine.prompt_history("gpt", "qa").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].version, 2);
        // Idempotent use cases, versioned prompts.
        assert_eq!(engine.use_cases().unwrap().len(), 2);
    }
}
