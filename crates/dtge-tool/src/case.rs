use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "dtge-tool-case.v1";

/// A scripted playthrough and the scenes it is expected to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    /// Falls back to the start scene of the directory's game data.
    #[serde(default)]
    pub start_scene: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u32,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
}

fn default_seed() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Choose { slot: usize },
}

impl TestAction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Choose { .. } => "choose",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExpectedEvent {
    Scene {
        #[serde(rename = "sceneId")]
        scene_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subscene: Option<String>,
        text: String,
        /// Display names; disabled options carry a ` (disabled)` suffix.
        options: Vec<String>,
    },
    /// A rejected choice. The playthrough stays where it was.
    Error { code: String },
    End,
}

#[cfg(test)]
mod case_tests {
    use super::*;

    #[test]
    fn testcase_deserialize_applies_defaults() {
        let parsed: TestCase = serde_json::from_str(
            r#"{
  "schemaVersion": "dtge-tool-case.v1",
  "actions": [],
  "expectedEvents": []
}"#,
        )
        .expect("testcase should deserialize");

        assert_eq!(parsed.schema_version, TESTCASE_SCHEMA_V1);
        assert_eq!(parsed.seed, 1);
        assert_eq!(parsed.start_scene, None);
        assert!(parsed.actions.is_empty());
    }

    #[test]
    fn expected_event_deserialize_supports_all_variants() {
        let parsed: Vec<ExpectedEvent> = serde_json::from_str(
            r#"[
  {"kind":"scene","sceneId":"east","subscene":"night","text":"t","options":["Back"]},
  {"kind":"error","code":"OPTION_DISABLED"},
  {"kind":"end"}
]"#,
        )
        .expect("events should deserialize");

        assert_eq!(parsed.len(), 3);
        assert!(matches!(
            &parsed[0],
            ExpectedEvent::Scene { subscene: Some(name), .. } if name == "night"
        ));
        assert!(matches!(parsed[1], ExpectedEvent::Error { .. }));
        assert!(matches!(parsed[2], ExpectedEvent::End));
    }

    #[test]
    fn test_action_kind_name_reports_expected_value() {
        let action: TestAction =
            serde_json::from_str(r#"{"kind":"choose","slot":3}"#).expect("action");
        assert_eq!(action, TestAction::Choose { slot: 3 });
        assert_eq!(action.kind_name(), "choose");
    }
}
