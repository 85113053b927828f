use std::path::Path;

use dtge_api::Playthrough;

use crate::source::{read_project, read_test_case};
use crate::{DtgeToolError, ExpectedEvent, TestAction, TestCase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub observed_events: Vec<ExpectedEvent>,
    pub consumed_actions: usize,
}

/// Plays `case` against the scenes in `demo_dir` and records what was shown.
///
/// A rejected choice is recorded as an error event rather than failing the
/// run; engine errors while starting do fail it.
pub fn run_case(demo_dir: &Path, case: &TestCase) -> Result<RunReport, DtgeToolError> {
    let project = read_project(demo_dir)?;
    let start = case
        .start_scene
        .clone()
        .unwrap_or_else(|| project.start_scene_id().to_string());
    let mut playthrough = Playthrough::start(project.registry, &start, case.seed)?;

    let mut observed_events = Vec::new();
    let mut ended = push_scene_events(&playthrough, &mut observed_events)?;

    for (consumed, action) in case.actions.iter().enumerate() {
        if ended {
            return Err(DtgeToolError::UnusedActions {
                used: consumed,
                total: case.actions.len(),
            });
        }
        match action {
            TestAction::Choose { slot } => match playthrough.choose(*slot) {
                Ok(()) => ended = push_scene_events(&playthrough, &mut observed_events)?,
                Err(error) => observed_events.push(ExpectedEvent::Error {
                    code: error.code().to_string(),
                }),
            },
        }
    }

    Ok(RunReport {
        observed_events,
        consumed_actions: case.actions.len(),
    })
}

/// Returns true when the scene offers no enabled option.
fn push_scene_events(
    playthrough: &Playthrough,
    events: &mut Vec<ExpectedEvent>,
) -> Result<bool, DtgeToolError> {
    let view = playthrough.view()?;
    let ended = !view.options.iter().any(|option| option.enabled);
    events.push(ExpectedEvent::Scene {
        scene_id: view.scene_id,
        subscene: view.subscene,
        text: view.text,
        options: view
            .options
            .into_iter()
            .map(|option| {
                if option.enabled {
                    option.display_name
                } else {
                    format!("{} (disabled)", option.display_name)
                }
            })
            .collect(),
    });
    if ended {
        events.push(ExpectedEvent::End);
    }
    Ok(ended)
}

pub fn assert_case(demo_dir: &Path, case_path: &Path) -> Result<(), DtgeToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(demo_dir, &case)?;

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(DtgeToolError::EventSerialize)?;
        return Err(DtgeToolError::EventCountMismatch {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected =
                serde_json::to_string(expected).map_err(DtgeToolError::EventSerialize)?;
            let actual = serde_json::to_string(actual).map_err(DtgeToolError::EventSerialize)?;
            return Err(DtgeToolError::EventMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    Ok(())
}
