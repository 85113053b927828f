use std::fs;
use std::path::Path;

use dtge_api::{load_project, LoadedProject};

use crate::{DtgeToolError, TestCase, TESTCASE_SCHEMA_V1};

pub fn read_project(demo_dir: &Path) -> Result<LoadedProject, DtgeToolError> {
    let project = load_project(demo_dir)?;
    if project.registry.is_empty() {
        return Err(DtgeToolError::SourceEmpty {
            path: demo_dir.to_path_buf(),
        });
    }
    Ok(project)
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, DtgeToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| DtgeToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase =
        serde_json::from_str(&raw).map_err(|source| DtgeToolError::ParseCase {
            path: case_path.to_path_buf(),
            source,
        })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(DtgeToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}
