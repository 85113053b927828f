use dtge_api::preview_scene;
use dtge_runtime::FactStore;
use tracing::info;

use crate::{json_string, load_cli_project, CheckArgs, CliError, PreviewArgs};

pub(super) fn run_preview(args: PreviewArgs) -> Result<i32, CliError> {
    let facts = parse_facts(&args.facts)?;
    let project = load_cli_project(&args.scenes_dir)?;
    let text = preview_scene(&project.registry, &args.scene, &facts, args.seed)?;

    println!("RESULT:OK");
    println!("SCENE:{}", args.scene);
    println!("TEXT_JSON:{}", json_string(&text));
    Ok(0)
}

/// Exits non-zero when any option target dangles.
pub(super) fn run_check(args: CheckArgs) -> Result<i32, CliError> {
    let project = load_cli_project(&args.scenes_dir)?;
    let dangling = project.registry.dangling_targets();
    info!(scenes = project.registry.len(), dangling = dangling.len(), "scene check finished");

    println!(
        "RESULT:{}",
        if dangling.is_empty() { "OK" } else { "DANGLING" }
    );
    println!("SCENES:{}", project.registry.len());
    if !project.registry.contains(project.start_scene_id()) {
        println!("MISSING_START:{}", json_string(project.start_scene_id()));
    }
    for entry in &dangling {
        println!(
            "DANGLING:{}|{}|{}",
            entry.scene_id,
            entry.slot,
            json_string(&entry.target)
        );
    }
    println!("DANGLING_COUNT:{}", dangling.len());
    Ok(if dangling.is_empty() { 0 } else { 1 })
}

pub(crate) fn parse_facts(raw: &[String]) -> Result<FactStore, CliError> {
    let mut facts = FactStore::new();
    for entry in raw {
        let parsed = entry
            .split_once('=')
            .and_then(|(name, value)| Some((name.trim(), value.trim().parse::<bool>().ok()?)));
        match parsed {
            Some((name, value)) if !name.is_empty() => facts.set(name, value),
            _ => {
                return Err(CliError::new(
                    "CLI_FACT_PARSE",
                    format!("Expected name=true|false, got: {}", entry),
                ))
            }
        }
    }
    Ok(facts)
}
