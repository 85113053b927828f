use dtge_api::SceneView;

use crate::json_string;

/// Protocol lines for one scene boundary, without the trailing `STATE_OUT`.
pub(crate) fn scene_protocol_lines(view: &SceneView) -> Vec<String> {
    let mut lines = vec!["RESULT:OK".to_string()];
    if view.options.iter().any(|option| option.enabled) {
        lines.push("EVENT:SCENE".to_string());
    } else {
        lines.push("EVENT:END".to_string());
    }
    lines.push(format!("SCENE:{}", view.scene_id));
    if let Some(subscene) = &view.subscene {
        lines.push(format!("SUBSCENE_JSON:{}", json_string(subscene)));
    }
    lines.push(format!("TEXT_JSON:{}", json_string(&view.text)));
    for option in &view.options {
        let tag = if option.enabled {
            "OPTION"
        } else {
            "OPTION_DISABLED"
        };
        lines.push(format!(
            "{}:{}|{}",
            tag,
            option.slot,
            json_string(&option.display_name)
        ));
    }
    lines
}

pub(crate) fn emit_scene(view: &SceneView, state_out: Option<&str>) {
    for line in scene_protocol_lines(view) {
        println!("{}", line);
    }
    println!("STATE_OUT:{}", state_out.unwrap_or("NONE"));
}
