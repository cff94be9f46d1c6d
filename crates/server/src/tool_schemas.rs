//! MCP tool definitions for SkillService.

use rmcp::model::{Tool, ToolAnnotations};
use serde_json::{json, Map as JsonMap};
use std::sync::Arc;

/// Returns an empty object schema for parameterless tools.
///
/// Some clients reject an input schema without a JSON Schema "type", so
/// parameterless tools explicitly take an empty object.
pub(crate) fn empty_schema() -> Arc<JsonMap<String, serde_json::Value>> {
    let mut schema = JsonMap::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), json!({}));
    schema.insert("additionalProperties".into(), json!(false));
    Arc::new(schema)
}

/// Returns the schema for the `skill` tool (a single required `name`).
fn skill_schema() -> Arc<JsonMap<String, serde_json::Value>> {
    let mut schema = JsonMap::new();
    schema.insert("type".into(), json!("object"));
    schema.insert(
        "properties".into(),
        json!({
            "name": {
                "type": "string",
                "description": "Exact skill name, as listed in this tool's description"
            }
        }),
    );
    schema.insert("required".into(), json!(["name"]));
    schema.insert("additionalProperties".into(), json!(false));
    Arc::new(schema)
}

fn read_only() -> ToolAnnotations {
    ToolAnnotations {
        read_only_hint: Some(true),
        ..ToolAnnotations::default()
    }
}

/// Returns every tool, with the `skill` tool described by `skill_description`.
///
/// Tools: skill, list-skills, refresh-skills
pub(crate) fn skill_tools(skill_description: String) -> Vec<Tool> {
    vec![
        Tool {
            name: "skill".into(),
            title: Some("Load a skill".into()),
            description: Some(skill_description.into()),
            input_schema: skill_schema(),
            output_schema: None,
            annotations: Some(read_only()),
            icons: None,
            meta: None,
        },
        Tool {
            name: "list-skills".into(),
            title: Some("List resolved skills".into()),
            description: Some(
                "List every resolved skill with its source location and directory.".into(),
            ),
            input_schema: empty_schema(),
            output_schema: None,
            annotations: Some(read_only()),
            icons: None,
            meta: None,
        },
        Tool {
            name: "refresh-skills".into(),
            title: Some("Rescan skill directories".into()),
            description: Some(
                "Rescan all skill locations now instead of waiting for the next scheduled refresh."
                    .into(),
            ),
            input_schema: empty_schema(),
            output_schema: None,
            annotations: Some(ToolAnnotations::default()),
            icons: None,
            meta: None,
        },
    ]
}
