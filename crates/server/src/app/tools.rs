//! Tool implementations for `SkillService`.

use super::{read_skill_text, SkillService, SkillSummary};
use rmcp::model::{CallToolResult, Content};
use serde_json::{json, Map as JsonMap, Value};
use time::format_description::well_known::Rfc3339;

/// Extracts the required `name` argument of the `skill` tool.
pub(crate) fn skill_name_arg(args: &JsonMap<String, Value>) -> Result<&str, String> {
    match args.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => Ok(name.as_str()),
        Some(Value::String(_)) => Err("`name` must not be empty".into()),
        Some(_) => Err("`name` must be a string".into()),
        None => Err("missing required argument `name`".into()),
    }
}

fn error_result(text: String) -> CallToolResult {
    CallToolResult {
        content: vec![Content::text(text)],
        structured_content: None,
        is_error: Some(true),
        meta: None,
    }
}

impl SkillService {
    /// Description of the `skill` tool, listing what is currently available.
    pub(crate) fn skill_tool_description(&self) -> String {
        let snapshot = self.registry.snapshot();
        let mut text = String::from(
            "Load a skill by name. Returns the skill's SKILL.md instructions and its base \
             directory, so files the skill references can be resolved relative to it.\n",
        );
        if snapshot.is_empty() {
            text.push_str("\nNo skills are currently available.");
            return text;
        }
        text.push_str("\n<available_skills>\n");
        for skill in snapshot.skills() {
            match &skill.description {
                Some(desc) => text.push_str(&format!("- {}: {}\n", skill.name, desc)),
                None => text.push_str(&format!("- {}\n", skill.name)),
            }
        }
        text.push_str("</available_skills>");
        text
    }

    /// `skill`: returns a skill's manifest text. Unknown names are a tool error,
    /// not a protocol error.
    pub(crate) fn skill_tool(&self, name: &str) -> CallToolResult {
        let Some(skill) = self.registry.get_skill(name) else {
            let available: Vec<String> = self.registry.snapshot().names().map(String::from).collect();
            return error_result(if available.is_empty() {
                format!("Skill '{name}' not found. No skills are currently available.")
            } else {
                format!(
                    "Skill '{name}' not found. Available skills: {}",
                    available.join(", ")
                )
            });
        };
        let content = match read_skill_text(&skill) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(target: "universal_skills::mcp", skill = %skill.name, error = %err, "skill manifest unreadable");
                return error_result(format!("Skill '{name}' could not be read: {err:#}"));
            }
        };
        let directory = skill.directory_path.display().to_string();
        let text = format!(
            "Loading skill: {}\nBase directory: {directory}\n\n{content}",
            skill.name
        );
        CallToolResult {
            content: vec![Content::text(text)],
            structured_content: Some(json!({
                "name": skill.name,
                "source": skill.source().label(),
                "scope": skill.scope().as_str(),
                "directory": directory,
                "manifest": skill.manifest_path.display().to_string(),
            })),
            is_error: Some(false),
            meta: None,
        }
    }

    /// `list-skills`: every resolved skill from one snapshot.
    pub(crate) fn list_skills_tool(&self) -> CallToolResult {
        let snapshot = self.registry.snapshot();
        let skills: Vec<SkillSummary> = snapshot.skills().map(SkillSummary::from).collect();
        let lines: Vec<String> = skills
            .iter()
            .map(|s| format!("{} ({}) {}", s.name, s.source, s.directory.display()))
            .collect();
        let text = if lines.is_empty() {
            "No skills found.".to_string()
        } else {
            lines.join("\n")
        };
        CallToolResult {
            content: vec![Content::text(text)],
            structured_content: Some(json!({
                "skills": skills,
                "count": skills.len(),
                "duplicates": snapshot.duplicates(),
            })),
            is_error: Some(false),
            meta: None,
        }
    }

    /// `refresh-skills`: re-resolves now (joining any pass already running).
    pub(crate) async fn refresh_skills_tool(&self) -> CallToolResult {
        match self.registry.refresh_now().await {
            Ok(table) => {
                let resolved_at = table
                    .resolved_at()
                    .format(&Rfc3339)
                    .unwrap_or_else(|_| table.resolved_at().to_string());
                CallToolResult {
                    content: vec![Content::text(format!(
                        "Refreshed: {} skills available",
                        table.len()
                    ))],
                    structured_content: Some(json!({
                        "count": table.len(),
                        "resolved_at": resolved_at,
                    })),
                    is_error: Some(false),
                    meta: None,
                }
            }
            Err(err) => {
                tracing::warn!(target: "universal_skills::refresh", error = %err, "on-demand refresh failed");
                error_result(format!(
                    "Refresh failed, previous skill list kept: {err}"
                ))
            }
        }
    }
}
