//! Handler for the `list` command.

use crate::app::SkillSummary;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use universal_skills_discovery::ResolvedTable;

use super::resolver_with_extra_dirs;

/// Resolves once and prints the table to stdout.
pub(crate) fn handle_list_command(skill_dirs: Vec<PathBuf>, json: bool) -> Result<()> {
    let table = resolver_with_extra_dirs(&skill_dirs).resolve()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        writeln!(out, "{}", render_json(&table)?)?;
    } else {
        write!(out, "{}", render_text(&table))?;
    }
    Ok(())
}

fn render_json(table: &ResolvedTable) -> Result<String> {
    let skills: Vec<SkillSummary> = table.skills().map(SkillSummary::from).collect();
    Ok(serde_json::to_string_pretty(&skills)?)
}

fn render_text(table: &ResolvedTable) -> String {
    if table.is_empty() {
        return "No skills found.\n".to_string();
    }
    let width = table.names().map(str::len).max().unwrap_or(0);
    let mut text = String::new();
    for skill in table.skills() {
        text.push_str(&format!(
            "{:width$}  {:<17}  {}\n",
            skill.name,
            skill.source().label(),
            skill.directory_path.display()
        ));
    }
    for dup in table.duplicates() {
        text.push_str(&format!(
            "note: {} from {} shadowed by {}\n",
            dup.name, dup.skipped_source, dup.kept_source
        ));
    }
    text
}
