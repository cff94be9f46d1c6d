//! The MCP-facing service and the process entry point.
//!
//! `SkillService` answers protocol requests from the published skill table; it
//! never scans the filesystem itself, but it does read a skill's manifest text
//! when a client asks for it.

pub(crate) mod tools;

use crate::cli::{Cli, Commands};
use crate::commands::{handle_install_command, handle_list_command, handle_serve_command};
use crate::config::apply_config_to_env;
use crate::registry::SkillRegistry;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rmcp::model::{Meta, RawResource, ReadResourceResult, Resource, ResourceContents};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use universal_skills_discovery::SkillRecord;

/// URI scheme for skill resources: `skill://<name>`.
pub(crate) const SKILL_URI_PREFIX: &str = "skill://";

/// Serves the resolved skill table over MCP.
#[derive(Clone, Debug)]
pub struct SkillService {
    registry: SkillRegistry,
}

/// Flat, serializable view of a [`SkillRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: String,
    pub scope: &'static str,
    pub directory: PathBuf,
    pub manifest: PathBuf,
}

impl From<&SkillRecord> for SkillSummary {
    fn from(record: &SkillRecord) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
            source: record.source().label(),
            scope: record.scope().as_str(),
            directory: record.directory_path.clone(),
            manifest: record.manifest_path.clone(),
        }
    }
}

pub(crate) fn skill_uri(name: &str) -> String {
    format!("{SKILL_URI_PREFIX}{name}")
}

/// Inserts source, scope, and directory into `readResource` responses.
fn text_with_location(text: String, uri: &str, skill: &SkillRecord) -> ResourceContents {
    let mut meta = Meta::new();
    meta.insert("source".into(), json!(skill.source().label()));
    meta.insert("scope".into(), json!(skill.scope().as_str()));
    meta.insert(
        "directory".into(),
        json!(skill.directory_path.display().to_string()),
    );
    ResourceContents::TextResourceContents {
        uri: uri.into(),
        mime_type: Some("text/markdown".into()),
        text,
        meta: Some(meta),
    }
}

/// Reads a skill's manifest text.
pub(crate) fn read_skill_text(skill: &SkillRecord) -> Result<String> {
    fs::read_to_string(&skill.manifest_path)
        .with_context(|| format!("failed to read {}", skill.manifest_path.display()))
}

impl SkillService {
    /// Wraps an already bootstrapped registry.
    pub fn new(registry: SkillRegistry) -> Self {
        Self { registry }
    }

    /// The registry this service reads from.
    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    /// One resource per resolved skill, in precedence order.
    pub(crate) fn list_resources_payload(&self) -> Vec<Resource> {
        let snapshot = self.registry.snapshot();
        snapshot
            .skills()
            .map(|s| {
                let mut raw = RawResource::new(skill_uri(&s.name), s.name.clone());
                raw.description = Some(match &s.description {
                    Some(desc) => format!("{desc} [{}]", s.source()),
                    None => format!("Skill from {}", s.source()),
                });
                raw.mime_type = Some("text/markdown".to_string());
                Resource::new(raw, None)
            })
            .collect()
    }

    /// Read a resource by its URI and return its content.
    ///
    /// Returns `Ok(None)` when the URI names no current skill.
    pub(crate) fn read_resource_sync(&self, uri: &str) -> Result<Option<ReadResourceResult>> {
        let name = uri
            .strip_prefix(SKILL_URI_PREFIX)
            .ok_or_else(|| anyhow!("unsupported uri {uri}"))?;
        let Some(skill) = self.registry.get_skill(name) else {
            return Ok(None);
        };
        let text = read_skill_text(&skill)?;
        Ok(Some(ReadResourceResult {
            contents: vec![text_with_location(text, uri, &skill)],
        }))
    }
}

/// The main entry point for the `universal-skills` application.
pub fn run() -> Result<()> {
    // stdout carries MCP frames; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    apply_config_to_env();
    let cli = Cli::parse();

    match cli.command {
        None => handle_serve_command(cli.serve),
        Some(Commands::Serve(args)) => handle_serve_command(args),
        Some(Commands::List { skill_dirs, json }) => handle_list_command(skill_dirs, json),
        Some(Commands::Install(args)) => handle_install_command(args),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;
    use universal_skills_discovery::{
        LocationEntry, LocationScope, LocationTable, SkillResolver, SkillSource,
    };

    pub(crate) fn write_skill(root: &Path, dir: &str, manifest: &str) {
        let skill_dir = root.join(dir);
        fs::create_dir_all(&skill_dir).unwrap();
        fs::write(skill_dir.join("SKILL.md"), manifest).unwrap();
    }

    /// A service over two locations: `first` (project) then `second` (global).
    pub(crate) fn service_over(first: &Path, second: &Path) -> SkillService {
        let table = LocationTable::new(vec![
            LocationEntry::new(
                first.to_string_lossy(),
                SkillSource::ProjectUniversal,
                LocationScope::Project,
            ),
            LocationEntry::new(
                second.to_string_lossy(),
                SkillSource::GlobalClaude,
                LocationScope::Global,
            ),
        ])
        .unwrap();
        SkillService::new(SkillRegistry::bootstrap(SkillResolver::new(table)).unwrap())
    }

    #[test]
    fn resources_follow_precedence_order() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        write_skill(&first, "zeta", "---\ndescription: Last letter\n---\n");
        write_skill(&second, "alpha", "# alpha");
        let service = service_over(&first, &second);

        let resources = service.list_resources_payload();
        let uris: Vec<_> = resources.iter().map(|r| r.raw.uri.as_str()).collect();
        assert_eq!(uris, vec!["skill://zeta", "skill://alpha"]);
        assert_eq!(
            resources[0].raw.description.as_deref(),
            Some("Last letter [project-universal]")
        );
        assert_eq!(resources[1].raw.mime_type.as_deref(), Some("text/markdown"));
    }

    #[test]
    fn read_resource_includes_location_meta() {
        /*
        GIVEN `writer` in both locations
        WHEN reading skill://writer
        THEN the project copy's text is returned with its source and directory in _meta
        */
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        write_skill(&first, "writer", "---\nname: writer\n---\nproject copy");
        write_skill(&second, "writer", "---\nname: writer\n---\nglobal copy");
        let service = service_over(&first, &second);

        let result = service.read_resource_sync("skill://writer").unwrap().unwrap();
        let ResourceContents::TextResourceContents { text, meta, .. } = &result.contents[0] else {
            panic!("expected text contents");
        };
        assert!(text.ends_with("project copy"));
        let meta = meta.as_ref().unwrap();
        assert_eq!(meta.get("source"), Some(&json!("project-universal")));
        assert_eq!(meta.get("scope"), Some(&json!("project")));
        assert_eq!(
            meta.get("directory"),
            Some(&json!(first.join("writer").display().to_string()))
        );
    }

    #[test]
    fn read_resource_unknown_or_foreign_uri() {
        let tmp = tempfile::tempdir().unwrap();
        let service = service_over(&tmp.path().join("a"), &tmp.path().join("b"));
        assert!(service.read_resource_sync("skill://missing").unwrap().is_none());
        assert!(service.read_resource_sync("doc://agents").is_err());
    }

    #[test]
    fn summary_flattens_record() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        write_skill(&first, "doc", "---\ndescription: Docs\n---\n");
        let service = service_over(&first, &tmp.path().join("none"));
        let record = service.registry().get_skill("doc").unwrap();
        let summary = SkillSummary::from(&record);
        assert_eq!(summary.source, "project-universal");
        assert_eq!(summary.scope, "project");
        assert_eq!(summary.description.as_deref(), Some("Docs"));
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["name"], json!("doc"));
    }
}
