//! The resolution engine: a strict left fold over the location table into an
//! insert-if-absent map.
//!
//! Locations may be scanned in parallel, but the merge always walks the scans in
//! table order, so concurrency never changes which location wins a name.

use indexmap::map::Entry;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use time::OffsetDateTime;

use crate::error::Result;
use crate::manifest::{read_manifest, SKILL_FILENAME};
use crate::scanner::{expand_location_path, scan_location, PathContext};
use crate::types::{DuplicateInfo, LocationEntry, LocationTable, SkillRecord};

const SLOW_SCAN_MS: u128 = 250;

/// An immutable snapshot of resolved skills.
///
/// Iteration order is location precedence order, then name within a location.
#[derive(Debug, Clone)]
pub struct ResolvedTable {
    skills: IndexMap<String, SkillRecord>,
    duplicates: Vec<DuplicateInfo>,
    resolved_at: OffsetDateTime,
}

impl ResolvedTable {
    /// Looks up a skill by exact, case-sensitive name.
    pub fn get(&self, name: &str) -> Option<&SkillRecord> {
        self.skills.get(name)
    }

    /// Skills in precedence order.
    pub fn skills(&self) -> impl ExactSizeIterator<Item = &SkillRecord> + '_ {
        self.skills.values()
    }

    /// Skill names in precedence order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.skills.keys().map(String::as_str)
    }

    /// Number of resolved skills.
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// True when no location supplied any skill.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Skills dropped because a higher-precedence location supplied the same name.
    pub fn duplicates(&self) -> &[DuplicateInfo] {
        &self.duplicates
    }

    /// When the scan that produced this table completed (UTC).
    pub fn resolved_at(&self) -> OffsetDateTime {
        self.resolved_at
    }
}

/// Walks a [`LocationTable`] and produces [`ResolvedTable`]s.
#[derive(Debug, Clone)]
pub struct SkillResolver {
    table: LocationTable,
    project_root: Option<PathBuf>,
    context: Option<PathContext>,
}

impl SkillResolver {
    /// Creates a resolver over `table`. Relative locations resolve against the
    /// working directory at scan time.
    pub fn new(table: LocationTable) -> Self {
        Self {
            table,
            project_root: None,
            context: None,
        }
    }

    /// Expands locations against `ctx` instead of reading the process's home and
    /// working directories on every pass.
    pub fn with_path_context(mut self, ctx: PathContext) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Resolves relative locations against `root` instead of the working directory.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    /// The configured location table.
    pub fn table(&self) -> &LocationTable {
        &self.table
    }

    /// Scans every location and merges the results, first match wins.
    ///
    /// Per-location and per-candidate failures are logged and contribute nothing.
    /// Only a broken location table is returned as an error.
    pub fn resolve(&self) -> Result<ResolvedTable> {
        self.table.validate()?;
        let started = Instant::now();

        let mut ctx = self.context.clone().unwrap_or_else(PathContext::current);
        if let Some(root) = &self.project_root {
            ctx.project_root = Some(root.clone());
        }

        let scans: Vec<Vec<SkillRecord>> = self
            .table
            .entries()
            .par_iter()
            .map(|entry| scan_entry(entry, &ctx))
            .collect();

        let mut skills: IndexMap<String, SkillRecord> = IndexMap::new();
        let mut duplicates = Vec::new();
        for record in scans.into_iter().flatten() {
            match skills.entry(record.name.clone()) {
                Entry::Occupied(kept) => {
                    let kept = kept.get();
                    tracing::debug!(
                        target: "universal_skills::resolve",
                        name = %record.name,
                        kept_source = %kept.location.source,
                        skipped_source = %record.location.source,
                        skipped_dir = %record.directory_path.display(),
                        "name collision; keeping higher-precedence skill"
                    );
                    duplicates.push(DuplicateInfo {
                        name: record.name.clone(),
                        skipped_source: record.location.source.label(),
                        skipped_dir: record.directory_path.clone(),
                        kept_source: kept.location.source.label(),
                        kept_dir: kept.directory_path.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }

        let elapsed_ms = started.elapsed().as_millis();
        if elapsed_ms > SLOW_SCAN_MS {
            tracing::info!(
                target: "universal_skills::scan",
                elapsed_ms,
                locations = self.table.len(),
                skills = skills.len(),
                duplicates = duplicates.len(),
                "skill resolution completed"
            );
        } else {
            tracing::debug!(
                target: "universal_skills::scan",
                elapsed_ms,
                locations = self.table.len(),
                skills = skills.len(),
                duplicates = duplicates.len(),
                "skill resolution completed"
            );
        }

        Ok(ResolvedTable {
            skills,
            duplicates,
            resolved_at: OffsetDateTime::now_utc(),
        })
    }
}

/// Scans one location into records ordered by (name, directory).
fn scan_entry(entry: &LocationEntry, ctx: &PathContext) -> Vec<SkillRecord> {
    let root = match expand_location_path(&entry.path, ctx) {
        Ok(root) => root,
        Err(err) => {
            tracing::info!(target: "universal_skills::scan", source = %entry.source, error = %err, "skipping location");
            return Vec::new();
        }
    };

    let candidates = match scan_location(&root).collect::<Result<Vec<_>>>() {
        Ok(candidates) => candidates,
        Err(err) => {
            tracing::info!(target: "universal_skills::scan", source = %entry.source, error = %err, "skipping location");
            return Vec::new();
        }
    };

    let mut records: Vec<SkillRecord> = candidates
        .into_iter()
        .filter_map(|dir| build_record(dir, entry))
        .collect();
    records.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.directory_path.cmp(&b.directory_path))
    });
    records
}

fn build_record(dir: PathBuf, entry: &LocationEntry) -> Option<SkillRecord> {
    let manifest_path = dir.join(SKILL_FILENAME);
    let fields = match read_manifest(&manifest_path) {
        Ok(fields) => fields,
        Err(err) => {
            tracing::debug!(target: "universal_skills::scan", error = %err, "skipping candidate");
            return None;
        }
    };
    let name = match fields.name.filter(|n| !n.trim().is_empty()) {
        Some(name) => name,
        None => dir_name(&dir)?,
    };
    Some(SkillRecord {
        name,
        description: fields.description,
        directory_path: dir,
        manifest_path,
        location: entry.clone(),
    })
}

fn dir_name(dir: &Path) -> Option<String> {
    dir.file_name().map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LocationScope, SkillSource};
    use std::fs;
    use tempfile::tempdir;

    fn write_skill(root: &Path, dir: &str, manifest: &str) -> PathBuf {
        let skill_dir = root.join(dir);
        fs::create_dir_all(&skill_dir).unwrap();
        fs::write(skill_dir.join(SKILL_FILENAME), manifest).unwrap();
        skill_dir
    }

    fn entry(path: &Path, source: SkillSource) -> LocationEntry {
        LocationEntry::new(path.to_string_lossy(), source, LocationScope::Project)
    }

    #[test]
    fn higher_precedence_location_wins() {
        /*
        GIVEN the same skill name in two locations
        WHEN resolving
        THEN the earlier location's record is kept and the other is logged as a duplicate
        */
        let tmp = tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        let kept = write_skill(&first, "writer", "---\nname: writer\n---\n");
        write_skill(&second, "writer", "---\nname: writer\n---\n");

        let table = LocationTable::new(vec![
            entry(&first, SkillSource::ProjectUniversal),
            entry(&second, SkillSource::GlobalClaude),
        ])
        .unwrap();
        let resolved = SkillResolver::new(table).resolve().unwrap();

        let skill = resolved.get("writer").unwrap();
        assert_eq!(skill.source(), &SkillSource::ProjectUniversal);
        assert_eq!(skill.directory_path, kept);
        assert_eq!(resolved.duplicates().len(), 1);
        assert_eq!(resolved.duplicates()[0].kept_source, "project-universal");
        assert_eq!(resolved.duplicates()[0].skipped_source, "global-claude");
    }

    #[test]
    fn front_matter_name_overrides_directory_name() {
        let tmp = tempdir().unwrap();
        write_skill(tmp.path(), "bar", "---\nname: \"foo\"\n---\n");
        let table =
            LocationTable::new(vec![entry(tmp.path(), SkillSource::GlobalUniversal)]).unwrap();
        let resolved = SkillResolver::new(table).resolve().unwrap();
        assert!(resolved.get("foo").is_some());
        assert!(resolved.get("bar").is_none());
    }

    #[test]
    fn missing_or_blank_name_falls_back_to_directory() {
        let tmp = tempdir().unwrap();
        write_skill(tmp.path(), "plain", "# no front-matter");
        write_skill(tmp.path(), "blank", "---\nname: \"  \"\n---\n");
        write_skill(tmp.path(), "numeric", "---\nname: 7\n---\n");
        let table =
            LocationTable::new(vec![entry(tmp.path(), SkillSource::GlobalUniversal)]).unwrap();
        let resolved = SkillResolver::new(table).resolve().unwrap();
        let names: Vec<_> = resolved.names().collect();
        assert_eq!(names, vec!["blank", "numeric", "plain"]);
    }

    #[test]
    fn description_is_carried_through() {
        let tmp = tempdir().unwrap();
        write_skill(
            tmp.path(),
            "doc",
            "---\nname: doc\ndescription: Writes docs\n---\n",
        );
        let table =
            LocationTable::new(vec![entry(tmp.path(), SkillSource::GlobalUniversal)]).unwrap();
        let resolved = SkillResolver::new(table).resolve().unwrap();
        let skill = resolved.get("doc").unwrap();
        assert_eq!(skill.description.as_deref(), Some("Writes docs"));
        assert_eq!(skill.manifest_path, tmp.path().join("doc").join(SKILL_FILENAME));
    }

    #[test]
    fn order_is_location_then_name() {
        let tmp = tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        write_skill(&first, "zeta", "");
        write_skill(&first, "alpha", "");
        write_skill(&second, "beta", "");
        write_skill(&second, "aardvark", "");
        let table = LocationTable::new(vec![
            entry(&first, SkillSource::ProjectUniversal),
            entry(&second, SkillSource::ProjectClaude),
        ])
        .unwrap();
        let resolved = SkillResolver::new(table).resolve().unwrap();
        let names: Vec<_> = resolved.names().collect();
        assert_eq!(names, vec!["alpha", "zeta", "aardvark", "beta"]);
    }

    #[test]
    fn same_name_within_one_location_is_deterministic() {
        let tmp = tempdir().unwrap();
        write_skill(tmp.path(), "b-dir", "---\nname: shared\n---\n");
        write_skill(tmp.path(), "a-dir", "---\nname: shared\n---\n");
        let table =
            LocationTable::new(vec![entry(tmp.path(), SkillSource::GlobalClaude)]).unwrap();
        let resolver = SkillResolver::new(table);
        for _ in 0..3 {
            let resolved = resolver.resolve().unwrap();
            assert_eq!(
                resolved.get("shared").unwrap().directory_path,
                tmp.path().join("a-dir")
            );
        }
    }

    #[test]
    fn relative_locations_use_project_root() {
        let tmp = tempdir().unwrap();
        write_skill(&tmp.path().join(".agent/skills"), "writer", "");
        let table = LocationTable::new(vec![LocationEntry::new(
            "./.agent/skills",
            SkillSource::ProjectUniversal,
            LocationScope::Project,
        )])
        .unwrap();
        let resolved = SkillResolver::new(table)
            .with_project_root(tmp.path())
            .resolve()
            .unwrap();
        let skill = resolved.get("writer").unwrap();
        assert!(skill.directory_path.ends_with(".agent/skills/writer"));
        assert!(skill.directory_path.is_absolute());
    }

    #[test]
    fn unavailable_location_does_not_block_later_ones() {
        /*
        GIVEN a home-relative location with no home directory, followed by a readable one
        WHEN resolving
        THEN the first location contributes nothing and the second still supplies its skills
        */
        let tmp = tempdir().unwrap();
        let global = tmp.path().join("global");
        write_skill(&global, "writer", "---\nname: writer\n---\n");
        let table = LocationTable::new(vec![
            LocationEntry::new("~/.agent/skills", SkillSource::GlobalUniversal, LocationScope::Global),
            entry(&global, SkillSource::GlobalClaude),
        ])
        .unwrap();

        let resolved = SkillResolver::new(table)
            .with_path_context(PathContext {
                home: None,
                project_root: Some(tmp.path().to_path_buf()),
            })
            .resolve()
            .unwrap();

        let names: Vec<_> = resolved.names().collect();
        assert_eq!(names, vec!["writer"]);
        assert_eq!(resolved.get("writer").unwrap().source(), &SkillSource::GlobalClaude);
        assert!(resolved.duplicates().is_empty());
    }
}
