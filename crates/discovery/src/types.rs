use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{DiscoveryError, Result};

/// Identifies which search location a skill was found in.
///
/// Used for precedence and diagnostics only; never for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum SkillSource {
    /// Project-local universal skills (`./.agent/skills`).
    ProjectUniversal,
    /// Project-local Claude skills (`./.claude/skills`).
    ProjectClaude,
    /// User-level universal skills (`~/.agent/skills`).
    GlobalUniversal,
    /// User-level Claude skills (`~/.claude/skills`).
    GlobalClaude,
    /// Extra user-specified directories (indexed).
    Extra(u32),
}

impl SkillSource {
    /// Returns a stable label for this source.
    pub fn label(&self) -> String {
        match self {
            SkillSource::ProjectUniversal => "project-universal".into(),
            SkillSource::ProjectClaude => "project-claude".into(),
            SkillSource::GlobalUniversal => "global-universal".into(),
            SkillSource::GlobalClaude => "global-claude".into(),
            SkillSource::Extra(n) => format!("extra{n}"),
        }
    }
}

impl fmt::Display for SkillSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Whether a location belongs to the current project or to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationScope {
    /// Relative to the working directory of the process.
    Project,
    /// Under the user's home directory.
    Global,
}

impl LocationScope {
    /// Returns a stable label for this scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationScope::Project => "project",
            LocationScope::Global => "global",
        }
    }
}

/// One configured search location.
///
/// `path` is kept unexpanded (it may start with `~`) so the table stays portable;
/// expansion happens on every resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationEntry {
    /// Directory path, possibly containing a home-directory placeholder.
    pub path: String,
    /// Source tag reported on skills found here.
    pub source: SkillSource,
    /// Project or global.
    pub scope: LocationScope,
}

impl LocationEntry {
    /// Convenience constructor.
    pub fn new(path: impl Into<String>, source: SkillSource, scope: LocationScope) -> Self {
        Self {
            path: path.into(),
            source,
            scope,
        }
    }
}

/// Ordered list of search locations. Earlier entries win on name collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTable {
    entries: Vec<LocationEntry>,
}

impl LocationTable {
    /// Builds a table, rejecting empty tables and blank paths.
    pub fn new(entries: Vec<LocationEntry>) -> Result<Self> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    /// The four standard locations, project before global, universal before Claude.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                LocationEntry::new(
                    "./.agent/skills",
                    SkillSource::ProjectUniversal,
                    LocationScope::Project,
                ),
                LocationEntry::new(
                    "./.claude/skills",
                    SkillSource::ProjectClaude,
                    LocationScope::Project,
                ),
                LocationEntry::new(
                    "~/.agent/skills",
                    SkillSource::GlobalUniversal,
                    LocationScope::Global,
                ),
                LocationEntry::new(
                    "~/.claude/skills",
                    SkillSource::GlobalClaude,
                    LocationScope::Global,
                ),
            ],
        }
    }

    /// Appends user-supplied directories after the existing entries, tagged `Extra(i)`.
    pub fn with_extra_dirs(mut self, extra: &[PathBuf]) -> Self {
        for (idx, dir) in extra.iter().enumerate() {
            self.entries.push(LocationEntry::new(
                dir.to_string_lossy().into_owned(),
                SkillSource::Extra(idx as u32),
                LocationScope::Project,
            ));
        }
        self
    }

    /// Entries in precedence order.
    pub fn entries(&self) -> &[LocationEntry] {
        &self.entries
    }

    /// Number of configured locations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a validated table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(DiscoveryError::Configuration(
                "location table has no entries".into(),
            ));
        }
        if let Some(pos) = self.entries.iter().position(|e| e.path.trim().is_empty()) {
            return Err(DiscoveryError::Configuration(format!(
                "location #{} ({}) has an empty path",
                pos + 1,
                self.entries[pos].source
            )));
        }
        Ok(())
    }
}

impl Default for LocationTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// One resolved skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// Unique key: front-matter `name`, or the directory base name.
    pub name: String,
    /// Optional front-matter `description`.
    pub description: Option<String>,
    /// Absolute path of the skill's root directory.
    pub directory_path: PathBuf,
    /// Absolute path of its `SKILL.md`.
    pub manifest_path: PathBuf,
    /// The location this skill was found under.
    pub location: LocationEntry,
}

impl SkillRecord {
    /// Source tag of the location that supplied this skill.
    pub fn source(&self) -> &SkillSource {
        &self.location.source
    }

    /// Scope of the location that supplied this skill.
    pub fn scope(&self) -> LocationScope {
        self.location.scope
    }
}

/// A skill that was dropped because a higher-precedence location already supplied its name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateInfo {
    /// The skill name that was duplicated.
    pub name: String,
    /// Source label of the skipped skill.
    pub skipped_source: String,
    /// Directory of the skipped skill.
    pub skipped_dir: PathBuf,
    /// Source label of the kept skill.
    pub kept_source: String,
    /// Directory of the kept skill.
    pub kept_dir: PathBuf,
}
