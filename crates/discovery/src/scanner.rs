use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{DiscoveryError, Result};
use crate::manifest::SKILL_FILENAME;

/// Filesystem anchors used to turn configured location paths into absolute ones.
///
/// Captured once per resolution pass so the table itself stays free of
/// machine-specific paths.
#[derive(Debug, Clone, Default)]
pub struct PathContext {
    /// Home directory used for `~` expansion.
    pub home: Option<PathBuf>,
    /// Base for relative (project-scoped) locations.
    pub project_root: Option<PathBuf>,
}

impl PathContext {
    /// Reads the current home and working directories.
    pub fn current() -> Self {
        Self {
            home: dirs::home_dir(),
            project_root: std::env::current_dir().ok(),
        }
    }
}

/// Expands `~` and makes a configured location path absolute.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use universal_skills_discovery::{expand_location_path, PathContext};
///
/// let ctx = PathContext {
///     home: Some(PathBuf::from("/home/ada")),
///     project_root: Some(PathBuf::from("/work/app")),
/// };
/// assert_eq!(
///     expand_location_path("~/.claude/skills", &ctx).unwrap(),
///     Path::new("/home/ada/.claude/skills")
/// );
/// assert_eq!(
///     expand_location_path("./.agent/skills", &ctx).unwrap(),
///     Path::new("/work/app/.agent/skills")
/// );
/// ```
pub fn expand_location_path(raw: &str, ctx: &PathContext) -> Result<PathBuf> {
    let unavailable = |message: &str| DiscoveryError::LocationUnavailable {
        path: raw.to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, message.to_string()),
    };

    let expanded: Cow<'_, str> = if raw == "~" || raw.starts_with("~/") {
        let home = ctx
            .home
            .as_deref()
            .ok_or_else(|| unavailable("home directory not found"))?;
        let home = home.to_string_lossy().into_owned();
        shellexpand::tilde_with_context(raw, move || Some(home))
    } else {
        Cow::Borrowed(raw)
    };

    let path = Path::new(expanded.as_ref());
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let base = ctx
            .project_root
            .as_deref()
            .ok_or_else(|| unavailable("working directory not available"))?;
        base.join(path)
    };
    // Drop interior `.` components so `./.agent/skills` reads naturally.
    Ok(absolute.components().collect())
}

/// Returns true when `dir` directly contains a `SKILL.md` file.
pub fn is_skill_dir(dir: &Path) -> bool {
    dir.join(SKILL_FILENAME).is_file()
}

/// Lazily lists the immediate subdirectories of `root` that contain a manifest.
///
/// A missing or non-directory root yields nothing. Failing to list the root
/// itself yields a single [`DiscoveryError::LocationUnavailable`] and stops;
/// unreadable individual entries are skipped.
pub fn scan_location(root: &Path) -> SkillCandidates {
    let inner = root.is_dir().then(|| {
        WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
    });
    SkillCandidates {
        root: root.to_path_buf(),
        inner,
    }
}

/// Iterator returned by [`scan_location`].
pub struct SkillCandidates {
    root: PathBuf,
    inner: Option<walkdir::IntoIter>,
}

impl Iterator for SkillCandidates {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let inner = self.inner.as_mut()?;
            match inner.next()? {
                Ok(entry) => {
                    if entry.file_type().is_dir() && is_skill_dir(entry.path()) {
                        return Some(Ok(entry.into_path()));
                    }
                }
                Err(err) if err.depth() == 0 || err.path() == Some(self.root.as_path()) => {
                    self.inner = None;
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("filesystem loop at location root"));
                    return Some(Err(DiscoveryError::LocationUnavailable {
                        path: self.root.display().to_string(),
                        source,
                    }));
                }
                Err(err) => {
                    tracing::trace!(
                        target: "universal_skills::scan",
                        root = %self.root.display(),
                        error = %err,
                        "skipping unreadable entry"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn ctx(home: &Path, project: &Path) -> PathContext {
        PathContext {
            home: Some(home.to_path_buf()),
            project_root: Some(project.to_path_buf()),
        }
    }

    #[test]
    fn scan_lists_only_dirs_with_manifest() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("alpha")).unwrap();
        fs::write(root.join("alpha/SKILL.md"), "# alpha").unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("nested/deeper/SKILL.md"), "# deep").unwrap();
        fs::write(root.join("SKILL.md"), "# root file is not a candidate").unwrap();
        fs::create_dir_all(root.join("lower")).unwrap();
        fs::write(root.join("lower/skill.md"), "# wrong case").unwrap();

        let found: Vec<_> = scan_location(root).collect::<Result<_>>().unwrap();
        assert_eq!(found, vec![root.join("alpha")]);
    }

    #[test]
    fn manifest_directory_is_not_a_manifest_file() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("odd/SKILL.md")).unwrap();
        assert_eq!(scan_location(tmp.path()).count(), 0);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let tmp = tempdir().unwrap();
        assert_eq!(scan_location(&tmp.path().join("absent")).count(), 0);
    }

    #[test]
    fn file_root_yields_nothing() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("plain");
        fs::write(&file, "x").unwrap();
        assert_eq!(scan_location(&file).count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_skill_dir_is_a_candidate() {
        let tmp = tempdir().unwrap();
        let real = tmp.path().join("real/linked");
        fs::create_dir_all(&real).unwrap();
        fs::write(real.join("SKILL.md"), "# linked").unwrap();
        let root = tmp.path().join("root");
        fs::create_dir_all(&root).unwrap();
        std::os::unix::fs::symlink(&real, root.join("linked")).unwrap();

        let found: Vec<_> = scan_location(&root).collect::<Result<_>>().unwrap();
        assert_eq!(found, vec![root.join("linked")]);
    }

    #[test]
    fn expand_tilde_uses_home() {
        let ctx = ctx(Path::new("/home/ada"), Path::new("/work"));
        assert_eq!(
            expand_location_path("~", &ctx).unwrap(),
            PathBuf::from("/home/ada")
        );
        assert_eq!(
            expand_location_path("~/.agent/skills", &ctx).unwrap(),
            PathBuf::from("/home/ada/.agent/skills")
        );
    }

    #[test]
    fn expand_relative_joins_project_root() {
        let ctx = ctx(Path::new("/home/ada"), Path::new("/work/app"));
        assert_eq!(
            expand_location_path("./.claude/skills", &ctx).unwrap(),
            PathBuf::from("/work/app/.claude/skills")
        );
        assert_eq!(
            expand_location_path("/abs/skills", &ctx).unwrap(),
            PathBuf::from("/abs/skills")
        );
    }

    #[test]
    fn expand_without_home_is_location_unavailable() {
        let ctx = PathContext {
            home: None,
            project_root: Some(PathBuf::from("/work")),
        };
        let err = expand_location_path("~/.claude/skills", &ctx).unwrap_err();
        assert!(matches!(err, DiscoveryError::LocationUnavailable { .. }));
        // A tilde that is not a home prefix is left alone.
        assert_eq!(
            expand_location_path("~other/skills", &ctx).unwrap(),
            PathBuf::from("/work/~other/skills")
        );
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_root_is_location_unavailable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let root = tmp.path().join("locked");
        fs::create_dir_all(root.join("alpha")).unwrap();
        fs::write(root.join("alpha/SKILL.md"), "# alpha").unwrap();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();

        let results: Vec<_> = scan_location(&root).collect();
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

        // Privileged users ignore the mode bits.
        if results.iter().any(|r| r.is_ok()) {
            return;
        }
        assert_eq!(results.len(), 1);
        assert!(matches!(
            results[0],
            Err(DiscoveryError::LocationUnavailable { .. })
        ));
    }
}
