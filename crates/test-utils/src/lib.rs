//! Shared test utilities for universal-skills crates.
//!
//! Provides process-global serialization for tests that touch `HOME` or other
//! environment variables, and a temporary skill tree laid out like a real
//! project plus home directory.

use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = universal_skills_test_utils::set_env_var("MY_VAR", Some("value"));
/// assert_eq!(std::env::var("MY_VAR").unwrap(), "value");
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// A temporary project directory and home directory with the standard skill roots.
///
/// Both tempdirs are cleaned up when the fixture is dropped.
pub struct SkillTree {
    project: tempfile::TempDir,
    home: tempfile::TempDir,
}

impl SkillTree {
    /// Creates empty project and home directories. No skill roots exist yet.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            project: tempfile::tempdir()?,
            home: tempfile::tempdir()?,
        })
    }

    /// The directory standing in for the working directory.
    pub fn project_root(&self) -> &Path {
        self.project.path()
    }

    /// The directory standing in for `$HOME`.
    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Create an RAII guard that sets HOME to this fixture's home directory.
    pub fn home_guard(&self) -> EnvVarGuard {
        set_env_var("HOME", Some(&self.home().to_string_lossy()))
    }

    /// `./.agent/skills` under the project root.
    pub fn project_universal(&self) -> PathBuf {
        self.project_root().join(".agent/skills")
    }

    /// `./.claude/skills` under the project root.
    pub fn project_claude(&self) -> PathBuf {
        self.project_root().join(".claude/skills")
    }

    /// `~/.agent/skills` under the fake home.
    pub fn global_universal(&self) -> PathBuf {
        self.home().join(".agent/skills")
    }

    /// `~/.claude/skills` under the fake home.
    pub fn global_claude(&self) -> PathBuf {
        self.home().join(".claude/skills")
    }

    /// Writes `<root>/<dir>/SKILL.md` with raw content and returns the skill directory.
    pub fn write_skill(&self, root: &Path, dir: &str, content: &str) -> std::io::Result<PathBuf> {
        let skill_dir = root.join(dir);
        std::fs::create_dir_all(&skill_dir)?;
        std::fs::write(skill_dir.join("SKILL.md"), content)?;
        Ok(skill_dir)
    }

    /// Writes a skill whose front-matter declares `name` and `description`.
    pub fn write_named_skill(
        &self,
        root: &Path,
        dir: &str,
        name: &str,
        description: &str,
    ) -> std::io::Result<PathBuf> {
        let content = format!("---\nname: {name}\ndescription: {description}\n---\n# {name}\n");
        self.write_skill(root, dir, &content)
    }
}
