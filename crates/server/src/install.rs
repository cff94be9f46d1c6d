//! Installs a skill from a remote repository into a local skill location.
//!
//! The workflow fetches into a temporary checkout, locates `SKILL.md`, works out
//! the skill name and copies the tree into `<local_dir>/<name>`. Network access
//! and user interaction sit behind [`RepoFetcher`] and [`Prompter`].

use inquire::validator::Validation;
use inquire::{Confirm, Text};
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use thiserror::Error;
use universal_skills_discovery::{read_manifest, SKILL_FILENAME};
use walkdir::WalkDir;

/// Installation directory used when none is given.
pub const DEFAULT_INSTALL_DIR: &str = "~/.claude/skills";

/// Entries never copied into an installed skill.
const EXCLUDED: &[&str] = &[".git", ".gitignore"];

static REPO_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^https?://github\.com/[\w-]+/[\w-]+",
        r"^git@github\.com:[\w-]+/[\w-]+",
        r"^https?://gitlab\.com/[\w-]+/[\w-]+",
        r"^git@gitlab\.com:[\w-]+/[\w-]+",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

static SKILL_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[\w-]+$").ok());

/// Failures of the install workflow.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("invalid repository URL: {0}")]
    InvalidRepoUrl(String),
    #[error("git clone failed: {0}")]
    Fetch(String),
    #[error("subdirectory '{0}' not found in repository")]
    MissingSubdirectory(String),
    #[error("SKILL.md not found in {}", .0.display())]
    MissingManifest(PathBuf),
    #[error("invalid skill name '{0}': use letters, numbers, hyphens, and underscores")]
    InvalidName(String),
    #[error("prompt failed: {0}")]
    Prompt(String),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| InstallError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// What the caller already knows. `None` fields are prompted for.
#[derive(Debug, Clone, Default)]
pub struct InstallRequest {
    pub repo: Option<String>,
    pub repo_dir: Option<String>,
    pub local_dir: Option<String>,
    /// Replace an existing skill without confirmation.
    pub force: bool,
}

/// How an install ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { name: String, target: PathBuf },
    /// The user declined to replace an existing skill. Nothing changed.
    Cancelled { name: String, target: PathBuf },
}

/// Materializes a repository checkout in a local directory.
pub trait RepoFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), InstallError>;
}

/// Shallow `git clone`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFetcher;

impl RepoFetcher for GitFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), InstallError> {
        tracing::info!(target: "universal_skills::install", url, "cloning repository");
        let output = Command::new("git")
            .args(["clone", "--depth", "1", "--quiet", url])
            .arg(dest)
            .output()
            .map_err(|e| InstallError::Fetch(format!("could not run git: {e}")))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(InstallError::Fetch(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

/// Questions the workflow may need answered.
pub trait Prompter {
    /// A repository URL that passes [`is_valid_repo_url`].
    fn repo_url(&mut self) -> Result<String, InstallError>;
    /// Subdirectory within the repository; empty means the repository root.
    fn repo_dir(&mut self) -> Result<String, InstallError>;
    fn local_dir(&mut self, default: &str) -> Result<String, InstallError>;
    /// Asked only when the manifest does not declare a name.
    fn skill_name(&mut self) -> Result<String, InstallError>;
    fn confirm_overwrite(&mut self, name: &str, target: &Path) -> Result<bool, InstallError>;
}

/// Terminal prompts.
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

fn prompt_err(err: inquire::InquireError) -> InstallError {
    InstallError::Prompt(err.to_string())
}

impl Prompter for InquirePrompter {
    fn repo_url(&mut self) -> Result<String, InstallError> {
        Text::new("GitHub repository URL:")
            .with_validator(|value: &str| {
                Ok(if value.trim().is_empty() {
                    Validation::Invalid("Repository URL is required".into())
                } else if !is_valid_repo_url(value.trim()) {
                    Validation::Invalid(
                        "Please enter a valid GitHub or GitLab repository URL".into(),
                    )
                } else {
                    Validation::Valid
                })
            })
            .prompt()
            .map(|v| v.trim().to_string())
            .map_err(prompt_err)
    }

    fn repo_dir(&mut self) -> Result<String, InstallError> {
        Text::new("Repository subdirectory (optional, press Enter to skip):")
            .with_default("")
            .prompt()
            .map_err(prompt_err)
    }

    fn local_dir(&mut self, default: &str) -> Result<String, InstallError> {
        Text::new("Installation directory:")
            .with_default(default)
            .prompt()
            .map_err(prompt_err)
    }

    fn skill_name(&mut self) -> Result<String, InstallError> {
        println!("\nSkill name not found in {SKILL_FILENAME} front-matter");
        Text::new("Enter skill name:")
            .with_validator(|value: &str| {
                Ok(if value.is_empty() {
                    Validation::Invalid("Skill name is required".into())
                } else if !is_valid_skill_name(value) {
                    Validation::Invalid(
                        "Skill name can only contain letters, numbers, hyphens, and underscores"
                            .into(),
                    )
                } else {
                    Validation::Valid
                })
            })
            .prompt()
            .map_err(prompt_err)
    }

    fn confirm_overwrite(&mut self, name: &str, target: &Path) -> Result<bool, InstallError> {
        println!(
            "\nSkill '{name}' already exists at: {}",
            target.display()
        );
        Confirm::new("This will DELETE and replace it. Continue?")
            .with_default(false)
            .prompt()
            .map_err(prompt_err)
    }
}

/// True for GitHub/GitLab https or ssh repository URLs.
///
/// ```
/// use universal_skills_server::install::is_valid_repo_url;
///
/// assert!(is_valid_repo_url("https://github.com/acme/skills"));
/// assert!(is_valid_repo_url("git@gitlab.com:acme/skills.git"));
/// assert!(!is_valid_repo_url("https://example.com/acme/skills"));
/// ```
pub fn is_valid_repo_url(url: &str) -> bool {
    REPO_URL_PATTERNS.iter().any(|re| re.is_match(url))
}

/// True for names made of word characters and hyphens.
pub fn is_valid_skill_name(name: &str) -> bool {
    SKILL_NAME.as_ref().is_some_and(|re| re.is_match(name))
}

/// Runs the whole install workflow.
pub fn install_skill(
    request: &InstallRequest,
    fetcher: &dyn RepoFetcher,
    prompter: &mut dyn Prompter,
) -> Result<InstallOutcome, InstallError> {
    let repo_url = match request.repo.as_deref() {
        Some(url) if is_valid_repo_url(url) => url.to_string(),
        Some(url) => return Err(InstallError::InvalidRepoUrl(url.to_string())),
        None => prompter.repo_url()?,
    };

    let repo_dir = match &request.repo_dir {
        Some(dir) => dir.clone(),
        None => prompter.repo_dir()?,
    };
    let repo_dir = Some(repo_dir.trim().to_string()).filter(|d| !d.is_empty());

    let local_dir = match &request.local_dir {
        Some(dir) => dir.clone(),
        None => prompter.local_dir(DEFAULT_INSTALL_DIR)?,
    };
    let local_dir = PathBuf::from(shellexpand::tilde(local_dir.trim()).into_owned());
    fs::create_dir_all(&local_dir).map_err(InstallError::io(&local_dir))?;

    let checkout = tempfile::Builder::new()
        .prefix("skill-install-")
        .tempdir()
        .map_err(InstallError::io(&std::env::temp_dir()))?;
    fetcher.fetch(&repo_url, checkout.path())?;

    let source = match &repo_dir {
        Some(sub) => {
            let path = checkout.path().join(sub);
            if !is_relative_subpath(sub) || !path.is_dir() {
                return Err(InstallError::MissingSubdirectory(sub.clone()));
            }
            path
        }
        None => checkout.path().to_path_buf(),
    };

    let manifest = source.join(SKILL_FILENAME);
    if !manifest.is_file() {
        return Err(InstallError::MissingManifest(
            repo_dir.map(PathBuf::from).unwrap_or_else(|| ".".into()),
        ));
    }

    let declared = match read_manifest(&manifest) {
        Ok(fields) => fields.name.filter(|n| !n.trim().is_empty()),
        Err(err) => {
            tracing::warn!(target: "universal_skills::install", error = %err, "could not parse manifest");
            None
        }
    };
    let name = match declared {
        Some(name) if is_single_component(&name) => name,
        Some(name) => return Err(InstallError::InvalidName(name)),
        None => {
            let name = prompter.skill_name()?;
            if !is_valid_skill_name(&name) {
                return Err(InstallError::InvalidName(name));
            }
            name
        }
    };

    let target = local_dir.join(&name);
    if target.exists() || target.is_symlink() {
        if !request.force && !prompter.confirm_overwrite(&name, &target)? {
            return Ok(InstallOutcome::Cancelled { name, target });
        }
        remove_existing(&target)?;
    }

    copy_tree(&source, &target)?;
    tracing::info!(
        target: "universal_skills::install",
        name = %name,
        target = %target.display(),
        "skill installed"
    );
    Ok(InstallOutcome::Installed { name, target })
}

/// Recursively copies `src` into `dest`, skipping `.git` and `.gitignore` at any depth.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<(), InstallError> {
    fs::create_dir_all(dest).map_err(InstallError::io(dest))?;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !EXCLUDED.iter().any(|x| e.file_name() == *x));
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            InstallError::Io {
                path,
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
            }
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let out = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&out).map_err(InstallError::io(&out))?;
        } else {
            fs::copy(entry.path(), &out).map_err(InstallError::io(entry.path()))?;
        }
    }
    Ok(())
}

/// Human-readable report printed after a successful install.
pub fn render_summary(name: &str, target: &Path) -> String {
    let rule = "━".repeat(80);
    format!(
        "\n{rule}\n✓ Installation complete!\n\n  Installation location:\n    {}\n\n  Next steps:\n    1. Restart your MCP client, or wait for the next skill refresh\n    2. Use the '{name}' skill\n\n{rule}\n",
        target.display()
    )
}

fn remove_existing(target: &Path) -> Result<(), InstallError> {
    let result = if target.is_dir() && !target.is_symlink() {
        fs::remove_dir_all(target)
    } else {
        fs::remove_file(target)
    };
    result.map_err(InstallError::io(target))
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn is_relative_subpath(sub: &str) -> bool {
    Path::new(sub)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
