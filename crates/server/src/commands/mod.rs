//! CLI command handlers for the universal-skills application.

mod install;
mod list;
mod serve;

pub(crate) use install::handle_install_command;
pub(crate) use list::handle_list_command;
pub(crate) use serve::handle_serve_command;

use std::path::PathBuf;
use universal_skills_discovery::{LocationTable, SkillResolver};

/// Standard locations followed by any user-supplied directories.
pub(crate) fn resolver_with_extra_dirs(skill_dirs: &[PathBuf]) -> SkillResolver {
    SkillResolver::new(LocationTable::standard().with_extra_dirs(skill_dirs))
}
