//! Handler for the `install` command.

use crate::cli::InstallArgs;
use crate::install::{
    install_skill, render_summary, GitFetcher, InquirePrompter, InstallOutcome, InstallRequest,
};
use anyhow::Result;

/// Handle the `install` command.
pub(crate) fn handle_install_command(args: InstallArgs) -> Result<()> {
    let request = InstallRequest {
        repo: args.repo,
        repo_dir: args.repo_dir,
        local_dir: args.local_dir,
        force: args.force,
    };
    match install_skill(&request, &GitFetcher, &mut InquirePrompter)? {
        InstallOutcome::Installed { name, target } => {
            println!("{}", render_summary(&name, &target));
        }
        InstallOutcome::Cancelled { .. } => println!("Installation cancelled"),
    }
    Ok(())
}
