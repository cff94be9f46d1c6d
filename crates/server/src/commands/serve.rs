//! Handler for the `serve` command.

use crate::app::SkillService;
use crate::cli::ServeArgs;
use crate::registry::SkillRegistry;
use crate::scheduler::RefreshScheduler;
use anyhow::{anyhow, Context, Result};
use rmcp::service::serve_server;
use std::time::Duration;
use tokio::runtime::Runtime;

use super::resolver_with_extra_dirs;

/// Handle the `serve` command.
pub(crate) fn handle_serve_command(args: ServeArgs) -> Result<()> {
    let resolver = resolver_with_extra_dirs(&args.skill_dirs);
    let registry =
        SkillRegistry::bootstrap(resolver).context("initial skill resolution failed")?;
    let period = Duration::from_millis(args.refresh_interval_ms);

    let rt = Runtime::new()?;
    rt.block_on(async move {
        let refresh = RefreshScheduler::spawn(registry.clone(), period);
        tracing::info!(
            target: "universal_skills::startup",
            refresh_interval_ms = args.refresh_interval_ms,
            extra_dirs = args.skill_dirs.len(),
            "serving skills over stdio"
        );

        let service = SkillService::new(registry);
        let running = serve_server(service, rmcp::transport::stdio())
            .await
            .map_err(|e| anyhow!("failed to start server: {e}"))?;
        let quit = running
            .waiting()
            .await
            .map_err(|e| anyhow!("server task ended: {e}"))?;
        tracing::debug!(target: "universal_skills::startup", reason = ?quit, "server stopped");

        refresh.shutdown();
        Ok(())
    })
}
