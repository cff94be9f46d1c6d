//! Core library for the `universal-skills` application: the MCP server, the
//! periodic skill refresh, the skill installer, and the command-line interface.
//!
//! The main entry point is [`run`], which parses the command line and dispatches.
//! [`SkillRegistry`] holds the published skill table and is usable on its own:
//!
//! ```no_run
//! use universal_skills_discovery::{LocationTable, SkillResolver};
//! use universal_skills_server::SkillRegistry;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SkillRegistry::bootstrap(SkillResolver::new(LocationTable::standard()))?;
//! for skill in registry.list_skills() {
//!     println!("{} ({})", skill.name, skill.source());
//! }
//! registry.refresh_now().await.map_err(|e| e.to_string())?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

mod app;
mod cli;
mod commands;
mod config;
mod handler;
pub mod install;
pub mod registry;
pub mod scheduler;
mod tool_schemas;

pub use app::{run, SkillService, SkillSummary};
pub use registry::{RefreshOutcome, SkillRegistry};
pub use scheduler::{RefreshHandle, RefreshScheduler, DEFAULT_REFRESH_INTERVAL_MS};
