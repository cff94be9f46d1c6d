//! Discovers `SKILL.md` packages across a layered set of search locations.
//!
//! This crate provides:
//! - Reading the `name`/`description` front-matter of a manifest.
//! - The ordered location table (project before global, universal before Claude).
//! - A non-recursive scanner for candidate skill directories.
//! - The resolution engine, which merges locations with first-match-wins precedence
//!   into an immutable [`ResolvedTable`].
//!
//! # Examples
//!
//! ```
//! use universal_skills_discovery::{
//!     LocationEntry, LocationScope, LocationTable, SkillResolver, SkillSource,
//! };
//! use tempfile::tempdir;
//!
//! let temp = tempdir().unwrap();
//! let skill_dir = temp.path().join("alpha");
//! std::fs::create_dir_all(&skill_dir).unwrap();
//! std::fs::write(skill_dir.join("SKILL.md"), "---\nname: alpha\n---\n# Alpha").unwrap();
//!
//! let table = LocationTable::new(vec![LocationEntry::new(
//!     temp.path().to_string_lossy(),
//!     SkillSource::GlobalUniversal,
//!     LocationScope::Global,
//! )])
//! .unwrap();
//!
//! let resolved = SkillResolver::new(table).resolve().unwrap();
//! assert_eq!(resolved.len(), 1);
//! assert!(resolved.get("alpha").is_some());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error taxonomy for discovery.
pub mod error;
/// Front-matter parsing for `SKILL.md`.
pub mod manifest;
/// Resolution engine and resolved snapshots.
pub mod resolver;
/// Directory scanning and location path expansion.
pub mod scanner;
/// Sources, locations and skill records.
pub mod types;

pub use error::{DiscoveryError, Result};
pub use manifest::{parse_manifest, read_manifest, ManifestFields, SKILL_FILENAME};
pub use resolver::{ResolvedTable, SkillResolver};
pub use scanner::{expand_location_path, is_skill_dir, scan_location, PathContext, SkillCandidates};
pub use types::{
    DuplicateInfo, LocationEntry, LocationScope, LocationTable, SkillRecord, SkillSource,
};
