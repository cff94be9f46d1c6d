//! Command-line interface for the `universal-skills` application.
//!
//! This crate is the executable's entry point; everything else lives in
//! `universal-skills-server`.

fn main() -> anyhow::Result<()> {
    universal_skills_server::run()
}
