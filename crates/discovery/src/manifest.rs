//! Reads the front-matter of a `SKILL.md` manifest.
//!
//! Only `name` and `description` are extracted. Unknown keys are ignored, and a
//! missing or malformed front-matter block is not an error: it simply yields no name.

use serde_yaml::Value;
use std::fs;
use std::path::Path;

use crate::error::{DiscoveryError, Result};

/// File name that marks a directory as a skill.
pub const SKILL_FILENAME: &str = "SKILL.md";

const DELIMITER: &str = "---";

/// Fields the engine cares about from a manifest's front-matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestFields {
    /// Declared skill name, present only when the YAML value is a string.
    pub name: Option<String>,
    /// Declared description, present only when the YAML value is a string.
    pub description: Option<String>,
}

/// Reads and parses a manifest file.
///
/// Fails only when the file cannot be read. Front-matter that does not parse is
/// logged and treated as absent.
pub fn read_manifest(path: &Path) -> Result<ManifestFields> {
    let content = fs::read_to_string(path).map_err(|source| DiscoveryError::ManifestUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    match parse_manifest(&content) {
        Ok(fields) => Ok(fields),
        Err(message) => {
            let err = DiscoveryError::ManifestUnparseable {
                path: path.to_path_buf(),
                message,
            };
            tracing::debug!(target: "universal_skills::scan", error = %err, "ignoring front-matter");
            Ok(ManifestFields::default())
        }
    }
}

/// Parses manifest text.
///
/// Returns empty fields when there is no front-matter block, and `Err` with the
/// parser message when the block is not valid YAML.
pub fn parse_manifest(content: &str) -> std::result::Result<ManifestFields, String> {
    let Some(yaml) = split_front_matter(content) else {
        return Ok(ManifestFields::default());
    };
    let value: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    Ok(ManifestFields {
        name: string_field(&value, "name"),
        description: string_field(&value, "description"),
    })
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Returns the YAML between the opening and closing `---` lines, if both exist.
fn split_front_matter(content: &str) -> Option<&str> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();
    let rest = trimmed.strip_prefix(DELIMITER)?;
    let (first_line, body) = rest.split_once('\n').unwrap_or((rest, ""));
    if !first_line.trim().is_empty() {
        // `---foo` or `----` is not an opening delimiter.
        return None;
    }

    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return Some(&body[..offset]);
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn extracts_name_and_description() {
        let content = "---\nname: writer\ndescription: Drafts prose\nextra: [1, 2]\n---\n# Writer\n";
        let fields = parse_manifest(content).unwrap();
        assert_eq!(fields.name.as_deref(), Some("writer"));
        assert_eq!(fields.description.as_deref(), Some("Drafts prose"));
    }

    #[test]
    fn no_front_matter_yields_no_name() {
        let fields = parse_manifest("# Just markdown\n\nname: not-front-matter\n").unwrap();
        assert_eq!(fields, ManifestFields::default());
    }

    #[test]
    fn non_string_name_is_ignored() {
        for content in [
            "---\nname: 42\n---\n",
            "---\nname: [a, b]\n---\n",
            "---\nname:\n  nested: true\n---\n",
            "---\ndescription: only\n---\n",
        ] {
            let fields = parse_manifest(content).unwrap();
            assert!(fields.name.is_none(), "expected no name for {content:?}");
        }
    }

    #[test]
    fn quoted_name_is_a_string() {
        let fields = parse_manifest("---\nname: \"foo\"\n---\nbody").unwrap();
        assert_eq!(fields.name.as_deref(), Some("foo"));
    }

    #[test]
    fn unclosed_front_matter_is_treated_as_absent() {
        let fields = parse_manifest("---\nname: dangling\n\nBody without closing line").unwrap();
        assert!(fields.name.is_none());
    }

    #[test]
    fn invalid_yaml_reports_error() {
        let err = parse_manifest("---\nname: [unterminated\n---\n").unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn crlf_and_leading_whitespace_are_accepted() {
        let fields = parse_manifest("\u{feff}\r\n---\r\nname: crlf\r\n---\r\nbody").unwrap();
        assert_eq!(fields.name.as_deref(), Some("crlf"));
    }

    #[test]
    fn empty_block_has_no_fields() {
        let fields = parse_manifest("---\n---\nbody").unwrap();
        assert_eq!(fields, ManifestFields::default());
    }

    #[test]
    fn read_manifest_swallows_parse_errors() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(SKILL_FILENAME);
        fs::write(&path, "---\nname: [broken\n---\n").unwrap();
        let fields = read_manifest(&path).unwrap();
        assert!(fields.name.is_none());
    }

    #[test]
    fn read_manifest_reports_missing_file() {
        let tmp = tempdir().unwrap();
        let err = read_manifest(&tmp.path().join(SKILL_FILENAME)).unwrap_err();
        assert!(matches!(err, DiscoveryError::ManifestUnreadable { .. }));
    }
}
