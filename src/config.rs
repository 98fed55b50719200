//! Transform options (csssprite.yaml).
//!
//! Options can be loaded from a YAML file and then overridden from the
//! command line.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpriteError};

/// The name of the options file looked up by the CLI.
pub const CONFIG_FILENAME: &str = "csssprite.yaml";

/// Options controlling where composites are written and how they are linked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteOptions {
    /// Directory prefix, relative to the build output, for emitted composites
    /// (e.g. `"img/"`). Concatenated as-is with the file name.
    pub output_path: String,

    /// Public URL prefix used in the rewritten CSS. Defaults to `output_path`.
    pub css_image_path: Option<String>,

    /// Reserved; not used when naming composites.
    pub name: Option<String>,

    /// Log a line for every stylesheet that produced sprite groups.
    pub debug: bool,
}

impl SpriteOptions {
    /// Load options from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SpriteError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read options: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse options from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str::<Option<Self>>(content)
            .map(Option::unwrap_or_default)
            .map_err(|e| SpriteError::Config {
                message: format!("Invalid options: {}", e),
                help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
            })
    }

    /// URL prefix written in front of composite file names.
    pub fn effective_css_image_path(&self) -> &str {
        self.css_image_path.as_deref().unwrap_or(&self.output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_options() {
        let yaml = r#"
output_path: img/
css_image_path: https://cdn.test/img/
name: icons
debug: true
"#;
        let options = SpriteOptions::parse(yaml).unwrap();

        assert_eq!(options.output_path, "img/");
        assert_eq!(options.css_image_path.as_deref(), Some("https://cdn.test/img/"));
        assert_eq!(options.name.as_deref(), Some("icons"));
        assert!(options.debug);
    }

    #[test]
    fn test_parse_empty_options() {
        let options = SpriteOptions::parse("").unwrap();
        assert_eq!(options, SpriteOptions::default());
    }

    #[test]
    fn test_parse_partial_options() {
        let options = SpriteOptions::parse("debug: true").unwrap();
        assert!(options.debug);
        assert!(options.output_path.is_empty());
    }

    #[test]
    fn test_parse_invalid_options() {
        let err = SpriteOptions::parse("debug: [").unwrap_err();
        assert!(matches!(err, SpriteError::Config { .. }));
    }

    #[test]
    fn test_effective_css_image_path() {
        let mut options = SpriteOptions {
            output_path: "img/".to_string(),
            ..Default::default()
        };
        assert_eq!(options.effective_css_image_path(), "img/");

        options.css_image_path = Some("/static/".to_string());
        assert_eq!(options.effective_css_image_path(), "/static/");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "output_path: sprites/").unwrap();

        let options = SpriteOptions::load(&path).unwrap();
        assert_eq!(options.output_path, "sprites/");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = SpriteOptions::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, SpriteError::Io { .. }));
    }
}
