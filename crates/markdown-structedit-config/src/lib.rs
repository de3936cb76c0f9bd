use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// One level of indentation, written as `"tab"` or a space count in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndentUnitRepr", into = "IndentUnitRepr")]
pub enum IndentUnit {
    Tab,
    Spaces(usize),
}

impl IndentUnit {
    pub fn is_tab(&self) -> bool {
        matches!(self, IndentUnit::Tab)
    }
}

impl Default for IndentUnit {
    fn default() -> Self {
        IndentUnit::Spaces(4)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum IndentUnitRepr {
    Width(usize),
    Name(String),
}

impl TryFrom<IndentUnitRepr> for IndentUnit {
    type Error = String;

    fn try_from(repr: IndentUnitRepr) -> Result<Self, Self::Error> {
        match repr {
            IndentUnitRepr::Width(0) => Err("indent_unit must be at least one space".to_string()),
            IndentUnitRepr::Width(n) => Ok(IndentUnit::Spaces(n)),
            IndentUnitRepr::Name(name) if name.eq_ignore_ascii_case("tab") => Ok(IndentUnit::Tab),
            IndentUnitRepr::Name(name) => Err(format!(
                "indent_unit must be \"tab\" or a number of spaces, got {name:?}"
            )),
        }
    }
}

impl From<IndentUnit> for IndentUnitRepr {
    fn from(unit: IndentUnit) -> Self {
        match unit {
            IndentUnit::Tab => IndentUnitRepr::Name("tab".to_string()),
            IndentUnit::Spaces(n) => IndentUnitRepr::Width(n),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreak {
    #[default]
    Lf,
    CrLf,
}

impl LineBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineBreak::Lf => "\n",
            LineBreak::CrLf => "\r\n",
        }
    }
}

/// What `format_content` does to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub insert_final_newline: bool,
    pub trim_trailing_whitespace: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            insert_final_newline: true,
            trim_trailing_whitespace: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub indent_unit: IndentUnit,
    /// Columns a tab advances to when measuring indentation
    pub tab_size: usize,
    pub line_break: LineBreak,
    pub format: FormatConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_unit: IndentUnit::default(),
            tab_size: 4,
            line_break: LineBreak::default(),
            format: FormatConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorConfig,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-structedit");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/markdown-structedit/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let editor = EditorConfig::default();
        assert_eq!(editor.indent_unit, IndentUnit::Spaces(4));
        assert_eq!(editor.tab_size, 4);
        assert_eq!(editor.line_break.as_str(), "\n");
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_editor_section() {
        let config: Config = toml::from_str(
            r#"
[editor]
indent_unit = "tab"
line_break = "crlf"
"#,
        )
        .unwrap();

        assert_eq!(config.editor.indent_unit, IndentUnit::Tab);
        assert_eq!(config.editor.line_break, LineBreak::CrLf);
        assert_eq!(config.editor.tab_size, 4);
        assert!(config.editor.format.insert_final_newline);
    }

    #[test]
    fn test_indent_unit_as_space_count() {
        let config: Config = toml::from_str("[editor]\nindent_unit = 2\n").unwrap();
        assert_eq!(config.editor.indent_unit, IndentUnit::Spaces(2));
        assert!(!config.editor.indent_unit.is_tab());
    }

    #[test]
    fn test_invalid_indent_unit_is_rejected() {
        assert!(toml::from_str::<Config>("[editor]\nindent_unit = \"tabs please\"\n").is_err());
        assert!(toml::from_str::<Config>("[editor]\nindent_unit = 0\n").is_err());
    }

    #[test]
    fn test_format_section() {
        let config: Config =
            toml::from_str("[editor.format]\ntrim_trailing_whitespace = false\n").unwrap();
        assert_eq!(
            config.editor.format,
            FormatConfig {
                insert_final_newline: true,
                trim_trailing_whitespace: false,
            }
        );
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            editor: EditorConfig {
                indent_unit: IndentUnit::Tab,
                tab_size: 8,
                line_break: LineBreak::CrLf,
                format: FormatConfig {
                    insert_final_newline: false,
                    trim_trailing_whitespace: true,
                },
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_reports_parse_errors_with_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[editor\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            editor: EditorConfig {
                indent_unit: IndentUnit::Spaces(2),
                ..EditorConfig::default()
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        assert!(config_file.exists(), "Config file should exist");

        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded_config, test_config);
    }
}
