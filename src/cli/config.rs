//! TOML configuration file support.
//!
//! ```toml
//! # glp2report.toml
//! [paths]
//! common_dir = "/srv/glp2"
//! data_dir = "export"
//! definition_dir = "programs"
//!
//! [data]
//! decimal_separator = ","
//! encoding = "utf-16le"
//!
//! [definitions]
//! encoding = "utf-16le"
//!
//! [data.columns]
//! graph_payload = 80
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use glp2report::records::{ColumnMap, DataFileOptions, TextEncoding};

/// Config file looked up when none is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "glp2report.toml";

/// Root configuration structure for glp2report.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Input directories.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Data export decoding.
    #[serde(default)]
    pub data: DataConfig,

    /// Test definition decoding.
    #[serde(default)]
    pub definitions: DefinitionConfig,
}

/// Where data exports and test definitions live.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory both subdirectories are relative to.
    pub common_dir: PathBuf,

    /// Directory with `*.csv` data exports.
    pub data_dir: PathBuf,

    /// Directory with `*.TPR` test definitions.
    pub definition_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            common_dir: PathBuf::from("."),
            data_dir: PathBuf::from("data"),
            definition_dir: PathBuf::from("definitions"),
        }
    }
}

/// Settings for decoding data exports.
#[derive(Debug, Default, Deserialize)]
pub struct DataConfig {
    /// Decimal separator of numeric fields (`.` or `,`).
    pub decimal_separator: Option<char>,

    /// Encoding of exports without a byte-order mark.
    #[serde(default)]
    pub encoding: TextEncoding,

    /// Column layout overrides.
    #[serde(default)]
    pub columns: ColumnMap,
}

/// Settings for decoding test definitions.
#[derive(Debug, Default, Deserialize)]
pub struct DefinitionConfig {
    /// Encoding of definitions without a byte-order mark.
    #[serde(default)]
    pub encoding: TextEncoding,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML configuration")?;
        if let Some(sep) = config.data.decimal_separator {
            if sep != '.' && sep != ',' {
                bail!("Unsupported decimal separator '{}'", sep);
            }
        }
        Ok(config)
    }

    /// Load the named file, or the default file if present, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Data directory, with an optional prefix in front of the common directory.
    pub fn data_path(&self, prefix: Option<&Path>) -> PathBuf {
        self.resolve(prefix, &self.paths.data_dir)
    }

    /// Definition directory, with an optional prefix in front of the common directory.
    pub fn definition_path(&self, prefix: Option<&Path>) -> PathBuf {
        self.resolve(prefix, &self.paths.definition_dir)
    }

    fn resolve(&self, prefix: Option<&Path>, dir: &Path) -> PathBuf {
        let base = match prefix {
            Some(prefix) => prefix.join(&self.paths.common_dir),
            None => self.paths.common_dir.clone(),
        };
        base.join(dir)
    }

    /// Decoding options for data exports.
    pub fn data_file_options(&self) -> DataFileOptions {
        DataFileOptions {
            decimal_separator: self.data.decimal_separator.unwrap_or('.'),
            columns: self.data.columns.clone(),
            encoding: self.data.encoding,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [paths]
            common_dir = "/srv/glp2"
            data_dir = "export"
            definition_dir = "programs"

            [data]
            decimal_separator = ","

            [data.columns]
            graph_payload = 80
            comment = 21
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.data_path(None), PathBuf::from("/srv/glp2/export"));
        assert_eq!(config.definition_path(None), PathBuf::from("/srv/glp2/programs"));

        let options = config.data_file_options();
        assert_eq!(options.decimal_separator, ',');
        assert_eq!(options.columns.graph_payload, 80);
        assert_eq!(options.columns.comment, 21);
        assert_eq!(options.columns.run_id, 0);
    }

    #[test]
    fn test_dir_prefix() {
        let config = Config::from_str("[paths]\ncommon_dir = \"line3\"\n").unwrap();
        assert_eq!(
            config.data_path(Some(Path::new("SN1234"))),
            PathBuf::from("SN1234/line3/data")
        );
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.data.decimal_separator, None);
        assert_eq!(config.data_file_options(), DataFileOptions::default());
    }

    #[test]
    fn test_encodings() {
        let config = Config::from_str(
            "[data]\nencoding = \"utf-16\"\n\n[definitions]\nencoding = \"utf-8\"\n",
        )
        .unwrap();
        assert_eq!(config.data_file_options().encoding, TextEncoding::Utf16Le);
        assert_eq!(config.definitions.encoding, TextEncoding::Utf8);

        let config = Config::from_str("").unwrap();
        assert_eq!(config.definitions.encoding, TextEncoding::Auto);
        assert!(Config::from_str("[data]\nencoding = \"latin1\"\n").is_err());
    }

    #[test]
    fn test_rejects_odd_decimal_separator() {
        assert!(Config::from_str("[data]\ndecimal_separator = \";\"\n").is_err());
    }
}
