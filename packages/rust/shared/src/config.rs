//! Application configuration for mindscribe.
//!
//! User config lives at `~/.mindscribe/mindscribe.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MindscribeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "mindscribe.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".mindscribe";

/// Literal line that opens a mind-map outline.
pub const DEFAULT_START_MARKER: &str = "@startmindmap";

/// Literal line that closes a mind-map outline.
pub const DEFAULT_END_MARKER: &str = "@endmindmap";

/// File name offered for the generated mind map.
pub const DEFAULT_FILE_NAME: &str = "mindmap.mm";

/// MIME type of a Freemind document.
pub const FREEMIND_MIME_TYPE: &str = "application/x-freemind";

// ---------------------------------------------------------------------------
// Config structs (matching mindscribe.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Outline notation settings.
    #[serde(default)]
    pub outline: OutlineConfig,

    /// Mind-map document settings.
    #[serde(default)]
    pub mindmap: MindMapConfig,
}

/// `[outline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineConfig {
    /// Line that opens an outline block.
    #[serde(default = "default_start_marker")]
    pub start_marker: String,

    /// Line that closes an outline block.
    #[serde(default = "default_end_marker")]
    pub end_marker: String,

    /// Character whose leading run encodes the heading level.
    #[serde(default = "default_marker")]
    pub marker: char,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            start_marker: default_start_marker(),
            end_marker: default_end_marker(),
            marker: default_marker(),
        }
    }
}

fn default_start_marker() -> String {
    DEFAULT_START_MARKER.into()
}
fn default_end_marker() -> String {
    DEFAULT_END_MARKER.into()
}
fn default_marker() -> char {
    '+'
}

/// `[mindmap]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindMapConfig {
    /// `TEXT` of the root `<node>` standing in for the synthetic root.
    #[serde(default = "default_root_text")]
    pub root_text: String,

    /// File name for the written document.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// MIME type reported for the written document.
    #[serde(default = "default_mime_type")]
    pub mime_type: String,

    /// Value of the `version` attribute on `<map>`.
    #[serde(default = "default_map_version")]
    pub map_version: String,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        Self {
            root_text: default_root_text(),
            file_name: default_file_name(),
            mime_type: default_mime_type(),
            map_version: default_map_version(),
        }
    }
}

fn default_root_text() -> String {
    "Root".into()
}
fn default_file_name() -> String {
    DEFAULT_FILE_NAME.into()
}
fn default_mime_type() -> String {
    FREEMIND_MIME_TYPE.into()
}
fn default_map_version() -> String {
    "1.0.1".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.mindscribe/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MindscribeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.mindscribe/mindscribe.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MindscribeError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        MindscribeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| MindscribeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config)
        .map_err(|e| MindscribeError::Serialization(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| MindscribeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject settings the outline parser cannot work with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let outline = &config.outline;
    if outline.marker.is_whitespace() {
        return Err(MindscribeError::config(
            "outline.marker must not be a whitespace character",
        ));
    }
    if outline.start_marker.trim().is_empty() || outline.end_marker.trim().is_empty() {
        return Err(MindscribeError::config(
            "outline.start_marker and outline.end_marker must not be blank",
        ));
    }
    if outline.start_marker.starts_with(outline.marker)
        || outline.end_marker.starts_with(outline.marker)
    {
        return Err(MindscribeError::config(format!(
            "outline markers must not begin with the level marker '{}'",
            outline.marker
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("@startmindmap"));
        assert!(toml_str.contains("application/x-freemind"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.outline.marker, '+');
        assert_eq!(parsed.mindmap.file_name, "mindmap.mm");
        assert_eq!(parsed.mindmap.map_version, "1.0.1");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[mindmap]
root_text = "Ideas"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.mindmap.root_text, "Ideas");
        assert_eq!(config.mindmap.mime_type, FREEMIND_MIME_TYPE);
        assert_eq!(config.outline.end_marker, DEFAULT_END_MARKER);
    }

    #[test]
    fn whitespace_marker_rejected() {
        let mut config = AppConfig::default();
        config.outline.marker = ' ';
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn marker_prefixed_start_token_rejected() {
        let mut config = AppConfig::default();
        config.outline.start_marker = "+begin".into();
        assert!(validate_config(&config).is_err());
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/mindscribe.toml")).unwrap_err();
        assert!(matches!(err, MindscribeError::Io { .. }));
    }
}
