use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::model::Config;

pub const CONFIG_FILE: &str = "multifield.toml";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read a config file
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the config named on the command line, else `multifield.toml` in
/// the working directory, else the defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_config_from(explicit, &cwd)
}

/// [`load_config`] with the fallback lookup rooted at `dir`
pub fn load_config_from(explicit: Option<&Path>, dir: &Path) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let local = dir.join(CONFIG_FILE);
    if local.is_file() {
        debug!(path = %local.display(), "using local config");
        return read_config(&local);
    }
    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_local_config_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_from(None, tmp.path()).unwrap();
        assert!(config.editor.validate);
        assert!(config.labels.is_empty());
    }

    #[test]
    fn local_config_is_picked_up() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[editor]\nvalidate = false\n\n[ui]\nshow_key_hints = false\n",
        )
        .unwrap();
        let config = load_config_from(None, tmp.path()).unwrap();
        assert!(!config.editor.validate);
        assert!(!config.ui.show_key_hints);
    }

    #[test]
    fn explicit_path_must_exist() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        let err = load_config_from(Some(&missing), tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[editor\n").unwrap();
        let err = load_config_from(Some(&path), tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
