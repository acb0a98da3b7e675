//! Where newtab's files live, and reading and writing the config file.
//!
//! The config file is searched next to the working directory first
//! (`newtab.json5`, `newtab.json`), then in the user config directory
//! (`<config_dir>/newtab/config.json5`, `config.json`). Both formats are
//! read with the JSON5 parser. Runtime data (the widget store and the log
//! file) lives under [`user_data_dir`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, Result};

/// Directory name under the platform config and data directories.
const APP_DIR: &str = "newtab";

const LOCAL_FILE_NAMES: [&str; 2] = ["newtab.json5", "newtab.json"];

const USER_FILE_NAMES: [&str; 2] = ["config.json5", "config.json"];

/// Lists the config file locations, highest priority first.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use newtab_config::persistence::config_candidates;
///
/// let candidates = config_candidates(Path::new("."), Some(Path::new("/etc/xdg")));
/// assert_eq!(candidates[0], PathBuf::from("./newtab.json5"));
/// assert_eq!(candidates[3], PathBuf::from("/etc/xdg/newtab/config.json"));
/// ```
#[must_use]
pub fn config_candidates(local_dir: &Path, config_dir: Option<&Path>) -> Vec<PathBuf> {
    let local = LOCAL_FILE_NAMES.iter().map(|name| local_dir.join(name));
    let user = config_dir
        .map(|dir| dir.join(APP_DIR))
        .into_iter()
        .flat_map(|dir| USER_FILE_NAMES.iter().map(move |name| dir.join(name)));
    local.chain(user).collect()
}

/// Returns the first existing config file, if any.
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    let config_dir = dirs::config_dir();
    config_candidates(Path::new("."), config_dir.as_deref())
        .into_iter()
        .find(|path| path.is_file())
}

/// Returns the directory holding the widget store and the log file,
/// typically `~/.local/share/newtab/` on Linux.
///
/// # Errors
///
/// Returns [`ConfigError::NoDataDirectory`] if the platform has no data
/// directory.
pub fn user_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(ConfigError::NoDataDirectory)
}

/// Reads a JSON or JSON5 file.
///
/// # Errors
///
/// Returns [`ConfigError::ReadFile`] if the file cannot be read and
/// [`ConfigError::ParseJson5`] if it does not parse into `T`.
pub fn read_config_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json5::from_str(&content)?)
}

/// Writes `value` as pretty JSON, creating missing parent directories.
///
/// JSON is valid JSON5, so the file reads back with [`read_config_file`].
///
/// # Errors
///
/// Returns [`ConfigError::WriteFile`] if the directory or the file cannot
/// be written.
pub fn write_config_file<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    };

    let content = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, content).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use newtab_protocol::WidgetKind;
    use tempfile::TempDir;

    #[test]
    fn candidates_prefer_local_files() {
        let candidates = config_candidates(Path::new("/work"), Some(Path::new("/home/u/.config")));
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/work/newtab.json5"),
                PathBuf::from("/work/newtab.json"),
                PathBuf::from("/home/u/.config/newtab/config.json5"),
                PathBuf::from("/home/u/.config/newtab/config.json"),
            ]
        );
    }

    #[test]
    fn candidates_without_config_dir() {
        assert_eq!(config_candidates(Path::new("."), None).len(), 2);
    }

    #[test]
    fn reads_plain_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("newtab.json");
        std::fs::write(&path, r#"{"widgets": ["mail"]}"#).unwrap();

        let config: Config = read_config_file(&path).unwrap();
        assert_eq!(config.widgets, vec![WidgetKind::Mail]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_config_file::<Config>("/nonexistent/newtab.json5").unwrap_err();
        match err {
            ConfigError::ReadFile { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/newtab.json5"));
            }
            other => panic!("expected ReadFile, got {other:?}"),
        }
    }

    #[test]
    fn unknown_widget_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("newtab.json5");
        std::fs::write(&path, "{ widgets: ['weather', 'stocks'] }").unwrap();

        let result: Result<Config> = read_config_file(&path);
        assert!(matches!(result, Err(ConfigError::ParseJson5(_))));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("config.json");

        write_config_file(&path, &Config::default()).unwrap();
        let loaded: Config = read_config_file(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn data_dir_is_app_specific() {
        if dirs::data_dir().is_some() {
            assert!(user_data_dir().unwrap().ends_with(APP_DIR));
        }
    }
}
