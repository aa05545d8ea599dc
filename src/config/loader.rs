//! Configuration loading and discovery for `tilechip.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{ColorsConfig, ProjectConfig, SpritesConfig, TilechipConfig};
use crate::color::Color;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = "tilechip.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse tilechip.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override the mask color
    pub mask_color: Option<Color>,
    /// Replace the existing palette
    pub palette: Option<Vec<Color>>,
    /// Force unique (`true`) or positional (`false`) sprite commits
    pub unique: Option<bool>,
}

/// Find tilechip.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for tilechip.toml
/// 2. Check XDG_CONFIG_HOME/tilechip/tilechip.toml (or ~/.config/tilechip/tilechip.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find tilechip.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("tilechip").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find tilechip.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a tilechip.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns a default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<TilechipConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<TilechipConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: TilechipConfig = toml::from_str(&contents)?;
    ensure_valid(&config)?;
    Ok(config)
}

/// Turn validation failures into a [`ConfigError::Validation`].
pub fn ensure_valid(config: &TilechipConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Create a default configuration when no tilechip.toml is found.
///
/// The project name is the current directory name.
pub fn default_config() -> TilechipConfig {
    let project_name = env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unnamed".to_string());

    TilechipConfig {
        project: ProjectConfig { name: project_name, out: PathBuf::from("build") },
        colors: ColorsConfig::default(),
        sprites: SpritesConfig::default(),
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut TilechipConfig, overrides: &CliOverrides) {
    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }

    if let Some(mask) = overrides.mask_color {
        config.colors.mask_color = mask;
    }

    if let Some(ref palette) = overrides.palette {
        config.colors.palette = palette.clone();
    }

    if let Some(unique) = overrides.unique {
        config.sprites.unique = unique;
    }
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &[u8]) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents)
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[project]\nname = \"test\"");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"[project]\nname = \"test\"");

        let subdir = temp.path().join("art").join("sprites");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, None);
    }

    #[test]
    #[serial]
    fn test_find_xdg_config() {
        let temp = TempDir::new().expect("should create temp dir");
        let app_dir = temp.path().join("tilechip");
        fs::create_dir_all(&app_dir).expect("should create config dir");
        let config_path = write_config(&app_dir, b"[project]\nname = \"global\"");

        let previous = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", temp.path());
        let found = find_xdg_config();
        match previous {
            Some(v) => env::set_var("XDG_CONFIG_HOME", v),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(found, Some(config_path));
    }

    #[test]
    #[serial]
    fn test_load_config_discovers_from_cwd() {
        let temp = TempDir::new().expect("should create temp dir");
        write_config(temp.path(), b"[project]\nname = \"walked\"\n[sprites]\nwidth = 16");
        let nested = temp.path().join("levels");
        fs::create_dir_all(&nested).expect("should create subdirectory");

        let original_dir = env::current_dir().expect("should read cwd");
        env::set_current_dir(&nested).expect("should change cwd");
        let result = load_config(None);
        env::set_current_dir(original_dir).expect("should restore cwd");

        let config = result.expect("should load discovered config");
        assert_eq!(config.project.name, "walked");
        assert_eq!(config.sprites.width, 16);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            br##"
[project]
name = "test-project"

[colors]
max_colors = 4
palette = ["#000000", "#FFFFFF"]

[sprites]
width = 4
height = 4
texture_width = 16
texture_height = 16
"##,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.project.name, "test-project");
        assert_eq!(config.colors.palette.len(), 2);
        assert_eq!(config.build_chips().sprite_chip.total_sprites(), 16);
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join("nonexistent.toml");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), b"this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            br#"
[project]
name = ""

[sprites]
width = 0
"#,
        );

        let result = load_config(Some(&config_path));
        match result {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config() {
        let config = default_config();
        assert!(!config.project.name.is_empty());
        assert_eq!(config.project.out, PathBuf::from("build"));
        assert!(config.is_valid());
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = default_config();
        let overrides = CliOverrides {
            out: Some(PathBuf::from("dist")),
            mask_color: Some(Color::new(0, 0, 0)),
            palette: Some(vec![Color::new(1, 2, 3)]),
            unique: Some(false),
        };

        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.project.out, PathBuf::from("dist"));
        assert_eq!(config.colors.mask_color, Color::new(0, 0, 0));
        assert_eq!(config.colors.palette, vec![Color::new(1, 2, 3)]);
        assert!(!config.sprites.unique);
    }

    #[test]
    fn test_merge_empty_overrides_is_noop() {
        let mut config = default_config();
        let before = format!("{:?}", config);
        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert_eq!(format!("{:?}", config), before);
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/project");
        assert_eq!(resolve_path(root, Path::new("/other/path")), PathBuf::from("/other/path"));
        assert_eq!(resolve_path(root, Path::new("build")), PathBuf::from("/project/build"));
    }
}
