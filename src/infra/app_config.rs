use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    SystemDefault,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "Light"),
            Self::Dark => write!(f, "Dark"),
            Self::SystemDefault => write!(f, "System Default"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system default" | "system" => Ok(Self::SystemDefault),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Tab shown when the app starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartTab {
    #[default]
    List,
    Discover,
    Settings,
}

impl fmt::Display for StartTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "List"),
            Self::Discover => write!(f, "Discover"),
            Self::Settings => write!(f, "Settings"),
        }
    }
}

impl FromStr for StartTab {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "list" => Ok(Self::List),
            "discover" => Ok(Self::Discover),
            "settings" => Ok(Self::Settings),
            other => Err(format!("unknown tab: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub theme: Theme,
    /// Derive colours from the wallpaper where the platform supports it.
    pub dynamic_color: bool,
    pub start_tab: StartTab,
    /// List selected when the list view opens; `None` shows every list.
    pub default_list: Option<String>,
}

pub fn load_config() -> AppConfig {
    load_config_from(&config_path())
}

/// Missing or unreadable files fall back to the defaults.
pub fn load_config_from(path: &Path) -> AppConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return AppConfig::default();
    };
    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("Ignoring malformed config at {}: {}", path.display(), err);
            AppConfig::default()
        }
    }
}

pub fn save_config(config: &AppConfig) -> anyhow::Result<()> {
    save_config_to(&config_path(), config)
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("SHOWTRACK_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    app_data_dir().join("config.toml")
}

pub fn app_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("SHOWTRACK_DATA_HOME") {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("Showtrack");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("Showtrack");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("showtrack");
        }
        if let Some(home) = home::home_dir() {
            return home.join(".local").join("share").join("showtrack");
        }
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".showtrack")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("config.toml");

        let config = AppConfig {
            theme: Theme::Dark,
            dynamic_color: true,
            start_tab: StartTab::Discover,
            default_list: Some("Watching".into()),
        };
        save_config_to(&path, &config)?;

        assert_eq!(load_config_from(&path), config);
        Ok(())
    }

    #[test]
    fn test_missing_or_malformed_config_uses_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing.toml");
        assert_eq!(load_config_from(&missing), AppConfig::default());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "theme = [")?;
        assert_eq!(load_config_from(&broken), AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_partial_config_fills_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "start_tab = \"settings\"\n")?;

        let config = load_config_from(&path);
        assert_eq!(config.start_tab, StartTab::Settings);
        assert_eq!(config.theme, Theme::Light);
        assert!(!config.dynamic_color);
        Ok(())
    }

    #[test]
    fn test_theme_and_tab_parse() {
        assert_eq!(Theme::from_str("system-default").unwrap(), Theme::SystemDefault);
        assert_eq!(Theme::SystemDefault.to_string(), "System Default");
        assert_eq!(StartTab::from_str("Discover").unwrap(), StartTab::Discover);
        assert!(StartTab::from_str("home").is_err());
    }
}
