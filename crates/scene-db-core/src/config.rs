use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub project_root: PathBuf,
    #[serde(default = "default_scenes_dir")]
    pub scenes_dir: String,
    #[serde(default = "default_database_dir")]
    pub database_dir: String,
    #[serde(default = "default_previews_dir")]
    pub previews_dir: String,
    /// Extension of the scene files written by the host, without the dot.
    #[serde(default = "default_scene_extension")]
    pub scene_extension: String,
    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,
    #[serde(default = "default_thumbnail_height")]
    pub thumbnail_height: u32,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub workstation: Option<String>,
}

fn default_scenes_dir() -> String {
    "scenes".to_string()
}

fn default_database_dir() -> String {
    "smDatabase".to_string()
}

fn default_previews_dir() -> String {
    "Playblasts".to_string()
}

fn default_scene_extension() -> String {
    "scene".to_string()
}

fn default_thumbnail_width() -> u32 {
    221
}

fn default_thumbnail_height() -> u32 {
    124
}

fn default_user() -> String {
    "Generic".to_string()
}

impl AppConfig {
    /// Minimal configuration for a project rooted at `project_root`.
    pub fn for_project(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            scenes_dir: default_scenes_dir(),
            database_dir: default_database_dir(),
            previews_dir: default_previews_dir(),
            scene_extension: default_scene_extension(),
            thumbnail_width: default_thumbnail_width(),
            thumbnail_height: default_thumbnail_height(),
            user: default_user(),
            workstation: None,
        }
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    pub fn with_workstation(mut self, workstation: &str) -> Self {
        self.workstation = Some(workstation.to_string());
        self
    }

    /// Machine name recorded on every saved version.
    pub fn workstation_name(&self) -> String {
        if let Some(name) = self.workstation.as_ref().filter(|n| !n.is_empty()) {
            return name.clone();
        }
        env::var("COMPUTERNAME")
            .or_else(|_| env::var("HOSTNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

/// Load `SceneDb.toml` (optional) overlaid with `SCENE_DB_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("SceneDb").required(false))
        .add_source(Environment::with_prefix("SCENE_DB"))
        .build()?;
    validated(builder.try_deserialize::<AppConfig>()?)
}

fn validated(config: AppConfig) -> Result<AppConfig, ConfigError> {
    if config.thumbnail_width == 0 || config.thumbnail_height == 0 {
        return Err(ConfigError::Message(format!(
            "thumbnail size must be positive, got {}x{}",
            config.thumbnail_width, config.thumbnail_height
        )));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_project_defaults() {
        let config = AppConfig::for_project("/projects/show");
        assert_eq!(config.scenes_dir, "scenes");
        assert_eq!(config.database_dir, "smDatabase");
        assert_eq!(config.thumbnail_width, 221);
        assert_eq!(config.thumbnail_height, 124);
    }

    #[test]
    fn test_explicit_workstation_wins() {
        let config = AppConfig::for_project("/p").with_workstation("ws-042");
        assert_eq!(config.workstation_name(), "ws-042");
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config = Config::builder()
            .set_override("project_root", "/projects/show")
            .unwrap()
            .set_override("scene_extension", "ma")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>()
            .unwrap();
        assert_eq!(config.project_root, PathBuf::from("/projects/show"));
        assert_eq!(config.scene_extension, "ma");
        assert_eq!(config.previews_dir, "Playblasts");
        assert_eq!(config.user, "Generic");
    }

    #[test]
    fn test_zero_thumbnail_size_is_rejected() {
        let config = Config::builder()
            .set_override("project_root", "/projects/show")
            .unwrap()
            .set_override("thumbnail_width", 0)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>()
            .unwrap();
        assert!(matches!(validated(config), Err(ConfigError::Message(_))));
        assert!(validated(AppConfig::for_project("/projects/show")).is_ok());
    }
}
