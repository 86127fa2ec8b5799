//! Project-wide configuration records stored in the database directory.
//!
//! Loaded once when a project is opened. A missing file is created with
//! defaults; an unreadable one falls back to defaults with a warning so a
//! single bad settings file never blocks access to the scenes.

use crate::error::{Error, Result};
use crate::naming::DEFAULT_SUB_PROJECT;
use crate::paths::ProjectLayout;
use crate::storage::RecordStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const PROJECT_SETTINGS_FILE: &str = "projectSettings.json";
pub const PLAYBLAST_SETTINGS_FILE: &str = "pbSettings.json";
pub const USERS_FILE: &str = "users.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const SUB_PROJECTS_FILE: &str = "subPAssets.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectSettings {
    pub resolution: [u32; 2],
    #[serde(rename = "FPS")]
    pub fps: u32,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            resolution: [1920, 1080],
            fps: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayblastSettings {
    pub resolution: [u32; 2],
    pub percent: u32,
    pub show_frame_number: bool,
    pub show_grid: bool,
    pub polygon_only: bool,
    pub wire_on_shaded: bool,
    pub clear_selection: bool,
}

impl Default for PlayblastSettings {
    fn default() -> Self {
        Self {
            resolution: [1280, 720],
            percent: 100,
            show_frame_number: true,
            show_grid: false,
            polygon_only: true,
            wire_on_shaded: false,
            clear_selection: true,
        }
    }
}

/// Known users: display name → initials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRegistry(pub BTreeMap<String, String>);

impl Default for UserRegistry {
    fn default() -> Self {
        Self(BTreeMap::from([("Generic".to_string(), "gn".to_string())]))
    }
}

impl UserRegistry {
    /// Initials of `user`; unknown users sign with their name as given.
    pub fn initials_of(&self, user: &str) -> String {
        self.0
            .get(user)
            .cloned()
            .unwrap_or_else(|| user.to_string())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRegistry(pub Vec<String>);

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self(
            ["Model", "Animation", "Rig", "Shading", "Layout", "Render", "Other"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

impl CategoryRegistry {
    pub fn contains(&self, category: &str) -> bool {
        self.0.iter().any(|c| c == category)
    }
}

/// Sub-projects; the first entry is always the default `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubProjectRegistry(pub Vec<String>);

impl Default for SubProjectRegistry {
    fn default() -> Self {
        Self(vec![DEFAULT_SUB_PROJECT.to_string()])
    }
}

impl SubProjectRegistry {
    pub fn contains(&self, sub_project: &str) -> bool {
        sub_project == DEFAULT_SUB_PROJECT || self.0.iter().any(|s| s == sub_project)
    }
}

/// All project-wide records, as loaded at project-open time.
#[derive(Debug, Clone, Default)]
pub struct ProjectRegistries {
    pub project: ProjectSettings,
    pub playblast: PlayblastSettings,
    pub users: UserRegistry,
    pub categories: CategoryRegistry,
    pub sub_projects: SubProjectRegistry,
}

impl ProjectRegistries {
    pub fn load(layout: &ProjectLayout) -> Result<Self> {
        let mut sub_projects: SubProjectRegistry = load_or_init(layout, SUB_PROJECTS_FILE)?;
        if sub_projects.0.first().map(|s| s.as_str()) != Some(DEFAULT_SUB_PROJECT) {
            sub_projects.0.retain(|s| s != DEFAULT_SUB_PROJECT);
            sub_projects.0.insert(0, DEFAULT_SUB_PROJECT.to_string());
        }
        Ok(Self {
            project: load_or_init(layout, PROJECT_SETTINGS_FILE)?,
            playblast: load_or_init(layout, PLAYBLAST_SETTINGS_FILE)?,
            users: load_or_init(layout, USERS_FILE)?,
            categories: load_or_init(layout, CATEGORIES_FILE)?,
            sub_projects,
        })
    }
}

fn load_or_init<T>(layout: &ProjectLayout, file_name: &str) -> Result<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let path = layout.settings_path(file_name);
    match RecordStore::load_optional::<T>(&path) {
        Ok(Some(record)) => Ok(record),
        Ok(None) => {
            debug!("Creating default {}", path.display());
            let record = T::default();
            RecordStore::save(&path, &record)?;
            Ok(record)
        }
        Err(e @ Error::CorruptDatabase { .. }) => {
            warn!("{}; using defaults", e);
            Ok(T::default())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use std::fs;

    #[test]
    fn test_missing_files_are_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(&AppConfig::for_project(dir.path()));
        let registries = ProjectRegistries::load(&layout).unwrap();
        assert!(registries.categories.contains("Rig"));
        assert_eq!(registries.sub_projects.0, vec!["None".to_string()]);
        assert!(layout.settings_path(CATEGORIES_FILE).is_file());
        assert!(layout.settings_path(USERS_FILE).is_file());
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(&AppConfig::for_project(dir.path()));
        fs::create_dir_all(layout.database_root()).unwrap();
        fs::write(layout.settings_path(USERS_FILE), "not json").unwrap();
        let registries = ProjectRegistries::load(&layout).unwrap();
        assert_eq!(registries.users, UserRegistry::default());
    }

    #[test]
    fn test_default_sub_project_is_forced_first() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(&AppConfig::for_project(dir.path()));
        RecordStore::save(
            &layout.settings_path(SUB_PROJECTS_FILE),
            &vec!["Episode01".to_string(), "None".to_string()],
        )
        .unwrap();
        let registries = ProjectRegistries::load(&layout).unwrap();
        assert_eq!(
            registries.sub_projects.0,
            vec!["None".to_string(), "Episode01".to_string()]
        );
    }

    #[test]
    fn test_initials_lookup() {
        let users = UserRegistry(BTreeMap::from([("John Doe".to_string(), "jd".to_string())]));
        assert_eq!(users.initials_of("John Doe"), "jd");
        assert_eq!(users.initials_of("guest"), "guest");
    }
}
