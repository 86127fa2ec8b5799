use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::naming;
use crate::paths::ProjectLayout;
use crate::reference::ReferenceManager;
use crate::reporter::RepositoryReporter;
use crate::repository::BaseSceneRepository;
use crate::settings::{ProjectRegistries, SUB_PROJECTS_FILE};
use crate::storage::RecordStore;
use crate::thumbnail::ThumbnailService;
use std::fs;
use tracing::{debug, info};

/// An opened project: its layout, settings and the services that work on it.
pub struct SceneDatabase {
    config: AppConfig,
    layout: ProjectLayout,
    registries: ProjectRegistries,
}

impl SceneDatabase {
    /// Open the project at `config.project_root`, creating the scenes and
    /// database directories and any missing settings file.
    pub fn open(config: AppConfig) -> Result<Self> {
        let layout = ProjectLayout::new(&config);
        for dir in [layout.scenes_root(), layout.database_root()] {
            fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        }
        let registries = ProjectRegistries::load(&layout)?;
        info!("Opened project at {}", layout.root().display());
        debug!(
            "{} categories, {} sub-projects, {} users",
            registries.categories.0.len(),
            registries.sub_projects.0.len(),
            registries.users.0.len()
        );
        Ok(Self {
            config,
            layout,
            registries,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn registries(&self) -> &ProjectRegistries {
        &self.registries
    }

    pub fn categories(&self) -> &[String] {
        &self.registries.categories.0
    }

    pub fn sub_projects(&self) -> &[String] {
        &self.registries.sub_projects.0
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.registries.users.names()
    }

    pub fn repository<'a>(&'a self, reporter: &'a dyn RepositoryReporter) -> BaseSceneRepository<'a> {
        BaseSceneRepository::new(&self.config, &self.layout, &self.registries, reporter)
    }

    pub fn references(&self) -> ReferenceManager<'_> {
        ReferenceManager::new(&self.layout, &self.config.scene_extension)
    }

    pub fn thumbnails(&self) -> ThumbnailService<'_> {
        ThumbnailService::new(
            &self.layout,
            self.config.thumbnail_width,
            self.config.thumbnail_height,
        )
    }

    /// Register a new sub-project and persist the list.
    pub fn add_sub_project(&mut self, name: &str) -> Result<()> {
        if !naming::is_valid_identifier(name, false) {
            return Err(Error::InvalidName(name.to_string()));
        }
        if self.registries.sub_projects.contains(name) {
            return Ok(());
        }
        self.registries.sub_projects.0.push(name.to_string());
        RecordStore::save(
            &self.layout.settings_path(SUB_PROJECTS_FILE),
            &self.registries.sub_projects,
        )?;
        info!("Sub-project {} added", name);
        Ok(())
    }
}
