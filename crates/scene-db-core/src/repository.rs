//! Create, version, list, resolve and remove base scenes.
//!
//! Every mutation is a read-modify-write of one record file: the record is
//! re-read from disk, changed in memory, and written back atomically after
//! any scene content has been persisted. No lock is taken, so two users
//! appending at the same moment can compute the same next version number;
//! the later write wins. `append_version_expecting` narrows that window for
//! callers that know the count they started from.

use crate::compare::{self, VersionAdvisory};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::host::HostApplication;
use crate::naming;
use crate::paths::ProjectLayout;
use crate::reference::ReferenceManager;
use crate::reporter::RepositoryReporter;
use crate::settings::ProjectRegistries;
use crate::storage::models::{BaseScene, Version, SCHEMA_ID};
use crate::storage::RecordStore;
use crate::thumbnail::ThumbnailService;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What is known about the open document when it belongs to a base scene.
#[derive(Debug, Clone)]
pub struct OpenSceneInfo {
    pub scene: BaseScene,
    pub record_path: PathBuf,
    /// 1-based version of the open file, when it is one of the recorded versions.
    pub version: Option<u32>,
    pub preview_dir: PathBuf,
}

pub struct BaseSceneRepository<'a> {
    config: &'a AppConfig,
    layout: &'a ProjectLayout,
    registries: &'a ProjectRegistries,
    reporter: &'a dyn RepositoryReporter,
}

impl<'a> BaseSceneRepository<'a> {
    pub fn new(
        config: &'a AppConfig,
        layout: &'a ProjectLayout,
        registries: &'a ProjectRegistries,
        reporter: &'a dyn RepositoryReporter,
    ) -> Self {
        Self {
            config,
            layout,
            registries,
            reporter,
        }
    }

    fn references(&self) -> ReferenceManager<'a> {
        ReferenceManager::new(self.layout, &self.config.scene_extension)
    }

    fn thumbnails(&self) -> ThumbnailService<'a> {
        ThumbnailService::new(
            self.layout,
            self.config.thumbnail_width,
            self.config.thumbnail_height,
        )
    }

    pub fn record_path(&self, scene: &BaseScene) -> PathBuf {
        self.layout
            .record_path(&scene.category, &scene.sub_project, &scene.name)
    }

    /// Save the host's open content as version 1 of a new base scene.
    ///
    /// A name that collides case-insensitively with an existing base scene
    /// in the same category/sub-project is `NameCollision`, carrying the
    /// existing record unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn create_base_scene(
        &self,
        host: &mut dyn HostApplication,
        category: &str,
        sub_project: &str,
        base_name: &str,
        author: &str,
        notes: &str,
        make_reference: bool,
    ) -> Result<BaseScene> {
        if !naming::is_valid_identifier(base_name, false) {
            return Err(Error::InvalidName(base_name.to_string()));
        }
        if !self.registries.categories.contains(category) {
            return Err(Error::UnknownCategory(category.to_string()));
        }
        let sub_project = if naming::is_default_sub_project(sub_project) {
            naming::DEFAULT_SUB_PROJECT
        } else {
            sub_project
        };
        if !self.registries.sub_projects.contains(sub_project) {
            return Err(Error::UnknownSubProject(sub_project.to_string()));
        }

        if let Some(existing) = self.find_in_scope(category, sub_project, base_name)? {
            warn!(
                "Base scene name '{}' is not unique in {}/{}",
                base_name, category, sub_project
            );
            return Err(Error::NameCollision {
                name: base_name.to_string(),
                category: category.to_string(),
                sub_project: sub_project.to_string(),
                existing: Box::new(existing),
            });
        }

        let scene_dir = self.layout.scene_dir(category, sub_project, base_name);
        fs::create_dir_all(&scene_dir).map_err(|e| Error::io(&scene_dir, e))?;
        let record_dir = self.layout.record_dir(category, sub_project);
        fs::create_dir_all(&record_dir).map_err(|e| Error::io(&record_dir, e))?;

        let mut scene = BaseScene {
            schema: Some(SCHEMA_ID.to_string()),
            name: base_name.to_string(),
            path: self.layout.relative(&scene_dir)?,
            category: category.to_string(),
            sub_project: sub_project.to_string(),
            creator: author.to_string(),
            creator_host: Some(self.config.workstation_name()),
            host_version: Some(host.runtime_version()),
            reference_file: None,
            referenced_version: None,
            versions: Vec::new(),
        };

        let version = self.save_new_version(host, &mut scene, author, notes)?;
        if make_reference {
            self.references().point_at(&mut scene, version)?;
        }
        RecordStore::save(&self.record_path(&scene), &scene)?;

        info!(
            "New base scene {}/{}/{} saved",
            scene.category, scene.sub_project, scene.name
        );
        self.reporter.on_version_saved(&scene.name, version);
        if make_reference {
            self.reporter.on_reference_updated(&scene.name, Some(version));
        }
        Ok(scene)
    }

    /// Save the host's open content as the next version of `scene`.
    /// The record is re-read first; `scene` only identifies it.
    pub fn append_version(
        &self,
        host: &mut dyn HostApplication,
        scene: &BaseScene,
        author: &str,
        notes: &str,
        make_reference: bool,
    ) -> Result<BaseScene> {
        self.append(host, scene, author, notes, make_reference, None)
    }

    /// As `append_version`, but fails with `VersionConflict` when the stored
    /// record no longer has `expected_count` versions.
    pub fn append_version_expecting(
        &self,
        host: &mut dyn HostApplication,
        scene: &BaseScene,
        author: &str,
        notes: &str,
        make_reference: bool,
        expected_count: usize,
    ) -> Result<BaseScene> {
        self.append(host, scene, author, notes, make_reference, Some(expected_count))
    }

    /// Append a version to whatever base scene the host currently has open.
    pub fn append_version_to_open_scene(
        &self,
        host: &mut dyn HostApplication,
        author: &str,
        notes: &str,
        make_reference: bool,
    ) -> Result<BaseScene> {
        let current = host
            .current_content_path()
            .ok_or_else(|| Error::NotABaseScene("untitled scene".to_string()))?;
        let info = self.resolve_open_scene(&current)?.ok_or_else(|| {
            Error::NotABaseScene(format!("{} has no database record", current.display()))
        })?;
        self.append_version(host, &info.scene, author, notes, make_reference)
    }

    fn append(
        &self,
        host: &mut dyn HostApplication,
        scene: &BaseScene,
        author: &str,
        notes: &str,
        make_reference: bool,
        expected_count: Option<usize>,
    ) -> Result<BaseScene> {
        let record_path = self.record_path(scene);
        let mut record = self.load_record(&record_path, &scene.name)?;

        if let Some(expected) = expected_count {
            let found = record.version_count();
            if found != expected {
                return Err(Error::VersionConflict {
                    name: record.name,
                    expected,
                    found,
                });
            }
        }

        let version = self.save_new_version(host, &mut record, author, notes)?;
        if make_reference {
            self.references().point_at(&mut record, version)?;
        }
        RecordStore::save(&record_path, &record)?;

        info!("{} v{} saved", record.name, version);
        self.reporter.on_version_saved(&record.name, version);
        if make_reference {
            self.reporter.on_reference_updated(&record.name, Some(version));
        }
        Ok(record)
    }

    /// Persist content for the next version number and push its entry.
    fn save_new_version(
        &self,
        host: &mut dyn HostApplication,
        scene: &mut BaseScene,
        author: &str,
        notes: &str,
    ) -> Result<u32> {
        let version = scene.next_version_number();
        let initials = self.registries.users.initials_of(author);
        let file_name = format!(
            "{}.{}",
            naming::format_versioned_name(&scene.name, &scene.category, &initials, version),
            self.config.scene_extension
        );
        let scene_dir = self.layout.stored_scene_dir(&scene.path)?;
        fs::create_dir_all(&scene_dir).map_err(|e| Error::io(&scene_dir, e))?;
        let scene_file = scene_dir.join(&file_name);
        let relative_path = self.layout.relative(&scene_file)?;

        debug!("Saving content to {}", scene_file.display());
        host.save_content_as(&scene_file)?;

        let thumb = match self.thumbnails().create_for_version(host, scene, version) {
            Ok(relative) => Some(relative),
            Err(e) => {
                warn!("Thumbnail for {} v{} not created: {}", scene.name, version, e);
                None
            }
        };

        scene.versions.push(Version {
            relative_path,
            note: naming::format_note(author, &chrono::Local::now(), notes),
            user: initials,
            workstation: Some(self.config.workstation_name()),
            preview: BTreeMap::new(),
            thumb,
            ranges: host.animation_range(),
        });
        Ok(version)
    }

    /// Load a record, telling "no record" (`NotABaseScene`) apart from
    /// "record exists but is unreadable" (`CorruptDatabase`).
    fn load_record(&self, record_path: &Path, name: &str) -> Result<BaseScene> {
        match RecordStore::load(record_path) {
            Err(Error::PathNotFound(_)) => Err(Error::NotABaseScene(format!(
                "{} (database file cannot be found)",
                name
            ))),
            other => other,
        }
    }

    pub fn load_base_scene(
        &self,
        category: &str,
        sub_project: &str,
        base_name: &str,
    ) -> Result<BaseScene> {
        let record_path = self.layout.record_path(category, sub_project, base_name);
        self.load_record(&record_path, base_name)
    }

    /// Re-read `scene` from disk.
    pub fn reload(&self, scene: &BaseScene) -> Result<BaseScene> {
        self.load_record(&self.record_path(scene), &scene.name)
    }

    /// Record in the scope whose file name matches `base_name` ignoring case.
    fn find_in_scope(
        &self,
        category: &str,
        sub_project: &str,
        base_name: &str,
    ) -> Result<Option<BaseScene>> {
        let wanted = base_name.to_lowercase();
        for path in record_files(&self.layout.record_dir(category, sub_project)) {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if stem == wanted {
                return RecordStore::load(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Lazily list the base scenes of one category/sub-project. Records that
    /// fail to parse are passed to the reporter and skipped.
    pub fn scan(&self, category: &str, sub_project: &str) -> SceneScan<'a> {
        let dir = self.layout.record_dir(category, sub_project);
        self.reporter.on_scan_start(category, sub_project);
        SceneScan {
            files: record_files(&dir),
            cursor: 0,
            loaded: 0,
            corrupt: 0,
            finished: false,
            reporter: self.reporter,
        }
    }

    /// Map an absolute scene file path back to its base scene, using the
    /// `<scenes>/<category>[/<sub_project>]/<base_name>/<file>` layout.
    /// Content outside that layout, or without a record, is `Ok(None)`.
    pub fn resolve_open_scene(&self, scene_file: &Path) -> Result<Option<OpenSceneInfo>> {
        let relative = match crate::paths::to_relative(scene_file, &self.layout.scenes_root()) {
            Ok(relative) => relative,
            Err(Error::PathOutsideProject { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let parts: Vec<&str> = relative.split('/').collect();
        let (category, sub_project, base_name) = match parts.as_slice() {
            [category, base_name, _file] => (*category, naming::DEFAULT_SUB_PROJECT, *base_name),
            [category, sub_project, base_name, _file] => (*category, *sub_project, *base_name),
            _ => return Ok(None),
        };

        let record_path = self.layout.record_path(category, sub_project, base_name);
        if !record_path.is_file() {
            debug!("No record for open scene {}", scene_file.display());
            return Ok(None);
        }
        let scene: BaseScene = RecordStore::load(&record_path)?;
        let version = self
            .layout
            .relative(scene_file)
            .ok()
            .and_then(|rel| scene.version_number_of(&rel));

        Ok(Some(OpenSceneInfo {
            preview_dir: self.layout.preview_dir(category, sub_project, base_name),
            scene,
            record_path,
            version,
        }))
    }

    pub fn version_advisory(&self, host: &dyn HostApplication, scene: &BaseScene) -> VersionAdvisory {
        compare::compare(host.runtime_version(), scene.host_version)
    }

    fn version_file(&self, scene: &BaseScene, version: u32) -> Result<PathBuf> {
        let v = scene.version(version).ok_or_else(|| Error::VersionNotFound {
            name: scene.name.clone(),
            version,
        })?;
        let path = self.layout.absolute(&v.relative_path);
        if !path.is_file() {
            return Err(Error::PathNotFound(path));
        }
        Ok(path)
    }

    /// Open `version` in the host. Returns the host-version advisory for
    /// the caller to show; it never prevents the open.
    pub fn load_version(
        &self,
        host: &mut dyn HostApplication,
        scene: &BaseScene,
        version: u32,
        force: bool,
    ) -> Result<VersionAdvisory> {
        let path = self.version_file(scene, version)?;
        let advisory = self.version_advisory(host, scene);
        host.open_content(&path, force)?;
        info!("Opened {} v{}", scene.name, version);
        Ok(advisory)
    }

    /// Merge `version` into the host's open content.
    pub fn import_version(
        &self,
        host: &mut dyn HostApplication,
        scene: &BaseScene,
        version: u32,
    ) -> Result<()> {
        let path = self.version_file(scene, version)?;
        host.merge_content_from(&path)?;
        info!("Imported {} v{}", scene.name, version);
        Ok(())
    }

    /// Reference the scene's `forReference` copy into the host and apply the
    /// referenced version's animation range. `Ok(false)` when no reference
    /// is set.
    pub fn reference_into_host(
        &self,
        host: &mut dyn HostApplication,
        scene: &BaseScene,
    ) -> Result<bool> {
        let copy = match self.references().resolve(scene) {
            Ok(Some(copy)) => copy,
            Ok(None) => {
                warn!("There is no reference set for {}. Nothing changed", scene.name);
                return Ok(false);
            }
            Err(e @ Error::DanglingReference { .. }) => {
                self.reporter.on_dangling_reference(&scene.name, &e);
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        host.reference_content(&copy)?;

        let ranges = scene
            .reference()
            .and_then(|r| scene.version(r.version))
            .and_then(|v| v.ranges);
        if let Some(ranges) = ranges {
            host.set_animation_range(ranges)?;
        }
        Ok(true)
    }

    /// Append a signed note block to an existing version.
    pub fn add_note(
        &self,
        scene: &BaseScene,
        version: u32,
        author: &str,
        text: &str,
    ) -> Result<BaseScene> {
        let record_path = self.record_path(scene);
        let mut record = self.load_record(&record_path, &scene.name)?;
        let name = record.name.clone();
        let v = record
            .version_mut(version)
            .ok_or(Error::VersionNotFound { name, version })?;
        v.note
            .push_str(&naming::format_note(author, &chrono::Local::now(), text));
        RecordStore::save(&record_path, &record)?;
        info!("Note added to {} v{}", record.name, version);
        Ok(record)
    }

    /// Copy a host-rendered preview clip next to the project's previews and
    /// record it under the host's active camera.
    pub fn attach_preview(
        &self,
        host: &dyn HostApplication,
        scene: &BaseScene,
        version: u32,
        clip: &Path,
    ) -> Result<BaseScene> {
        if !clip.is_file() {
            return Err(Error::PathNotFound(clip.to_path_buf()));
        }
        let record_path = self.record_path(scene);
        let mut record = self.load_record(&record_path, &scene.name)?;
        let version_name = {
            let v = record.version(version).ok_or_else(|| Error::VersionNotFound {
                name: record.name.clone(),
                version,
            })?;
            Path::new(&v.relative_path.replace('\\', "/"))
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        let camera = host.active_camera();
        let extension = clip
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avi".to_string());
        let preview_dir =
            self.layout
                .preview_dir(&record.category, &record.sub_project, &record.name);
        fs::create_dir_all(&preview_dir).map_err(|e| Error::io(&preview_dir, e))?;
        let target = preview_dir.join(naming::format_preview_name(
            &version_name,
            &camera,
            &extension,
        ));
        if target.exists() {
            fs::remove_file(&target).map_err(|e| Error::io(&target, e))?;
        }
        fs::copy(clip, &target).map_err(|e| Error::io(&target, e))?;
        let relative = self.layout.relative(&target)?;

        if let Some(v) = record.version_mut(version) {
            v.preview.insert(camera, relative);
        }
        RecordStore::save(&record_path, &record)?;
        info!("Preview attached to {} v{}", record.name, version);
        Ok(record)
    }

    /// Remove a base scene: its scene files (versions and reference copy),
    /// thumbnails, previews, and finally the record.
    pub fn delete_base_scene(&self, scene: &BaseScene) -> Result<()> {
        let record_path = self.record_path(scene);
        let record = self.load_record(&record_path, &scene.name)?;

        // Only the folders derived from the record's identity are removed,
        // whatever its stored paths say.
        remove_dir_if_present(&self.layout.scene_dir(
            &record.category,
            &record.sub_project,
            &record.name,
        ))?;
        let record_dir = self.layout.record_dir(&record.category, &record.sub_project);
        let thumb_prefix = format!("{}_", record.name);
        for thumb in record.versions.iter().filter_map(|v| v.thumb.as_ref()) {
            let thumb = self.layout.absolute(thumb);
            let owned = thumb.parent() == Some(record_dir.as_path())
                && thumb
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| n.starts_with(&thumb_prefix));
            if owned {
                remove_file_if_present(&thumb)?;
            } else {
                warn!("Leaving thumbnail not owned by {}: {}", record.name, thumb.display());
            }
        }
        remove_dir_if_present(&self.layout.preview_dir(
            &record.category,
            &record.sub_project,
            &record.name,
        ))?;
        RecordStore::remove(&record_path)?;
        info!(
            "Base scene {}/{}/{} deleted",
            record.category, record.sub_project, record.name
        );
        Ok(())
    }

    /// Rename a base scene within its scope. Every file the record points
    /// at is moved to the new name and the record is rewritten under the new
    /// name before the old one is removed.
    pub fn rename_base_scene(&self, scene: &BaseScene, new_name: &str) -> Result<BaseScene> {
        if !naming::is_valid_identifier(new_name, false) {
            return Err(Error::InvalidName(new_name.to_string()));
        }
        let old_record_path = self.record_path(scene);
        let mut record = self.load_record(&old_record_path, &scene.name)?;
        let category = record.category.clone();
        let sub_project = record.sub_project.clone();

        if !new_name.eq_ignore_ascii_case(&record.name) {
            if let Some(existing) = self.find_in_scope(&category, &sub_project, new_name)? {
                return Err(Error::NameCollision {
                    name: new_name.to_string(),
                    category,
                    sub_project,
                    existing: Box::new(existing),
                });
            }
        }

        let old_scene_dir = self.layout.stored_scene_dir(&record.path)?;
        let new_scene_dir = self.layout.scene_dir(&category, &sub_project, new_name);
        let old_preview_dir = self.layout.preview_dir(&category, &sub_project, &record.name);
        let new_preview_dir = self.layout.preview_dir(&category, &sub_project, new_name);
        let renamer = Renamer {
            layout: self.layout,
            old_prefix: format!("{}_", record.name),
            new_prefix: format!("{}_", new_name),
            dir_moves: vec![
                (old_scene_dir.clone(), new_scene_dir.clone()),
                (old_preview_dir.clone(), new_preview_dir),
            ],
        };

        for version in record.versions.iter_mut() {
            version.relative_path = renamer.relocate(&version.relative_path)?;
            if let Some(thumb) = version.thumb.as_mut() {
                *thumb = renamer.relocate(thumb)?;
            }
            for clip in version.preview.values_mut() {
                *clip = renamer.relocate(clip)?;
            }
        }
        if let Some(reference) = record.reference_file.as_mut() {
            *reference = renamer.relocate(reference)?;
        }

        record.name = new_name.to_string();
        record.path = self.layout.relative(&new_scene_dir)?;
        let new_record_path = self.record_path(&record);
        if new_record_path == old_record_path {
            RecordStore::save(&new_record_path, &record)?;
        } else if new_name.eq_ignore_ascii_case(&scene.name) && new_record_path.exists() {
            // Case-only rename on a case-insensitive filesystem: both paths
            // name the same file.
            RecordStore::save(&new_record_path, &record)?;
        } else {
            RecordStore::save(&new_record_path, &record)?;
            RecordStore::remove(&old_record_path)?;
        }
        for dir in [old_scene_dir, old_preview_dir] {
            if dir.is_dir() && fs::remove_dir(&dir).is_err() {
                warn!("Leaving non-empty directory {}", dir.display());
            }
        }
        info!("Base scene {} renamed to {}", scene.name, new_name);
        Ok(record)
    }
}

/// Moves files of a renamed base scene and rewrites their relative paths.
struct Renamer<'a> {
    layout: &'a ProjectLayout,
    old_prefix: String,
    new_prefix: String,
    dir_moves: Vec<(PathBuf, PathBuf)>,
}

impl Renamer<'_> {
    fn relocate(&self, relative: &str) -> Result<String> {
        let old_path = self.layout.absolute(relative);
        let file_name = old_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let new_file_name = match file_name.strip_prefix(&self.old_prefix) {
            Some(rest) => format!("{}{}", self.new_prefix, rest),
            None => file_name,
        };
        let parent = old_path.parent().map(Path::to_path_buf).unwrap_or_default();
        let new_parent = self
            .dir_moves
            .iter()
            .find(|(from, _)| *from == parent)
            .map(|(_, to)| to.clone())
            .unwrap_or(parent);
        let new_path = new_parent.join(new_file_name);

        if new_path != old_path && old_path.exists() {
            fs::create_dir_all(&new_parent).map_err(|e| Error::io(&new_parent, e))?;
            fs::rename(&old_path, &new_path).map_err(|e| Error::io(&old_path, e))?;
        }
        self.layout.relative(&new_path)
    }
}

/// Restartable, lazily-parsed listing of the records in one scope.
pub struct SceneScan<'a> {
    files: Vec<PathBuf>,
    cursor: usize,
    loaded: usize,
    corrupt: usize,
    finished: bool,
    reporter: &'a dyn RepositoryReporter,
}

impl SceneScan<'_> {
    /// Start over from the first record; files are re-read on the next pass.
    pub fn restart(&mut self) {
        self.cursor = 0;
        self.loaded = 0;
        self.corrupt = 0;
        self.finished = false;
    }

    /// Records that failed to parse so far in this pass.
    pub fn corrupt_count(&self) -> usize {
        self.corrupt
    }
}

impl Iterator for SceneScan<'_> {
    type Item = BaseScene;

    fn next(&mut self) -> Option<BaseScene> {
        while let Some(path) = self.files.get(self.cursor) {
            self.cursor += 1;
            match RecordStore::load::<BaseScene>(path) {
                Ok(scene) => {
                    self.loaded += 1;
                    self.reporter.on_record_loaded(&scene.name);
                    return Some(scene);
                }
                // Removed since the listing was taken.
                Err(Error::PathNotFound(_)) => continue,
                Err(e) => {
                    warn!("Skipping unreadable record: {}", e);
                    self.corrupt += 1;
                    self.reporter.on_corrupt_record(path, &e);
                }
            }
        }
        if !self.finished {
            self.finished = true;
            self.reporter.on_scan_complete(self.loaded, self.corrupt);
        }
        None
    }
}

/// `*.json` files directly inside `dir`, sorted by name. A missing
/// directory is an empty scope.
fn record_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Error reading {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
        .collect()
}

fn remove_dir_if_present(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(dir, e)),
    }
}

fn remove_file_if_present(file: &Path) -> Result<()> {
    match fs::remove_file(file) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(file, e)),
    }
}
