use crate::digest;
use crate::error::{Error, Result};
use crate::naming;
use crate::paths::ProjectLayout;
use crate::storage::models::{BaseScene, Reference};
use crate::storage::RecordStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Health of a base scene's reference copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceStatus {
    /// No reference is set.
    None,
    /// The copy matches the referenced version's file.
    Consistent,
    /// Both files exist but their content differs.
    Stale,
    /// The pointer, the copy or the referenced version file is missing.
    Dangling,
}

/// Maintains the single `forReference` copy of each base scene.
pub struct ReferenceManager<'a> {
    layout: &'a ProjectLayout,
    default_extension: &'a str,
}

impl<'a> ReferenceManager<'a> {
    pub fn new(layout: &'a ProjectLayout, default_extension: &'a str) -> Self {
        Self {
            layout,
            default_extension,
        }
    }

    /// Copy `version`'s scene file over the reference copy and update the
    /// in-memory pointer. The record itself is not written.
    pub fn point_at(&self, scene: &mut BaseScene, version: u32) -> Result<Reference> {
        let source = {
            let v = scene.version(version).ok_or_else(|| Error::VersionNotFound {
                name: scene.name.clone(),
                version,
            })?;
            self.layout.absolute(&v.relative_path)
        };
        if !source.is_file() {
            return Err(Error::PathNotFound(source));
        }

        let target = self.reference_path(scene, &source)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::copy(&source, &target).map_err(|e| Error::io(&target, e))?;
        debug!("Copied {} -> {}", source.display(), target.display());
        self.remove_previous_copy(scene, &target)?;

        let reference = Reference {
            relative_path: self.layout.relative(&target)?,
            version,
        };
        scene.set_reference(Some(reference.clone()));
        Ok(reference)
    }

    /// Make `version` the reference of `scene`. The record is re-read from
    /// disk first, and written only after the copy succeeded. `scene` is
    /// updated to the stored state.
    pub fn set_reference(&self, scene: &mut BaseScene, version: u32) -> Result<Reference> {
        let record_path = self.record_path(scene);
        *scene = RecordStore::load(&record_path)?;
        let reference = self.point_at(scene, version)?;
        RecordStore::save(&record_path, scene)?;
        info!("Version {} is the new reference of {}", version, scene.name);
        Ok(reference)
    }

    /// Remove the reference copy and the pointer.
    pub fn clear_reference(&self, scene: &mut BaseScene) -> Result<()> {
        let record_path = self.record_path(scene);
        *scene = RecordStore::load(&record_path)?;
        if let Some(reference) = scene.reference() {
            let copy = self.layout.absolute(&reference.relative_path);
            match fs::remove_file(&copy) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("Reference copy already missing: {}", copy.display());
                }
                Err(e) => return Err(Error::io(&copy, e)),
            }
        }
        scene.set_reference(None);
        RecordStore::save(&record_path, scene)?;
        info!("Reference of {} cleared", scene.name);
        Ok(())
    }

    /// Absolute path of the reference copy, `None` when no reference is set.
    /// A pointer whose copy or version file is missing is `DanglingReference`.
    pub fn resolve(&self, scene: &BaseScene) -> Result<Option<PathBuf>> {
        let Some(reference) = scene.reference() else {
            return Ok(None);
        };
        let copy = self.layout.absolute(&reference.relative_path);
        let version_file = scene
            .version(reference.version)
            .map(|v| self.layout.absolute(&v.relative_path));

        match version_file {
            Some(version_file) if version_file.is_file() && copy.is_file() => Ok(Some(copy)),
            Some(version_file) if !version_file.is_file() => Err(Error::DanglingReference {
                name: scene.name.clone(),
                version: reference.version,
                path: version_file,
            }),
            _ => Err(Error::DanglingReference {
                name: scene.name.clone(),
                version: reference.version,
                path: copy,
            }),
        }
    }

    /// Check the copy against the referenced version. `deep` compares
    /// content hashes; otherwise only sizes are compared.
    pub fn verify(&self, scene: &BaseScene, deep: bool) -> Result<ReferenceStatus> {
        let copy = match self.resolve(scene) {
            Ok(Some(copy)) => copy,
            Ok(None) => return Ok(ReferenceStatus::None),
            Err(Error::DanglingReference { .. }) => return Ok(ReferenceStatus::Dangling),
            Err(e) => return Err(e),
        };
        let Some(version) = scene.reference().and_then(|r| scene.version(r.version).cloned())
        else {
            return Ok(ReferenceStatus::Dangling);
        };
        let version_file = self.layout.absolute(&version.relative_path);

        let matches = if deep {
            digest::files_match(&copy, &version_file)
        } else {
            same_size(&copy, &version_file)
        }
        .map_err(|e| Error::io(&copy, e))?;

        Ok(if matches {
            ReferenceStatus::Consistent
        } else {
            ReferenceStatus::Stale
        })
    }

    /// `<scene dir>/<base>_<category>_forReference.<ext of the source version>`
    fn reference_path(&self, scene: &BaseScene, source: &Path) -> Result<PathBuf> {
        let extension = source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.default_extension.to_string());
        Ok(self.layout.stored_scene_dir(&scene.path)?.join(format!(
            "{}.{}",
            naming::format_reference_name(&scene.name, &scene.category),
            extension
        )))
    }

    /// A copy made from a version with another extension lives at another
    /// path. Only a reference copy of this scene next to `target` is removed.
    fn remove_previous_copy(&self, scene: &BaseScene, target: &Path) -> Result<()> {
        let Some(previous) = scene.reference_file.as_deref().filter(|p| !p.is_empty()) else {
            return Ok(());
        };
        let previous = self.layout.absolute(previous);
        let reference_name = naming::format_reference_name(&scene.name, &scene.category);
        let is_sibling_copy = previous != target
            && previous.parent() == target.parent()
            && previous.file_stem().and_then(|s| s.to_str()) == Some(reference_name.as_str());
        if !is_sibling_copy {
            return Ok(());
        }
        match fs::remove_file(&previous) {
            Ok(()) => {
                debug!("Removed previous reference copy {}", previous.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(&previous, e)),
        }
    }

    fn record_path(&self, scene: &BaseScene) -> PathBuf {
        self.layout
            .record_path(&scene.category, &scene.sub_project, &scene.name)
    }
}

fn same_size(a: &Path, b: &Path) -> std::io::Result<bool> {
    Ok(fs::metadata(a)?.len() == fs::metadata(b)?.len())
}
