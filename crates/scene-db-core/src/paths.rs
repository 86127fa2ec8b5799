//! Conversion between project-relative and absolute paths, and the fixed
//! folder layout of a project.
//!
//! Records never store absolute paths. Relative paths are persisted with `/`
//! separators so a project written on one platform opens on another; both
//! separators are accepted when reading.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::naming;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. Does not touch the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    result.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    result.pop();
                } else if !result.has_root() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Express `absolute` relative to `project_root`, with `/` separators.
pub fn to_relative(absolute: &Path, project_root: &Path) -> Result<String> {
    let absolute = normalize(absolute);
    let root = normalize(project_root);
    let relative = absolute
        .strip_prefix(&root)
        .map_err(|_| Error::PathOutsideProject {
            path: absolute.clone(),
            root: root.clone(),
        })?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

/// Resolve a stored relative path against `project_root`.
pub fn to_absolute(relative: &str, project_root: &Path) -> PathBuf {
    let mut path = normalize(project_root);
    for part in relative.split(['/', '\\']).filter(|p| !p.is_empty()) {
        path.push(part);
    }
    normalize(&path)
}

/// Folder layout of one project. Scene content lives under `scenes_dir`,
/// records mirror the same category/sub-project hierarchy under
/// `database_dir`.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    scenes_dir: String,
    database_dir: String,
    previews_dir: String,
}

impl ProjectLayout {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            root: normalize(&config.project_root),
            scenes_dir: config.scenes_dir.clone(),
            database_dir: config.database_dir.clone(),
            previews_dir: config.previews_dir.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scenes_root(&self) -> PathBuf {
        self.root.join(&self.scenes_dir)
    }

    pub fn database_root(&self) -> PathBuf {
        self.root.join(&self.database_dir)
    }

    pub fn previews_root(&self) -> PathBuf {
        self.root.join(&self.previews_dir)
    }

    pub fn relative(&self, absolute: &Path) -> Result<String> {
        to_relative(absolute, &self.root)
    }

    pub fn absolute(&self, relative: &str) -> PathBuf {
        to_absolute(relative, &self.root)
    }

    /// Resolve a record's stored scene folder. Anything that is not strictly
    /// below the scenes root is `PathOutsideProject`.
    pub fn stored_scene_dir(&self, relative: &str) -> Result<PathBuf> {
        let scenes_root = normalize(&self.scenes_root());
        let dir = self.absolute(relative);
        if dir == scenes_root || !dir.starts_with(&scenes_root) {
            return Err(Error::PathOutsideProject {
                path: dir,
                root: scenes_root,
            });
        }
        Ok(dir)
    }

    /// `<scenes>/<category>[/<sub_project>]/<base_name>`
    pub fn scene_dir(&self, category: &str, sub_project: &str, base_name: &str) -> PathBuf {
        scoped(self.scenes_root(), category, sub_project).join(base_name)
    }

    /// `<database>/<category>[/<sub_project>]`
    pub fn record_dir(&self, category: &str, sub_project: &str) -> PathBuf {
        scoped(self.database_root(), category, sub_project)
    }

    pub fn record_path(&self, category: &str, sub_project: &str, base_name: &str) -> PathBuf {
        self.record_dir(category, sub_project)
            .join(format!("{}.json", base_name))
    }

    pub fn preview_dir(&self, category: &str, sub_project: &str, base_name: &str) -> PathBuf {
        scoped(self.previews_root(), category, sub_project).join(base_name)
    }

    /// Thumbnails sit next to the record: `<record_dir>/<base>_v001_thumb.jpg`.
    pub fn thumbnail_path(
        &self,
        category: &str,
        sub_project: &str,
        base_name: &str,
        version: u32,
    ) -> PathBuf {
        self.record_dir(category, sub_project).join(format!(
            "{}_{}_thumb.jpg",
            base_name,
            naming::version_tag(version)
        ))
    }

    pub fn settings_path(&self, file_name: &str) -> PathBuf {
        self.database_root().join(file_name)
    }
}

fn scoped(base: PathBuf, category: &str, sub_project: &str) -> PathBuf {
    let category_dir = base.join(category);
    if naming::is_default_sub_project(sub_project) {
        category_dir
    } else {
        category_dir.join(sub_project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_dots() {
        let p = normalize(Path::new("/proj/./scenes/../scenes/Rig/CharA"));
        assert_eq!(p, PathBuf::from("/proj/scenes/Rig/CharA"));
    }

    #[test]
    fn test_normalize_keeps_leading_parent_on_relative() {
        assert_eq!(normalize(Path::new("../a/./b")), PathBuf::from("../a/b"));
    }

    #[test]
    fn test_to_relative_uses_forward_slashes() {
        let rel = to_relative(
            Path::new("/proj/scenes/Rig/CharA/CharA_Rig_jd_v001.scene"),
            Path::new("/proj"),
        )
        .unwrap();
        assert_eq!(rel, "scenes/Rig/CharA/CharA_Rig_jd_v001.scene");
    }

    #[test]
    fn test_to_relative_rejects_outside_paths() {
        let err = to_relative(Path::new("/elsewhere/file.scene"), Path::new("/proj")).unwrap_err();
        assert!(matches!(err, Error::PathOutsideProject { .. }));

        let err = to_relative(Path::new("/proj/../elsewhere/f"), Path::new("/proj")).unwrap_err();
        assert!(matches!(err, Error::PathOutsideProject { .. }));
    }

    #[test]
    fn test_round_trip() {
        let root = Path::new("/proj/show");
        for p in [
            "/proj/show/scenes/Rig/CharA/a.scene",
            "/proj/show/./smDatabase/Rig/../Rig/CharA.json",
            "/proj/show",
        ] {
            let p = Path::new(p);
            let rel = to_relative(p, root).unwrap();
            assert_eq!(to_absolute(&rel, root), normalize(p));
        }
    }

    #[test]
    fn test_to_absolute_accepts_backslashes() {
        let abs = to_absolute("scenes\\Rig\\CharA\\a.scene", Path::new("/proj"));
        assert_eq!(abs, PathBuf::from("/proj/scenes/Rig/CharA/a.scene"));
    }

    #[test]
    fn test_layout_skips_default_sub_project() {
        let layout = ProjectLayout::new(&AppConfig::for_project("/proj"));
        assert_eq!(
            layout.scene_dir("Rig", "None", "CharA"),
            PathBuf::from("/proj/scenes/Rig/CharA")
        );
        assert_eq!(
            layout.record_path("Rig", "Episode01", "CharA"),
            PathBuf::from("/proj/smDatabase/Rig/Episode01/CharA.json")
        );
        assert_eq!(
            layout.thumbnail_path("Rig", "None", "CharA", 2),
            PathBuf::from("/proj/smDatabase/Rig/CharA_v002_thumb.jpg")
        );
    }

    #[test]
    fn test_stored_scene_dir_must_sit_below_scenes_root() {
        let layout = ProjectLayout::new(&AppConfig::for_project("/proj"));
        assert_eq!(
            layout.stored_scene_dir("scenes/Rig/CharA").unwrap(),
            PathBuf::from("/proj/scenes/Rig/CharA")
        );
        for stored in ["", "scenes", "smDatabase/Rig", "scenes/../smDatabase", "../elsewhere"] {
            assert!(
                matches!(
                    layout.stored_scene_dir(stored),
                    Err(Error::PathOutsideProject { .. })
                ),
                "{:?} accepted",
                stored
            );
        }
    }
}
