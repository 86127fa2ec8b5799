#![allow(dead_code)]

use image::{Rgb, RgbImage};
use scene_db_core::error::Result;
use scene_db_core::{
    AnimationRange, AppConfig, Error, HostApplication, HostVersion, RepositoryReporter,
    SceneDatabase, ThumbnailImage,
};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

/// In-memory stand-in for a content-creation application. Every save
/// writes distinct bytes so version files can be told apart.
pub struct MockHost {
    pub saves: u32,
    pub current: Option<PathBuf>,
    pub modified: bool,
    pub version: HostVersion,
    pub range: Option<AnimationRange>,
    pub camera: String,
    pub opened: Vec<PathBuf>,
    pub merged: Vec<PathBuf>,
    pub referenced: Vec<PathBuf>,
    pub fail_capture: bool,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            saves: 0,
            current: None,
            modified: true,
            version: HostVersion::new(26, 3, 0),
            range: Some(AnimationRange {
                start: 0,
                min: 0,
                max: 100,
                end: 100,
            }),
            camera: "|cam_main".to_string(),
            opened: Vec::new(),
            merged: Vec::new(),
            referenced: Vec::new(),
            fail_capture: false,
        }
    }
}

impl HostApplication for MockHost {
    fn save_content_as(&mut self, path: &Path) -> Result<()> {
        self.saves += 1;
        fs::write(path, format!("scene content #{}", self.saves))
            .map_err(|e| Error::io(path, e))?;
        self.current = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    fn save_content_in_place(&mut self) -> Result<()> {
        match self.current.clone() {
            Some(path) => self.save_content_as(&path),
            None => Err(Error::Host("untitled scene".to_string())),
        }
    }

    fn open_content(&mut self, path: &Path, force_discard_unsaved: bool) -> Result<()> {
        if self.modified && !force_discard_unsaved {
            return Err(Error::Host("unsaved changes".to_string()));
        }
        self.opened.push(path.to_path_buf());
        self.current = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    fn merge_content_from(&mut self, path: &Path) -> Result<()> {
        self.merged.push(path.to_path_buf());
        self.modified = true;
        Ok(())
    }

    fn reference_content(&mut self, path: &Path) -> Result<()> {
        self.referenced.push(path.to_path_buf());
        self.modified = true;
        Ok(())
    }

    fn is_content_modified(&self) -> bool {
        self.modified
    }

    fn current_content_path(&self) -> Option<PathBuf> {
        self.current.clone()
    }

    fn capture_viewport(&mut self) -> Result<ThumbnailImage> {
        if self.fail_capture {
            return Err(Error::Host("no viewport".to_string()));
        }
        Ok(ThumbnailImage::new(RgbImage::from_pixel(
            320,
            180,
            Rgb([200, 100, 50]),
        )))
    }

    fn runtime_version(&self) -> HostVersion {
        self.version
    }

    fn animation_range(&self) -> Option<AnimationRange> {
        self.range
    }

    fn set_animation_range(&mut self, range: AnimationRange) -> Result<()> {
        self.range = Some(range);
        Ok(())
    }

    fn active_camera(&self) -> String {
        self.camera.clone()
    }
}

/// Reporter that remembers what it was told.
#[derive(Default)]
pub struct RecordingReporter {
    pub loaded: RefCell<Vec<String>>,
    pub corrupt: RefCell<Vec<PathBuf>>,
    pub completed: Cell<Option<(usize, usize)>>,
    pub saved: RefCell<Vec<(String, u32)>>,
    pub dangling: Cell<usize>,
}

impl RepositoryReporter for RecordingReporter {
    fn on_record_loaded(&self, name: &str) {
        self.loaded.borrow_mut().push(name.to_string());
    }

    fn on_corrupt_record(&self, path: &Path, _error: &Error) {
        self.corrupt.borrow_mut().push(path.to_path_buf());
    }

    fn on_scan_complete(&self, records: usize, corrupt: usize) {
        self.completed.set(Some((records, corrupt)));
    }

    fn on_version_saved(&self, name: &str, version: u32) {
        self.saved.borrow_mut().push((name.to_string(), version));
    }

    fn on_dangling_reference(&self, _name: &str, _error: &Error) {
        self.dangling.set(self.dangling.get() + 1);
    }
}

/// Open a project under `root` with a known user and one extra sub-project.
pub fn open_project(root: &Path) -> SceneDatabase {
    let database = root.join("smDatabase");
    fs::create_dir_all(&database).unwrap();
    fs::write(
        database.join("users.json"),
        r#"{ "John Doe": "jd", "Generic": "gn" }"#,
    )
    .unwrap();
    fs::write(database.join("subPAssets.json"), r#"["None", "Episode01"]"#).unwrap();
    let config = AppConfig::for_project(root)
        .with_user("John Doe")
        .with_workstation("ws-01");
    SceneDatabase::open(config).unwrap()
}
