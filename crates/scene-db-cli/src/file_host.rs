use scene_db_core::error::Result;
use scene_db_core::image::{Rgb, RgbImage};
use scene_db_core::{AnimationRange, Error, HostApplication, HostVersion, ThumbnailImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Host that treats a plain file as the open document. Saving copies the
/// source bytes; opening, merging and referencing only track paths.
pub struct FileHost {
    source: Option<PathBuf>,
    current: Option<PathBuf>,
    viewport: Option<PathBuf>,
    camera: String,
    version: HostVersion,
    range: Option<AnimationRange>,
}

impl FileHost {
    pub fn new(version: HostVersion) -> Self {
        Self {
            source: None,
            current: None,
            viewport: None,
            camera: "persp".to_string(),
            version,
            range: None,
        }
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.current = Some(source.clone());
        self.source = Some(source);
        self
    }

    pub fn with_viewport(mut self, viewport: Option<PathBuf>) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_camera(mut self, camera: &str) -> Self {
        self.camera = camera.to_string();
        self
    }
}

/// Parse `MAJOR.API.SDK`; missing trailing parts are zero.
pub fn parse_host_version(text: &str) -> Result<HostVersion> {
    let mut parts = [0i64; 3];
    for (slot, part) in parts.iter_mut().zip(text.split('.')) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| Error::Host(format!("invalid host version '{}'", text)))?;
    }
    Ok(HostVersion::from(parts))
}

impl HostApplication for FileHost {
    fn save_content_as(&mut self, path: &Path) -> Result<()> {
        let source = self
            .source
            .clone()
            .or_else(|| self.current.clone())
            .ok_or_else(|| Error::Host("nothing to save".to_string()))?;
        fs::copy(&source, path).map_err(|e| Error::io(&source, e))?;
        debug!("{} -> {}", source.display(), path.display());
        self.source = None;
        self.current = Some(path.to_path_buf());
        Ok(())
    }

    fn save_content_in_place(&mut self) -> Result<()> {
        match self.current.clone() {
            Some(path) if self.source.is_some() => self.save_content_as(&path),
            Some(_) => Ok(()),
            None => Err(Error::Host("untitled scene".to_string())),
        }
    }

    fn open_content(&mut self, path: &Path, _force_discard_unsaved: bool) -> Result<()> {
        if !path.is_file() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        self.source = None;
        self.current = Some(path.to_path_buf());
        info!("Opened {}", path.display());
        Ok(())
    }

    fn merge_content_from(&mut self, path: &Path) -> Result<()> {
        info!("Merged {}", path.display());
        Ok(())
    }

    fn reference_content(&mut self, path: &Path) -> Result<()> {
        info!("Referenced {}", path.display());
        Ok(())
    }

    fn is_content_modified(&self) -> bool {
        self.source.is_some()
    }

    fn current_content_path(&self) -> Option<PathBuf> {
        self.current.clone()
    }

    fn capture_viewport(&mut self) -> Result<ThumbnailImage> {
        match &self.viewport {
            Some(path) => ThumbnailImage::from_file(path),
            None => Ok(ThumbnailImage::new(RgbImage::from_pixel(
                320,
                180,
                Rgb([64, 64, 64]),
            ))),
        }
    }

    fn runtime_version(&self) -> HostVersion {
        self.version
    }

    fn animation_range(&self) -> Option<AnimationRange> {
        self.range
    }

    fn set_animation_range(&mut self, range: AnimationRange) -> Result<()> {
        info!(
            "Animation range set to {}-{} ({}-{})",
            range.start, range.end, range.min, range.max
        );
        self.range = Some(range);
        Ok(())
    }

    fn active_camera(&self) -> String {
        self.camera.clone()
    }
}
