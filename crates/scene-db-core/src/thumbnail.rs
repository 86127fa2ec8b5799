//! Fixed-size preview images per version.
//!
//! Captures are resized with their aspect ratio preserved and centered on a
//! black canvas of the configured size.

use crate::error::{Error, Result};
use crate::host::HostApplication;
use crate::paths::ProjectLayout;
use crate::storage::models::BaseScene;
use crate::storage::RecordStore;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ThumbnailImage(RgbImage);

impl ThumbnailImage {
    pub fn new(image: RgbImage) -> Self {
        Self(image)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::PathNotFound(path.to_path_buf()));
        }
        Ok(Self(image::open(path)?.to_rgb8()))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.0
    }
}

/// Where a replacement thumbnail comes from.
pub enum ThumbnailSource<'a> {
    File(PathBuf),
    Capture(&'a mut dyn HostApplication),
}

/// Placement of a `src_w`×`src_h` image inside an `out_w`×`out_h` canvas:
/// `(width, height, x_offset, y_offset)`. `None` for an empty canvas.
pub fn letterbox_geometry(
    src_w: u32,
    src_h: u32,
    out_w: u32,
    out_h: u32,
) -> Option<(u32, u32, u32, u32)> {
    if out_w == 0 || out_h == 0 {
        return None;
    }
    let src_ratio = src_w.max(1) as f64 / src_h.max(1) as f64;
    let out_ratio = out_w as f64 / out_h as f64;

    let (w, h) = if src_ratio <= out_ratio {
        ((out_h as f64 * src_ratio).round() as u32, out_h)
    } else {
        (out_w, (out_w as f64 / src_ratio).round() as u32)
    };
    let w = w.clamp(1, out_w);
    let h = h.clamp(1, out_h);
    Some((w, h, (out_w - w) / 2, (out_h - h) / 2))
}

pub fn letterbox(image: &ThumbnailImage, out_w: u32, out_h: u32) -> Result<RgbImage> {
    let (w, h, x, y) = letterbox_geometry(image.width(), image.height(), out_w, out_h).ok_or(
        Error::InvalidThumbnailSize {
            width: out_w,
            height: out_h,
        },
    )?;
    let resized = imageops::resize(image.as_rgb(), w, h, FilterType::Triangle);
    let mut canvas = RgbImage::from_pixel(out_w, out_h, Rgb([0, 0, 0]));
    imageops::overlay(&mut canvas, &resized, x as i64, y as i64);
    Ok(canvas)
}

pub struct ThumbnailService<'a> {
    layout: &'a ProjectLayout,
    width: u32,
    height: u32,
}

impl<'a> ThumbnailService<'a> {
    pub fn new(layout: &'a ProjectLayout, width: u32, height: u32) -> Self {
        Self {
            layout,
            width,
            height,
        }
    }

    pub fn capture(host: &mut dyn HostApplication) -> Result<ThumbnailImage> {
        host.capture_viewport()
    }

    /// Letterbox `image` into `max_width`×`max_height`, write it to
    /// `target`, and return its project-relative path.
    pub fn store(
        &self,
        image: &ThumbnailImage,
        target: &Path,
        max_width: u32,
        max_height: u32,
    ) -> Result<String> {
        let canvas = letterbox(image, max_width, max_height)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let relative = self.layout.relative(target)?;
        canvas.save(target)?;
        debug!("Thumbnail stored at {}", target.display());
        Ok(relative)
    }

    /// Capture the host viewport as the thumbnail of `version`.
    pub fn create_for_version(
        &self,
        host: &mut dyn HostApplication,
        scene: &BaseScene,
        version: u32,
    ) -> Result<String> {
        let image = Self::capture(host)?;
        let target = self.thumbnail_target(scene, version);
        self.store(&image, &target, self.width, self.height)
    }

    /// Overwrite the thumbnail of an existing version and record its path.
    /// Works on the record as currently stored, not on `scene`'s copy.
    pub fn replace(
        &self,
        scene: &BaseScene,
        version: u32,
        source: ThumbnailSource<'_>,
    ) -> Result<BaseScene> {
        let record_path =
            self.layout
                .record_path(&scene.category, &scene.sub_project, &scene.name);
        let mut record: BaseScene = RecordStore::load(&record_path)?;
        if record.version(version).is_none() {
            return Err(Error::VersionNotFound {
                name: record.name,
                version,
            });
        }

        let image = match source {
            ThumbnailSource::File(path) => ThumbnailImage::from_file(&path)?,
            ThumbnailSource::Capture(host) => Self::capture(host)?,
        };
        let target = self.thumbnail_target(&record, version);
        let relative = self.store(&image, &target, self.width, self.height)?;

        if let Some(v) = record.version_mut(version) {
            v.thumb = Some(relative);
        }
        RecordStore::save(&record_path, &record)?;
        info!("Thumbnail of {} v{} replaced", record.name, version);
        Ok(record)
    }

    pub fn thumbnail_target(&self, scene: &BaseScene, version: u32) -> PathBuf {
        self.layout
            .thumbnail_path(&scene.category, &scene.sub_project, &scene.name, version)
    }
}
