use crate::error::Result;
use crate::storage::models::{AnimationRange, HostVersion};
use crate::thumbnail::ThumbnailImage;
use std::path::{Path, PathBuf};

/// Capabilities the database needs from the content-creation application
/// it runs in. One implementation per host; the core never branches on
/// which host it talks to.
pub trait HostApplication {
    /// Persist the open content at `path`; the open document becomes `path`.
    fn save_content_as(&mut self, path: &Path) -> Result<()>;

    fn save_content_in_place(&mut self) -> Result<()>;

    /// Open `path`, discarding unsaved changes only when `force_discard_unsaved`.
    fn open_content(&mut self, path: &Path, force_discard_unsaved: bool) -> Result<()>;

    fn merge_content_from(&mut self, path: &Path) -> Result<()>;

    /// Bring `path` in as a live reference of the open content.
    fn reference_content(&mut self, path: &Path) -> Result<()>;

    fn is_content_modified(&self) -> bool;

    /// Absolute path of the open document, `None` when untitled.
    fn current_content_path(&self) -> Option<PathBuf>;

    fn capture_viewport(&mut self) -> Result<ThumbnailImage>;

    fn runtime_version(&self) -> HostVersion;

    fn animation_range(&self) -> Option<AnimationRange>;

    fn set_animation_range(&mut self, range: AnimationRange) -> Result<()>;

    fn active_camera(&self) -> String;
}
