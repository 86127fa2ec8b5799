pub mod compare;
pub mod config;
pub mod database;
pub mod digest;
pub mod error;
pub mod host;
pub mod naming;
pub mod paths;
pub mod reference;
pub mod reporter;
pub mod repository;
pub mod settings;
pub mod storage;
pub mod thumbnail;

pub use image;

pub use compare::VersionAdvisory;
pub use config::AppConfig;
pub use database::SceneDatabase;
pub use error::{Error, Result};
pub use host::HostApplication;
pub use reference::{ReferenceManager, ReferenceStatus};
pub use reporter::{RepositoryReporter, SilentReporter};
pub use repository::{BaseSceneRepository, OpenSceneInfo, SceneScan};
pub use storage::models::{AnimationRange, BaseScene, HostVersion, Reference, Version};
pub use thumbnail::{ThumbnailImage, ThumbnailService, ThumbnailSource};
