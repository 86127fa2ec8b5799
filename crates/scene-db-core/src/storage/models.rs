use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::naming::DEFAULT_SUB_PROJECT;

/// Schema tag written into every base scene record.
pub const SCHEMA_ID: &str = "SceneDbV02_sceneFile";

/// Host application version at the time a base scene was created:
/// `(major, api level, sdk level)`. Persisted as a 3-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i64; 3]", into = "[i64; 3]")]
pub struct HostVersion {
    pub major: i64,
    pub api: i64,
    pub sdk: i64,
}

impl HostVersion {
    pub fn new(major: i64, api: i64, sdk: i64) -> Self {
        Self { major, api, sdk }
    }
}

impl From<[i64; 3]> for HostVersion {
    fn from(v: [i64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<HostVersion> for [i64; 3] {
    fn from(v: HostVersion) -> Self {
        [v.major, v.api, v.sdk]
    }
}

impl std::fmt::Display for HostVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.api, self.sdk)
    }
}

/// Timeline ranges `[animation start, min, max, animation end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 4]", into = "[i64; 4]")]
pub struct AnimationRange {
    pub start: i64,
    pub min: i64,
    pub max: i64,
    pub end: i64,
}

impl From<[i64; 4]> for AnimationRange {
    fn from(r: [i64; 4]) -> Self {
        Self {
            start: r[0],
            min: r[1],
            max: r[2],
            end: r[3],
        }
    }
}

impl From<AnimationRange> for [i64; 4] {
    fn from(r: AnimationRange) -> Self {
        [r.start, r.min, r.max, r.end]
    }
}

/// One saved snapshot of a base scene. The scene file is immutable once
/// written; note, thumbnail and previews are annexes that may change later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Version {
    pub relative_path: String,
    #[serde(default)]
    pub note: String,
    /// Author initials.
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub workstation: Option<String>,
    /// Camera identifier → relative preview clip path.
    #[serde(default)]
    pub preview: BTreeMap<String, String>,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub ranges: Option<AnimationRange>,
}

/// The single "forReference" copy of a base scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub relative_path: String,
    /// 1-based index of the version the copy was made from.
    pub version: u32,
}

/// Persisted record of a base scene: identity plus its append-only history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseScene {
    #[serde(rename = "ID", default)]
    pub schema: Option<String>,
    pub name: String,
    /// Relative scene directory holding every version file.
    pub path: String,
    pub category: String,
    #[serde(default = "default_sub_project")]
    pub sub_project: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub creator_host: Option<String>,
    #[serde(
        rename = "HostVersion",
        alias = "3dsMaxVersion",
        default,
        deserialize_with = "lenient_host_version"
    )]
    pub host_version: Option<HostVersion>,
    #[serde(default)]
    pub reference_file: Option<String>,
    #[serde(default)]
    pub referenced_version: Option<u32>,
    #[serde(default)]
    pub versions: Vec<Version>,
}

fn default_sub_project() -> String {
    DEFAULT_SUB_PROJECT.to_string()
}

/// Old records stored the host version as a free-form string, or not at all.
/// Anything that is not a 3-element integer array reads as unknown.
fn lenient_host_version<'de, D>(deserializer: D) -> Result<Option<HostVersion>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<HostVersion>(value).ok())
}

impl BaseScene {
    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    /// Number the next appended version will receive.
    pub fn next_version_number(&self) -> u32 {
        self.versions.len() as u32 + 1
    }

    /// 1-based lookup.
    pub fn version(&self, number: u32) -> Option<&Version> {
        let index = (number as usize).checked_sub(1)?;
        self.versions.get(index)
    }

    pub fn version_mut(&mut self, number: u32) -> Option<&mut Version> {
        let index = (number as usize).checked_sub(1)?;
        self.versions.get_mut(index)
    }

    pub fn reference(&self) -> Option<Reference> {
        match (&self.reference_file, self.referenced_version) {
            (Some(path), Some(version)) if !path.is_empty() => Some(Reference {
                relative_path: path.clone(),
                version,
            }),
            _ => None,
        }
    }

    pub fn set_reference(&mut self, reference: Option<Reference>) {
        match reference {
            Some(r) => {
                self.reference_file = Some(r.relative_path);
                self.referenced_version = Some(r.version);
            }
            None => {
                self.reference_file = None;
                self.referenced_version = None;
            }
        }
    }

    /// 1-based number of the version stored at `relative_path`, if any.
    pub fn version_number_of(&self, relative_path: &str) -> Option<u32> {
        let wanted = relative_path.replace('\\', "/");
        self.versions
            .iter()
            .position(|v| v.relative_path.replace('\\', "/") == wanted)
            .map(|i| i as u32 + 1)
    }
}
