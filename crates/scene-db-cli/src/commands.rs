use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scene-db")]
#[command(about = "Versioned scene file database", long_about = None)]
pub struct Cli {
    /// Project root; overrides SCENE_DB_PROJECT_ROOT and SceneDb.toml
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Author of saved versions and notes; overrides the configured user
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Host version reported by the file-backed host, as MAJOR.API.SDK
    #[arg(long, global = true, default_value = "1.0.0")]
    pub host_version: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Identifies one base scene.
#[derive(Debug, Args)]
pub struct SceneArgs {
    pub category: String,
    pub name: String,
    #[arg(long, short = 's', default_value = "None")]
    pub sub_project: String,
}

/// Content to save, standing in for the host's open document.
#[derive(Debug, Args)]
pub struct SaveArgs {
    /// File whose bytes become the new version
    #[arg(long)]
    pub source: PathBuf,
    /// Image used as the viewport capture for the thumbnail
    #[arg(long)]
    pub viewport: Option<PathBuf>,
    #[arg(long, short = 'n', default_value = "")]
    pub notes: String,
    /// Make the saved version the reference
    #[arg(long)]
    pub reference: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the project folders and default settings files
    Init,
    /// Save a new base scene as version 1
    SaveNew {
        #[command(flatten)]
        scene: SceneArgs,
        #[command(flatten)]
        save: SaveArgs,
    },
    /// Save the next version of an existing base scene
    SaveVersion {
        #[command(flatten)]
        scene: SceneArgs,
        #[command(flatten)]
        save: SaveArgs,
        /// Fail if the record no longer has this many versions
        #[arg(long)]
        expect_versions: Option<usize>,
    },
    /// List the base scenes of a category
    List {
        category: String,
        #[arg(long, short = 's', default_value = "None")]
        sub_project: String,
    },
    /// Show the versions and reference of a base scene
    Info {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Open a version in the file-backed host
    Load {
        #[command(flatten)]
        scene: SceneArgs,
        version: u32,
        /// Skip the host version confirmation
        #[arg(long)]
        force: bool,
    },
    /// Make a version the reference
    SetReference {
        #[command(flatten)]
        scene: SceneArgs,
        version: u32,
    },
    /// Remove the reference copy
    ClearReference {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Check the reference copy against its version
    VerifyReference {
        #[command(flatten)]
        scene: SceneArgs,
        /// Compare content hashes instead of sizes
        #[arg(long)]
        deep: bool,
    },
    /// Append a note to a version
    AddNote {
        #[command(flatten)]
        scene: SceneArgs,
        version: u32,
        text: String,
    },
    /// Replace the thumbnail of a version from an image file
    ReplaceThumbnail {
        #[command(flatten)]
        scene: SceneArgs,
        version: u32,
        image: PathBuf,
    },
    /// Attach a rendered preview clip to a version
    AttachPreview {
        #[command(flatten)]
        scene: SceneArgs,
        version: u32,
        clip: PathBuf,
        #[arg(long, default_value = "persp")]
        camera: String,
    },
    /// Rename a base scene and its files
    Rename {
        #[command(flatten)]
        scene: SceneArgs,
        new_name: String,
    },
    /// Find the base scene a scene file belongs to
    Resolve { path: PathBuf },
    /// Delete a base scene with all of its versions
    Delete {
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Register a sub-project
    AddSubProject { name: String },
    /// Print configuration values
    PrintConfig,
    /// Print project settings, users, categories and sub-projects
    Settings,
}
