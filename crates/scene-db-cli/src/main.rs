mod commands;
mod file_host;
mod logging;
mod progress;

use std::io::{self, Write};
use std::path::Path;
use std::process;

use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, SaveArgs, SceneArgs};
use dotenv::dotenv;
use file_host::FileHost;
use progress::CliReporter;
use scene_db_core::{
    AppConfig, BaseScene, HostApplication, HostVersion, ReferenceStatus, RepositoryReporter,
    SceneDatabase, ThumbnailSource, VersionAdvisory,
};
use tracing::{error, info, warn};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> CliResult {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config = match (scene_db_core::config::load_configuration(), &args.project) {
        (Ok(config), Some(project)) => AppConfig {
            project_root: project.clone(),
            ..config
        },
        (Ok(config), None) => config,
        (Err(_), Some(project)) => AppConfig::for_project(project),
        (Err(err), None) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };
    let config = match &args.user {
        Some(user) => config.with_user(user),
        None => config,
    };

    let Some(command) = args.command else {
        let _ = Cli::command().print_long_help();
        return Ok(());
    };

    let host_version = file_host::parse_host_version(&args.host_version)?;
    if let Err(err) = run(command, config, host_version) {
        error!("Error: {}", err);
        process::exit(1);
    }

    Ok(())
}

fn run(command: Commands, config: AppConfig, host_version: HostVersion) -> CliResult {
    let author = config.user.clone();
    let mut db = SceneDatabase::open(config)?;
    let reporter = CliReporter::new();

    match command {
        Commands::Init => {
            info!(
                "Project ready at {}",
                db.layout().root().display().to_string().green()
            );
        }
        Commands::SaveNew { scene, save } => {
            let mut host = host_for(&save, host_version);
            let repo = db.repository(&reporter);
            let created = repo.create_base_scene(
                &mut host,
                &scene.category,
                &scene.sub_project,
                &scene.name,
                &author,
                &save.notes,
                save.reference,
            );
            match created {
                Ok(created) => print_scene(&created),
                Err(scene_db_core::Error::NameCollision { existing, .. }) => {
                    warn!("Base scene already exists");
                    print_scene(&existing);
                    return Err(format!("'{}' is not unique", scene.name).into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::SaveVersion {
            scene,
            save,
            expect_versions,
        } => {
            let mut host = host_for(&save, host_version);
            let repo = db.repository(&reporter);
            let record = repo.load_base_scene(&scene.category, &scene.sub_project, &scene.name)?;
            let updated = match expect_versions {
                Some(expected) => repo.append_version_expecting(
                    &mut host,
                    &record,
                    &author,
                    &save.notes,
                    save.reference,
                    expected,
                )?,
                None => repo.append_version(
                    &mut host,
                    &record,
                    &author,
                    &save.notes,
                    save.reference,
                )?,
            };
            print_scene(&updated);
        }
        Commands::List {
            category,
            sub_project,
        } => {
            let repo = db.repository(&reporter);
            let scenes: Vec<BaseScene> = repo.scan(&category, &sub_project).collect();
            for scene in &scenes {
                let reference = scene
                    .referenced_version
                    .map(|v| format!("ref v{}", v))
                    .unwrap_or_else(|| "no ref".to_string());
                println!(
                    "{:<24} {:>3} versions  {}  {}",
                    scene.name.bold(),
                    scene.version_count(),
                    reference.cyan(),
                    scene.creator
                );
            }
        }
        Commands::Info { scene } => {
            let record = load(&db, &reporter, &scene)?;
            print_scene(&record);
        }
        Commands::Load {
            scene,
            version,
            force,
        } => {
            let record = load(&db, &reporter, &scene)?;
            let mut host = FileHost::new(host_version);
            let repo = db.repository(&reporter);
            let advisory = repo.version_advisory(&host, &record);
            if advisory.is_mismatch() && !force {
                let message = advisory.message(host.runtime_version(), record.host_version);
                if !prompt_confirm(&message, Some(false))? {
                    return Ok(());
                }
            } else if advisory == VersionAdvisory::Unknown {
                warn!(
                    "{}",
                    advisory.message(host.runtime_version(), record.host_version)
                );
            }
            repo.load_version(&mut host, &record, version, true)?;
            if let Some(path) = host.current_content_path() {
                println!("{}", path.display());
            }
        }
        Commands::SetReference { scene, version } => {
            let mut record = load(&db, &reporter, &scene)?;
            db.references().set_reference(&mut record, version)?;
            reporter.on_reference_updated(&record.name, Some(version));
        }
        Commands::ClearReference { scene } => {
            let mut record = load(&db, &reporter, &scene)?;
            db.references().clear_reference(&mut record)?;
            reporter.on_reference_updated(&record.name, None);
        }
        Commands::VerifyReference { scene, deep } => {
            let record = load(&db, &reporter, &scene)?;
            let status = db.references().verify(&record, deep)?;
            let label = match status {
                ReferenceStatus::None => "no reference".normal(),
                ReferenceStatus::Consistent => "consistent".green(),
                ReferenceStatus::Stale => "stale".yellow(),
                ReferenceStatus::Dangling => "dangling".red(),
            };
            println!("{}: {}", record.name, label);
        }
        Commands::AddNote {
            scene,
            version,
            text,
        } => {
            let record = load(&db, &reporter, &scene)?;
            let updated = db
                .repository(&reporter)
                .add_note(&record, version, &author, &text)?;
            print_scene(&updated);
        }
        Commands::ReplaceThumbnail {
            scene,
            version,
            image,
        } => {
            let record = load(&db, &reporter, &scene)?;
            let updated = db
                .thumbnails()
                .replace(&record, version, ThumbnailSource::File(image))?;
            if let Some(thumb) = updated.version(version).and_then(|v| v.thumb.as_ref()) {
                println!("{}", thumb);
            }
        }
        Commands::AttachPreview {
            scene,
            version,
            clip,
            camera,
        } => {
            let record = load(&db, &reporter, &scene)?;
            let host = FileHost::new(host_version).with_camera(&camera);
            let updated = db
                .repository(&reporter)
                .attach_preview(&host, &record, version, &clip)?;
            if let Some(v) = updated.version(version) {
                for (camera, clip) in &v.preview {
                    println!("{}: {}", camera, clip);
                }
            }
        }
        Commands::Rename { scene, new_name } => {
            let record = load(&db, &reporter, &scene)?;
            let renamed = db.repository(&reporter).rename_base_scene(&record, &new_name)?;
            print_scene(&renamed);
        }
        Commands::Resolve { path } => {
            let path = absolute(&path)?;
            match db.repository(&reporter).resolve_open_scene(&path)? {
                Some(info) => {
                    println!(
                        "{}/{}/{}",
                        info.scene.category, info.scene.sub_project, info.scene.name
                    );
                    match info.version {
                        Some(version) => println!("version {}", version),
                        None => println!("not one of the recorded versions"),
                    }
                    println!("record: {}", info.record_path.display());
                    println!("previews: {}", info.preview_dir.display());
                }
                None => println!("{}", "Not a base scene".yellow()),
            }
        }
        Commands::Delete { scene } => {
            let record = load(&db, &reporter, &scene)?;
            let prompt = format!(
                "Are you SURE you want to DELETE {} and all of its {} versions?",
                record.name,
                record.version_count()
            );
            match prompt_confirm(&prompt, Some(false)) {
                Ok(true) => {
                    db.repository(&reporter).delete_base_scene(&record)?;
                    println!("{} deleted", record.name);
                }
                _ => {
                    process::exit(0);
                }
            }
        }
        Commands::AddSubProject { name } => {
            db.add_sub_project(&name)?;
        }
        Commands::Settings => {
            let registries = db.registries();
            println!(
                "Resolution: {}x{} @ {} fps",
                registries.project.resolution[0],
                registries.project.resolution[1],
                registries.project.fps
            );
            println!("Categories: {}", db.categories().join(", "));
            println!("Sub-projects: {}", db.sub_projects().join(", "));
            println!("Users: {}", db.users().collect::<Vec<_>>().join(", "));
        }
        Commands::PrintConfig => {
            println!("Configuration: {:?}", db.config());
        }
    }

    Ok(())
}

fn host_for(save: &SaveArgs, host_version: HostVersion) -> FileHost {
    FileHost::new(host_version)
        .with_source(save.source.clone())
        .with_viewport(save.viewport.clone())
}

fn load(
    db: &SceneDatabase,
    reporter: &CliReporter,
    scene: &SceneArgs,
) -> scene_db_core::Result<BaseScene> {
    db.repository(reporter)
        .load_base_scene(&scene.category, &scene.sub_project, &scene.name)
}

fn absolute(path: &Path) -> io::Result<std::path::PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn print_scene(scene: &BaseScene) {
    println!(
        "{} ({}/{}) created by {}",
        scene.name.bold(),
        scene.category,
        scene.sub_project,
        scene.creator
    );
    if let Some(version) = scene.host_version {
        println!("  host version {}", version);
    }
    for (index, version) in scene.versions.iter().enumerate() {
        let number = index as u32 + 1;
        let marker = if scene.referenced_version == Some(number) {
            "*".cyan()
        } else {
            " ".normal()
        };
        println!(
            "{} v{:03} {:<4} {}",
            marker,
            number,
            version.user,
            version.relative_path
        );
        for line in version.note.lines().filter(|l| !l.is_empty()) {
            println!("         {}", line.dimmed());
        }
    }
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
