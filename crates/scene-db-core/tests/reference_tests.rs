mod common;

use common::{open_project, MockHost, RecordingReporter};
use image::{Rgb, RgbImage};
use scene_db_core::{
    AnimationRange, AppConfig, Error, ReferenceStatus, SceneDatabase, SilentReporter,
    ThumbnailSource,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_set_reference_copies_chosen_version() {
    let tmp = tempdir().unwrap();
    let db = open_project(tmp.path());
    let repo = db.repository(&SilentReporter);
    let mut host = MockHost::new();

    let scene = repo
        .create_base_scene(&mut host, "Rig", "None", "CharA", "John Doe", "", true)
        .unwrap();
    let scene = repo
        .append_version(&mut host, &scene, "John Doe", "", false)
        .unwrap();
    let mut scene = repo
        .append_version(&mut host, &scene, "John Doe", "", false)
        .unwrap();
    assert_eq!(scene.reference().unwrap().version, 1);

    let reference = db.references().set_reference(&mut scene, 2).unwrap();
    assert_eq!(reference.version, 2);

    let copy = fs::read(tmp.path().join(&reference.relative_path)).unwrap();
    let v2 = fs::read(tmp.path().join(&scene.versions[1].relative_path)).unwrap();
    let v3 = fs::read(tmp.path().join(&scene.versions[2].relative_path)).unwrap();
    assert_eq!(copy, v2);
    assert_ne!(copy, v3);

    let stored = repo.reload(&scene).unwrap();
    assert_eq!(stored.referenced_version, Some(2));
    assert_eq!(stored.version_count(), 3);
    assert_eq!(
        db.references().verify(&stored, true).unwrap(),
        ReferenceStatus::Consistent
    );
}

#[test]
fn test_set_reference_to_missing_version_changes_nothing() {
    let tmp = tempdir().unwrap();
    let db = open_project(tmp.path());
    let repo = db.repository(&SilentReporter);
    let mut host = MockHost::new();

    let mut scene = repo
        .create_base_scene(&mut host, "Rig", "None", "CharA", "John Doe", "", true)
        .unwrap();
    let before = fs::read(tmp.path().join("smDatabase/Rig/CharA.json")).unwrap();

    assert!(matches!(
        db.references().set_reference(&mut scene, 4),
        Err(Error::VersionNotFound { version: 4, .. })
    ));
    let after = fs::read(tmp.path().join("smDatabase/Rig/CharA.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_clear_reference_removes_copy() {
    let tmp = tempdir().unwrap();
    let db = open_project(tmp.path());
    let repo = db.repository(&SilentReporter);
    let mut host = MockHost::new();

    let mut scene = repo
        .create_base_scene(&mut host, "Rig", "None", "CharA", "John Doe", "", true)
        .unwrap();
    let copy = tmp.path().join("scenes/Rig/CharA/CharA_Rig_forReference.scene");
    assert!(copy.is_file());

    db.references().clear_reference(&mut scene).unwrap();
    assert!(!copy.exists());
    assert!(scene.reference().is_none());
    assert!(repo.reload(&scene).unwrap().reference().is_none());
    assert_eq!(
        db.references().verify(&scene, false).unwrap(),
        ReferenceStatus::None
    );
}

#[test]
fn test_missing_version_file_makes_reference_dangling() {
    let tmp = tempdir().unwrap();
    let db = open_project(tmp.path());
    let reporter = RecordingReporter::default();
    let repo = db.repository(&reporter);
    let mut host = MockHost::new();

    let scene = repo
        .create_base_scene(&mut host, "Rig", "None", "CharA", "John Doe", "", true)
        .unwrap();
    fs::remove_file(tmp.path().join(&scene.versions[0].relative_path)).unwrap();

    assert!(matches!(
        db.references().resolve(&scene),
        Err(Error::DanglingReference { version: 1, .. })
    ));
    assert_eq!(
        db.references().verify(&scene, true).unwrap(),
        ReferenceStatus::Dangling
    );
    assert!(matches!(
        repo.reference_into_host(&mut host, &scene),
        Err(Error::DanglingReference { .. })
    ));
    assert_eq!(reporter.dangling.get(), 1);
    assert!(host.referenced.is_empty());
}

#[test]
fn test_edited_copy_is_stale() {
    let tmp = tempdir().unwrap();
    let db = open_project(tmp.path());
    let repo = db.repository(&SilentReporter);
    let mut host = MockHost::new();

    let scene = repo
        .create_base_scene(&mut host, "Rig", "None", "CharA", "John Doe", "", true)
        .unwrap();
    let copy = tmp.path().join(scene.reference_file.as_deref().unwrap());
    fs::write(&copy, "scene content #9").unwrap();

    // Same length: only the deep check notices.
    assert_eq!(
        db.references().verify(&scene, false).unwrap(),
        ReferenceStatus::Consistent
    );
    assert_eq!(
        db.references().verify(&scene, true).unwrap(),
        ReferenceStatus::Stale
    );
}

#[test]
fn test_reference_into_host_applies_recorded_range() {
    let tmp = tempdir().unwrap();
    let db = open_project(tmp.path());
    let repo = db.repository(&SilentReporter);
    let mut host = MockHost::new();
    host.range = Some(AnimationRange {
        start: 10,
        min: 10,
        max: 50,
        end: 50,
    });

    let scene = repo
        .create_base_scene(&mut host, "Animation", "None", "Walk", "John Doe", "", true)
        .unwrap();

    let mut shot = MockHost::new();
    assert!(repo.reference_into_host(&mut shot, &scene).unwrap());
    assert_eq!(
        shot.referenced,
        vec![tmp
            .path()
            .join("scenes/Animation/Walk/Walk_Animation_forReference.scene")]
    );
    assert_eq!(shot.range.unwrap().max, 50);

    let unreferenced = repo
        .create_base_scene(&mut host, "Animation", "None", "Run", "John Doe", "", false)
        .unwrap();
    assert!(!repo.reference_into_host(&mut shot, &unreferenced).unwrap());
    assert_eq!(shot.referenced.len(), 1);
}

#[test]
fn test_replace_thumbnail_from_file() {
    let tmp = tempdir().unwrap();
    let db = open_project(tmp.path());
    let repo = db.repository(&SilentReporter);
    let mut host = MockHost::new();
    host.fail_capture = true;

    let scene = repo
        .create_base_scene(&mut host, "Model", "None", "Prop", "John Doe", "", false)
        .unwrap();
    assert!(scene.versions[0].thumb.is_none());

    let source = tmp.path().join("grab.png");
    RgbImage::from_pixel(1000, 1000, Rgb([255, 255, 255]))
        .save(&source)
        .unwrap();

    let scene = db
        .thumbnails()
        .replace(&scene, 1, ThumbnailSource::File(source))
        .unwrap();
    let thumb = scene.versions[0].thumb.as_deref().unwrap();
    let image = image::open(tmp.path().join(thumb)).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (221, 124));
    // square source on a wide canvas: bars left and right
    assert!(image.get_pixel(2, 62).0.iter().all(|&c| c < 10));
    assert!(image.get_pixel(110, 62).0.iter().all(|&c| c > 240));

    assert_eq!(repo.reload(&scene).unwrap().versions[0].thumb, scene.versions[0].thumb);
}

#[test]
fn test_replace_thumbnail_for_unknown_version() {
    let tmp = tempdir().unwrap();
    let db = open_project(tmp.path());
    let repo = db.repository(&SilentReporter);
    let mut host = MockHost::new();

    let scene = repo
        .create_base_scene(&mut host, "Model", "None", "Prop", "John Doe", "", false)
        .unwrap();
    let mut capture_host = MockHost::new();
    assert!(matches!(
        db.thumbnails()
            .replace(&scene, 3, ThumbnailSource::Capture(&mut capture_host)),
        Err(Error::VersionNotFound { version: 3, .. })
    ));
}

#[test]
fn test_reference_copy_follows_version_extension() {
    let tmp = tempdir().unwrap();
    let db = open_project(tmp.path());
    let mut host = MockHost::new();

    let scene = db
        .repository(&SilentReporter)
        .create_base_scene(&mut host, "Rig", "None", "CharA", "John Doe", "", true)
        .unwrap();
    let old_copy = tmp.path().join("scenes/Rig/CharA/CharA_Rig_forReference.scene");
    assert!(old_copy.is_file());

    let mut config = AppConfig::for_project(tmp.path())
        .with_user("John Doe")
        .with_workstation("ws-01");
    config.scene_extension = "ma".to_string();
    let ma_db = SceneDatabase::open(config).unwrap();
    let mut scene = ma_db
        .repository(&SilentReporter)
        .append_version(&mut host, &scene, "John Doe", "", true)
        .unwrap();

    let new_copy = tmp.path().join("scenes/Rig/CharA/CharA_Rig_forReference.ma");
    assert_eq!(
        scene.reference_file.as_deref(),
        Some("scenes/Rig/CharA/CharA_Rig_forReference.ma")
    );
    assert!(new_copy.is_file());
    assert!(!old_copy.exists());

    ma_db.references().set_reference(&mut scene, 1).unwrap();
    assert!(old_copy.is_file());
    assert!(!new_copy.exists());
    assert_eq!(
        ma_db.references().verify(&scene, true).unwrap(),
        ReferenceStatus::Consistent
    );
}
