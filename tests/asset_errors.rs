mod common;

use std::path::Path;

use breakout::engine::error::{AssetError, AssetKind};
use breakout::engine::resources::ResourceManager;
use breakout::game::Game;

fn init(paths: &breakout::engine::core::AssetPaths) -> Result<Game, AssetError> {
    let mut resources = ResourceManager::default();
    Game::init(common::WIDTH, common::HEIGHT, paths, &mut resources)
}

#[test]
fn missing_texture_is_reported_not_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let paths = common::copy_assets(dir.path());
    std::fs::remove_file(paths.texture("paddle.png")).unwrap();

    match init(&paths) {
        Err(AssetError::MissingFile { path }) => assert!(path.ends_with("paddle.png")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("init succeeded without the paddle texture"),
    }
}

#[test]
fn missing_shader_stage_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let paths = common::copy_assets(dir.path());
    std::fs::remove_file(paths.shader("sprite.fs.wgsl")).unwrap();

    let err = init(&paths).err().expect("init must fail");
    assert!(err.is_missing_file());
    assert!(err.to_string().contains("sprite.fs.wgsl"));
}

#[test]
fn missing_level_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let paths = common::copy_assets(dir.path());
    std::fs::remove_file(paths.level("three.lvl")).unwrap();

    match init(&paths) {
        Err(AssetError::MissingFile { path }) => assert!(path.ends_with("three.lvl")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("init succeeded without level three"),
    }
}

#[test]
fn corrupt_texture_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let paths = common::copy_assets(dir.path());
    std::fs::write(paths.texture("block.png"), b"definitely not a png").unwrap();

    let err = init(&paths).err().expect("init must fail");
    assert!(matches!(err, AssetError::ImageDecode { .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn malformed_level_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let paths = common::copy_assets(dir.path());
    std::fs::write(paths.level("two.lvl"), "1 1 1\n1 brick 1\n").unwrap();

    match init(&paths) {
        Err(AssetError::LevelParse { path, line, .. }) => {
            assert!(path.ends_with("two.lvl"));
            assert_eq!(line, 2);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("init accepted a malformed level"),
    }
}

#[test]
fn shader_without_fragment_entry_fails_to_compile() {
    let dir = tempfile::tempdir().unwrap();
    let paths = common::copy_assets(dir.path());
    std::fs::write(paths.shader("sprite.fs.wgsl"), "// empty stage\n").unwrap();

    let err = init(&paths).err().expect("init must fail");
    match err {
        AssetError::ShaderCompile { name, message } => {
            assert_eq!(name, "sprite");
            assert!(message.contains("fs_main"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn geometry_stage_is_rejected() {
    let paths = common::repo_assets();
    let mut resources = ResourceManager::default();
    let err = resources
        .load_shader(
            &paths.shader("sprite.vs.wgsl"),
            &paths.shader("sprite.fs.wgsl"),
            Some(Path::new("sprite.gs")),
            "sprite",
        )
        .unwrap_err();
    assert!(matches!(err, AssetError::ShaderCompile { .. }));
    assert!(resources.get_shader("sprite").is_err());
}

#[test]
fn unknown_names_are_classified() {
    let resources = ResourceManager::default();
    assert!(matches!(
        resources.get_texture("paddle"),
        Err(AssetError::UnknownAsset {
            kind: AssetKind::Texture,
            ..
        })
    ));
    assert!(matches!(
        resources.get_shader("sprite"),
        Err(AssetError::UnknownAsset {
            kind: AssetKind::Shader,
            ..
        })
    ));
}

#[test]
fn textures_without_alpha_are_opaque() {
    let paths = common::repo_assets();
    let mut resources = ResourceManager::default();

    resources
        .load_texture(&paths.texture("awesomeface.png"), true, "face")
        .unwrap();
    let face = resources.texture("face").unwrap();
    assert!(face.has_alpha);
    assert!(face.image.pixels().any(|pixel| pixel.0[3] == 0));

    resources
        .load_texture(&paths.texture("awesomeface.png"), false, "face_opaque")
        .unwrap();
    let opaque = resources.texture("face_opaque").unwrap();
    assert!(opaque.image.pixels().all(|pixel| pixel.0[3] == u8::MAX));
    assert_eq!(resources.get_texture("face_opaque").unwrap().size(), (128, 128));
}

#[test]
fn loaded_assets_are_cached_by_name() {
    let mut resources = ResourceManager::default();
    Game::init(common::WIDTH, common::HEIGHT, &common::repo_assets(), &mut resources).unwrap();

    assert_eq!(resources.texture_count(), 5);
    for name in ["background", "face", "block", "block_solid", "paddle"] {
        assert_eq!(resources.get_texture(name).unwrap().name(), name);
    }
    let shader = resources.get_shader("sprite").unwrap();
    assert!(shader.source().contains("fn vs_main"));
    assert!(shader.source().contains("fn fs_main"));

    resources.clear();
    assert_eq!(resources.texture_count(), 0);
}
