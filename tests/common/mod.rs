#![allow(dead_code)]

use std::path::{Path, PathBuf};

use breakout::engine::core::AssetPaths;
use breakout::engine::resources::{ResourceManager, Texture2D, TextureHandle};
use breakout::game::Game;
use image::RgbaImage;

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 600;

pub fn repo_assets() -> AssetPaths {
    AssetPaths::with_root(env!("CARGO_MANIFEST_DIR"))
}

pub fn game() -> Game {
    let mut resources = ResourceManager::default();
    Game::init(WIDTH, HEIGHT, &repo_assets(), &mut resources).expect("repository assets load")
}

pub fn blank_texture(name: &str) -> TextureHandle {
    let mut resources = ResourceManager::default();
    resources.insert_texture(Texture2D::from_image(name, RgbaImage::new(2, 2), true))
}

/// Copies the repository assets into `root`, returning the layout pointing at it.
pub fn copy_assets(root: &Path) -> AssetPaths {
    let source = repo_assets();
    let target = AssetPaths::with_root(root);
    for dir in [&source.shaders, &source.textures, &source.levels] {
        copy_dir(&source.root.join(dir), &target.root.join(dir));
    }
    target
}

fn copy_dir(from: &Path, to: &Path) {
    std::fs::create_dir_all(to).unwrap();
    for entry in std::fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let dest: PathBuf = to.join(entry.file_name());
        std::fs::copy(entry.path(), dest).unwrap();
    }
}
