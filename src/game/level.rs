use std::path::Path;

use glam::{Vec2, Vec3};

use crate::engine::error::AssetError;
use crate::engine::resources::TextureHandle;
use crate::engine::sprite::{SpriteRenderer, WHITE};

use super::game_object::GameObject;

const SOLID_COLOR: Vec3 = Vec3::new(0.8, 0.8, 0.7);

/// Textures shared by every brick of every level.
#[derive(Debug, Clone)]
pub struct BrickTextures {
    pub block: TextureHandle,
    pub block_solid: TextureHandle,
}

/// A brick layout read from a `.lvl` file.
///
/// The file holds one row of whitespace separated tile codes per line:
/// `0` is empty, `1` an indestructible brick, `2..=5` colored bricks.
#[derive(Debug, Clone, Default)]
pub struct GameLevel {
    pub bricks: Vec<GameObject>,
}

impl GameLevel {
    pub fn load(
        path: &Path,
        level_width: u32,
        level_height: u32,
        textures: &BrickTextures,
    ) -> Result<Self, AssetError> {
        let text = std::fs::read_to_string(path).map_err(|err| AssetError::from_io(path, err))?;
        let level = Self::parse(path, &text, level_width, level_height, textures)?;
        tracing::debug!(
            target: "assets",
            path = %path.display(),
            bricks = level.bricks.len(),
            "loaded level"
        );
        Ok(level)
    }

    pub fn parse(
        path: &Path,
        text: &str,
        level_width: u32,
        level_height: u32,
        textures: &BrickTextures,
    ) -> Result<Self, AssetError> {
        let tiles = parse_tiles(path, text)?;
        Ok(Self {
            bricks: build_bricks(&tiles, level_width, level_height, textures),
        })
    }

    pub fn draw(&self, renderer: &mut SpriteRenderer) {
        for brick in self.bricks.iter().filter(|brick| !brick.destroyed) {
            brick.draw(renderer);
        }
    }

    pub fn is_completed(&self) -> bool {
        self.bricks
            .iter()
            .all(|brick| brick.is_solid || brick.destroyed)
    }
}

fn parse_tiles(path: &Path, text: &str) -> Result<Vec<Vec<u32>>, AssetError> {
    let mut rows: Vec<Vec<u32>> = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<u32>().map_err(|_| AssetError::LevelParse {
                    path: path.to_path_buf(),
                    line: line_no,
                    message: format!("invalid tile code `{token}`"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(AssetError::LevelParse {
                    path: path.to_path_buf(),
                    line: line_no,
                    message: format!("expected {} tiles, found {}", first.len(), row.len()),
                });
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn build_bricks(
    tiles: &[Vec<u32>],
    level_width: u32,
    level_height: u32,
    textures: &BrickTextures,
) -> Vec<GameObject> {
    let rows = tiles.len();
    let cols = tiles.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let unit = Vec2::new(
        level_width as f32 / cols as f32,
        level_height as f32 / rows as f32,
    );

    let mut bricks = Vec::new();
    for (y, row) in tiles.iter().enumerate() {
        for (x, &code) in row.iter().enumerate() {
            let position = unit * Vec2::new(x as f32, y as f32);
            let brick = match code {
                0 => continue,
                1 => GameObject::new(position, unit, textures.block_solid.clone())
                    .with_color(SOLID_COLOR)
                    .solid(),
                code => GameObject::new(position, unit, textures.block.clone())
                    .with_color(brick_color(code)),
            };
            bricks.push(brick);
        }
    }
    bricks
}

fn brick_color(code: u32) -> Vec3 {
    match code {
        2 => Vec3::new(0.2, 0.6, 1.0),
        3 => Vec3::new(0.0, 0.7, 0.0),
        4 => Vec3::new(0.8, 0.8, 0.4),
        5 => Vec3::new(1.0, 0.5, 0.0),
        _ => WHITE,
    }
}
