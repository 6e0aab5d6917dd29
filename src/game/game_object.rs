use glam::{Vec2, Vec3};

use crate::engine::resources::TextureHandle;
use crate::engine::sprite::{SpriteRenderer, WHITE};

/// Anything drawn as a single sprite: the paddle and every brick.
#[derive(Debug, Clone)]
pub struct GameObject {
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub color: Vec3,
    /// Degrees, clockwise in screen space.
    pub rotation: f32,
    pub is_solid: bool,
    pub destroyed: bool,
    pub sprite: TextureHandle,
}

impl GameObject {
    pub fn new(position: Vec2, size: Vec2, sprite: TextureHandle) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            color: WHITE,
            rotation: 0.0,
            is_solid: false,
            destroyed: false,
            sprite,
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn solid(mut self) -> Self {
        self.is_solid = true;
        self
    }

    pub fn draw(&self, renderer: &mut SpriteRenderer) {
        renderer.draw_sprite(
            &self.sprite,
            self.position,
            self.size,
            self.rotation,
            self.color,
        );
    }
}
