use glam::{Mat4, Vec2, Vec3};

use super::resources::{Shader, TextureHandle};

/// Unit quad, origin at the top-left. Each vertex is `[x, y, u, v]`; texture
/// coordinates share the position's origin so they are identical.
pub const QUAD_VERTICES: [[f32; 4]; 6] = [
    [0.0, 1.0, 0.0, 1.0],
    [1.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [1.0, 0.0, 1.0, 0.0],
];

pub const QUAD_VERTEX_COUNT: u32 = QUAD_VERTICES.len() as u32;

pub const WHITE: Vec3 = Vec3::ONE;

/// Model matrix placing the unit quad at `position` with `size`, rotated by
/// `rotation_degrees` about its own center.
///
/// Matrices apply right to left: scale, shift the pivot to the quad center,
/// rotate, shift back, then translate to `position`.
pub fn sprite_model(position: Vec2, size: Vec2, rotation_degrees: f32) -> Mat4 {
    let pivot = 0.5 * size;
    Mat4::from_translation(position.extend(0.0))
        * Mat4::from_translation(pivot.extend(0.0))
        * Mat4::from_rotation_z(rotation_degrees.to_radians())
        * Mat4::from_translation((-pivot).extend(0.0))
        * Mat4::from_scale(size.extend(1.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub texture: TextureHandle,
    pub model: Mat4,
    pub color: Vec3,
}

/// Everything the GPU backend needs to draw one frame, in submission order.
#[derive(Debug, Clone)]
pub struct SpriteFrame {
    pub shader: String,
    pub projection: Mat4,
    pub draws: Vec<SpriteDraw>,
}

#[derive(Debug)]
pub struct SpriteRenderer {
    shader: Shader,
    quad: [[f32; 4]; 6],
    draws: Vec<SpriteDraw>,
}

impl SpriteRenderer {
    pub fn new(shader: Shader) -> Self {
        Self {
            shader,
            quad: QUAD_VERTICES,
            draws: Vec::new(),
        }
    }

    pub fn shader(&self) -> &Shader {
        &self.shader
    }

    pub fn quad(&self) -> &[[f32; 4]; 6] {
        &self.quad
    }

    pub fn draw_sprite(
        &mut self,
        texture: &TextureHandle,
        position: Vec2,
        size: Vec2,
        rotation_degrees: f32,
        color: Vec3,
    ) {
        let model = sprite_model(position, size, rotation_degrees);
        self.draws.push(SpriteDraw {
            texture: texture.clone(),
            model,
            color,
        });
    }

    pub fn draw_sprite_default(&mut self, texture: &TextureHandle, position: Vec2, size: Vec2) {
        self.draw_sprite(texture, position, size, 0.0, WHITE);
    }

    pub fn draws(&self) -> &[SpriteDraw] {
        &self.draws
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    pub fn take_frame(&mut self) -> SpriteFrame {
        SpriteFrame {
            shader: self.shader.name().to_string(),
            projection: self.shader.projection(),
            draws: std::mem::take(&mut self.draws),
        }
    }
}
