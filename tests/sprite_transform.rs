mod common;

use breakout::engine::resources::Shader;
use breakout::engine::sprite::{sprite_model, SpriteRenderer, QUAD_VERTICES, WHITE};
use glam::{Mat4, Vec2, Vec3};

fn corner(model: Mat4, x: f32, y: f32) -> Vec2 {
    model.transform_point3(Vec3::new(x, y, 0.0)).truncate()
}

#[test]
fn zero_rotation_is_translate_then_scale() {
    let model = sprite_model(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0), 0.0);
    let expected = Mat4::from_translation(Vec3::new(10.0, 20.0, 0.0))
        * Mat4::from_scale(Vec3::new(30.0, 40.0, 1.0));
    assert!(model.abs_diff_eq(expected, 1e-5));
}

#[test]
fn half_turn_mirrors_about_the_center() {
    let position = Vec2::new(100.0, 50.0);
    let s = 32.0;
    let upright = sprite_model(position, Vec2::splat(s), 0.0);
    let flipped = sprite_model(position, Vec2::splat(s), 180.0);
    let center = position + Vec2::splat(s / 2.0);

    for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.25, 0.75)] {
        let mirrored = 2.0 * center - corner(upright, x, y);
        assert!(corner(flipped, x, y).abs_diff_eq(mirrored, 1e-3));
    }

    assert!(corner(flipped, 0.0, 0.0).abs_diff_eq(position + Vec2::splat(s), 1e-3));
    assert!(corner(flipped, 1.0, 1.0).abs_diff_eq(position, 1e-3));
}

#[test]
fn rotation_keeps_the_center_fixed() {
    let position = Vec2::new(-5.0, 12.0);
    let size = Vec2::new(64.0, 16.0);
    for degrees in [0.0, 33.0, 90.0, 180.0, 270.0, -45.0] {
        let model = sprite_model(position, size, degrees);
        assert!(corner(model, 0.5, 0.5).abs_diff_eq(position + size / 2.0, 1e-3));
    }
}

#[test]
fn quarter_turn_moves_top_left_to_top_right() {
    let position = Vec2::new(10.0, 10.0);
    let model = sprite_model(position, Vec2::splat(20.0), 90.0);
    assert!(corner(model, 0.0, 0.0).abs_diff_eq(Vec2::new(30.0, 10.0), 1e-3));
}

#[test]
fn unit_quad_shares_position_and_texture_origin() {
    assert_eq!(QUAD_VERTICES.len(), 6);
    for [x, y, u, v] in QUAD_VERTICES {
        assert_eq!((x, y), (u, v));
        assert!((0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y));
    }
}

#[test]
fn draws_record_texture_model_and_tint() {
    let texture = common::blank_texture("block");
    let mut renderer = SpriteRenderer::new(Shader::new("sprite", ""));
    assert_eq!(renderer.quad(), &QUAD_VERTICES);

    let tint = Vec3::new(0.2, 0.6, 1.0);
    renderer.draw_sprite(&texture, Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), 45.0, tint);
    renderer.draw_sprite_default(&texture, Vec2::ZERO, Vec2::ONE);

    let draws = renderer.draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].texture, texture);
    assert_eq!(draws[0].color, tint);
    assert_eq!(
        draws[0].model,
        sprite_model(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), 45.0)
    );
    assert_eq!(draws[1].color, WHITE);
    assert!(draws[1].model.abs_diff_eq(Mat4::IDENTITY, 1e-6));
}

#[test]
fn frame_carries_shader_projection() {
    let mut shader = Shader::new("sprite", "");
    let projection = Mat4::orthographic_rh(0.0, 640.0, 480.0, 0.0, -1.0, 1.0);
    shader.set_projection(projection);

    let mut renderer = SpriteRenderer::new(shader);
    renderer.draw_sprite_default(&common::blank_texture("paddle"), Vec2::ZERO, Vec2::ONE);

    let frame = renderer.take_frame();
    assert_eq!(frame.shader, "sprite");
    assert_eq!(frame.projection, projection);
    assert_eq!(frame.draws.len(), 1);
    assert!(renderer.take_frame().draws.is_empty());
}
