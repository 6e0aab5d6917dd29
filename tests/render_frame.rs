mod common;

use breakout::engine::error::LevelIndexError;
use breakout::game::states::GameState;
use breakout::game::SPRITE_SHADER;
use glam::{Mat4, Vec2, Vec3};

#[test]
fn init_loads_four_levels_and_starts_active() {
    let game = common::game();
    assert_eq!(game.state(), GameState::Active);
    assert_eq!(game.levels().len(), 4);
    assert_eq!(game.level_index(), 0);
    assert_eq!(game.viewport(), (common::WIDTH, common::HEIGHT));
    assert!(game.levels().iter().all(|level| !level.bricks.is_empty()));
}

#[test]
fn level_bricks_fill_the_top_half() {
    let game = common::game();
    let half = common::HEIGHT as f32 / 2.0;
    for level in game.levels() {
        for brick in &level.bricks {
            assert!(brick.position.x + brick.size.x <= common::WIDTH as f32 + 1e-3);
            assert!(brick.position.y + brick.size.y <= half + 1e-3);
        }
    }
}

#[test]
fn active_render_draws_background_level_then_paddle() {
    let mut game = common::game();
    game.render();

    let frame = game.take_frame();
    let bricks = game.current_level().bricks.len();
    assert_eq!(frame.shader, SPRITE_SHADER);
    assert_eq!(frame.draws.len(), bricks + 2);

    let background = &frame.draws[0];
    assert_eq!(background.texture.name(), "background");
    let expected = Mat4::from_scale(Vec3::new(800.0, 600.0, 1.0));
    assert!(background.model.abs_diff_eq(expected, 1e-4));

    assert_eq!(frame.draws[1].texture.name(), game.current_level().bricks[0].sprite.name());

    let paddle = frame.draws.last().unwrap();
    assert_eq!(paddle.texture.name(), "paddle");
    assert_eq!(paddle.color, Vec3::ONE);
}

#[test]
fn inactive_states_draw_nothing() {
    let mut game = common::game();
    for state in [GameState::Menu, GameState::Win] {
        game.set_state(state);
        game.render();
        assert_eq!(game.sprite_renderer().draw_count(), 0);
        assert!(game.take_frame().draws.is_empty());
    }
}

#[test]
fn take_frame_drains_recorded_draws() {
    let mut game = common::game();
    game.render();
    assert!(game.sprite_renderer().draw_count() > 0);

    let _ = game.take_frame();
    assert_eq!(game.sprite_renderer().draw_count(), 0);
}

#[test]
fn projection_maps_viewport_corners() {
    let mut game = common::game();
    let projection = game.take_frame().projection;

    let top_left = projection.project_point3(Vec3::ZERO);
    let bottom_right = projection.project_point3(Vec3::new(800.0, 600.0, 0.0));
    assert!(top_left.truncate().abs_diff_eq(Vec2::new(-1.0, 1.0), 1e-5));
    assert!(bottom_right.truncate().abs_diff_eq(Vec2::new(1.0, -1.0), 1e-5));
}

#[test]
fn destroyed_bricks_are_skipped() {
    let mut game = common::game();
    game.render();
    let full = game.take_frame().draws.len();

    let level = game.current_level_mut();
    level.bricks[0].destroyed = true;
    level.bricks[1].destroyed = true;

    game.render();
    assert_eq!(game.take_frame().draws.len(), full - 2);
}

#[test]
fn selecting_a_level_is_bounds_checked() {
    let mut game = common::game();
    game.select_level(3).unwrap();
    assert_eq!(game.level_index(), 3);

    let err = game.select_level(4).unwrap_err();
    assert_eq!(err, LevelIndexError { index: 4, len: 4 });
    assert_eq!(game.level_index(), 3);

    game.render();
    let frame = game.take_frame();
    assert_eq!(frame.draws.len(), game.levels()[3].bricks.len() + 2);
}

#[test]
fn update_leaves_the_scene_unchanged() {
    let mut game = common::game();
    let before = game.player().position;
    game.update(0.5);
    assert_eq!(game.player().position, before);
    assert_eq!(game.state(), GameState::Active);
}
