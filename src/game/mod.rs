pub mod game_object;
pub mod input;
pub mod level;
pub mod states;

use glam::{Mat4, Vec2};

use crate::engine::core::AssetPaths;
use crate::engine::error::{AssetError, LevelIndexError};
use crate::engine::resources::{ResourceManager, TextureHandle};
use crate::engine::sprite::{SpriteFrame, SpriteRenderer, WHITE};
use game_object::GameObject;
use input::{Action, ActionState};
use level::{BrickTextures, GameLevel};
use states::GameState;

pub const PLAYER_SIZE: Vec2 = Vec2::new(100.0, 20.0);
/// Paddle speed in pixels per second.
pub const PLAYER_VELOCITY: f32 = 500.0;

pub const SPRITE_SHADER: &str = "sprite";
const LEVEL_FILES: [&str; 4] = ["one.lvl", "two.lvl", "three.lvl", "four.lvl"];

pub struct Game {
    state: GameState,
    actions: ActionState,
    width: u32,
    height: u32,
    levels: Vec<GameLevel>,
    level: usize,
    renderer: SpriteRenderer,
    player: GameObject,
    background: TextureHandle,
}

impl Game {
    /// Loads every asset the game needs and builds the initial scene.
    pub fn init(
        width: u32,
        height: u32,
        paths: &AssetPaths,
        resources: &mut ResourceManager,
    ) -> Result<Self, AssetError> {
        tracing::info!(target: "game", width, height, root = %paths.root.display(), "initializing");

        resources.load_shader(
            &paths.shader("sprite.vs.wgsl"),
            &paths.shader("sprite.fs.wgsl"),
            None,
            SPRITE_SHADER,
        )?;
        let projection =
            Mat4::orthographic_rh(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
        resources
            .shader_mut(SPRITE_SHADER)?
            .set_projection(projection);
        let renderer = SpriteRenderer::new(resources.get_shader(SPRITE_SHADER)?);

        let background = resources.load_texture(&paths.texture("background.png"), false, "background")?;
        resources.load_texture(&paths.texture("awesomeface.png"), true, "face")?;
        let block = resources.load_texture(&paths.texture("block.png"), false, "block")?;
        let block_solid =
            resources.load_texture(&paths.texture("block_solid.png"), false, "block_solid")?;
        let paddle = resources.load_texture(&paths.texture("paddle.png"), true, "paddle")?;

        let bricks = BrickTextures { block, block_solid };
        let levels = LEVEL_FILES
            .iter()
            .map(|file| GameLevel::load(&paths.level(file), width, height / 2, &bricks))
            .collect::<Result<Vec<_>, _>>()?;

        let player_pos = Vec2::new(
            width as f32 / 2.0 - PLAYER_SIZE.x / 2.0,
            height as f32 - PLAYER_SIZE.y,
        );
        let player = GameObject::new(player_pos, PLAYER_SIZE, paddle);

        tracing::info!(
            target: "game",
            levels = levels.len(),
            textures = resources.texture_count(),
            "initialized"
        );

        Ok(Self {
            state: GameState::Active,
            actions: ActionState::default(),
            width,
            height,
            levels,
            level: 0,
            renderer,
            player,
            background,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn set_state(&mut self, state: GameState) {
        if self.state != state {
            tracing::debug!(target: "game", from = ?self.state, to = ?state, "state change");
            self.state = state;
        }
    }

    pub fn set_action(&mut self, action: Action, pressed: bool) {
        self.actions.set(action, pressed);
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.actions.is_pressed(action)
    }

    pub fn release_actions(&mut self) {
        self.actions.release_all();
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn player(&self) -> &GameObject {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut GameObject {
        &mut self.player
    }

    pub fn levels(&self) -> &[GameLevel] {
        &self.levels
    }

    pub fn level_index(&self) -> usize {
        self.level
    }

    pub fn current_level(&self) -> &GameLevel {
        &self.levels[self.level]
    }

    pub fn current_level_mut(&mut self) -> &mut GameLevel {
        &mut self.levels[self.level]
    }

    pub fn select_level(&mut self, index: usize) -> Result<(), LevelIndexError> {
        if index >= self.levels.len() {
            return Err(LevelIndexError {
                index,
                len: self.levels.len(),
            });
        }
        tracing::info!(target: "game", level = index, "level selected");
        self.level = index;
        Ok(())
    }

    /// Moves the paddle for held actions. Bounds are checked on the position
    /// before the move, so a single frame may carry the paddle past an edge.
    pub fn process_input(&mut self, dt: f32) {
        if self.state != GameState::Active {
            return;
        }

        let velocity = PLAYER_VELOCITY * dt;
        if self.actions.is_pressed(Action::MoveLeft) && self.player.position.x > 0.0 {
            self.player.position.x -= velocity;
        }
        if self.actions.is_pressed(Action::MoveRight)
            && self.player.position.x <= self.width as f32 - self.player.size.x
        {
            self.player.position.x += velocity;
        }
    }

    pub fn update(&mut self, dt: f32) {
        tracing::trace!(target: "game", dt, state = ?self.state, "update");
    }

    pub fn render(&mut self) {
        if self.state != GameState::Active {
            return;
        }

        self.renderer.draw_sprite(
            &self.background,
            Vec2::ZERO,
            Vec2::new(self.width as f32, self.height as f32),
            0.0,
            WHITE,
        );
        self.levels[self.level].draw(&mut self.renderer);
        self.player.draw(&mut self.renderer);
    }

    pub fn sprite_renderer(&self) -> &SpriteRenderer {
        &self.renderer
    }

    /// Drains the draws recorded by [`Game::render`].
    pub fn take_frame(&mut self) -> SpriteFrame {
        self.renderer.take_frame()
    }
}
