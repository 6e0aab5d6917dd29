use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::game::input::Action;

/// Keyboard events reduced to what the engine and game care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Action { action: Action, pressed: bool },
    Quit,
}

#[derive(Debug)]
pub struct PlatformLayer {
    boot_timestamp: std::time::Instant,
}

impl PlatformLayer {
    pub fn new() -> Self {
        Self {
            boot_timestamp: std::time::Instant::now(),
        }
    }

    pub fn translate_key(&self, event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        map_key(code, event.state == ElementState::Pressed)
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.boot_timestamp.elapsed()
    }
}

impl Default for PlatformLayer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn map_key(code: KeyCode, pressed: bool) -> Option<InputEvent> {
    let action = match code {
        KeyCode::KeyA | KeyCode::ArrowLeft => Action::MoveLeft,
        KeyCode::KeyD | KeyCode::ArrowRight => Action::MoveRight,
        KeyCode::Escape if pressed => return Some(InputEvent::Quit),
        _ => return None,
    };
    Some(InputEvent::Action { action, pressed })
}
