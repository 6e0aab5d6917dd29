/// Player intents, independent of any keyboard layout or windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::MoveLeft, Action::MoveRight];

    const fn index(self) -> usize {
        match self {
            Action::MoveLeft => 0,
            Action::MoveRight => 1,
        }
    }
}

/// Pressed/released table, one slot per [`Action`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    pressed: [bool; Action::ALL.len()],
}

impl ActionState {
    pub fn set(&mut self, action: Action, pressed: bool) {
        self.pressed[action.index()] = pressed;
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed[action.index()]
    }

    pub fn release_all(&mut self) {
        self.pressed = [false; Action::ALL.len()];
    }
}
