use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the engine reacts to. Everything else arrives as `Other` with the
/// host's key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    /// Number row key `1`-`9`
    Digit(u8),
    Up,
    Down,
    Left,
    Right,
    Other(u32),
}

/// Modifier keys held at the time of an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };
    pub const ALT: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: true,
    };
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: true,
        alt: false,
    };

    /// True if every modifier set in `required` is also set here
    pub fn contains(&self, required: Modifiers) -> bool {
        (!required.shift || self.shift) && (!required.ctrl || self.ctrl) && (!required.alt || self.alt)
    }
}

/// What was pressed or released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Mouse(MouseButton),
    Key(KeyCode),
}

/// One event from the host's input stream.
///
/// Modifier state is reported as it is after the event, so releasing Shift
/// arrives as a key release whose `modifiers.shift` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Press {
        trigger: Trigger,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Release {
        trigger: Trigger,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Pointer moved. The hovered slot is part of the screen context.
    MouseMove {
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Scroll tick; positive is "up"
    Scroll {
        amount: i32,
        #[serde(default)]
        modifiers: Modifiers,
    },
    ScreenClosed,
}

impl InputEvent {
    pub fn press(button: MouseButton, modifiers: Modifiers) -> Self {
        InputEvent::Press {
            trigger: Trigger::Mouse(button),
            modifiers,
        }
    }

    pub fn release(button: MouseButton, modifiers: Modifiers) -> Self {
        InputEvent::Release {
            trigger: Trigger::Mouse(button),
            modifiers,
        }
    }

    pub fn key(key: KeyCode, modifiers: Modifiers) -> Self {
        InputEvent::Press {
            trigger: Trigger::Key(key),
            modifiers,
        }
    }

    pub fn mouse_move(modifiers: Modifiers) -> Self {
        InputEvent::MouseMove { modifiers }
    }

    pub fn scroll(amount: i32, modifiers: Modifiers) -> Self {
        InputEvent::Scroll { amount, modifiers }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            InputEvent::Press { modifiers, .. }
            | InputEvent::Release { modifiers, .. }
            | InputEvent::MouseMove { modifiers }
            | InputEvent::Scroll { modifiers, .. } => *modifiers,
            InputEvent::ScreenClosed => Modifiers::NONE,
        }
    }
}
