/// Input events and the gesture binding table
pub mod bindings;
pub mod event;

pub use bindings::{ActionBinding, ActionBindings, MoveAction};
pub use event::{InputEvent, KeyCode, Modifiers, MouseButton, Trigger};
