/// Gesture bindings
///
/// Maps a mouse button plus an exact modifier set to the move action it
/// arms. Lookup requires the modifiers to match exactly, so Left+Ctrl+Shift
/// never arms the Left+Shift action.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::{Modifiers, MouseButton};

/// Which drag gesture is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    MoveSingleItemToStorage,
    MoveAllItemsToStorage,
    MoveSingleItemToHotbarStorage,
    MoveMatchingItemsToStorage,
    DropItems,
    DragCraftSingleItem,
    SpreadToCraftingGrid,
}

impl fmt::Display for MoveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveAction::MoveSingleItemToStorage => "move single item to storage",
            MoveAction::MoveAllItemsToStorage => "move all items to storage",
            MoveAction::MoveSingleItemToHotbarStorage => "move single item to hotbar",
            MoveAction::MoveMatchingItemsToStorage => "move matching items to storage",
            MoveAction::DropItems => "drop items",
            MoveAction::DragCraftSingleItem => "drag craft single item",
            MoveAction::SpreadToCraftingGrid => "spread to crafting grid",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBinding {
    pub button: MouseButton,
    #[serde(default)]
    pub modifiers: Modifiers,
    pub action: MoveAction,
}

impl ActionBinding {
    pub const fn new(button: MouseButton, modifiers: Modifiers, action: MoveAction) -> Self {
        Self {
            button,
            modifiers,
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionBindings {
    bindings: Vec<ActionBinding>,
}

impl ActionBindings {
    pub fn new(bindings: Vec<ActionBinding>) -> Self {
        Self { bindings }
    }

    /// The binding armed by pressing `button` with exactly `modifiers`.
    /// The first matching entry wins.
    pub fn lookup(&self, button: MouseButton, modifiers: Modifiers) -> Option<ActionBinding> {
        self.bindings
            .iter()
            .find(|b| b.button == button && b.modifiers == modifiers)
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for ActionBindings {
    fn default() -> Self {
        use MouseButton::{Left, Right};
        Self::new(vec![
            ActionBinding::new(Left, Modifiers::SHIFT, MoveAction::MoveAllItemsToStorage),
            ActionBinding::new(Right, Modifiers::SHIFT, MoveAction::MoveSingleItemToStorage),
            ActionBinding::new(Left, Modifiers::CTRL_SHIFT, MoveAction::MoveMatchingItemsToStorage),
            ActionBinding::new(Right, Modifiers::CTRL, MoveAction::MoveSingleItemToHotbarStorage),
            ActionBinding::new(Left, Modifiers::ALT, MoveAction::DropItems),
            ActionBinding::new(Right, Modifiers::ALT, MoveAction::DragCraftSingleItem),
            ActionBinding::new(Left, Modifiers::CTRL, MoveAction::SpreadToCraftingGrid),
        ])
    }
}
