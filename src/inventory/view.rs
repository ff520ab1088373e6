/// Host-facing views of an open container
///
/// The core never owns item stacks or slots. It reads them through these
/// traits for the duration of one decision and asks the host to carry out
/// primitive moves.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HostError;
use crate::gui::grid_registry::{ContainerTypeId, SlotTypeId};

/// Opaque item identity token, e.g. `minecraft:oak_planks`.
///
/// Only equality matters to the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Read-only view of the stack held by one slot.
pub trait ItemStackView {
    fn is_empty(&self) -> bool;

    /// Item identity, `None` for an empty stack.
    fn identity(&self) -> Option<&ItemId>;

    fn count(&self) -> u32;

    /// Capacity of a slot holding this item. Used only to size top-up moves;
    /// the host still decides whether a move is legal.
    fn max_count(&self) -> u32;

    /// Remaining capacity in this stack
    fn room(&self) -> u32 {
        self.max_count().saturating_sub(self.count())
    }

    /// True if this stack is non-empty and holds `item`
    fn holds(&self, item: &ItemId) -> bool {
        !self.is_empty() && self.identity() == Some(item)
    }
}

/// Which part of the screen a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotOwner {
    /// Slots of the opened block/entity (chest rows, crafting grid, output)
    Container,
    /// Player inventory rows above the hotbar
    PlayerMain,
    /// Player hotbar
    PlayerHotbar,
}

impl SlotOwner {
    pub fn is_player(&self) -> bool {
        matches!(self, SlotOwner::PlayerMain | SlotOwner::PlayerHotbar)
    }
}

/// Describes one slot of the open container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDescriptor {
    pub index: usize,
    pub slot_type: SlotTypeId,
    pub owner: SlotOwner,
    /// Output (crafting result) slot. Never a move target.
    #[serde(default)]
    pub is_output: bool,
}

impl SlotDescriptor {
    pub fn new(index: usize, slot_type: impl Into<SlotTypeId>, owner: SlotOwner) -> Self {
        Self {
            index,
            slot_type: slot_type.into(),
            owner,
            is_output: false,
        }
    }

    pub fn output(index: usize, slot_type: impl Into<SlotTypeId>) -> Self {
        Self {
            index,
            slot_type: slot_type.into(),
            owner: SlotOwner::Container,
            is_output: true,
        }
    }
}

/// The currently open container, as exposed by the host.
pub trait ContainerView {
    type Stack: ItemStackView;

    fn container_type(&self) -> &ContainerTypeId;

    /// All slots, in ascending index order
    fn slots(&self) -> &[SlotDescriptor];

    /// Stack held by the slot at `index`, `None` if the slot does not exist
    fn stack_at(&self, index: usize) -> Option<&Self::Stack>;

    /// Move `quantity` items from `source` to `target`.
    fn apply_move(&mut self, source: usize, target: usize, quantity: u32) -> Result<(), HostError>;

    /// Drop the whole stack held by `source`.
    fn apply_drop(&mut self, source: usize) -> Result<(), HostError>;

    /// Stack carried on the cursor. Hosts without a cursor report none.
    fn carried(&self) -> Option<&Self::Stack> {
        None
    }

    /// Drop the stack carried on the cursor.
    fn drop_carried(&mut self) -> Result<(), HostError> {
        Err(HostError::EmptyCursor)
    }

    fn slot(&self, index: usize) -> Option<&SlotDescriptor> {
        self.slots().iter().find(|s| s.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_serializes_as_plain_string() {
        let id = ItemId::from("minecraft:stick");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"minecraft:stick\"");
        assert_eq!(id.to_string(), "minecraft:stick");
    }

    #[test]
    fn test_slot_owner_player() {
        assert!(SlotOwner::PlayerMain.is_player());
        assert!(SlotOwner::PlayerHotbar.is_player());
        assert!(!SlotOwner::Container.is_player());
    }
}
