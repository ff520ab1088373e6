/// In-memory container
///
/// A self-contained host stand-in: it owns its slots, applies the usual
/// stacking rules when asked to move items and keeps a log of every primitive
/// operation it accepted. Used by the replay binary and by the tests.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::error::HostError;
use crate::gui::grid_registry::{vanilla, ContainerTypeId};
use crate::inventory::view::{ContainerView, ItemId, ItemStackView, SlotDescriptor, SlotOwner};

/// Default capacity of a slot
pub const DEFAULT_MAX_COUNT: u32 = 64;

/// Number of player inventory slots above the hotbar
pub const PLAYER_MAIN_SLOTS: usize = 27;

/// Number of hotbar slots
pub const HOTBAR_SLOTS: usize = 9;

/// An item stack owned by [`MemoryContainer`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemStack {
    #[serde(default)]
    pub item: Option<ItemId>,
    #[serde(default)]
    pub count: u32,
    #[serde(default = "default_max_count")]
    pub max_count: u32,
}

fn default_max_count() -> u32 {
    DEFAULT_MAX_COUNT
}

impl ItemStack {
    pub fn empty() -> Self {
        Self {
            item: None,
            count: 0,
            max_count: DEFAULT_MAX_COUNT,
        }
    }

    pub fn new(item: impl Into<ItemId>, count: u32) -> Self {
        Self {
            item: Some(item.into()),
            count,
            max_count: DEFAULT_MAX_COUNT,
        }
    }

    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self
    }

    fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.count);
        self.count -= taken;
        if self.count == 0 {
            self.item = None;
        }
        taken
    }
}

impl ItemStackView for ItemStack {
    fn is_empty(&self) -> bool {
        self.item.is_none() || self.count == 0
    }

    fn identity(&self) -> Option<&ItemId> {
        if self.count == 0 {
            return None;
        }
        self.item.as_ref()
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn max_count(&self) -> u32 {
        self.max_count
    }
}

/// A primitive operation accepted by [`MemoryContainer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedOp {
    Move { source: usize, target: usize, quantity: u32 },
    Drop { source: usize, quantity: u32 },
    DropCarried { quantity: u32 },
}

/// Owned container with vanilla-like stacking rules
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    container_type: ContainerTypeId,
    slots: Vec<SlotDescriptor>,
    stacks: Vec<ItemStack>,
    carried: ItemStack,
    log: Vec<AppliedOp>,
    rejected_targets: HashSet<usize>,
}

impl MemoryContainer {
    /// Create a container from slot descriptors; slot `i` must have index `i`
    pub fn new(container_type: impl Into<ContainerTypeId>, slots: Vec<SlotDescriptor>) -> Self {
        let stacks = vec![ItemStack::empty(); slots.len()];
        Self {
            container_type: container_type.into(),
            slots,
            stacks,
            carried: ItemStack::empty(),
            log: Vec::new(),
            rejected_targets: HashSet::new(),
        }
    }

    /// A chest with `container_slots` slots followed by the player inventory
    pub fn chest(container_slots: usize) -> Self {
        let mut slots: Vec<SlotDescriptor> = (0..container_slots)
            .map(|i| SlotDescriptor::new(i, vanilla::GENERIC, SlotOwner::Container))
            .collect();
        append_player_slots(&mut slots);
        Self::new(vanilla::CHEST, slots)
    }

    /// Crafting table: output slot 0, grid 1-9, then the player inventory
    pub fn crafting_table() -> Self {
        let mut slots = vec![SlotDescriptor::output(0, vanilla::CRAFTING_RESULT)];
        slots.extend((1..=9).map(|i| SlotDescriptor::new(i, vanilla::GENERIC, SlotOwner::Container)));
        append_player_slots(&mut slots);
        Self::new(vanilla::CRAFTING_TABLE, slots)
    }

    /// Player inventory screen: output 0, 2x2 grid 1-4, then the player inventory
    pub fn player_inventory() -> Self {
        let mut slots = vec![SlotDescriptor::output(0, vanilla::CRAFTING_RESULT)];
        slots.extend((1..=4).map(|i| SlotDescriptor::new(i, vanilla::GENERIC, SlotOwner::Container)));
        append_player_slots(&mut slots);
        Self::new(vanilla::PLAYER_INVENTORY, slots)
    }

    /// Set the stack at `index`. Out-of-range indices are ignored.
    pub fn set_stack(&mut self, index: usize, stack: ItemStack) {
        if let Some(slot) = self.stacks.get_mut(index) {
            *slot = stack;
        }
    }

    /// Put `stack` on the cursor
    pub fn set_carried(&mut self, stack: ItemStack) {
        self.carried = stack;
    }

    /// Clear all slots, the cursor and the operation log
    pub fn clear(&mut self) {
        for stack in &mut self.stacks {
            *stack = ItemStack::empty();
        }
        self.carried = ItemStack::empty();
        self.log.clear();
    }

    /// Operations accepted so far
    pub fn log(&self) -> &[AppliedOp] {
        &self.log
    }

    pub fn take_log(&mut self) -> Vec<AppliedOp> {
        std::mem::take(&mut self.log)
    }

    /// Make every future move into `target` fail
    pub fn reject_moves_into(&mut self, target: usize) {
        self.rejected_targets.insert(target);
    }

    /// Index of the first non-empty slot holding `item`
    pub fn find_item(&self, item: &ItemId) -> Option<usize> {
        self.stacks.iter().position(|s| s.holds(item))
    }

    /// Total number of `item` across all slots
    pub fn total_of(&self, item: &ItemId) -> u32 {
        self.stacks.iter().filter(|s| s.holds(item)).map(|s| s.count).sum()
    }

    pub fn first_player_slot(&self) -> Option<usize> {
        self.slots.iter().find(|s| s.owner.is_player()).map(|s| s.index)
    }

    pub fn first_hotbar_slot(&self) -> Option<usize> {
        self.slots
            .iter()
            .find(|s| s.owner == SlotOwner::PlayerHotbar)
            .map(|s| s.index)
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }
}

fn append_player_slots(slots: &mut Vec<SlotDescriptor>) {
    let start = slots.len();
    slots.extend(
        (0..PLAYER_MAIN_SLOTS).map(|i| SlotDescriptor::new(start + i, vanilla::GENERIC, SlotOwner::PlayerMain)),
    );
    let start = slots.len();
    slots.extend(
        (0..HOTBAR_SLOTS).map(|i| SlotDescriptor::new(start + i, vanilla::GENERIC, SlotOwner::PlayerHotbar)),
    );
}

impl ContainerView for MemoryContainer {
    type Stack = ItemStack;

    fn container_type(&self) -> &ContainerTypeId {
        &self.container_type
    }

    fn slots(&self) -> &[SlotDescriptor] {
        &self.slots
    }

    fn stack_at(&self, index: usize) -> Option<&ItemStack> {
        self.stacks.get(index)
    }

    fn apply_move(&mut self, source: usize, target: usize, quantity: u32) -> Result<(), HostError> {
        let rejected = |reason: &str| HostError::Rejected {
            source_slot: source,
            target_slot: target,
            reason: reason.to_string(),
        };

        if source >= self.stacks.len() {
            return Err(HostError::InvalidSlot(source));
        }
        if target >= self.stacks.len() {
            return Err(HostError::InvalidSlot(target));
        }
        if source == target {
            return Err(rejected("source and target are the same slot"));
        }
        if self.rejected_targets.contains(&target) {
            return Err(rejected("target refuses items"));
        }
        if self.slots[target].is_output {
            return Err(rejected("cannot place into an output slot"));
        }

        let src = self.stacks[source].clone();
        let item = match src.identity() {
            Some(item) => item.clone(),
            None => return Err(HostError::EmptySource(source)),
        };
        if quantity == 0 || quantity > src.count {
            return Err(rejected("not enough items in source"));
        }

        let dst = &self.stacks[target];
        let room = if dst.is_empty() {
            src.max_count
        } else if dst.holds(&item) {
            dst.room()
        } else {
            return Err(rejected("target holds a different item"));
        };
        if quantity > room {
            return Err(rejected("target does not have enough room"));
        }

        self.stacks[source].take(quantity);
        let dst = &mut self.stacks[target];
        if dst.is_empty() {
            *dst = ItemStack {
                item: Some(item),
                count: quantity,
                max_count: src.max_count,
            };
        } else {
            dst.count += quantity;
        }

        debug!("Moved {} item(s) from slot {} to slot {}", quantity, source, target);
        self.log.push(AppliedOp::Move { source, target, quantity });
        Ok(())
    }

    fn apply_drop(&mut self, source: usize) -> Result<(), HostError> {
        let stack = self.stacks.get_mut(source).ok_or(HostError::InvalidSlot(source))?;
        if stack.is_empty() {
            return Err(HostError::EmptySource(source));
        }

        let quantity = stack.count;
        *stack = ItemStack::empty();
        debug!("Dropped {} item(s) from slot {}", quantity, source);
        self.log.push(AppliedOp::Drop { source, quantity });
        Ok(())
    }

    fn carried(&self) -> Option<&ItemStack> {
        Some(&self.carried).filter(|stack| !stack.is_empty())
    }

    fn drop_carried(&mut self) -> Result<(), HostError> {
        if self.carried.is_empty() {
            return Err(HostError::EmptyCursor);
        }

        let quantity = self.carried.count;
        self.carried = ItemStack::empty();
        debug!("Dropped {} carried item(s)", quantity);
        self.log.push(AppliedOp::DropCarried { quantity });
        Ok(())
    }
}
