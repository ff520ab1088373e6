/// Inventory transfer planner
///
/// Expands a transfer intent (which slot, where to, how much) into an ordered
/// list of primitive moves and executes them against the host. The planner
/// keeps its own running tally of slot contents while it plans so later steps
/// see the effect of earlier ones. It never decides whether a move is legal:
/// that is the host's call, and execution stops at the first refusal.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::TransferError;
use crate::gui::grid_registry::{SlotGridRegistry, SlotRange};
use crate::inventory::view::{ContainerView, ItemId, ItemStackView, SlotDescriptor, SlotOwner};
use crate::recipes::Recipe;

/// How much of the source a transfer moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// One unit into the first slot that can take it
    SingleItem,
    /// Everything, topping up partial stacks before using empty slots
    WholeStack,
    /// One unit per eligible slot per pass, only complete passes
    ShiftDistribute,
    /// Drop the source stack
    Drop,
}

/// How many sets a recipe fill places into the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillAmount {
    One,
    Max,
}

/// A primitive operation for the host to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOp {
    Move { source: usize, target: usize, quantity: u32 },
    Drop { source: usize },
}

#[derive(Debug, Clone)]
struct ModelSlot {
    item: Option<ItemId>,
    count: u32,
    max_count: u32,
    is_output: bool,
}

impl ModelSlot {
    fn is_empty(&self) -> bool {
        self.item.is_none() || self.count == 0
    }

    fn holds(&self, item: &ItemId) -> bool {
        !self.is_empty() && self.item.as_ref() == Some(item)
    }

    /// How many `item` this slot can still accept; `fallback_max` applies to
    /// empty slots
    fn room_for(&self, item: &ItemId, fallback_max: u32) -> u32 {
        if self.is_output {
            0
        } else if self.is_empty() {
            fallback_max
        } else if self.holds(item) {
            self.max_count.saturating_sub(self.count)
        } else {
            0
        }
    }
}

/// Planning-time copy of the slot contents
struct SlotModel {
    slots: BTreeMap<usize, ModelSlot>,
}

impl SlotModel {
    fn capture<C: ContainerView>(container: &C) -> Self {
        let slots = container
            .slots()
            .iter()
            .filter_map(|desc| {
                let stack = container.stack_at(desc.index)?;
                Some((
                    desc.index,
                    ModelSlot {
                        item: stack.identity().cloned(),
                        count: stack.count(),
                        max_count: stack.max_count(),
                        is_output: desc.is_output,
                    },
                ))
            })
            .collect();
        Self { slots }
    }

    fn get(&self, index: usize) -> Option<&ModelSlot> {
        self.slots.get(&index)
    }

    /// Item, count and capacity of a non-empty slot
    fn contents(&self, index: usize) -> Option<(ItemId, u32, u32)> {
        let slot = self.get(index)?;
        let item = slot.item.clone().filter(|_| slot.count > 0)?;
        Some((item, slot.count, slot.max_count))
    }

    fn room_for(&self, index: usize, item: &ItemId, fallback_max: u32) -> u32 {
        self.get(index).map_or(0, |s| s.room_for(item, fallback_max))
    }

    fn record(&mut self, op: &MoveOp, ops: &mut Vec<MoveOp>) {
        match *op {
            MoveOp::Move { source, target, quantity } => {
                let (item, max_count) = match self.slots.get_mut(&source) {
                    Some(src) => {
                        let taken = quantity.min(src.count);
                        src.count -= taken;
                        let item = src.item.clone();
                        if src.count == 0 {
                            src.item = None;
                        }
                        (item, src.max_count)
                    }
                    None => return,
                };
                if let Some(dst) = self.slots.get_mut(&target) {
                    if dst.is_empty() {
                        dst.item = item;
                        dst.count = quantity;
                        dst.max_count = max_count;
                    } else {
                        dst.count += quantity;
                    }
                }
            }
            MoveOp::Drop { source } => {
                if let Some(src) = self.slots.get_mut(&source) {
                    src.item = None;
                    src.count = 0;
                }
            }
        }
        ops.push(op.clone());
    }
}

/// Ascending, de-duplicated targets without `source`
fn normalize_targets(source: usize, targets: &[usize]) -> Vec<usize> {
    let mut targets: Vec<usize> = targets.iter().copied().filter(|&t| t != source).collect();
    targets.sort_unstable();
    targets.dedup();
    targets
}

/// Sequences primitive moves for transfer intents
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferPlanner;

impl TransferPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plan moving the contents of `source` into `targets` using `mode`.
    ///
    /// An empty or missing source yields an empty plan.
    pub fn plan<C: ContainerView>(&self, container: &C, source: usize, targets: &[usize], mode: TransferMode) -> Vec<MoveOp> {
        let mut model = SlotModel::capture(container);
        let mut ops = Vec::new();
        let targets = normalize_targets(source, targets);
        plan_from(&mut model, source, &targets, mode, &mut ops);
        ops
    }

    /// Plan moving every stack in `sources` that holds the same item as
    /// `source` (including `source` itself) into `targets`.
    pub fn plan_matching<C: ContainerView>(&self, container: &C, source: usize, sources: &[usize], targets: &[usize]) -> Vec<MoveOp> {
        let mut model = SlotModel::capture(container);
        let mut ops = Vec::new();
        let Some((item, _, _)) = model.contents(source) else {
            return ops;
        };

        let mut sources: Vec<usize> = sources.iter().copied().chain(std::iter::once(source)).collect();
        sources.sort_unstable();
        sources.dedup();

        for src in sources {
            if !model.get(src).is_some_and(|s| s.holds(&item)) {
                continue;
            }
            let targets = normalize_targets(src, targets);
            plan_from(&mut model, src, &targets, TransferMode::WholeStack, &mut ops);
        }
        ops
    }

    /// Plan pulling one item matching `target`'s contents from the first of
    /// `sources` that holds it.
    pub fn plan_pull_one<C: ContainerView>(&self, container: &C, target: usize, sources: &[usize]) -> Vec<MoveOp> {
        let model = SlotModel::capture(container);
        let Some((item, _, _)) = model.contents(target) else {
            return Vec::new();
        };
        if model.room_for(target, &item, 0) == 0 {
            return Vec::new();
        }

        normalize_targets(target, sources)
            .into_iter()
            .find(|&src| model.get(src).is_some_and(|s| s.holds(&item)))
            .map(|src| vec![MoveOp::Move { source: src, target, quantity: 1 }])
            .unwrap_or_default()
    }

    /// Plan emptying every cell of `grid` into `targets`.
    pub fn plan_clear_grid<C: ContainerView>(&self, container: &C, grid: SlotRange, targets: &[usize]) -> Vec<MoveOp> {
        let mut model = SlotModel::capture(container);
        let mut ops = Vec::new();
        for cell in grid.iter() {
            let targets: Vec<usize> = normalize_targets(cell, targets)
                .into_iter()
                .filter(|t| !grid.contains(*t))
                .collect();
            plan_from(&mut model, cell, &targets, TransferMode::WholeStack, &mut ops);
        }
        ops
    }

    /// Plan laying `recipe` out in `grid` using items from `sources`.
    ///
    /// Cells whose contents do not match the recipe are cleared into
    /// `sources` first. With [`FillAmount::One`] each ingredient cell gains
    /// one item; with [`FillAmount::Max`] the available items of each
    /// ingredient are split evenly over the cells that need it.
    pub fn plan_recipe_fill<C: ContainerView>(
        &self,
        container: &C,
        recipe: &Recipe,
        grid: SlotRange,
        sources: &[usize],
        amount: FillAmount,
    ) -> Vec<MoveOp> {
        let mut model = SlotModel::capture(container);
        let mut ops = Vec::new();

        if grid.count() != recipe.ingredients().len() {
            warn!(
                "Recipe of {} cells does not fit crafting grid {}",
                recipe.ingredients().len(),
                grid
            );
            return ops;
        }

        let mut sources: Vec<usize> = sources.iter().copied().filter(|s| !grid.contains(*s)).collect();
        sources.sort_unstable();
        sources.dedup();

        // Clear cells holding something other than the recipe's ingredient
        for (cell, wanted) in grid.iter().zip(recipe.ingredients()) {
            let Some(slot) = model.get(cell) else { continue };
            let mismatched = match (&slot.item, wanted) {
                (_, _) if slot.is_empty() => false,
                (Some(present), Some(wanted)) => present != wanted,
                _ => true,
            };
            if mismatched {
                plan_from(&mut model, cell, &sources, TransferMode::WholeStack, &mut ops);
            }
        }

        // Group cells per ingredient, keeping first-appearance order
        let mut groups: Vec<(ItemId, Vec<usize>)> = Vec::new();
        for (cell, wanted) in grid.iter().zip(recipe.ingredients()) {
            let Some(item) = wanted else { continue };
            match groups.iter_mut().find(|(i, _)| i == item) {
                Some((_, cells)) => cells.push(cell),
                None => groups.push((item.clone(), vec![cell])),
            }
        }

        for (item, cells) in groups {
            let available: u32 = sources
                .iter()
                .filter_map(|&s| model.get(s))
                .filter(|s| s.holds(&item))
                .map(|s| s.count)
                .sum();
            let per_cell = match amount {
                FillAmount::One => 1,
                FillAmount::Max => available / cells.len() as u32,
            };
            if per_cell == 0 {
                debug!("Not enough {} to fill {} cell(s)", item, cells.len());
                continue;
            }

            for cell in cells {
                let fallback_max = sources
                    .iter()
                    .filter_map(|&s| model.get(s))
                    .find(|s| s.holds(&item))
                    .map_or(0, |s| s.max_count);
                let mut wanted = per_cell.min(model.room_for(cell, &item, fallback_max));

                for &src in &sources {
                    if wanted == 0 {
                        break;
                    }
                    let Some(slot) = model.get(src) else { continue };
                    if !slot.holds(&item) {
                        continue;
                    }
                    let quantity = wanted.min(slot.count);
                    model.record(&MoveOp::Move { source: src, target: cell, quantity }, &mut ops);
                    wanted -= quantity;
                }
            }
        }

        ops
    }

    /// Apply `plan` in order, stopping at the first step the host rejects.
    ///
    /// Returns the number of steps applied.
    pub fn execute<C: ContainerView>(&self, container: &mut C, plan: &[MoveOp]) -> Result<usize, TransferError> {
        for (step, op) in plan.iter().enumerate() {
            let result = match *op {
                MoveOp::Move { source, target, quantity } => container.apply_move(source, target, quantity),
                MoveOp::Drop { source } => container.apply_drop(source),
            };
            if let Err(error) = result {
                return Err(TransferError::HostMoveFailure { step, error });
            }
        }
        Ok(plan.len())
    }

    /// Execute `plan`, logging a rejected step. Returns the steps applied.
    pub fn run<C: ContainerView>(&self, container: &mut C, plan: Vec<MoveOp>) -> usize {
        if plan.is_empty() {
            return 0;
        }
        match self.execute(container, &plan) {
            Ok(applied) => applied,
            Err(TransferError::HostMoveFailure { step, error }) => {
                warn!("Aborting transfer after {} of {} step(s): {}", step, plan.len(), error);
                step
            }
        }
    }
}

fn plan_from(model: &mut SlotModel, source: usize, targets: &[usize], mode: TransferMode, ops: &mut Vec<MoveOp>) {
    let Some((item, count, max_count)) = model.contents(source) else {
        return;
    };

    match mode {
        TransferMode::Drop => model.record(&MoveOp::Drop { source }, ops),
        TransferMode::SingleItem => {
            if let Some(&target) = targets
                .iter()
                .find(|&&t| model.room_for(t, &item, max_count) > 0)
            {
                model.record(&MoveOp::Move { source, target, quantity: 1 }, ops);
            }
        }
        TransferMode::WholeStack => {
            let mut remaining = count;
            let partials = targets.iter().filter(|&&t| model.get(t).is_some_and(|s| s.holds(&item)));
            let empties = targets.iter().filter(|&&t| model.get(t).is_some_and(|s| s.is_empty()));
            let order: Vec<usize> = partials.chain(empties).copied().collect();

            for target in order {
                if remaining == 0 {
                    break;
                }
                let quantity = remaining.min(model.room_for(target, &item, max_count));
                if quantity > 0 {
                    model.record(&MoveOp::Move { source, target, quantity }, ops);
                    remaining -= quantity;
                }
            }
        }
        TransferMode::ShiftDistribute => {
            let mut remaining = count;
            let mut eligible: Vec<usize> = targets
                .iter()
                .copied()
                .filter(|&t| model.room_for(t, &item, max_count) > 0)
                .collect();

            loop {
                eligible.retain(|&t| model.room_for(t, &item, max_count) > 0);
                if eligible.is_empty() || (remaining as usize) < eligible.len() {
                    break;
                }
                for &target in &eligible {
                    model.record(&MoveOp::Move { source, target, quantity: 1 }, ops);
                    remaining -= 1;
                }
            }
        }
    }
}

/// Slots outside the crafting grid that receive items moved "to storage"
/// from `source`.
///
/// Container slots move to the player inventory. Player slots move to the
/// container's storage slots, or, on screens without any (crafting table,
/// player inventory), between main inventory and hotbar.
pub fn storage_targets<C: ContainerView>(container: &C, registry: &SlotGridRegistry, source: &SlotDescriptor) -> Vec<usize> {
    let grid = registry.crafting_grid(container).map(|(_, range)| range);
    let in_grid = |i: usize| grid.is_some_and(|g| g.contains(i));

    if source.owner == SlotOwner::Container {
        return slots_where(container, |s| s.owner.is_player());
    }

    let storage = slots_where(container, |s| s.owner == SlotOwner::Container && !s.is_output && !in_grid(s.index));
    if !storage.is_empty() {
        return storage;
    }

    let other = match source.owner {
        SlotOwner::PlayerHotbar => SlotOwner::PlayerMain,
        _ => SlotOwner::PlayerHotbar,
    };
    slots_where(container, |s| s.owner == other)
}

/// Hotbar slots of `container`
pub fn hotbar_slots<C: ContainerView>(container: &C) -> Vec<usize> {
    slots_where(container, |s| s.owner == SlotOwner::PlayerHotbar)
}

/// Player inventory slots (main and hotbar) of `container`
pub fn player_slots<C: ContainerView>(container: &C) -> Vec<usize> {
    slots_where(container, |s| s.owner.is_player())
}

/// Slots sharing an owner with `source`, excluding outputs
pub fn same_section<C: ContainerView>(container: &C, source: &SlotDescriptor) -> Vec<usize> {
    slots_where(container, |s| s.owner == source.owner && !s.is_output)
}

fn slots_where<C, F>(container: &C, predicate: F) -> Vec<usize>
where
    C: ContainerView,
    F: Fn(&SlotDescriptor) -> bool,
{
    let mut slots: Vec<usize> = container
        .slots()
        .iter()
        .filter(|s| !s.is_output && predicate(s))
        .map(|s| s.index)
        .collect();
    slots.sort_unstable();
    slots
}
