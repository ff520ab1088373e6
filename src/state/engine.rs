/// Move action engine
///
/// Turns the host's input stream into inventory transfers. A press whose
/// button and modifiers match a binding arms a drag action; while the
/// trigger is held every newly hovered slot is planned and executed once.
/// Releasing the button or one of its modifiers, closing the screen, or
/// arming another action ends the stroke.
///
/// With the recipe view open the engine also drives recipe selection, recipe
/// storing and recipe replay into the crafting grid. On a merchant screen it
/// takes clicks and scrolls over the trade list.

use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, FeatureToggles};
use crate::gui::grid_registry::{ContainerTypeId, SlotGridRegistry, TypeResolver};
use crate::input::{ActionBinding, ActionBindings, InputEvent, KeyCode, Modifiers, MouseButton, MoveAction, Trigger};
use crate::inventory::planner::{self, FillAmount, MoveOp, TransferMode, TransferPlanner};
use crate::inventory::view::{ContainerView, ItemStackView, SlotDescriptor};
use crate::recipes::RecipeStorage;
use crate::villager::{TradeListView, VillagerTradeIndex};

/// The open container screen as seen by one event
pub struct ScreenContext<'a, C> {
    pub container: &'a mut C,
    pub hovered_slot: Option<usize>,
    /// Recipe id under the pointer in the recipe view
    pub hovered_recipe: Option<usize>,
    pub recipe_view_open: bool,
    /// Pointer is outside the screen's bounds
    pub pointer_outside: bool,
    /// Set while the pointer is over a merchant trade list
    pub trade_list: Option<TradeListView>,
}

impl<'a, C: ContainerView> ScreenContext<'a, C> {
    pub fn new(container: &'a mut C) -> Self {
        Self {
            container,
            hovered_slot: None,
            hovered_recipe: None,
            recipe_view_open: false,
            pointer_outside: false,
            trade_list: None,
        }
    }

    pub fn hovering(mut self, slot: Option<usize>) -> Self {
        self.hovered_slot = slot;
        self
    }

    pub fn with_recipe_view(mut self, hovered_recipe: Option<usize>) -> Self {
        self.recipe_view_open = true;
        self.hovered_recipe = hovered_recipe;
        self
    }

    pub fn outside(mut self) -> Self {
        self.pointer_outside = true;
        self
    }

    pub fn over_trade_list(mut self, list: TradeListView) -> Self {
        self.trade_list = Some(list);
        self
    }

    fn hovered(&self) -> Option<SlotDescriptor> {
        self.hovered_slot
            .and_then(|index| self.container.slot(index))
            .cloned()
    }
}

/// Everything [`MoveActionEngine::handle_event`] may read or change
pub struct EngineContext<'a, C> {
    /// `None` when no container screen is open
    pub screen: Option<ScreenContext<'a, C>>,
    pub recipes: &'a mut RecipeStorage,
    pub trades: &'a mut VillagerTradeIndex,
    /// Trader under the crosshair, if any
    pub targeted_trader: Option<Uuid>,
}

/// State of one stroke of an armed action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    binding: ActionBinding,
    origin: Option<usize>,
    visited: HashSet<usize>,
    /// The arming press was kept from the host, so its release is too
    press_consumed: bool,
}

impl DragSession {
    pub fn new(binding: ActionBinding, origin: Option<usize>) -> Self {
        Self {
            binding,
            origin,
            visited: HashSet::new(),
            press_consumed: false,
        }
    }

    pub fn action(&self) -> MoveAction {
        self.binding.action
    }

    pub fn binding(&self) -> ActionBinding {
        self.binding
    }

    /// Slot the stroke started on
    pub fn origin(&self) -> Option<usize> {
        self.origin
    }

    pub fn has_visited(&self, slot: usize) -> bool {
        self.visited.contains(&slot)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Mark `slot` visited; false if it already was
    fn visit(&mut self, slot: usize) -> bool {
        self.visited.insert(slot)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    Idle,
    Active(DragSession),
}

pub struct MoveActionEngine {
    bindings: ActionBindings,
    registry: SlotGridRegistry,
    toggles: FeatureToggles,
    blacklist: HashSet<ContainerTypeId>,
    planner: TransferPlanner,
    state: ActionState,
    /// Slot of the last left or right click, where a carried stack came from
    source_candidate: Option<usize>,
}

impl MoveActionEngine {
    pub fn new(registry: SlotGridRegistry, bindings: ActionBindings) -> Self {
        Self {
            bindings,
            registry,
            toggles: FeatureToggles::default(),
            blacklist: HashSet::new(),
            planner: TransferPlanner::new(),
            state: ActionState::Idle,
            source_candidate: None,
        }
    }

    /// Engine with the configured grids, bindings, toggles and blacklist
    pub fn from_config(config: &Config, resolver: &dyn TypeResolver) -> Self {
        let mut registry = SlotGridRegistry::new();
        let registered = registry.update_grid_definitions(resolver, &config.crafting_grid_definitions);
        debug!("Registered {} crafting grid(s)", registered);

        Self::new(registry, config.bindings.clone())
            .with_toggles(config.toggles)
            .with_blacklist(config.gui_blacklist.iter().map(|name| ContainerTypeId::new(name.as_str())))
    }

    pub fn with_toggles(mut self, toggles: FeatureToggles) -> Self {
        self.toggles = toggles;
        self
    }

    /// Container types on which every event is ignored
    pub fn with_blacklist<I>(mut self, container_types: I) -> Self
    where
        I: IntoIterator<Item = ContainerTypeId>,
    {
        self.blacklist = container_types.into_iter().collect();
        self
    }

    pub fn registry(&self) -> &SlotGridRegistry {
        &self.registry
    }

    pub fn bindings(&self) -> &ActionBindings {
        &self.bindings
    }

    pub fn state(&self) -> &ActionState {
        &self.state
    }

    pub fn active_action(&self) -> Option<MoveAction> {
        match &self.state {
            ActionState::Active(session) => Some(session.action()),
            ActionState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ActionState::Active(_))
    }

    /// End the current stroke, if any
    pub fn stop_dragging(&mut self) {
        if let ActionState::Active(session) = std::mem::take(&mut self.state) {
            info!(
                "Stopped '{}' after {} slot(s)",
                session.action(),
                session.visited_count()
            );
        }
    }

    /// Process one input event. Returns true if the event was consumed and
    /// should not reach the host's own handling.
    pub fn handle_event<C: ContainerView>(&mut self, event: &InputEvent, ctx: &mut EngineContext<'_, C>) -> bool {
        let EngineContext {
            screen,
            recipes,
            trades,
            targeted_trader,
        } = ctx;

        if let InputEvent::ScreenClosed = event {
            self.stop_dragging();
            self.source_candidate = None;
            return false;
        }

        let Some(screen) = screen.as_mut() else {
            self.stop_dragging();
            self.source_candidate = None;
            if let (InputEvent::Press { .. } | InputEvent::Scroll { .. }, Some(uuid)) = (event, *targeted_trader) {
                if self.toggles.villager_trade_list {
                    trades.set_last_interacted(uuid);
                }
            }
            return false;
        };

        if let Some(list) = screen.trade_list {
            if self.toggles.villager_trade_list && trades.has_interaction_target() {
                if let Some(consumed) = self.route_trade_list(event, &list, trades) {
                    return consumed;
                }
            }
        }

        if self.blacklist.contains(screen.container.container_type()) {
            self.stop_dragging();
            return false;
        }

        match *event {
            InputEvent::Press {
                trigger: Trigger::Key(key),
                modifiers,
            } => {
                self.check_held(modifiers);
                self.handle_key(key, modifiers, screen, recipes)
            }
            InputEvent::Press {
                trigger: Trigger::Mouse(button),
                modifiers,
            } => self.handle_click(button, modifiers, screen, recipes),
            InputEvent::Release { trigger, modifiers } => self.handle_release(trigger, modifiers),
            InputEvent::MouseMove { modifiers } => self.check_held(modifiers) && self.visit_hovered(screen),
            InputEvent::Scroll { amount, modifiers } => self.handle_scroll(amount, modifiers, screen, recipes),
            InputEvent::ScreenClosed => false,
        }
    }

    /// Stop the stroke if its modifiers are no longer held. Returns whether
    /// a stroke is still active.
    fn check_held(&mut self, modifiers: Modifiers) -> bool {
        let held = match &self.state {
            ActionState::Active(session) => modifiers.contains(session.binding().modifiers),
            ActionState::Idle => return false,
        };
        if !held {
            self.stop_dragging();
        }
        held
    }

    fn handle_key<C: ContainerView>(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        screen: &mut ScreenContext<'_, C>,
        recipes: &mut RecipeStorage,
    ) -> bool {
        if !screen.recipe_view_open || !self.toggles.recipe_view {
            return false;
        }
        navigate_recipes(recipes, key, modifiers.shift)
    }

    fn handle_click<C: ContainerView>(
        &mut self,
        button: MouseButton,
        modifiers: Modifiers,
        screen: &mut ScreenContext<'_, C>,
        recipes: &mut RecipeStorage,
    ) -> bool {
        if screen.recipe_view_open && self.toggles.recipe_view {
            if let Some(id) = screen.hovered_recipe {
                return self.handle_recipe_click(id, button, modifiers.shift, screen, recipes);
            }

            if button == MouseButton::Middle {
                if let Some(slot) = screen.hovered().filter(|s| self.registry.is_output_slot(&*screen.container, s)) {
                    let overwrite = !modifiers.shift;
                    recipes.store_crafting_recipe_to_current_selection(&slot, &*screen.container, &self.registry, overwrite);
                    return true;
                }
            }
        }

        if matches!(button, MouseButton::Left | MouseButton::Right) && screen.hovered_slot.is_some() {
            self.source_candidate = screen.hovered_slot;
        }

        if button == MouseButton::Right && modifiers == Modifiers::NONE && self.toggles.right_click_craft_stack {
            if let Some(slot) = screen.hovered().filter(|s| self.registry.is_output_slot(&*screen.container, s)) {
                self.stop_dragging();
                let crafted = self.craft_one_stack(&slot, &mut *screen.container);
                debug!("Crafted {} item(s) from slot {}", crafted, slot.index);
                return crafted > 0;
            }
        }

        if button == MouseButton::Left
            && modifiers == Modifiers::SHIFT
            && screen.pointer_outside
            && self.toggles.shift_drop_items
            && screen.container.carried().is_some()
        {
            self.stop_dragging();
            return self.shift_drop_items(&mut *screen.container);
        }

        let Some(binding) = self.bindings.lookup(button, modifiers) else {
            return false;
        };
        if !self.action_enabled(binding.action) {
            debug!("'{}' is disabled", binding.action);
            return false;
        }

        self.stop_dragging();
        let origin = screen.hovered_slot;
        debug!("Started '{}' on slot {:?}", binding.action, origin);
        self.state = ActionState::Active(DragSession::new(binding, origin));

        // Left to the host when nothing was moved, e.g. on an output slot
        let consumed = self.visit_hovered(screen);
        if let ActionState::Active(session) = &mut self.state {
            session.press_consumed = consumed;
        }
        consumed
    }

    fn handle_release(&mut self, trigger: Trigger, modifiers: Modifiers) -> bool {
        let ActionState::Active(session) = &self.state else {
            return false;
        };
        let binding = session.binding();
        let released_trigger = trigger == Trigger::Mouse(binding.button);
        let consumed = released_trigger && session.press_consumed;

        if released_trigger || !modifiers.contains(binding.modifiers) {
            self.stop_dragging();
        }
        consumed
    }

    fn handle_scroll<C: ContainerView>(
        &mut self,
        amount: i32,
        modifiers: Modifiers,
        screen: &mut ScreenContext<'_, C>,
        recipes: &mut RecipeStorage,
    ) -> bool {
        if amount == 0 {
            return false;
        }

        if screen.recipe_view_open && self.toggles.recipe_view {
            recipes.scroll_selection(amount < 0);
            return true;
        }

        if self.check_held(modifiers) {
            return self.visit_hovered(screen);
        }

        if !self.toggles.scroll_move_items {
            return false;
        }
        let Some(slot) = screen.hovered().filter(|s| !s.is_output) else {
            return false;
        };
        self.scroll_move(&slot, amount > 0, modifiers.shift, &mut *screen.container)
    }

    /// Plan and run the active action on the hovered slot, once per stroke.
    /// Returns whether anything was moved; false as well without a stroke or
    /// hovered slot, or on a slot already visited.
    fn visit_hovered<C: ContainerView>(&mut self, screen: &mut ScreenContext<'_, C>) -> bool {
        let Some(slot) = screen.hovered() else {
            return false;
        };
        let ActionState::Active(session) = &mut self.state else {
            return false;
        };
        if !session.visit(slot.index) {
            return false;
        }
        let action = session.action();

        let applied = self.apply_action(action, &slot, &mut *screen.container);
        debug!("'{}' on slot {}: {} step(s) applied", action, slot.index, applied);
        applied > 0
    }

    fn apply_action<C: ContainerView>(&self, action: MoveAction, slot: &SlotDescriptor, container: &mut C) -> usize {
        let plan = {
            let view: &C = container;
            let source = slot.index;

            match action {
                MoveAction::DragCraftSingleItem => {
                    if self.registry.is_output_slot(view, slot) {
                        let targets = planner::player_slots(view);
                        self.planner.plan(view, source, &targets, TransferMode::WholeStack)
                    } else {
                        Vec::new()
                    }
                }
                _ if slot.is_output => Vec::new(),
                MoveAction::MoveSingleItemToStorage => {
                    let targets = planner::storage_targets(view, &self.registry, slot);
                    self.planner.plan(view, source, &targets, TransferMode::SingleItem)
                }
                MoveAction::MoveAllItemsToStorage => {
                    let targets = planner::storage_targets(view, &self.registry, slot);
                    self.planner.plan(view, source, &targets, TransferMode::WholeStack)
                }
                MoveAction::MoveSingleItemToHotbarStorage => {
                    let targets = planner::hotbar_slots(view);
                    self.planner.plan(view, source, &targets, TransferMode::SingleItem)
                }
                MoveAction::MoveMatchingItemsToStorage => {
                    let targets = planner::storage_targets(view, &self.registry, slot);
                    let sources = planner::same_section(view, slot);
                    self.planner.plan_matching(view, source, &sources, &targets)
                }
                MoveAction::DropItems => self.planner.plan(view, source, &[], TransferMode::Drop),
                MoveAction::SpreadToCraftingGrid => match self.registry.crafting_grid(view) {
                    Some((_, grid)) if !grid.contains(source) => {
                        let cells: Vec<usize> = grid.iter().collect();
                        self.planner.plan(view, source, &cells, TransferMode::ShiftDistribute)
                    }
                    _ => Vec::new(),
                },
            }
        };

        self.planner.run(container, plan)
    }

    /// Idle scroll over `slot`: push one item (or the stack) to the other
    /// inventory, or pull one matching item (or a matching stack) back.
    fn scroll_move<C: ContainerView>(&self, slot: &SlotDescriptor, outward: bool, whole_stack: bool, container: &mut C) -> bool {
        let plan = {
            let view: &C = container;
            let other = planner::storage_targets(view, &self.registry, slot);

            if outward {
                let mode = if whole_stack {
                    TransferMode::WholeStack
                } else {
                    TransferMode::SingleItem
                };
                self.planner.plan(view, slot.index, &other, mode)
            } else if whole_stack {
                let item = view.stack_at(slot.index).and_then(|s| s.identity()).cloned();
                item.and_then(|item| {
                    other
                        .iter()
                        .copied()
                        .find(|&i| view.stack_at(i).is_some_and(|s| s.holds(&item)))
                })
                .map(|src| self.planner.plan(view, src, &[slot.index], TransferMode::WholeStack))
                .unwrap_or_default()
            } else {
                self.planner.plan_pull_one(view, slot.index, &other)
            }
        };

        self.planner.run(container, plan) > 0
    }

    /// Take results out of `output` into the player inventory until one full
    /// stack has been crafted, the result changes or nothing fits. Returns
    /// the number of items crafted.
    fn craft_one_stack<C: ContainerView>(&self, output: &SlotDescriptor, container: &mut C) -> u32 {
        let Some((item, stack_size)) = container
            .stack_at(output.index)
            .and_then(|s| s.identity().map(|item| (item.clone(), s.max_count())))
        else {
            return 0;
        };

        let mut crafted = 0;
        while crafted < stack_size {
            let plan = {
                let view: &C = container;
                if !view.stack_at(output.index).is_some_and(|s| s.holds(&item)) {
                    break;
                }
                let targets = planner::player_slots(view);
                self.planner.plan(view, output.index, &targets, TransferMode::WholeStack)
            };

            let applied = self.planner.run(container, plan.clone());
            let taken: u32 = plan
                .iter()
                .take(applied)
                .map(|op| match op {
                    MoveOp::Move { quantity, .. } => *quantity,
                    MoveOp::Drop { .. } => 0,
                })
                .sum();
            if taken == 0 {
                break;
            }
            crafted += taken;
        }
        crafted
    }

    /// Drop the carried stack, then every stack of the same item in the
    /// section it was picked up from.
    fn shift_drop_items<C: ContainerView>(&self, container: &mut C) -> bool {
        let Some(item) = container.carried().and_then(|s| s.identity()).cloned() else {
            return false;
        };
        if let Err(e) = container.drop_carried() {
            warn!("Failed to drop the carried stack: {}", e);
            return false;
        }

        let plan: Vec<MoveOp> = {
            let view: &C = container;
            match self.source_candidate.and_then(|index| view.slot(index)) {
                Some(origin) => planner::same_section(view, origin)
                    .into_iter()
                    .filter(|&index| view.stack_at(index).is_some_and(|s| s.holds(&item)))
                    .map(|source| MoveOp::Drop { source })
                    .collect(),
                None => Vec::new(),
            }
        };
        let dropped = self.planner.run(container, plan);
        debug!("Dropped the carried '{}' and {} matching stack(s)", item, dropped);
        true
    }

    /// Clicks and scrolls over the merchant trade list. Left click opens the
    /// hovered trade's page, middle click toggles it as a favourite, scrolling
    /// moves the list. Returns `None` for events the list does not take.
    fn route_trade_list(&mut self, event: &InputEvent, list: &TradeListView, trades: &mut VillagerTradeIndex) -> Option<bool> {
        match *event {
            InputEvent::Scroll { amount, .. } => {
                if amount != 0 && trades.scroll_trade_list(amount, list) {
                    debug!("Trade list scrolled to {}", trades.trade_list_position());
                }
                Some(true)
            }
            InputEvent::Press {
                trigger: Trigger::Mouse(button),
                ..
            } => {
                self.stop_dragging();
                match (button, list.hovered()) {
                    (MouseButton::Left, Some(trade)) => trades.set_last_page(trade),
                    (MouseButton::Middle, Some(trade)) => {
                        let favorite = trades.toggle_favorite(trade);
                        debug!("Trade {} favourite: {}", trade, favorite);
                    }
                    _ => {}
                }
                Some(true)
            }
            InputEvent::Release { trigger, modifiers } => {
                self.handle_release(trigger, modifiers);
                Some(matches!(trigger, Trigger::Mouse(_)))
            }
            _ => None,
        }
    }

    fn handle_recipe_click<C: ContainerView>(
        &self,
        id: usize,
        button: MouseButton,
        shift: bool,
        screen: &mut ScreenContext<'_, C>,
        recipes: &mut RecipeStorage,
    ) -> bool {
        if id >= recipes.total_recipe_count() {
            return false;
        }
        recipes.change_selected_recipe(id);

        let container = &mut *screen.container;
        let applied = match button {
            MouseButton::Left => {
                let amount = if shift { FillAmount::Max } else { FillAmount::One };
                self.fill_crafting_grid(recipes, id, amount, container)
            }
            MouseButton::Right => self.clear_crafting_grid(container),
            MouseButton::Middle => 0,
        };
        debug!("Recipe {} clicked with {:?}: {} step(s) applied", id, button, applied);
        true
    }

    fn fill_crafting_grid<C: ContainerView>(&self, recipes: &RecipeStorage, id: usize, amount: FillAmount, container: &mut C) -> usize {
        let plan = {
            let view: &C = container;
            let (Ok(recipe), Some((_, grid))) = (recipes.recipe(id), self.registry.crafting_grid(view)) else {
                return 0;
            };
            let sources = planner::player_slots(view);
            self.planner.plan_recipe_fill(view, recipe, grid, &sources, amount)
        };
        self.planner.run(container, plan)
    }

    fn clear_crafting_grid<C: ContainerView>(&self, container: &mut C) -> usize {
        let plan = {
            let view: &C = container;
            let Some((_, grid)) = self.registry.crafting_grid(view) else {
                return 0;
            };
            let targets = planner::player_slots(view);
            self.planner.plan_clear_grid(view, grid, &targets)
        };
        self.planner.run(container, plan)
    }

    fn action_enabled(&self, action: MoveAction) -> bool {
        match action {
            MoveAction::MoveSingleItemToStorage
            | MoveAction::MoveAllItemsToStorage
            | MoveAction::MoveSingleItemToHotbarStorage
            | MoveAction::MoveMatchingItemsToStorage => self.toggles.drag_move_items,
            MoveAction::DropItems => self.toggles.drag_drop_items,
            MoveAction::DragCraftSingleItem => self.toggles.drag_craft_items,
            MoveAction::SpreadToCraftingGrid => self.toggles.shift_place_items,
        }
    }
}

/// Recipe view keys: `1`-`9` pick an absolute index, Up/Down step by one,
/// Left/Right step by a page with Shift or half a page without. Moves that
/// would leave the stored range are ignored.
fn navigate_recipes(recipes: &mut RecipeStorage, key: KeyCode, shift: bool) -> bool {
    let Some(current) = recipes.selection() else {
        return false;
    };
    let per_page = recipes.recipe_count_per_page();
    let step = if shift { per_page } else { (per_page / 2).max(1) };

    let target = match key {
        KeyCode::Digit(digit @ 1..=9) => Some(usize::from(digit) - 1),
        KeyCode::Up => current.checked_sub(1),
        KeyCode::Down => Some(current + 1),
        KeyCode::Left => current.checked_sub(step),
        KeyCode::Right => Some(current + step),
        _ => None,
    };

    match target {
        Some(index) if index < recipes.total_recipe_count() => {
            recipes.change_selected_recipe(index);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::grid_registry::{vanilla, KnownTypes};
    use crate::inventory::memory::{AppliedOp, ItemStack, MemoryContainer};
    use crate::inventory::view::{ItemId, SlotOwner};
    use crate::recipes::Recipe;

    const CHEST_MAIN: usize = 27;

    fn engine() -> MoveActionEngine {
        MoveActionEngine::from_config(&Config::default(), &KnownTypes::vanilla())
    }

    fn send(
        engine: &mut MoveActionEngine,
        recipes: &mut RecipeStorage,
        container: &mut MemoryContainer,
        hovered: Option<usize>,
        event: InputEvent,
    ) -> bool {
        let mut trades = VillagerTradeIndex::new();
        let mut ctx = EngineContext {
            screen: Some(ScreenContext::new(container).hovering(hovered)),
            recipes,
            trades: &mut trades,
            targeted_trader: None,
        };
        engine.handle_event(&event, &mut ctx)
    }

    fn send_recipe_view(
        engine: &mut MoveActionEngine,
        recipes: &mut RecipeStorage,
        container: &mut MemoryContainer,
        hovered_slot: Option<usize>,
        hovered_recipe: Option<usize>,
        event: InputEvent,
    ) -> bool {
        let mut trades = VillagerTradeIndex::new();
        let screen = ScreenContext::new(container)
            .hovering(hovered_slot)
            .with_recipe_view(hovered_recipe);
        let mut ctx = EngineContext {
            screen: Some(screen),
            recipes,
            trades: &mut trades,
            targeted_trader: None,
        };
        engine.handle_event(&event, &mut ctx)
    }

    fn send_screen(
        engine: &mut MoveActionEngine,
        trades: &mut VillagerTradeIndex,
        screen: ScreenContext<'_, MemoryContainer>,
        event: InputEvent,
    ) -> bool {
        let mut recipes = RecipeStorage::default();
        let mut ctx = EngineContext {
            screen: Some(screen),
            recipes: &mut recipes,
            trades,
            targeted_trader: None,
        };
        engine.handle_event(&event, &mut ctx)
    }

    fn moves(container: &MemoryContainer) -> usize {
        container.log().len()
    }

    fn recipes_with(count: usize) -> RecipeStorage {
        let mut recipes = RecipeStorage::default();
        for i in 0..count {
            let recipe = Recipe::new(vec![Some(ItemId::from("planks"))], ItemId::new(format!("item_{}", i)), 1).unwrap();
            recipes.store_recipe(recipe, false);
        }
        recipes
    }

    #[test]
    fn test_unmapped_press_stays_idle() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(0, ItemStack::new("stone", 10));

        assert!(!send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::press(MouseButton::Left, Modifiers::NONE)));
        assert!(!engine.is_dragging());
        assert_eq!(moves(&chest), 0);
    }

    #[test]
    fn test_revisit_within_stroke_is_noop() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(0, ItemStack::new("stone", 10));

        assert!(send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::press(MouseButton::Left, Modifiers::SHIFT)));
        assert_eq!(engine.active_action(), Some(MoveAction::MoveAllItemsToStorage));
        assert_eq!(
            chest.log(),
            &[AppliedOp::Move { source: 0, target: CHEST_MAIN, quantity: 10 }]
        );

        chest.set_stack(0, ItemStack::new("stone", 5));
        assert!(!send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::mouse_move(Modifiers::SHIFT)));
        assert_eq!(moves(&chest), 1);

        // A new stroke may process the same slot again
        assert!(send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::release(MouseButton::Left, Modifiers::SHIFT)));
        assert!(!engine.is_dragging());
        send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::press(MouseButton::Left, Modifiers::SHIFT));
        assert_eq!(
            chest.log().last(),
            Some(&AppliedOp::Move { source: 0, target: CHEST_MAIN, quantity: 5 })
        );
    }

    #[test]
    fn test_drag_applies_in_visit_order() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(0, ItemStack::new("stone", 3));
        chest.set_stack(1, ItemStack::new("dirt", 2));
        chest.set_stack(2, ItemStack::new("sand", 4));

        send(&mut engine, &mut recipes, &mut chest, Some(2), InputEvent::press(MouseButton::Right, Modifiers::SHIFT));
        send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::mouse_move(Modifiers::SHIFT));
        send(&mut engine, &mut recipes, &mut chest, Some(1), InputEvent::mouse_move(Modifiers::SHIFT));

        let sources: Vec<usize> = chest
            .log()
            .iter()
            .map(|op| match op {
                AppliedOp::Move { source, quantity, .. } => {
                    assert_eq!(*quantity, 1);
                    *source
                }
                AppliedOp::Drop { source, .. } => *source,
                AppliedOp::DropCarried { .. } => panic!("nothing is carried"),
            })
            .collect();
        assert_eq!(sources, vec![2, 0, 1]);
    }

    #[test]
    fn test_modifier_release_stops_drag() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(1, ItemStack::new("stone", 10));

        send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::press(MouseButton::Left, Modifiers::SHIFT));
        assert!(engine.is_dragging());

        assert!(!send(&mut engine, &mut recipes, &mut chest, Some(1), InputEvent::mouse_move(Modifiers::NONE)));
        assert!(!engine.is_dragging());
        assert_eq!(moves(&chest), 0);
    }

    #[test]
    fn test_screen_closed_stops_drag() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);

        send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::press(MouseButton::Left, Modifiers::ALT));
        assert_eq!(engine.active_action(), Some(MoveAction::DropItems));
        assert!(!send(&mut engine, &mut recipes, &mut chest, None, InputEvent::ScreenClosed));
        assert_eq!(engine.state(), &ActionState::Idle);
    }

    #[test]
    fn test_new_action_replaces_active_one() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(0, ItemStack::new("stone", 10));

        send(&mut engine, &mut recipes, &mut chest, None, InputEvent::press(MouseButton::Left, Modifiers::SHIFT));
        assert_eq!(engine.active_action(), Some(MoveAction::MoveAllItemsToStorage));

        send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::press(MouseButton::Left, Modifiers::ALT));
        assert_eq!(engine.active_action(), Some(MoveAction::DropItems));
        assert_eq!(chest.log(), &[AppliedOp::Drop { source: 0, quantity: 10 }]);
        match engine.state() {
            ActionState::Active(session) => {
                assert_eq!(session.origin(), Some(0));
                assert!(session.has_visited(0));
            }
            ActionState::Idle => panic!("expected an active drag"),
        }
    }

    #[test]
    fn test_host_failure_keeps_session_active() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(0, ItemStack::new("stone", 10));
        chest.set_stack(1, ItemStack::new("dirt", 3));
        chest.set_stack(CHEST_MAIN, ItemStack::new("stone", 60));
        chest.set_stack(CHEST_MAIN + 2, ItemStack::new("dirt", 1));
        chest.reject_moves_into(CHEST_MAIN + 1);

        send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::press(MouseButton::Left, Modifiers::SHIFT));
        assert!(engine.is_dragging());
        assert_eq!(chest.stacks()[0].count, 6);

        assert!(send(&mut engine, &mut recipes, &mut chest, Some(1), InputEvent::mouse_move(Modifiers::SHIFT)));
        assert_eq!(
            chest.log(),
            &[
                AppliedOp::Move { source: 0, target: CHEST_MAIN, quantity: 4 },
                AppliedOp::Move { source: 1, target: CHEST_MAIN + 2, quantity: 3 },
            ]
        );
    }

    #[test]
    fn test_spread_to_crafting_grid() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut table = MemoryContainer::crafting_table();
        for cell in [1, 3, 5, 7] {
            table.set_stack(cell, ItemStack::new("dirt", 1));
        }
        table.set_stack(10, ItemStack::new("stone", 9));

        send(&mut engine, &mut recipes, &mut table, Some(10), InputEvent::press(MouseButton::Left, Modifiers::CTRL));
        assert_eq!(moves(&table), 5);
        assert_eq!(table.stacks()[10].count, 4);
        for cell in [2, 4, 6, 8, 9] {
            assert_eq!(table.stacks()[cell].count, 1);
        }
    }

    #[test]
    fn test_drag_craft_takes_output() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut table = MemoryContainer::crafting_table();
        table.set_stack(0, ItemStack::new("stick", 4));
        table.set_stack(11, ItemStack::new("dirt", 1));

        send(&mut engine, &mut recipes, &mut table, Some(11), InputEvent::press(MouseButton::Right, Modifiers::ALT));
        assert_eq!(moves(&table), 0);
        send(&mut engine, &mut recipes, &mut table, Some(0), InputEvent::mouse_move(Modifiers::ALT));
        assert_eq!(table.log(), &[AppliedOp::Move { source: 0, target: 10, quantity: 4 }]);
    }

    #[test]
    fn test_blacklisted_container_is_inert() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut creative = MemoryContainer::new(
            vanilla::CREATIVE,
            vec![
                SlotDescriptor::new(0, vanilla::GENERIC, SlotOwner::PlayerMain),
                SlotDescriptor::new(1, vanilla::GENERIC, SlotOwner::PlayerHotbar),
            ],
        );
        creative.set_stack(0, ItemStack::new("stone", 10));

        assert!(!send(&mut engine, &mut recipes, &mut creative, Some(0), InputEvent::press(MouseButton::Left, Modifiers::SHIFT)));
        assert!(!send(&mut engine, &mut recipes, &mut creative, Some(0), InputEvent::scroll(1, Modifiers::NONE)));
        assert!(!engine.is_dragging());
        assert_eq!(moves(&creative), 0);
    }

    #[test]
    fn test_disabled_toggle_leaves_press_unconsumed() {
        let toggles = FeatureToggles {
            drag_drop_items: false,
            ..FeatureToggles::default()
        };
        let mut engine = engine().with_toggles(toggles);
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(0, ItemStack::new("stone", 10));

        assert!(!send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::press(MouseButton::Left, Modifiers::ALT)));
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_idle_scroll_moves_one_item_each_way() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(0, ItemStack::new("stone", 10));

        assert!(send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::scroll(1, Modifiers::NONE)));
        assert_eq!(chest.stacks()[0].count, 9);
        assert_eq!(chest.stacks()[CHEST_MAIN].count, 1);

        assert!(send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::scroll(-1, Modifiers::NONE)));
        assert_eq!(chest.stacks()[0].count, 10);
        assert!(chest.stacks()[CHEST_MAIN].is_empty());

        assert!(send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::scroll(1, Modifiers::SHIFT)));
        assert!(chest.stacks()[0].is_empty());
        assert_eq!(chest.stacks()[CHEST_MAIN].count, 10);

        // Nothing matching left on the chest side to pull from
        assert!(!send(&mut engine, &mut recipes, &mut chest, Some(1), InputEvent::scroll(-1, Modifiers::NONE)));
    }

    #[test]
    fn test_recipe_view_keys() {
        let mut engine = engine();
        let mut recipes = recipes_with(20);
        let mut chest = MemoryContainer::chest(27);
        let mut key = |recipes: &mut RecipeStorage, key: KeyCode, modifiers: Modifiers| {
            send_recipe_view(&mut engine, recipes, &mut chest, None, None, InputEvent::key(key, modifiers))
        };

        assert!(key(&mut recipes, KeyCode::Digit(3), Modifiers::NONE));
        assert_eq!(recipes.selection(), Some(2));
        assert!(key(&mut recipes, KeyCode::Up, Modifiers::NONE));
        assert_eq!(recipes.selection(), Some(1));
        assert!(!key(&mut recipes, KeyCode::Left, Modifiers::NONE));
        assert_eq!(recipes.selection(), Some(1));
        assert!(key(&mut recipes, KeyCode::Right, Modifiers::NONE));
        assert_eq!(recipes.selection(), Some(5));
        assert!(key(&mut recipes, KeyCode::Right, Modifiers::SHIFT));
        assert_eq!(recipes.selection(), Some(14));
        assert!(!key(&mut recipes, KeyCode::Right, Modifiers::SHIFT));
        assert!(key(&mut recipes, KeyCode::Down, Modifiers::NONE));
        assert_eq!(recipes.selection(), Some(15));
        assert!(!key(&mut recipes, KeyCode::Other(65), Modifiers::NONE));
    }

    #[test]
    fn test_keys_ignored_without_recipe_view() {
        let mut engine = engine();
        let mut recipes = recipes_with(5);
        let mut chest = MemoryContainer::chest(27);
        assert!(!send(&mut engine, &mut recipes, &mut chest, None, InputEvent::key(KeyCode::Digit(1), Modifiers::NONE)));
        assert_eq!(recipes.selection(), Some(4));
    }

    #[test]
    fn test_recipe_view_scroll_changes_selection() {
        let mut engine = engine();
        let mut recipes = recipes_with(5);
        recipes.change_selected_recipe(2);
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(0, ItemStack::new("stone", 10));

        assert!(send_recipe_view(&mut engine, &mut recipes, &mut chest, Some(0), None, InputEvent::scroll(-1, Modifiers::NONE)));
        assert_eq!(recipes.selection(), Some(3));
        assert!(send_recipe_view(&mut engine, &mut recipes, &mut chest, Some(0), None, InputEvent::scroll(2, Modifiers::NONE)));
        assert_eq!(recipes.selection(), Some(2));
        assert_eq!(moves(&chest), 0);
    }

    #[test]
    fn test_recipe_click_fills_and_clears_grid() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut ingredients = vec![None; 9];
        ingredients[0] = Some(ItemId::from("planks"));
        recipes.store_recipe(Recipe::new(ingredients, ItemId::from("button"), 1).unwrap(), false);
        recipes.store_recipe(Recipe::new(vec![None], ItemId::from("other"), 1).unwrap(), false);

        let mut table = MemoryContainer::crafting_table();
        table.set_stack(10, ItemStack::new("planks", 5));

        assert!(send_recipe_view(&mut engine, &mut recipes, &mut table, None, Some(0), InputEvent::press(MouseButton::Left, Modifiers::NONE)));
        assert_eq!(recipes.selection(), Some(0));
        assert_eq!(table.stacks()[1].count, 1);
        assert_eq!(table.stacks()[10].count, 4);

        send_recipe_view(&mut engine, &mut recipes, &mut table, None, Some(0), InputEvent::press(MouseButton::Left, Modifiers::SHIFT));
        assert_eq!(table.stacks()[1].count, 5);
        assert!(table.stacks()[10].is_empty());

        send_recipe_view(&mut engine, &mut recipes, &mut table, None, Some(0), InputEvent::press(MouseButton::Right, Modifiers::NONE));
        assert!(table.stacks()[1].is_empty());
        assert_eq!(table.total_of(&ItemId::from("planks")), 5);

        assert!(send_recipe_view(&mut engine, &mut recipes, &mut table, None, Some(1), InputEvent::press(MouseButton::Middle, Modifiers::NONE)));
        assert_eq!(recipes.selection(), Some(1));
        assert!(!send_recipe_view(&mut engine, &mut recipes, &mut table, None, Some(7), InputEvent::press(MouseButton::Middle, Modifiers::NONE)));
    }

    #[test]
    fn test_middle_click_stores_recipe() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut table = MemoryContainer::crafting_table();
        table.set_stack(0, ItemStack::new("crafting_table", 1));
        for cell in [1, 2, 4, 5] {
            table.set_stack(cell, ItemStack::new("planks", 1));
        }

        assert!(send_recipe_view(&mut engine, &mut recipes, &mut table, Some(0), None, InputEvent::press(MouseButton::Middle, Modifiers::NONE)));
        assert_eq!(recipes.total_recipe_count(), 1);
        assert!(send_recipe_view(&mut engine, &mut recipes, &mut table, Some(0), None, InputEvent::press(MouseButton::Middle, Modifiers::NONE)));
        assert_eq!(recipes.total_recipe_count(), 1);
        assert!(send_recipe_view(&mut engine, &mut recipes, &mut table, Some(0), None, InputEvent::press(MouseButton::Middle, Modifiers::SHIFT)));
        assert_eq!(recipes.total_recipe_count(), 2);
        assert_eq!(recipes.selection(), Some(1));

        // Not an output slot
        assert!(!send_recipe_view(&mut engine, &mut recipes, &mut table, Some(1), None, InputEvent::press(MouseButton::Middle, Modifiers::NONE)));
    }

    #[test]
    fn test_villager_target_captured_without_screen() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut trades = VillagerTradeIndex::new();
        let trader = Uuid::new_v4();

        let mut ctx: EngineContext<'_, MemoryContainer> = EngineContext {
            screen: None,
            recipes: &mut recipes,
            trades: &mut trades,
            targeted_trader: Some(trader),
        };
        assert!(!engine.handle_event(&InputEvent::press(MouseButton::Right, Modifiers::NONE), &mut ctx));
        assert_eq!(trades.last_interacted(), Some(trader));
    }

    #[test]
    fn test_press_without_moves_is_left_to_host() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut table = MemoryContainer::crafting_table();
        table.set_stack(0, ItemStack::new("stick", 4));

        // Shift+left on the output is the host's own shift-craft
        assert!(!send(&mut engine, &mut recipes, &mut table, Some(0), InputEvent::press(MouseButton::Left, Modifiers::SHIFT)));
        assert_eq!(moves(&table), 0);
        assert!(engine.is_dragging());
        assert!(!send(&mut engine, &mut recipes, &mut table, Some(0), InputEvent::release(MouseButton::Left, Modifiers::SHIFT)));
        assert!(!engine.is_dragging());

        // Same for an empty slot
        assert!(!send(&mut engine, &mut recipes, &mut table, Some(12), InputEvent::press(MouseButton::Left, Modifiers::SHIFT)));
        assert_eq!(moves(&table), 0);
    }

    #[test]
    fn test_scroll_continues_active_stroke() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(0, ItemStack::new("stone", 10));
        chest.set_stack(1, ItemStack::new("dirt", 3));

        assert!(send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::press(MouseButton::Left, Modifiers::SHIFT)));
        assert_eq!(moves(&chest), 1);

        assert!(send(&mut engine, &mut recipes, &mut chest, Some(1), InputEvent::scroll(1, Modifiers::SHIFT)));
        assert_eq!(engine.active_action(), Some(MoveAction::MoveAllItemsToStorage));
        assert_eq!(
            chest.log(),
            &[
                AppliedOp::Move { source: 0, target: CHEST_MAIN, quantity: 10 },
                AppliedOp::Move { source: 1, target: CHEST_MAIN + 1, quantity: 3 },
            ]
        );

        // Already visited in this stroke, and no idle scroll-move either
        chest.set_stack(1, ItemStack::new("dirt", 2));
        assert!(!send(&mut engine, &mut recipes, &mut chest, Some(1), InputEvent::scroll(-1, Modifiers::SHIFT)));
        assert_eq!(moves(&chest), 2);
        assert!(engine.is_dragging());
    }

    #[test]
    fn test_unrelated_release_keeps_stroke() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut chest = MemoryContainer::chest(27);
        chest.set_stack(0, ItemStack::new("stone", 10));
        chest.set_stack(1, ItemStack::new("dirt", 3));

        send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::press(MouseButton::Left, Modifiers::SHIFT));
        assert!(!send(&mut engine, &mut recipes, &mut chest, Some(0), InputEvent::release(MouseButton::Right, Modifiers::SHIFT)));
        assert!(!send(
            &mut engine,
            &mut recipes,
            &mut chest,
            Some(0),
            InputEvent::Release {
                trigger: Trigger::Key(KeyCode::Digit(1)),
                modifiers: Modifiers::SHIFT,
            }
        ));
        assert_eq!(engine.active_action(), Some(MoveAction::MoveAllItemsToStorage));

        assert!(send(&mut engine, &mut recipes, &mut chest, Some(1), InputEvent::mouse_move(Modifiers::SHIFT)));
        assert_eq!(moves(&chest), 2);
    }

    #[test]
    fn test_right_click_crafts_one_stack() {
        let mut engine = engine();
        let mut recipes = RecipeStorage::default();
        let mut table = MemoryContainer::crafting_table();
        table.set_stack(0, ItemStack::new("stick", 4));
        table.set_stack(10, ItemStack::new("stick", 62));

        assert!(send(&mut engine, &mut recipes, &mut table, Some(0), InputEvent::press(MouseButton::Right, Modifiers::NONE)));
        assert_eq!(
            table.log(),
            &[
                AppliedOp::Move { source: 0, target: 10, quantity: 2 },
                AppliedOp::Move { source: 0, target: 11, quantity: 2 },
            ]
        );
        assert!(table.stacks()[0].is_empty());
        assert!(!engine.is_dragging());

        // Nothing left to craft
        assert!(!send(&mut engine, &mut recipes, &mut table, Some(0), InputEvent::press(MouseButton::Right, Modifiers::NONE)));
    }

    #[test]
    fn test_right_click_craft_toggle() {
        let toggles = FeatureToggles {
            right_click_craft_stack: false,
            ..FeatureToggles::default()
        };
        let mut engine = engine().with_toggles(toggles);
        let mut recipes = RecipeStorage::default();
        let mut table = MemoryContainer::crafting_table();
        table.set_stack(0, ItemStack::new("stick", 4));

        assert!(!send(&mut engine, &mut recipes, &mut table, Some(0), InputEvent::press(MouseButton::Right, Modifiers::NONE)));
        assert_eq!(moves(&table), 0);
    }

    #[test]
    fn test_shift_drop_outside_screen() {
        let mut engine = engine();
        let mut trades = VillagerTradeIndex::new();
        let mut chest = MemoryContainer::chest(27);
        let player = CHEST_MAIN;
        chest.set_stack(0, ItemStack::new("stone", 8));
        chest.set_stack(player + 3, ItemStack::new("stone", 5));
        chest.set_stack(player + 4, ItemStack::new("stone", 3));
        chest.set_stack(player + 8, ItemStack::new("stone", 2));
        chest.set_stack(player + 9, ItemStack::new("dirt", 1));

        // The host picks the stack up on a plain click
        assert!(!send_screen(
            &mut engine,
            &mut trades,
            ScreenContext::new(&mut chest).hovering(Some(player + 3)),
            InputEvent::press(MouseButton::Left, Modifiers::NONE)
        ));
        chest.set_stack(player + 3, ItemStack::empty());
        chest.set_carried(ItemStack::new("stone", 5));

        assert!(send_screen(
            &mut engine,
            &mut trades,
            ScreenContext::new(&mut chest).outside(),
            InputEvent::press(MouseButton::Left, Modifiers::SHIFT)
        ));
        assert_eq!(
            chest.log(),
            &[
                AppliedOp::DropCarried { quantity: 5 },
                AppliedOp::Drop { source: player + 4, quantity: 3 },
                AppliedOp::Drop { source: player + 8, quantity: 2 },
            ]
        );
        assert_eq!(chest.stacks()[0].count, 8);
        assert_eq!(chest.stacks()[player + 9].count, 1);
        assert!(!engine.is_dragging());

        // Nothing carried: the gesture falls back to the binding table
        assert!(!send_screen(
            &mut engine,
            &mut trades,
            ScreenContext::new(&mut chest).outside(),
            InputEvent::press(MouseButton::Left, Modifiers::SHIFT)
        ));
        assert_eq!(moves(&chest), 3);
    }

    #[test]
    fn test_trade_list_routing() {
        let mut engine = engine();
        let mut trades = VillagerTradeIndex::new();
        let mut merchant = MemoryContainer::chest(3);
        let list = TradeListView::new(10, 7).hovering(Some(4));
        let mut over_list = |engine: &mut MoveActionEngine, trades: &mut VillagerTradeIndex, event: InputEvent| {
            send_screen(engine, trades, ScreenContext::new(&mut merchant).over_trade_list(list), event)
        };

        // No trader targeted yet
        assert!(!over_list(&mut engine, &mut trades, InputEvent::scroll(-1, Modifiers::NONE)));

        trades.set_last_interacted(Uuid::new_v4());
        assert!(over_list(&mut engine, &mut trades, InputEvent::press(MouseButton::Left, Modifiers::NONE)));
        assert_eq!(trades.last_page(), 4);
        assert!(over_list(&mut engine, &mut trades, InputEvent::release(MouseButton::Left, Modifiers::NONE)));
        assert!(over_list(&mut engine, &mut trades, InputEvent::press(MouseButton::Middle, Modifiers::NONE)));
        assert_eq!(trades.favorites(), vec![4]);
        assert!(over_list(&mut engine, &mut trades, InputEvent::scroll(-2, Modifiers::NONE)));
        assert_eq!(trades.trade_list_position(), 2);
        assert!(trades.is_dirty());

        // Keys are not the list's
        assert!(!over_list(&mut engine, &mut trades, InputEvent::key(KeyCode::Down, Modifiers::NONE)));

        let mut engine = engine.with_toggles(FeatureToggles {
            villager_trade_list: false,
            ..FeatureToggles::default()
        });
        assert!(!over_list(&mut engine, &mut trades, InputEvent::press(MouseButton::Left, Modifiers::NONE)));
        assert_eq!(trades.trade_list_position(), 2);
    }
}
