/// Replay scripts
///
/// A replay script describes a container, its initial contents and a list
/// of input events. Running it feeds the events through a
/// [`SessionManager`] against a [`MemoryContainer`], the way a host would
/// during a real session.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::input::InputEvent;
use crate::inventory::memory::{AppliedOp, ItemStack, MemoryContainer};
use crate::inventory::view::{ContainerView, ItemId, ItemStackView};
use crate::persist::PersistenceSink;
use crate::state::{ScreenContext, SessionManager};
use crate::villager::TradeListView;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layout {
    Chest { slots: usize },
    CraftingTable,
    PlayerInventory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotStack {
    pub slot: usize,
    pub item: ItemId,
    pub count: u32,
    #[serde(default)]
    pub max_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSetup {
    pub layout: Layout,
    #[serde(default)]
    pub stacks: Vec<SlotStack>,
    /// Stack on the cursor when the script starts
    #[serde(default)]
    pub carried: Option<ItemStack>,
}

/// One event plus the screen state it happens in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayStep {
    pub event: InputEvent,
    #[serde(default)]
    pub hovered_slot: Option<usize>,
    #[serde(default)]
    pub hovered_recipe: Option<usize>,
    #[serde(default)]
    pub recipe_view: bool,
    /// The event happens with no container screen open
    #[serde(default)]
    pub no_screen: bool,
    #[serde(default)]
    pub pointer_outside: bool,
    #[serde(default)]
    pub trade_list: Option<TradeListView>,
    #[serde(default)]
    pub targeted_trader: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub world: Option<String>,
    pub container: ContainerSetup,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

/// What a replay did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub events: usize,
    pub consumed: usize,
    pub applied: Vec<AppliedOp>,
}

impl ReplayScript {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay script {:?}", path))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse replay script {:?}", path))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Build the container described by the script
    pub fn build_container(&self) -> Result<MemoryContainer> {
        let mut container = match self.container.layout {
            Layout::Chest { slots } => MemoryContainer::chest(slots),
            Layout::CraftingTable => MemoryContainer::crafting_table(),
            Layout::PlayerInventory => MemoryContainer::player_inventory(),
        };

        for stack in &self.container.stacks {
            if stack.slot >= container.slots().len() {
                bail!(
                    "slot {} does not exist, the container has {} slots",
                    stack.slot,
                    container.slots().len()
                );
            }
            let mut item = ItemStack::new(stack.item.clone(), stack.count);
            if let Some(max_count) = stack.max_count {
                item = item.with_max_count(max_count);
            }
            container.set_stack(stack.slot, item);
        }
        if let Some(carried) = &self.container.carried {
            container.set_carried(carried.clone());
        }
        Ok(container)
    }

    /// Feed every step through `manager`. The session must already be
    /// started.
    pub fn run<S: PersistenceSink>(&self, manager: &mut SessionManager<S>, container: &mut MemoryContainer) -> ReplayOutcome {
        let mut outcome = ReplayOutcome::default();

        for (index, step) in self.steps.iter().enumerate() {
            let screen = if step.no_screen {
                None
            } else {
                let mut screen = ScreenContext::new(&mut *container).hovering(step.hovered_slot);
                if step.recipe_view {
                    screen = screen.with_recipe_view(step.hovered_recipe);
                }
                if step.pointer_outside {
                    screen = screen.outside();
                }
                if let Some(list) = step.trade_list {
                    screen = screen.over_trade_list(list);
                }
                Some(screen)
            };

            let consumed = manager.handle_event(&step.event, screen, step.targeted_trader);
            outcome.events += 1;
            if consumed {
                outcome.consumed += 1;
            }

            for op in container.take_log() {
                info!("step {}: {}", index, describe_op(&op));
                outcome.applied.push(op);
            }
        }
        outcome
    }
}

fn describe_op(op: &AppliedOp) -> String {
    match op {
        AppliedOp::Move { source, target, quantity } => {
            format!("moved {} item(s) from slot {} to slot {}", quantity, source, target)
        }
        AppliedOp::Drop { source, quantity } => format!("dropped {} item(s) from slot {}", quantity, source),
        AppliedOp::DropCarried { quantity } => format!("dropped {} carried item(s)", quantity),
    }
}

/// One line per non-empty slot, `<index>: <count> x <item>`
pub fn format_contents(container: &MemoryContainer) -> String {
    let mut out = String::new();
    for (index, stack) in container.stacks().iter().enumerate() {
        if let Some(item) = stack.identity() {
            let _ = writeln!(out, "{:>3}: {} x {}", index, stack.count(), item);
        }
    }
    out
}
