use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::gui::grid_registry::TypeResolver;
use crate::input::InputEvent;
use crate::inventory::view::ContainerView;
use crate::persist::{record_name, LoadStatus, PersistenceSink, RECIPES_RECORD, VILLAGER_TRADES_RECORD};
use crate::recipes::RecipeStorage;
use crate::state::engine::{EngineContext, MoveActionEngine, ScreenContext};
use crate::villager::VillagerTradeIndex;

/// Owns the engine and both stores for the lifetime of a world session.
///
/// `start_session` loads the recipe and trade records for a world,
/// `end_session` writes them back and empties the stores. A record that
/// existed but could not be read is only overwritten once its store has
/// changed.
pub struct SessionManager<S: PersistenceSink> {
    engine: MoveActionEngine,
    recipes: RecipeStorage,
    trades: VillagerTradeIndex,
    sink: S,
    persist_on_change: bool,
    global_records: bool,
    world: Option<String>,
    active: bool,
    recipes_rejected: bool,
    trades_rejected: bool,
}

impl<S: PersistenceSink> SessionManager<S> {
    pub fn new(config: &Config, resolver: &dyn TypeResolver, sink: S) -> Self {
        Self {
            engine: MoveActionEngine::from_config(config, resolver),
            recipes: RecipeStorage::new(config.generic.recipes_per_page()),
            trades: VillagerTradeIndex::new(),
            sink,
            persist_on_change: config.generic.persist_recipes_on_change,
            global_records: config.generic.global_recipe_file,
            world: None,
            active: false,
            recipes_rejected: false,
            trades_rejected: false,
        }
    }

    /// Load both stores for `world`. A session that is already running is
    /// ended first.
    pub fn start_session(&mut self, world: Option<&str>) {
        if self.active {
            self.end_session();
        }

        self.world = world.map(str::to_string);
        self.active = true;
        tracing::info!("Session started for world {:?}", self.world);

        let recipes = self.recipes_record();
        let trades = self.trades_record();
        self.recipes_rejected = self.recipes.read_from_disk(&self.sink, &recipes) == LoadStatus::Rejected;
        self.trades_rejected = self.trades.read_from_disk(&self.sink, &trades) == LoadStatus::Rejected;
    }

    /// Stop any drag and write both stores. No-op without a session.
    pub fn end_session(&mut self) {
        if !self.active {
            return;
        }

        self.engine.stop_dragging();
        self.write_recipes();
        self.write_trades();
        self.recipes.clear();
        self.trades.clear();
        self.active = false;
        tracing::info!("Session ended for world {:?}", self.world);
    }

    /// Route one input event through the engine. Ignored outside a session.
    pub fn handle_event<C: ContainerView>(
        &mut self,
        event: &InputEvent,
        screen: Option<ScreenContext<'_, C>>,
        targeted_trader: Option<Uuid>,
    ) -> bool {
        if !self.active {
            return false;
        }

        let mut ctx = EngineContext {
            screen,
            recipes: &mut self.recipes,
            trades: &mut self.trades,
            targeted_trader,
        };
        let consumed = self.engine.handle_event(event, &mut ctx);

        if self.persist_on_change {
            if self.recipes.is_dirty() {
                self.write_recipes();
            }
            if self.trades.is_dirty() {
                self.write_trades();
            }
        }
        consumed
    }

    fn write_recipes(&mut self) {
        let record = self.recipes_record();
        if self.recipes_rejected && !self.recipes.is_dirty() {
            debug!("Keeping unreadable record '{}' untouched", record);
            return;
        }
        match self.recipes.write_to_disk(&mut self.sink, &record) {
            Ok(()) => self.recipes_rejected = false,
            Err(e) => warn!("Failed to save recipes: {}", e),
        }
    }

    fn write_trades(&mut self) {
        let record = self.trades_record();
        if self.trades_rejected && !self.trades.is_dirty() {
            debug!("Keeping unreadable record '{}' untouched", record);
            return;
        }
        match self.trades.write_to_disk(&mut self.sink, &record) {
            Ok(()) => self.trades_rejected = false,
            Err(e) => warn!("Failed to save villager trades: {}", e),
        }
    }

    pub fn recipes_record(&self) -> String {
        record_name(RECIPES_RECORD, self.world.as_deref(), self.global_records)
    }

    pub fn trades_record(&self) -> String {
        // Trades are per world even with a global recipe file
        record_name(VILLAGER_TRADES_RECORD, self.world.as_deref(), false)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn world(&self) -> Option<&str> {
        self.world.as_deref()
    }

    pub fn engine(&self) -> &MoveActionEngine {
        &self.engine
    }

    pub fn recipes(&self) -> &RecipeStorage {
        &self.recipes
    }

    pub fn recipes_mut(&mut self) -> &mut RecipeStorage {
        &mut self.recipes
    }

    pub fn trades(&self) -> &VillagerTradeIndex {
        &self.trades
    }

    pub fn trades_mut(&mut self) -> &mut VillagerTradeIndex {
        &mut self.trades
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
