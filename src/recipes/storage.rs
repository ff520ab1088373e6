/// Recipe storage
///
/// An ordered, paged list of stored recipes with a selection cursor. Recipes
/// are addressed by position: storing at the cursor either replaces the
/// selected entry or inserts a new one right after it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use tracing::{debug, info, warn};

use crate::error::{PersistenceError, RecipeError};
use crate::gui::grid_registry::SlotGridRegistry;
use crate::inventory::view::{ContainerView, SlotDescriptor};
use crate::persist::{load_json, save_json, LoadStatus, PersistenceSink};
use crate::recipes::Recipe;

/// Default number of recipes shown per page
pub const DEFAULT_RECIPES_PER_PAGE: usize = 9;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SavedRecipes {
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    selection: Option<usize>,
    #[serde(default)]
    recipes: Vec<Recipe>,
}

/// Current page and page count, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current: usize,
    pub total: usize,
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {}/{}", self.current, self.total)
    }
}

#[derive(Debug, Clone)]
pub struct RecipeStorage {
    recipes: Vec<Recipe>,
    selection: Option<usize>,
    recipes_per_page: usize,
    dirty: bool,
}

impl RecipeStorage {
    pub fn new(recipes_per_page: usize) -> Self {
        Self {
            recipes: Vec::new(),
            selection: None,
            recipes_per_page: recipes_per_page.max(1),
            dirty: false,
        }
    }

    /// Selected recipe index, `None` while the storage is empty
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Select `index`, clamped to the stored range. No-op when empty.
    pub fn change_selected_recipe(&mut self, index: usize) {
        let Some(last) = self.recipes.len().checked_sub(1) else {
            return;
        };
        let index = index.min(last);
        if self.selection != Some(index) {
            debug!("Selected recipe {}", index);
            self.selection = Some(index);
            self.dirty = true;
        }
    }

    /// Move the selection one step, stopping at either end
    pub fn scroll_selection(&mut self, forward: bool) {
        let Some(current) = self.selection else {
            return;
        };
        let next = if forward {
            current + 1
        } else {
            current.saturating_sub(1)
        };
        self.change_selected_recipe(next);
    }

    /// Snapshot the crafting grid that feeds `output` and store it at the
    /// cursor.
    ///
    /// With `overwrite` the selected entry is replaced; otherwise the recipe
    /// is inserted after the selection and becomes selected. On an empty
    /// storage both insert at index 0. Returns false, without changing
    /// anything, if `output` is not a registered output slot or is empty.
    pub fn store_crafting_recipe_to_current_selection<C: ContainerView>(
        &mut self,
        output: &SlotDescriptor,
        container: &C,
        registry: &SlotGridRegistry,
        overwrite: bool,
    ) -> bool {
        let Some(grid) = registry.lookup(container.container_type(), output) else {
            debug!("Slot {} is not a crafting output slot", output.index);
            return false;
        };

        match Recipe::from_grid(container, output, grid) {
            Ok(recipe) => {
                self.store_recipe(recipe, overwrite);
                true
            }
            Err(e) => {
                debug!("Not storing recipe: {}", e);
                false
            }
        }
    }

    /// Store `recipe` at the cursor, see
    /// [`store_crafting_recipe_to_current_selection`](Self::store_crafting_recipe_to_current_selection).
    /// Returns the index the recipe was stored at.
    pub fn store_recipe(&mut self, recipe: Recipe, overwrite: bool) -> usize {
        let index = match self.selection {
            Some(selected) if overwrite => {
                self.recipes[selected] = recipe;
                selected
            }
            Some(selected) => {
                self.recipes.insert(selected + 1, recipe);
                selected + 1
            }
            None => {
                self.recipes.insert(0, recipe);
                0
            }
        };

        info!(
            "{} recipe {} ({} stored)",
            if overwrite { "Stored" } else { "Inserted" },
            index,
            self.recipes.len()
        );
        self.selection = Some(index);
        self.dirty = true;
        index
    }

    /// Remove the selected recipe. The selection stays at the same position,
    /// or moves to the new last entry.
    pub fn remove_selected_recipe(&mut self) -> Option<Recipe> {
        let selected = self.selection?;
        let removed = self.recipes.remove(selected);
        self.selection = match self.recipes.len() {
            0 => None,
            len => Some(selected.min(len - 1)),
        };
        self.dirty = true;
        Some(removed)
    }

    pub fn recipe_count_per_page(&self) -> usize {
        self.recipes_per_page
    }

    /// First recipe index of the page holding the selection
    pub fn first_visible_recipe_id(&self) -> usize {
        let selected = self.selection.unwrap_or(0);
        (selected / self.recipes_per_page) * self.recipes_per_page
    }

    /// Recipe indices shown on the current page
    pub fn visible_recipe_ids(&self) -> Range<usize> {
        let first = self.first_visible_recipe_id();
        let end = (first + self.recipes_per_page).min(self.recipes.len());
        first..end.max(first)
    }

    pub fn page_info(&self) -> PageInfo {
        let total = self.recipes.len().div_ceil(self.recipes_per_page).max(1);
        PageInfo {
            current: self.first_visible_recipe_id() / self.recipes_per_page + 1,
            total,
        }
    }

    pub fn total_recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn selected_recipe(&self) -> Option<&Recipe> {
        self.selection.and_then(|i| self.recipes.get(i))
    }

    pub fn recipe(&self, id: usize) -> Result<&Recipe, RecipeError> {
        self.recipes.get(id).ok_or(RecipeError::IndexOutOfRange {
            index: id,
            count: self.recipes.len(),
        })
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// True if there are changes not yet written
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
        self.selection = None;
        self.dirty = false;
    }

    /// Write the recipes and selection to record `record`.
    pub fn write_to_disk(&mut self, sink: &mut dyn PersistenceSink, record: &str) -> Result<(), PersistenceError> {
        let saved = SavedRecipes {
            version: FORMAT_VERSION,
            saved_at: Some(Utc::now()),
            selection: self.selection,
            recipes: self.recipes.clone(),
        };
        save_json(sink, record, &saved)?;
        self.dirty = false;
        debug!("Wrote {} recipe(s) to '{}'", self.recipes.len(), record);
        Ok(())
    }

    /// Replace the contents with record `record`.
    ///
    /// A missing or unreadable record leaves the storage empty; the problem
    /// is logged and reported only through the returned status.
    pub fn read_from_disk(&mut self, sink: &dyn PersistenceSink, record: &str) -> LoadStatus {
        self.clear();

        match self.try_read(sink, record) {
            Ok(()) => {
                info!(
                    "Loaded {} recipe(s) from '{}', selection {:?}",
                    self.recipes.len(),
                    record,
                    self.selection
                );
                LoadStatus::Loaded
            }
            Err(e) if e.is_missing() => {
                debug!("No saved recipes in '{}'", record);
                LoadStatus::Missing
            }
            Err(e) => {
                warn!("Ignoring saved recipes: {}", e);
                self.clear();
                LoadStatus::Rejected
            }
        }
    }

    fn try_read(&mut self, sink: &dyn PersistenceSink, record: &str) -> Result<(), PersistenceError> {
        let saved: SavedRecipes = load_json(sink, record)?;
        if saved.version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                record: record.to_string(),
                version: saved.version,
            });
        }

        let total = saved.recipes.len();
        self.recipes = saved.recipes.into_iter().filter(Recipe::is_valid).collect();
        if self.recipes.len() < total {
            warn!("Dropped {} invalid recipe(s) from '{}'", total - self.recipes.len(), record);
        }

        self.selection = match self.recipes.len() {
            0 => None,
            len => Some(saved.selection.unwrap_or(0).min(len - 1)),
        };
        Ok(())
    }
}

impl Default for RecipeStorage {
    fn default() -> Self {
        Self::new(DEFAULT_RECIPES_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::grid_registry::KnownTypes;
    use crate::inventory::memory::{ItemStack, MemoryContainer};
    use crate::inventory::view::ItemId;
    use crate::persist::MemorySink;

    fn recipe(result: &str) -> Recipe {
        Recipe::new(vec![Some(ItemId::from("planks"))], ItemId::from(result), 1).unwrap()
    }

    fn storage_with(count: usize) -> RecipeStorage {
        let mut storage = RecipeStorage::default();
        for i in 0..count {
            storage.store_recipe(recipe(&format!("item_{}", i)), false);
        }
        storage
    }

    fn registry() -> SlotGridRegistry {
        let mut registry = SlotGridRegistry::new();
        registry.update_grid_definitions(&KnownTypes::vanilla(), &[]);
        registry
    }

    fn table_with_recipe() -> MemoryContainer {
        let mut table = MemoryContainer::crafting_table();
        table.set_stack(0, ItemStack::new("crafting_table", 1));
        for cell in [1, 2, 4, 5] {
            table.set_stack(cell, ItemStack::new("planks", 1));
        }
        table
    }

    #[test]
    fn test_empty_storage() {
        let storage = RecipeStorage::default();
        assert_eq!(storage.selection(), None);
        assert_eq!(storage.total_recipe_count(), 0);
        assert!(storage.selected_recipe().is_none());
        assert_eq!(
            storage.recipe(0).unwrap_err(),
            RecipeError::IndexOutOfRange { index: 0, count: 0 }
        );
    }

    #[test]
    fn test_change_selection_clamps() {
        let mut storage = storage_with(3);
        storage.change_selected_recipe(10);
        assert_eq!(storage.selection(), Some(2));
        storage.change_selected_recipe(0);
        assert_eq!(storage.selection(), Some(0));

        let mut empty = RecipeStorage::default();
        empty.change_selected_recipe(4);
        assert_eq!(empty.selection(), None);
    }

    #[test]
    fn test_scroll_selection_clamps_at_both_ends() {
        let mut storage = storage_with(3);
        storage.change_selected_recipe(2);
        storage.scroll_selection(true);
        storage.scroll_selection(true);
        assert_eq!(storage.selection(), Some(2));

        for _ in 0..5 {
            storage.scroll_selection(false);
        }
        assert_eq!(storage.selection(), Some(0));
        storage.scroll_selection(true);
        assert_eq!(storage.selection(), Some(1));
    }

    #[test]
    fn test_store_insert_grows_and_selects() {
        let registry = registry();
        let table = table_with_recipe();
        let output = table.slot(0).unwrap().clone();
        let mut storage = storage_with(3);
        storage.change_selected_recipe(1);

        assert!(storage.store_crafting_recipe_to_current_selection(&output, &table, &registry, false));
        assert_eq!(storage.total_recipe_count(), 4);
        assert_eq!(storage.selection(), Some(2));
        assert_eq!(storage.recipe(2).unwrap().result(), &ItemId::from("crafting_table"));
        assert_eq!(storage.recipe(3).unwrap().result(), &ItemId::from("item_2"));

        // Storing again at the same cursor keeps growing
        assert!(storage.store_crafting_recipe_to_current_selection(&output, &table, &registry, false));
        assert_eq!(storage.total_recipe_count(), 5);
        assert_eq!(storage.selection(), Some(3));
    }

    #[test]
    fn test_store_overwrite_keeps_count() {
        let registry = registry();
        let table = table_with_recipe();
        let output = table.slot(0).unwrap().clone();
        let mut storage = storage_with(3);
        storage.change_selected_recipe(1);

        assert!(storage.store_crafting_recipe_to_current_selection(&output, &table, &registry, true));
        assert_eq!(storage.total_recipe_count(), 3);
        assert_eq!(storage.selection(), Some(1));
        assert_eq!(storage.recipe(1).unwrap().result(), &ItemId::from("crafting_table"));
        assert_eq!(storage.recipe(1).unwrap().grid_size(), 3);
    }

    #[test]
    fn test_store_on_last_page_inserts_after_cursor() {
        let mut storage = storage_with(9);
        assert_eq!(storage.selection(), Some(8));
        let index = storage.store_recipe(recipe("tenth"), false);
        assert_eq!(index, 9);
        assert_eq!(storage.first_visible_recipe_id(), 9);
        assert_eq!(storage.visible_recipe_ids(), 9..10);
    }

    #[test]
    fn test_store_into_empty_storage() {
        let mut storage = RecipeStorage::default();
        assert_eq!(storage.store_recipe(recipe("a"), true), 0);
        assert_eq!(storage.total_recipe_count(), 1);
        assert_eq!(storage.selection(), Some(0));
    }

    #[test]
    fn test_store_rejects_non_output_and_empty_output() {
        let registry = registry();
        let mut table = table_with_recipe();
        let grid_slot = table.slot(1).unwrap().clone();
        let output = table.slot(0).unwrap().clone();
        let mut storage = RecipeStorage::default();

        assert!(!storage.store_crafting_recipe_to_current_selection(&grid_slot, &table, &registry, false));
        table.set_stack(0, ItemStack::empty());
        assert!(!storage.store_crafting_recipe_to_current_selection(&output, &table, &registry, false));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_pagination() {
        let mut storage = storage_with(10);
        storage.change_selected_recipe(9);
        assert_eq!(storage.recipe_count_per_page(), 9);
        assert_eq!(storage.first_visible_recipe_id(), 9);
        assert_eq!(storage.page_info(), PageInfo { current: 2, total: 2 });
        assert_eq!(storage.page_info().to_string(), "Page 2/2");

        storage.change_selected_recipe(4);
        assert_eq!(storage.first_visible_recipe_id(), 0);
        assert_eq!(storage.visible_recipe_ids(), 0..9);
        assert_eq!(RecipeStorage::default().page_info(), PageInfo { current: 1, total: 1 });
    }

    #[test]
    fn test_remove_selected() {
        let mut storage = storage_with(2);
        assert_eq!(storage.remove_selected_recipe().unwrap().result(), &ItemId::from("item_1"));
        assert_eq!(storage.selection(), Some(0));
        storage.remove_selected_recipe();
        assert_eq!(storage.selection(), None);
        assert!(storage.remove_selected_recipe().is_none());
    }

    #[test]
    fn test_disk_round_trip() {
        let mut sink = MemorySink::new();
        let mut storage = storage_with(5);
        storage.change_selected_recipe(3);
        storage.write_to_disk(&mut sink, "recipes").unwrap();
        assert!(!storage.is_dirty());

        let mut loaded = RecipeStorage::default();
        assert_eq!(loaded.read_from_disk(&sink, "recipes"), LoadStatus::Loaded);
        assert_eq!(loaded.recipes(), storage.recipes());
        assert_eq!(loaded.selection(), Some(3));
    }

    #[test]
    fn test_read_missing_or_corrupt_yields_empty() {
        let mut sink = MemorySink::new();
        let mut storage = storage_with(2);

        assert_eq!(storage.read_from_disk(&sink, "recipes"), LoadStatus::Missing);
        assert!(storage.is_empty());
        assert_eq!(storage.selection(), None);

        sink.insert("recipes", "{\"version\": 1, \"recipes\": [oops");
        let mut storage = storage_with(2);
        assert_eq!(storage.read_from_disk(&sink, "recipes"), LoadStatus::Rejected);
        assert!(storage.is_empty());

        sink.insert("recipes", "{\"version\": 7, \"recipes\": []}");
        assert_eq!(storage.read_from_disk(&sink, "recipes"), LoadStatus::Rejected);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_read_clamps_selection_and_drops_invalid() {
        let mut sink = MemorySink::new();
        sink.insert(
            "recipes",
            r#"{
                "version": 1,
                "selection": 12,
                "recipes": [
                    {"ingredients": ["planks"], "result": "button", "result_count": 1},
                    {"ingredients": ["planks", null], "result": "broken", "result_count": 1}
                ]
            }"#,
        );

        let mut storage = RecipeStorage::default();
        storage.read_from_disk(&sink, "recipes");
        assert_eq!(storage.total_recipe_count(), 1);
        assert_eq!(storage.selection(), Some(0));
    }
}
