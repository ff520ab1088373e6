use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::gui::grid_registry::vanilla;
use crate::input::ActionBindings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_gui_blacklist")]
    pub gui_blacklist: Vec<String>,

    /// Extra crafting grids, `"<container>,<slot_type>,<output_index>,<first>-<last>"`
    #[serde(default)]
    pub crafting_grid_definitions: Vec<String>,

    #[serde(default)]
    pub generic: GenericConfig,

    #[serde(default)]
    pub toggles: FeatureToggles,

    #[serde(default)]
    pub bindings: ActionBindings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericConfig {
    #[serde(default = "default_true")]
    pub persist_recipes_on_change: bool,

    /// One recipe file for every world instead of one per world
    #[serde(default)]
    pub global_recipe_file: bool,

    #[serde(default = "default_recipes_per_page")]
    pub recipes_per_page: usize,

    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Per-feature switches. A disabled feature leaves its events unconsumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureToggles {
    #[serde(default = "default_true")]
    pub drag_move_items: bool,

    #[serde(default = "default_true")]
    pub drag_drop_items: bool,

    #[serde(default = "default_true")]
    pub drag_craft_items: bool,

    #[serde(default = "default_true")]
    pub scroll_move_items: bool,

    /// Spreading a stack over the crafting grid
    #[serde(default = "default_true")]
    pub shift_place_items: bool,

    /// Shift+left click outside the screen drops the carried stack and its matches
    #[serde(default = "default_true")]
    pub shift_drop_items: bool,

    /// Plain right click on a crafting output crafts one full stack
    #[serde(default = "default_true")]
    pub right_click_craft_stack: bool,

    #[serde(default = "default_true")]
    pub villager_trade_list: bool,

    #[serde(default = "default_true")]
    pub recipe_view: bool,
}

// Default values
fn default_true() -> bool {
    true
}

fn default_recipes_per_page() -> usize {
    9
}

fn default_gui_blacklist() -> Vec<String> {
    vec![vanilla::CREATIVE.to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gui_blacklist: default_gui_blacklist(),
            crafting_grid_definitions: Vec::new(),
            generic: GenericConfig::default(),
            toggles: FeatureToggles::default(),
            bindings: ActionBindings::default(),
        }
    }
}

impl Default for GenericConfig {
    fn default() -> Self {
        Self {
            persist_recipes_on_change: true,
            global_recipe_file: false,
            recipes_per_page: default_recipes_per_page(),
            data_dir: None,
        }
    }
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            drag_move_items: true,
            drag_drop_items: true,
            drag_craft_items: true,
            scroll_move_items: true,
            shift_place_items: true,
            shift_drop_items: true,
            right_click_craft_stack: true,
            villager_trade_list: true,
            recipe_view: true,
        }
    }
}

impl GenericConfig {
    /// Page size, never below one
    pub fn recipes_per_page(&self) -> usize {
        self.recipes_per_page.max(1)
    }

    /// Directory the recipe and trade records live in
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("itemscroller")
        })
    }
}
