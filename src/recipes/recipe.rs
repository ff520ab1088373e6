/// A stored crafting recipe: the ingredient layout of a crafting grid and the
/// item it produced.

use serde::{Deserialize, Serialize};

use crate::error::RecipeError;
use crate::gui::grid_registry::SlotRange;
use crate::inventory::view::{ContainerView, ItemId, ItemStackView, SlotDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    ingredients: Vec<Option<ItemId>>,
    result: ItemId,
    result_count: u32,
}

impl Recipe {
    /// Create a recipe. `ingredients` must describe a 1x1, 2x2 or 3x3 grid
    /// in row-major order.
    pub fn new(ingredients: Vec<Option<ItemId>>, result: ItemId, result_count: u32) -> Result<Self, RecipeError> {
        grid_size_for(ingredients.len())?;
        Ok(Self {
            ingredients,
            result,
            result_count,
        })
    }

    /// Snapshot the crafting grid `grid` and the item in `output`.
    pub fn from_grid<C: ContainerView>(container: &C, output: &SlotDescriptor, grid: SlotRange) -> Result<Self, RecipeError> {
        let stack = container
            .stack_at(output.index)
            .filter(|s| !s.is_empty())
            .ok_or(RecipeError::EmptyOutput(output.index))?;
        let result = stack.identity().cloned().ok_or(RecipeError::EmptyOutput(output.index))?;
        let result_count = stack.count();

        let ingredients = grid
            .iter()
            .map(|cell| container.stack_at(cell).and_then(|s| s.identity().cloned()))
            .collect();

        Self::new(ingredients, result, result_count)
    }

    pub fn ingredients(&self) -> &[Option<ItemId>] {
        &self.ingredients
    }

    pub fn result(&self) -> &ItemId {
        &self.result
    }

    pub fn result_count(&self) -> u32 {
        self.result_count
    }

    /// Width (and height) of the grid this recipe was stored from
    pub fn grid_size(&self) -> usize {
        grid_size_for(self.ingredients.len()).unwrap_or(0)
    }

    /// False for recipes whose layout cannot come from a crafting grid,
    /// e.g. after loading a hand-edited record
    pub fn is_valid(&self) -> bool {
        grid_size_for(self.ingredients.len()).is_ok()
    }

    /// True if every cell of `grid` holds the recipe's ingredient for that
    /// position. Counts are ignored and an empty cell matches "no
    /// ingredient".
    pub fn matches_grid<C: ContainerView>(&self, container: &C, grid: SlotRange) -> bool {
        if grid.count() != self.ingredients.len() {
            return false;
        }

        grid.iter().zip(&self.ingredients).all(|(cell, wanted)| {
            let present = container.stack_at(cell).and_then(|s| s.identity());
            present == wanted.as_ref()
        })
    }
}

fn grid_size_for(len: usize) -> Result<usize, RecipeError> {
    match len {
        1 => Ok(1),
        4 => Ok(2),
        9 => Ok(3),
        other => Err(RecipeError::InvalidGridSize(other)),
    }
}
