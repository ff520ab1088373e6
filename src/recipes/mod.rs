/// Stored crafting recipes and the paged recipe list
pub mod recipe;
pub mod storage;

pub use recipe::Recipe;
pub use storage::{PageInfo, RecipeStorage};
