//! Item Scroller core
//!
//! Bulk inventory moves driven by mouse drags and scrolls on container
//! screens, plus a persisted, paged library of crafting recipes that can be
//! replayed into a crafting grid. The host game supplies the container view
//! and executes the primitive moves this crate plans.

pub mod config;
pub mod error;
pub mod gui;
pub mod input;
pub mod inventory;
pub mod logging;
pub mod persist;
pub mod recipes;
pub mod replay;
pub mod state;
pub mod villager;

pub use error::{ConfigurationError, HostError, PersistenceError, RecipeError, TransferError};
pub use recipes::{Recipe, RecipeStorage};
pub use state::{MoveActionEngine, SessionManager};
