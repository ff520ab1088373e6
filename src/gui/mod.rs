pub mod grid_registry;

pub use grid_registry::{ContainerTypeId, CraftingGridKey, KnownTypes, SlotGridRegistry, SlotRange, SlotTypeId, TypeResolver};
