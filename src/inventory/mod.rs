pub mod memory;
pub mod planner;
pub mod view;

pub use memory::{ItemStack, MemoryContainer};
pub use planner::{FillAmount, MoveOp, TransferMode, TransferPlanner};
pub use view::{ContainerView, ItemId, ItemStackView, SlotDescriptor, SlotOwner};
