pub mod engine;
pub mod manager;

pub use engine::{ActionState, DragSession, EngineContext, MoveActionEngine, ScreenContext};
pub use manager::SessionManager;
