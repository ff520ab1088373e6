/// Per-trader villager trade screen state
pub mod trade_index;

pub use trade_index::{TradeListView, VillagerData, VillagerTradeIndex};
