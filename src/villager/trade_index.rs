/// Villager trade index
///
/// Remembers, per trade partner, which trade page was last viewed, how far
/// the trade list was scrolled and which trades are marked as favourites.
/// The host reports the trader under the crosshair before the trade screen
/// opens; the screen then reads and updates that trader's entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::persist::{load_json, save_json, LoadStatus, PersistenceSink};

const FORMAT_VERSION: u32 = 1;

/// Stored state for one trader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillagerData {
    pub uuid: Uuid,
    #[serde(default)]
    pub last_page: usize,
    #[serde(default)]
    pub trade_list_position: usize,
    #[serde(default)]
    pub favorites: BTreeSet<usize>,
}

impl VillagerData {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            ..Self::default()
        }
    }
}

/// The merchant screen's trade list under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeListView {
    /// Number of trades the trader offers
    pub trade_count: usize,
    /// Rows the list shows at once
    #[serde(default = "default_visible_rows")]
    pub visible_rows: usize,
    /// Trade index of the hovered row
    #[serde(default)]
    pub hovered_trade: Option<usize>,
}

fn default_visible_rows() -> usize {
    7
}

impl TradeListView {
    pub fn new(trade_count: usize, visible_rows: usize) -> Self {
        Self {
            trade_count,
            visible_rows,
            hovered_trade: None,
        }
    }

    pub fn hovering(mut self, trade: Option<usize>) -> Self {
        self.hovered_trade = trade;
        self
    }

    /// Largest scroll position that still fills the list
    pub fn max_position(&self) -> usize {
        self.trade_count.saturating_sub(self.visible_rows)
    }

    /// Hovered trade, if it is one the trader actually offers
    pub fn hovered(&self) -> Option<usize> {
        self.hovered_trade.filter(|&trade| trade < self.trade_count)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedTrades {
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    villagers: Vec<VillagerData>,
}

#[derive(Debug, Clone, Default)]
pub struct VillagerTradeIndex {
    villagers: HashMap<Uuid, VillagerData>,
    last_interacted: Option<Uuid>,
    dirty: bool,
}

impl VillagerTradeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `uuid` as the trader whose screen opens next
    pub fn set_last_interacted(&mut self, uuid: Uuid) {
        if self.last_interacted != Some(uuid) {
            debug!("Last interacted trader: {}", uuid);
            self.last_interacted = Some(uuid);
        }
    }

    pub fn last_interacted(&self) -> Option<Uuid> {
        self.last_interacted
    }

    pub fn has_interaction_target(&self) -> bool {
        self.last_interacted.is_some()
    }

    pub fn get(&self, uuid: &Uuid) -> Option<&VillagerData> {
        self.villagers.get(uuid)
    }

    /// Entry of the last interacted trader
    pub fn current(&self) -> Option<&VillagerData> {
        self.last_interacted.and_then(|uuid| self.villagers.get(&uuid))
    }

    fn current_mut(&mut self) -> Option<&mut VillagerData> {
        let uuid = self.last_interacted?;
        Some(self.villagers.entry(uuid).or_insert_with(|| VillagerData::new(uuid)))
    }

    /// Last viewed page of the current trader, 0 if unknown
    pub fn last_page(&self) -> usize {
        self.current().map_or(0, |v| v.last_page)
    }

    pub fn set_last_page(&mut self, page: usize) {
        let Some(data) = self.current_mut() else {
            return;
        };
        if data.last_page != page {
            data.last_page = page;
            self.dirty = true;
        }
    }

    pub fn trade_list_position(&self) -> usize {
        self.current().map_or(0, |v| v.trade_list_position)
    }

    pub fn set_trade_list_position(&mut self, position: usize) {
        let Some(data) = self.current_mut() else {
            return;
        };
        if data.trade_list_position != position {
            data.trade_list_position = position;
            self.dirty = true;
        }
    }

    /// Scroll the current trader's list by `amount` rows, positive towards
    /// the top. Returns whether the position changed.
    pub fn scroll_trade_list(&mut self, amount: i32, list: &TradeListView) -> bool {
        let current = self.trade_list_position().min(list.max_position());
        let steps = amount.unsigned_abs() as usize;
        let position = if amount > 0 {
            current.saturating_sub(steps)
        } else {
            current.saturating_add(steps).min(list.max_position())
        };

        let before = self.trade_list_position();
        self.set_trade_list_position(position);
        self.trade_list_position() != before
    }

    /// Flip the favourite mark of `trade` for the current trader. Returns
    /// whether the trade is now a favourite.
    pub fn toggle_favorite(&mut self, trade: usize) -> bool {
        let Some(data) = self.current_mut() else {
            return false;
        };
        let now_favorite = if data.favorites.remove(&trade) {
            false
        } else {
            data.favorites.insert(trade)
        };
        self.dirty = true;
        now_favorite
    }

    /// Favourite trade indices of the current trader, ascending
    pub fn favorites(&self) -> Vec<usize> {
        self.current()
            .map(|v| v.favorites.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.villagers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.villagers.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear(&mut self) {
        self.villagers.clear();
        self.last_interacted = None;
        self.dirty = false;
    }

    pub fn write_to_disk(&mut self, sink: &mut dyn PersistenceSink, record: &str) -> Result<(), PersistenceError> {
        let mut villagers: Vec<VillagerData> = self.villagers.values().cloned().collect();
        villagers.sort_by_key(|v| v.uuid);

        let saved = SavedTrades {
            version: FORMAT_VERSION,
            saved_at: Some(Utc::now()),
            villagers,
        };
        save_json(sink, record, &saved)?;
        self.dirty = false;
        debug!("Wrote {} trader(s) to '{}'", self.villagers.len(), record);
        Ok(())
    }

    /// Replace the contents with record `record`. Problems are logged and
    /// leave the index empty.
    pub fn read_from_disk(&mut self, sink: &dyn PersistenceSink, record: &str) -> LoadStatus {
        self.clear();

        let saved: SavedTrades = match load_json(sink, record) {
            Ok(saved) => saved,
            Err(e) if e.is_missing() => {
                debug!("No saved villager trades in '{}'", record);
                return LoadStatus::Missing;
            }
            Err(e) => {
                warn!("Ignoring saved villager trades: {}", e);
                return LoadStatus::Rejected;
            }
        };
        if saved.version != FORMAT_VERSION {
            warn!(
                "Ignoring saved villager trades: {}",
                PersistenceError::UnsupportedVersion {
                    record: record.to_string(),
                    version: saved.version,
                }
            );
            return LoadStatus::Rejected;
        }

        self.villagers = saved.villagers.into_iter().map(|v| (v.uuid, v)).collect();
        info!("Loaded {} trader(s) from '{}'", self.villagers.len(), record);
        LoadStatus::Loaded
    }
}
