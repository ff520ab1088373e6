/// Crafting grid registry
///
/// Maps a crafting output slot, identified by the container type, the output
/// slot's type and its slot number, to the contiguous range of slots that form
/// the crafting grid feeding it. Type identifiers are plain strings resolved
/// once against the host at registration time.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

use crate::error::ConfigurationError;
use crate::inventory::view::{ContainerView, SlotDescriptor};

/// Well-known type identifiers of the vanilla screens
pub mod vanilla {
    pub const CRAFTING_TABLE: &str = "crafting_table";
    pub const PLAYER_INVENTORY: &str = "player_inventory";
    pub const CHEST: &str = "chest";
    pub const CREATIVE: &str = "creative";

    pub const CRAFTING_RESULT: &str = "crafting_result";
    pub const GENERIC: &str = "generic";
}

/// Stable identifier of a container screen type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerTypeId(String);

impl ContainerTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContainerTypeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ContainerTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a slot type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotTypeId(String);

impl SlotTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SlotTypeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SlotTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive range of slot numbers. `first <= last` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRange {
    first: usize,
    last: usize,
}

impl SlotRange {
    /// Range from `first` to `last` inclusive, `None` if `first > last`
    pub fn new(first: usize, last: usize) -> Option<Self> {
        (first <= last).then_some(Self { first, last })
    }

    /// Range of `count` slots starting at `start`, `None` if `count` is zero
    pub fn with_count(start: usize, count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        Self::new(start, start + count - 1)
    }

    pub fn first(&self) -> usize {
        self.first
    }

    pub fn last(&self) -> usize {
        self.last
    }

    pub fn count(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot >= self.first && slot <= self.last
    }

    pub fn iter(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }
}

impl fmt::Display for SlotRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

/// Identifies one family of crafting layouts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CraftingGridKey {
    pub container_type: ContainerTypeId,
    pub slot_type: SlotTypeId,
    pub output_slot: usize,
}

impl CraftingGridKey {
    pub fn new(container_type: ContainerTypeId, slot_type: SlotTypeId, output_slot: usize) -> Self {
        Self {
            container_type,
            slot_type,
            output_slot,
        }
    }

    pub fn from_slot(container_type: &ContainerTypeId, slot: &SlotDescriptor) -> Self {
        Self::new(container_type.clone(), slot.slot_type.clone(), slot.index)
    }
}

/// Resolves type names from configuration against the types the host knows.
pub trait TypeResolver {
    fn resolve_container(&self, name: &str) -> Option<ContainerTypeId>;
    fn resolve_slot_type(&self, name: &str) -> Option<SlotTypeId>;
}

/// A fixed set of known type names.
#[derive(Debug, Clone, Default)]
pub struct KnownTypes {
    containers: HashSet<String>,
    slot_types: HashSet<String>,
}

impl KnownTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// The vanilla screens and slot types
    pub fn vanilla() -> Self {
        Self::new()
            .with_container(vanilla::CRAFTING_TABLE)
            .with_container(vanilla::PLAYER_INVENTORY)
            .with_container(vanilla::CHEST)
            .with_container(vanilla::CREATIVE)
            .with_slot_type(vanilla::CRAFTING_RESULT)
            .with_slot_type(vanilla::GENERIC)
    }

    pub fn with_container(mut self, name: &str) -> Self {
        self.containers.insert(name.to_string());
        self
    }

    pub fn with_slot_type(mut self, name: &str) -> Self {
        self.slot_types.insert(name.to_string());
        self
    }
}

impl TypeResolver for KnownTypes {
    fn resolve_container(&self, name: &str) -> Option<ContainerTypeId> {
        self.containers.get(name).map(|n| ContainerTypeId::new(n.as_str()))
    }

    fn resolve_slot_type(&self, name: &str) -> Option<SlotTypeId> {
        self.slot_types.get(name).map(|n| SlotTypeId::new(n.as_str()))
    }
}

/// A parsed `"<container>,<slot_type>,<output>,<first>-<last>"` definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDefinition {
    pub container: String,
    pub slot_type: String,
    pub output_slot: usize,
    pub range: SlotRange,
}

// Constant pattern, checked by the definition parsing tests
static DEFINITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^,\s]+)\s*,\s*([^,\s]+)\s*,\s*(\d+)\s*,\s*(\d+)\s*-\s*(\d+)\s*$")
        .expect("grid definition pattern is valid")
});

impl GridDefinition {
    pub fn parse(definition: &str) -> Result<Self, ConfigurationError> {
        let malformed = || ConfigurationError::MalformedDefinition(definition.to_string());
        let caps = DEFINITION_RE.captures(definition).ok_or_else(malformed)?;

        let number = |i: usize| -> Result<usize, ConfigurationError> {
            caps[i].parse::<usize>().map_err(|_| malformed())
        };
        let output_slot = number(3)?;
        let first = number(4)?;
        let last = number(5)?;
        let range = SlotRange::new(first, last).ok_or(ConfigurationError::InvalidRange { first, last })?;

        Ok(Self {
            container: caps[1].to_string(),
            slot_type: caps[2].to_string(),
            output_slot,
            range,
        })
    }
}

/// Definitions registered by [`SlotGridRegistry::update_grid_definitions`]
/// before any configured ones.
pub const DEFAULT_GRID_DEFINITIONS: &[&str] = &[
    "crafting_table,crafting_result,0,1-9",
    "player_inventory,crafting_result,0,1-4",
];

/// Registry of crafting grids keyed by their output slot
#[derive(Debug, Clone, Default)]
pub struct SlotGridRegistry {
    grids: HashMap<CraftingGridKey, SlotRange>,
    crafting_containers: HashSet<ContainerTypeId>,
}

impl SlotGridRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the registry and register the default grids followed by `extra`.
    ///
    /// Returns the number of definitions that were registered.
    pub fn update_grid_definitions(&mut self, resolver: &dyn TypeResolver, extra: &[String]) -> usize {
        self.grids.clear();
        self.crafting_containers.clear();

        let defaults = DEFAULT_GRID_DEFINITIONS.iter().copied();
        let configured = extra.iter().map(String::as_str);

        let mut registered = 0;
        for definition in defaults.chain(configured) {
            if self.register_definition(resolver, definition) {
                registered += 1;
            }
        }
        registered
    }

    /// Register a grid. Returns false, after logging, if either type name is
    /// unknown to the host.
    pub fn register(
        &mut self,
        resolver: &dyn TypeResolver,
        container: &str,
        slot_type: &str,
        output_slot: usize,
        range: SlotRange,
    ) -> bool {
        match self.try_register(resolver, container, slot_type, output_slot, range) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Failed to register crafting grid: container '{}', slot type '{}', output slot {}: {}",
                    container, slot_type, output_slot, e
                );
                false
            }
        }
    }

    fn try_register(
        &mut self,
        resolver: &dyn TypeResolver,
        container: &str,
        slot_type: &str,
        output_slot: usize,
        range: SlotRange,
    ) -> Result<(), ConfigurationError> {
        let container_type = resolver
            .resolve_container(container)
            .ok_or_else(|| ConfigurationError::UnknownContainerType(container.to_string()))?;
        let slot_type = resolver
            .resolve_slot_type(slot_type)
            .ok_or_else(|| ConfigurationError::UnknownSlotType(slot_type.to_string()))?;

        debug!(
            "Registered crafting grid {} for {}/{}#{}",
            range, container_type, slot_type, output_slot
        );
        self.crafting_containers.insert(container_type.clone());
        self.grids
            .insert(CraftingGridKey::new(container_type, slot_type, output_slot), range);
        Ok(())
    }

    /// Parse and register a definition string. Malformed strings are logged
    /// and skipped.
    pub fn register_definition(&mut self, resolver: &dyn TypeResolver, definition: &str) -> bool {
        match GridDefinition::parse(definition) {
            Ok(def) => self.register(resolver, &def.container, &def.slot_type, def.output_slot, def.range),
            Err(e) => {
                warn!("Skipping crafting grid definition: {}", e);
                false
            }
        }
    }

    /// Grid range for `slot` in a container of type `container_type`, exact
    /// key match only
    pub fn lookup(&self, container_type: &ContainerTypeId, slot: &SlotDescriptor) -> Option<SlotRange> {
        self.lookup_key(&CraftingGridKey::from_slot(container_type, slot))
    }

    pub fn lookup_key(&self, key: &CraftingGridKey) -> Option<SlotRange> {
        self.grids.get(key).copied()
    }

    pub fn is_crafting_container(&self, container_type: &ContainerTypeId) -> bool {
        self.crafting_containers.contains(container_type)
    }

    /// Lowest-numbered slot of `container` that is a registered output slot.
    pub fn first_output_slot<C: ContainerView>(&self, container: &C) -> Option<SlotDescriptor> {
        let container_type = container.container_type();
        if !self.is_crafting_container(container_type) {
            return None;
        }

        container
            .slots()
            .iter()
            .filter(|slot| self.lookup(container_type, slot).is_some())
            .min_by_key(|slot| slot.index)
            .cloned()
    }

    /// First output slot of `container` together with its grid range
    pub fn crafting_grid<C: ContainerView>(&self, container: &C) -> Option<(SlotDescriptor, SlotRange)> {
        let output = self.first_output_slot(container)?;
        let range = self.lookup(container.container_type(), &output)?;
        Some((output, range))
    }

    /// True if `slot` is a registered output slot of `container`
    pub fn is_output_slot<C: ContainerView>(&self, container: &C, slot: &SlotDescriptor) -> bool {
        self.lookup(container.container_type(), slot).is_some()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}
