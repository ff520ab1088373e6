/// Error types shared across the crate
///
/// Every failure the core can produce maps to one of these enums. None of them
/// crosses the input-dispatch boundary: the engine and session manager reduce
/// them to log lines and a consumed/not-consumed flag.

use thiserror::Error;

/// A crafting grid definition that could not be registered.
///
/// Non-fatal: the offending definition is skipped and the rest of the
/// registry keeps working.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown container type '{0}'")]
    UnknownContainerType(String),

    #[error("unknown slot type '{0}'")]
    UnknownSlotType(String),

    #[error("malformed grid definition '{0}'")]
    MalformedDefinition(String),

    #[error("invalid slot range {first}-{last}")]
    InvalidRange { first: usize, last: usize },
}

/// Errors from recipe construction and recipe storage access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("recipe index {index} out of range (recipe count: {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("crafting grid of {0} slots is not a 1x1, 2x2 or 3x3 grid")]
    InvalidGridSize(usize),

    #[error("crafting output slot {0} is empty")]
    EmptyOutput(usize),
}

/// A primitive move rejected by the host container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("slot {0} does not exist")]
    InvalidSlot(usize),

    #[error("slot {0} is empty")]
    EmptySource(usize),

    #[error("no stack is carried on the cursor")]
    EmptyCursor,

    #[error("move from slot {source_slot} to slot {target_slot} rejected: {reason}")]
    Rejected {
        source_slot: usize,
        target_slot: usize,
        reason: String,
    },
}

/// Failure while executing a planned transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The host refused the primitive move at position `step` of the plan.
    /// Steps before it were applied, steps after it were not attempted.
    #[error("host rejected step {step} of the plan: {error}")]
    HostMoveFailure { step: usize, error: HostError },
}

/// Errors reading or writing persisted records.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error on record '{record}': {source}")]
    Io {
        record: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record '{record}': {source}")]
    Malformed {
        record: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("record '{record}' has unsupported version {version}")]
    UnsupportedVersion { record: String, version: u32 },
}

impl PersistenceError {
    /// True when the record simply does not exist yet.
    pub fn is_missing(&self) -> bool {
        matches!(self, PersistenceError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
