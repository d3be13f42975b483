//! Graph-specific error types.

use thiserror::Error;
use uuid::Uuid;
use wh_core::{ConnectionKey, CoreError, Designator, PartKind};

pub type GraphResult<T> = Result<T, GraphError>;

/// Construction-time errors raised by the registry, the connection graph and
/// the label overlay. The offending call fails and nothing is stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Designator '{0}' is already in use")]
    DuplicateDesignator(String),

    #[error("Component {0} not found")]
    NotFound(String),

    #[error("Component {designator} is still referenced by connection {key}")]
    ReferencedByConnection {
        designator: Designator,
        key: ConnectionKey,
    },

    #[error("Component {designator} is still referenced by label {label}")]
    ReferencedByLabel { designator: Designator, label: Uuid },

    #[error("{role} {designator} does not exist")]
    DanglingReference {
        designator: Designator,
        role: &'static str,
    },

    #[error("{designator} is a {actual}, expected a {expected}")]
    WrongKind {
        designator: Designator,
        expected: PartKind,
        actual: PartKind,
    },

    #[error("Pin {pin} out of range for {connector} (valid range: 1-{positions})")]
    PinOutOfRange {
        connector: Designator,
        pin: u32,
        positions: u32,
    },

    #[error("Core {core_no} does not exist on cable {cable} (core_count {core_count})")]
    CoreOutOfRange {
        cable: Designator,
        core_no: u32,
        core_count: u32,
    },

    #[error("Core {cable}.{core_no} is already claimed by connection {existing}")]
    CoreAlreadyConnected {
        cable: Designator,
        core_no: u32,
        existing: ConnectionKey,
    },

    #[error("Connection {0} already exists")]
    DuplicateConnection(ConnectionKey),

    #[error("Connection {0} not found")]
    ConnectionNotFound(ConnectionKey),

    #[error("Connection {key} carries a cable core, so {end} must be a connector pin, not a {found}")]
    UnsupportedCoreTermination {
        key: ConnectionKey,
        end: &'static str,
        found: &'static str,
    },

    #[error("Neither end of a cable-core half connection is a cable core")]
    NoCoreEnd,

    #[error("Label {0} not found")]
    LabelNotFound(Uuid),

    #[error("Label {0} already exists")]
    DuplicateLabel(Uuid),
}
