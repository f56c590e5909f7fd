//! Error types for the gridwalk tracing framework.
//!
//! Organized by subsystem: phase state, network model, and traversal.
//! Every error is a local precondition violation raised at the point of
//! misuse; none are retried or downgraded.

use crate::id::{EquipmentId, FeederId, NodeId, TerminalId};
use crate::phase::SinglePhaseKind;
use std::error::Error;
use std::fmt;

/// Errors from reading or mutating traced phase state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhaseError {
    /// A phase/direction query or update used a nominal phase with no slot
    /// (`NONE` or `INVALID`).
    InvalidPhase {
        /// The offending nominal phase.
        phase: SinglePhaseKind,
    },
    /// An `add` tried to energise a slot with a physical phase that differs
    /// from the one already recorded there.
    CrossPhaseConflict {
        /// The nominal phase slot being updated.
        nominal: SinglePhaseKind,
        /// The physical phase already held by the slot.
        existing: SinglePhaseKind,
        /// The physical phase the caller tried to add.
        attempted: SinglePhaseKind,
    },
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPhase { phase } => {
                write!(f, "nominal phase {phase} has no traced phase slot")
            }
            Self::CrossPhaseConflict {
                nominal,
                existing,
                attempted,
            } => write!(
                f,
                "cross-phase conflict on nominal phase {nominal}: \
                 slot holds {existing}, attempted to add {attempted}"
            ),
        }
    }
}

impl Error for PhaseError {}

/// Errors from building or querying the network model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkError {
    /// A terminal has no owning equipment where one is required.
    MissingConductingEquipment {
        /// The orphan terminal.
        terminal: TerminalId,
    },
    /// A terminal was attached to a second, different piece of equipment.
    EquipmentAlreadyAssigned {
        /// The terminal being attached.
        terminal: TerminalId,
        /// Its current owner.
        existing: EquipmentId,
        /// The rejected new owner.
        attempted: EquipmentId,
    },
    /// No terminal with this ID exists in the network.
    UnknownTerminal(TerminalId),
    /// No equipment with this ID exists in the network.
    UnknownEquipment(EquipmentId),
    /// No connectivity node with this ID exists in the network.
    UnknownNode(NodeId),
    /// No feeder with this ID exists in the network.
    UnknownFeeder(FeederId),
    /// An mRID was registered twice.
    DuplicateMrid(String),
    /// Open status was set on equipment that cannot be opened.
    NotASwitch(EquipmentId),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingConductingEquipment { terminal } => {
                write!(f, "terminal {terminal} has no conducting equipment")
            }
            Self::EquipmentAlreadyAssigned {
                terminal,
                existing,
                attempted,
            } => write!(
                f,
                "terminal {terminal} already belongs to equipment {existing}, \
                 cannot assign it to {attempted}"
            ),
            Self::UnknownTerminal(id) => write!(f, "unknown terminal {id}"),
            Self::UnknownEquipment(id) => write!(f, "unknown equipment {id}"),
            Self::UnknownNode(id) => write!(f, "unknown connectivity node {id}"),
            Self::UnknownFeeder(id) => write!(f, "unknown feeder {id}"),
            Self::DuplicateMrid(mrid) => write!(f, "duplicate mRID '{mrid}'"),
            Self::NotASwitch(id) => write!(f, "equipment {id} is not a switch"),
        }
    }
}

impl Error for NetworkError {}

/// Errors from running a traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraversalError {
    /// `run` or `reset` was called while the traversal is running.
    AlreadyRunning,
    /// `run` was called on a completed traversal without an intervening
    /// `reset`.
    RequiresReset,
    /// A step action hit a phase state error.
    Phase(PhaseError),
    /// A step action or the stepping strategy hit a malformed network.
    Network(NetworkError),
    /// A step action failed for a caller-specific reason.
    ActionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl TraversalError {
    /// Returns `true` for the invalid-state pair (`AlreadyRunning`,
    /// `RequiresReset`).
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::AlreadyRunning | Self::RequiresReset)
    }
}

impl fmt::Display for TraversalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "traversal is already running"),
            Self::RequiresReset => {
                write!(f, "traversal has already run and must be reset before reuse")
            }
            Self::Phase(e) => write!(f, "phase error: {e}"),
            Self::Network(e) => write!(f, "network error: {e}"),
            Self::ActionFailed { reason } => write!(f, "step action failed: {reason}"),
        }
    }
}

impl Error for TraversalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Phase(e) => Some(e),
            Self::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PhaseError> for TraversalError {
    fn from(e: PhaseError) -> Self {
        Self::Phase(e)
    }
}

impl From<NetworkError> for TraversalError {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}
