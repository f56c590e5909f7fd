//! Core value types for the gridwalk network tracing framework.
//!
//! This crate provides the leaf types every other gridwalk crate builds on:
//! strongly-typed arena IDs, single phases and phase codes, the two
//! direction flag sets, the bit-packed [`TracedPhases`] state machine, and
//! the error taxonomy shared across the workspace.
//!
//! Nothing here depends on the network model or the traversal engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direction;
pub mod error;
pub mod id;
pub mod phase;
pub mod traced;

pub use direction::{FeederDirection, PhaseDirection};
pub use error::{NetworkError, PhaseError, TraversalError};
pub use id::{EquipmentId, FeederId, NodeId, TerminalId};
pub use phase::{PhaseCode, SinglePhaseKind};
pub use traced::{NetworkState, PhaseTable, TracedPhases};
