//! gridwalk: connectivity tracing and analysis for electrical distribution
//! networks.
//!
//! This is the facade crate that re-exports the public API of the gridwalk
//! sub-crates. Most users only need `gridwalk` as a dependency.
//!
//! # Quick start
//!
//! ```rust
//! use gridwalk::prelude::*;
//!
//! // source -> breaker -> line
//! let mut network = Network::new();
//! let phases = [PhaseCode::ABC, PhaseCode::ABC];
//! let source = network.add_equipment("source", EquipmentType::EnergySource, &[PhaseCode::ABC]).unwrap();
//! let breaker = network.add_equipment("cb", EquipmentType::Breaker, &phases).unwrap();
//! let line = network.add_equipment("line", EquipmentType::AcLineSegment, &phases).unwrap();
//! let s0 = network.equipment(source).unwrap().terminals()[0];
//! let cb = network.equipment(breaker).unwrap().terminals().to_vec();
//! let l0 = network.equipment(line).unwrap().terminals()[0];
//! network.connect_terminals(s0, cb[0]).unwrap();
//! network.connect_terminals(cb[1], l0).unwrap();
//! let feeder = network.add_feeder("fdr", Some(cb[1])).unwrap();
//!
//! AssignToFeeders::default().run(&mut network).unwrap();
//! assert!(network.feeder(feeder).unwrap().equipment().contains(&line));
//!
//! SetPhases::new(NetworkState::Normal).run(&network).unwrap();
//! let table = network.terminal(l0).unwrap().traced_phases().normal();
//! assert_eq!(table.phase(SinglePhaseKind::A).unwrap(), SinglePhaseKind::A);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gridwalk-core` | IDs, phases, directions, traced phase tables, errors |
//! | [`network`] | `gridwalk-network` | Equipment, terminals, nodes, feeders, phase connectivity |
//! | [`traversal`] | `gridwalk-traversal` | The generic traversal engine |
//! | [`trace`] | `gridwalk-trace` | Network traces, stepping and trace conditions |
//! | [`analysis`] | `gridwalk-analysis` | Feeder assignment, direction, phases, SWER discovery |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`gridwalk-core`).
///
/// IDs, [`types::PhaseCode`], [`types::FeederDirection`], the traced phase
/// tables, and the error enums shared by every crate.
pub use gridwalk_core as types;

/// The network model (`gridwalk-network`).
pub use gridwalk_network as network;

/// Generic traversal engine (`gridwalk-traversal`).
///
/// [`traversal::Traversal`] works over any item type; network traces are
/// built on top of it.
pub use gridwalk_traversal as traversal;

/// Network traces (`gridwalk-trace`).
///
/// Start from [`trace::connected_equipment_trace`] or
/// [`trace::connected_terminal_trace`] and add conditions fluently.
pub use gridwalk_trace as trace;

/// Network-wide analyses (`gridwalk-analysis`).
pub use gridwalk_analysis as analysis;

/// Common imports for typical gridwalk usage.
///
/// ```rust
/// use gridwalk::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use gridwalk_core::{
        EquipmentId, FeederDirection, FeederId, NetworkState, PhaseCode, PhaseDirection, SinglePhaseKind,
        TerminalId,
    };

    // Errors
    pub use gridwalk_core::{NetworkError, PhaseError, TraversalError};

    // Network
    pub use gridwalk_network::{EquipmentType, Network};

    // Engine
    pub use gridwalk_traversal::{StepContext, Traversal, TraversalStats};

    // Traces
    pub use gridwalk_trace::{
        connected_equipment_trace, connected_terminal_trace, EquipmentFilter, NetworkTrace, NetworkTraceStep,
        Stepping, TraceConfig,
    };

    // Analyses
    pub use gridwalk_analysis::{
        AssignToFeeders, FindSwerEquipment, RemovePhases, SetDirection, SetPhases, SwerConfig,
    };
}
