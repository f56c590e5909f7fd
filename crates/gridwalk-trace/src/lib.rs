//! Network trace layer for gridwalk.
//!
//! Specializes the generic [`Traversal`](gridwalk_traversal::Traversal) to
//! the electrical network: the item type is [`NetworkTraceStep`], successors
//! come from a [`NetworkStepper`] using either equipment-level or
//! terminal-level [`Stepping`], and a library of
//! [conditions](crate::conditions) plugs into the engine's stop, queue and
//! context hooks.
//!
//! [`NetworkTrace`] wraps all of this behind a fluent builder.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builders;
pub mod conditions;
pub mod config;
pub mod step;
pub mod stepping;
pub mod trace;

pub use builders::{connected_equipment_trace, connected_terminal_trace};
pub use conditions::{
    ContextEntry, DirectionCondition, EquipmentFilter, EquipmentStepLimitCondition,
    NetworkTraceCondition, OpenCondition, PhaseCondition,
};
pub use config::TraceConfig;
pub use step::NetworkTraceStep;
pub use stepping::{NetworkStepper, Stepping};
pub use trace::NetworkTrace;
