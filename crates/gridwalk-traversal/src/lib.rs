//! Generic single-pass traversal engine.
//!
//! A [`Traversal`] walks items of any type `T`. It delegates "what comes
//! next" to a [`QueueNext`] strategy and "whether to continue or act" to
//! caller-registered closures:
//!
//! - **stop conditions** decide whether a visited item's branch ends;
//!   every one runs on every visited item
//! - **queue conditions** gate whether a candidate successor is queued
//! - **step actions** observe or mutate state for each visited item
//! - **context computers** derive per-item [`StepContext`] data from the
//!   parent's
//!
//! Queue discipline and dedup policy come from the [`TraversalQueue`] and
//! [`Tracker`] implementations passed in, so the engine itself is
//! policy-free.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod metrics;
pub mod queue;
pub mod tracker;
pub mod traversal;

pub use context::{ComputeNextContext, ContextComputer, StepContext};
pub use metrics::TraversalStats;
pub use queue::{BasicQueue, QueueDiscipline, TraversalQueue};
pub use tracker::{BasicTracker, KeyedTracker, Tracker};
pub use traversal::{queue_next_fn, Queued, QueueNext, QueueNextFn, Traversal, TraversalState};
