//! Arena-backed electrical network model for gridwalk traces.
//!
//! A [`Network`] owns every [`Terminal`], [`Equipment`], [`ConnectivityNode`]
//! and [`Feeder`] in flat vectors addressed by the typed IDs from
//! `gridwalk-core`. Cross references are IDs rather than pointers, so a
//! terminal's link to its connectivity node never keeps the rest of the
//! graph alive and there is no reference cycle to break.
//!
//! The network is built through `&mut self` methods and then read through
//! `&self` while traces run. Traced phases and feeder directions on
//! terminals use interior mutability so traces can update them during a
//! shared borrow.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod connectivity;
pub mod equipment;
pub mod feeder;
pub mod network;
pub mod terminal;

pub use connectivity::{ConnectivityResult, NominalPhasePath};
pub use equipment::{Equipment, EquipmentType};
pub use feeder::Feeder;
pub use network::Network;
pub use terminal::{ConnectivityNode, Terminal};
