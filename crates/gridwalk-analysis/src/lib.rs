//! Network analyses built on gridwalk traces.
//!
//! Each analysis only chooses start points and supplies conditions and step
//! actions; the walking itself is done by
//! [`NetworkTrace`](gridwalk_trace::NetworkTrace).
//!
//! - [`FindSwerEquipment`]: equipment on SWER spurs and the LV networks they
//!   supply.
//! - [`AssignToFeeders`]: feeder membership from each feeder head.
//! - [`SetDirection`]: feeder direction of every terminal.
//! - [`SetPhases`] and [`RemovePhases`]: traced phases energised from a
//!   source terminal.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod direction;
pub mod feeder;
pub mod phases;
pub mod swer;

pub use config::{ConfigError, SwerConfig};
pub use direction::SetDirection;
pub use feeder::AssignToFeeders;
pub use phases::{RemovePhases, SetPhases};
pub use swer::FindSwerEquipment;
