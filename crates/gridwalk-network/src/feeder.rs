//! Feeders: the set of equipment energised from one head terminal.

use gridwalk_core::{EquipmentId, FeederId, TerminalId};
use indexmap::IndexSet;

/// A feeder, identified by its head terminal.
#[derive(Debug)]
pub struct Feeder {
    pub(crate) id: FeederId,
    pub(crate) mrid: String,
    pub(crate) head_terminal: Option<TerminalId>,
    pub(crate) equipment: IndexSet<EquipmentId>,
}

impl Feeder {
    /// Arena ID.
    pub fn id(&self) -> FeederId {
        self.id
    }

    /// Master resource identifier.
    pub fn mrid(&self) -> &str {
        &self.mrid
    }

    /// Terminal the feeder is energised from.
    pub fn head_terminal(&self) -> Option<TerminalId> {
        self.head_terminal
    }

    /// Equipment assigned to this feeder, in assignment order.
    pub fn equipment(&self) -> &IndexSet<EquipmentId> {
        &self.equipment
    }
}
