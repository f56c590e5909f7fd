//! Terminals and connectivity nodes.

use gridwalk_core::{
    EquipmentId, FeederDirection, NetworkError, NetworkState, NodeId, PhaseCode, TerminalId,
    TracedPhases,
};
use std::cell::Cell;

/// An electrical connection point on a piece of equipment.
#[derive(Debug)]
pub struct Terminal {
    pub(crate) id: TerminalId,
    pub(crate) equipment: Option<EquipmentId>,
    pub(crate) phases: PhaseCode,
    pub(crate) sequence_number: u32,
    pub(crate) node: Option<NodeId>,
    traced_phases: TracedPhases,
    normal_feeder_direction: Cell<FeederDirection>,
    current_feeder_direction: Cell<FeederDirection>,
}

impl Terminal {
    pub(crate) fn new(id: TerminalId, phases: PhaseCode) -> Self {
        Self {
            id,
            equipment: None,
            phases,
            sequence_number: 0,
            node: None,
            traced_phases: TracedPhases::new(),
            normal_feeder_direction: Cell::new(FeederDirection::NONE),
            current_feeder_direction: Cell::new(FeederDirection::NONE),
        }
    }

    /// Arena ID.
    pub fn id(&self) -> TerminalId {
        self.id
    }

    /// Owning equipment, if the terminal has been attached.
    pub fn conducting_equipment(&self) -> Option<EquipmentId> {
        self.equipment
    }

    /// Owning equipment, or [`NetworkError::MissingConductingEquipment`].
    pub fn equipment(&self) -> Result<EquipmentId, NetworkError> {
        self.equipment
            .ok_or(NetworkError::MissingConductingEquipment { terminal: self.id })
    }

    /// Nominal phases the terminal is wired for.
    pub fn phases(&self) -> PhaseCode {
        self.phases
    }

    /// One-based position on the owning equipment; zero while unattached.
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// Connectivity node the terminal is wired to.
    pub fn connectivity_node(&self) -> Option<NodeId> {
        self.node
    }

    /// Whether the terminal is wired to a connectivity node.
    pub fn is_connected(&self) -> bool {
        self.node.is_some()
    }

    /// Traced phase state for both network states.
    pub fn traced_phases(&self) -> &TracedPhases {
        &self.traced_phases
    }

    /// Feeder direction recorded for `state`.
    pub fn feeder_direction(&self, state: NetworkState) -> FeederDirection {
        self.direction_cell(state).get()
    }

    /// Overwrite the feeder direction for `state`. Returns whether it changed.
    pub fn set_feeder_direction(&self, state: NetworkState, direction: FeederDirection) -> bool {
        self.direction_cell(state).replace(direction) != direction
    }

    /// Union `direction` into the feeder direction for `state`.
    pub fn add_feeder_direction(&self, state: NetworkState, direction: FeederDirection) -> bool {
        let cell = self.direction_cell(state);
        let previous = cell.get();
        cell.set(previous + direction);
        cell.get() != previous
    }

    /// Remove `direction` from the feeder direction for `state`.
    pub fn remove_feeder_direction(&self, state: NetworkState, direction: FeederDirection) -> bool {
        let cell = self.direction_cell(state);
        let previous = cell.get();
        cell.set(previous - direction);
        cell.get() != previous
    }

    /// Set-once owner assignment.
    pub(crate) fn assign_equipment(&mut self, equipment: EquipmentId) -> Result<(), NetworkError> {
        match self.equipment {
            Some(existing) if existing != equipment => Err(NetworkError::EquipmentAlreadyAssigned {
                terminal: self.id,
                existing,
                attempted: equipment,
            }),
            _ => {
                self.equipment = Some(equipment);
                Ok(())
            }
        }
    }

    fn direction_cell(&self, state: NetworkState) -> &Cell<FeederDirection> {
        match state {
            NetworkState::Normal => &self.normal_feeder_direction,
            NetworkState::Current => &self.current_feeder_direction,
        }
    }
}

/// A zero-impedance junction joining terminals.
#[derive(Debug)]
pub struct ConnectivityNode {
    pub(crate) id: NodeId,
    pub(crate) terminals: Vec<TerminalId>,
}

impl ConnectivityNode {
    /// Arena ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Terminals wired to this node.
    pub fn terminals(&self) -> &[TerminalId] {
        &self.terminals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_set_once() {
        let mut t = Terminal::new(TerminalId(0), PhaseCode::ABC);
        assert!(t.equipment().is_err());
        t.assign_equipment(EquipmentId(3)).unwrap();
        t.assign_equipment(EquipmentId(3)).unwrap();
        assert_eq!(
            t.assign_equipment(EquipmentId(4)),
            Err(NetworkError::EquipmentAlreadyAssigned {
                terminal: TerminalId(0),
                existing: EquipmentId(3),
                attempted: EquipmentId(4),
            })
        );
        assert_eq!(t.equipment(), Ok(EquipmentId(3)));
    }

    #[test]
    fn feeder_directions_per_state() {
        let t = Terminal::new(TerminalId(0), PhaseCode::A);
        assert!(t.add_feeder_direction(NetworkState::Normal, FeederDirection::UPSTREAM));
        assert!(!t.add_feeder_direction(NetworkState::Normal, FeederDirection::UPSTREAM));
        assert!(t.add_feeder_direction(NetworkState::Normal, FeederDirection::DOWNSTREAM));
        assert_eq!(t.feeder_direction(NetworkState::Normal), FeederDirection::BOTH);
        assert_eq!(t.feeder_direction(NetworkState::Current), FeederDirection::NONE);
        assert!(t.remove_feeder_direction(NetworkState::Normal, FeederDirection::UPSTREAM));
        assert_eq!(t.feeder_direction(NetworkState::Normal), FeederDirection::DOWNSTREAM);
        assert!(!t.set_feeder_direction(NetworkState::Normal, FeederDirection::DOWNSTREAM));
    }
}
