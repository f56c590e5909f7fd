//! [`NetworkTraceStep`], the item a network trace walks.

use gridwalk_core::{EquipmentId, NetworkError, TerminalId};
use gridwalk_network::Network;

/// One hop of a network trace: from a terminal to a terminal, either across
/// a connectivity node or internally through one piece of equipment.
///
/// A start step has `from_terminal == to_terminal` and both counters at
/// zero. Every successor has `n_terminal_steps` one greater than its parent;
/// `n_equipment_steps` grows only when the hop enters different equipment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkTraceStep<D = ()> {
    from_terminal: TerminalId,
    to_terminal: TerminalId,
    from_equipment: EquipmentId,
    to_equipment: EquipmentId,
    n_terminal_steps: u32,
    n_equipment_steps: u32,
    leaves_all_terminals: bool,
    data: Option<D>,
}

impl<D> NetworkTraceStep<D> {
    /// The step a trace starts with when seeded at `terminal`.
    ///
    /// Fails with [`NetworkError::MissingConductingEquipment`] when the
    /// terminal has no owning equipment.
    pub fn start(network: &Network, terminal: TerminalId, data: Option<D>) -> Result<Self, NetworkError> {
        let equipment = network.conducting_equipment(terminal)?;
        Ok(Self {
            from_terminal: terminal,
            to_terminal: terminal,
            from_equipment: equipment,
            to_equipment: equipment,
            n_terminal_steps: 0,
            n_equipment_steps: 0,
            leaves_all_terminals: false,
            data,
        })
    }

    /// Mark a start step as standing for its whole equipment, so equipment
    /// stepping leaves through every terminal rather than the others only.
    pub(crate) fn leaving_all_terminals(mut self) -> Self {
        self.leaves_all_terminals = true;
        self
    }

    pub(crate) fn leaves_all_terminals(&self) -> bool {
        self.leaves_all_terminals
    }

    /// The hop `from -> to` taken after this step.
    pub fn successor(
        &self,
        network: &Network,
        from: TerminalId,
        to: TerminalId,
        data: Option<D>,
    ) -> Result<Self, NetworkError> {
        let from_equipment = network.conducting_equipment(from)?;
        let to_equipment = network.conducting_equipment(to)?;
        let crossed = u32::from(from_equipment != to_equipment);
        Ok(Self {
            from_terminal: from,
            to_terminal: to,
            from_equipment,
            to_equipment,
            n_terminal_steps: self.n_terminal_steps + 1,
            n_equipment_steps: self.n_equipment_steps + crossed,
            leaves_all_terminals: false,
            data,
        })
    }

    /// Terminal the hop leaves from.
    pub fn from_terminal(&self) -> TerminalId {
        self.from_terminal
    }

    /// Terminal the hop arrives at.
    pub fn to_terminal(&self) -> TerminalId {
        self.to_terminal
    }

    /// Owner of [`from_terminal`](Self::from_terminal).
    pub fn from_equipment(&self) -> EquipmentId {
        self.from_equipment
    }

    /// Owner of [`to_terminal`](Self::to_terminal).
    pub fn to_equipment(&self) -> EquipmentId {
        self.to_equipment
    }

    /// Terminal hops taken since the start.
    pub fn n_terminal_steps(&self) -> u32 {
        self.n_terminal_steps
    }

    /// Hops into different equipment taken since the start.
    pub fn n_equipment_steps(&self) -> u32 {
        self.n_equipment_steps
    }

    /// Caller payload attached to the step.
    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    /// Both terminals belong to the same equipment. Start steps count as
    /// internal.
    pub fn stepped_internally(&self) -> bool {
        self.from_equipment == self.to_equipment
    }

    /// The step was created by [`start`](Self::start).
    pub fn is_start(&self) -> bool {
        self.n_terminal_steps == 0
    }
}
