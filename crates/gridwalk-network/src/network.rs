//! The [`Network`] arena and its connectivity queries.

use crate::connectivity::{nominal_phase_paths, ConnectivityResult};
use crate::equipment::{Equipment, EquipmentType};
use crate::feeder::Feeder;
use crate::terminal::{ConnectivityNode, Terminal};
use gridwalk_core::{
    EquipmentId, FeederId, NetworkError, NetworkState, NodeId, PhaseCode, SinglePhaseKind,
    TerminalId,
};
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;

/// Terminals reached from one terminal, usually no more than a handful.
pub type TerminalList = SmallVec<[TerminalId; 4]>;

/// An electrical network held in flat arenas.
///
/// # Examples
///
/// ```
/// use gridwalk_core::PhaseCode;
/// use gridwalk_network::{EquipmentType, Network};
///
/// let mut network = Network::new();
/// let source = network.add_equipment("src", EquipmentType::EnergySource, &[PhaseCode::ABC]).unwrap();
/// let line = network
///     .add_equipment("line", EquipmentType::AcLineSegment, &[PhaseCode::ABC, PhaseCode::ABC])
///     .unwrap();
/// let src_t = network.equipment(source).unwrap().terminals()[0];
/// let line_t1 = network.equipment(line).unwrap().terminals()[0];
/// network.connect_terminals(src_t, line_t1).unwrap();
///
/// assert_eq!(network.connected_terminals(src_t).unwrap().as_slice(), &[line_t1]);
/// ```
#[derive(Debug, Default)]
pub struct Network {
    terminals: Vec<Terminal>,
    equipment: Vec<Equipment>,
    nodes: Vec<ConnectivityNode>,
    feeders: Vec<Feeder>,
    by_mrid: IndexMap<String, EquipmentId>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ────────────────────────────────────────────

    /// Add equipment with one new terminal per entry in `terminal_phases`.
    pub fn add_equipment(
        &mut self,
        mrid: impl Into<String>,
        kind: EquipmentType,
        terminal_phases: &[PhaseCode],
    ) -> Result<EquipmentId, NetworkError> {
        let mrid = mrid.into();
        if self.by_mrid.contains_key(&mrid) {
            return Err(NetworkError::DuplicateMrid(mrid));
        }
        let id = EquipmentId(self.equipment.len() as u32);
        self.by_mrid.insert(mrid.clone(), id);
        self.equipment.push(Equipment::new(id, mrid, kind));
        for &phases in terminal_phases {
            let terminal = self.add_terminal(phases);
            self.attach_terminal(id, terminal)?;
        }
        Ok(id)
    }

    /// Add a free-standing terminal with no owner or connection.
    pub fn add_terminal(&mut self, phases: PhaseCode) -> TerminalId {
        let id = TerminalId(self.terminals.len() as u32);
        self.terminals.push(Terminal::new(id, phases));
        id
    }

    /// Attach `terminal` to `equipment`.
    ///
    /// A terminal's owner is set once. Re-attaching to the same owner is a
    /// no-op; attaching to a different owner fails with
    /// [`NetworkError::EquipmentAlreadyAssigned`].
    pub fn attach_terminal(
        &mut self,
        equipment: EquipmentId,
        terminal: TerminalId,
    ) -> Result<(), NetworkError> {
        let eq = self
            .equipment
            .get_mut(equipment.index())
            .ok_or(NetworkError::UnknownEquipment(equipment))?;
        let t = self
            .terminals
            .get_mut(terminal.index())
            .ok_or(NetworkError::UnknownTerminal(terminal))?;
        if t.equipment == Some(equipment) {
            return Ok(());
        }
        t.assign_equipment(equipment)?;
        eq.terminals.push(terminal);
        t.sequence_number = eq.terminals.len() as u32;
        Ok(())
    }

    /// Create an empty connectivity node.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ConnectivityNode {
            id,
            terminals: Vec::new(),
        });
        id
    }

    /// Wire `terminal` to `node`, moving it off any node it was on.
    pub fn connect(&mut self, terminal: TerminalId, node: NodeId) -> Result<(), NetworkError> {
        if node.index() >= self.nodes.len() {
            return Err(NetworkError::UnknownNode(node));
        }
        self.disconnect(terminal)?;
        self.nodes[node.index()].terminals.push(terminal);
        self.terminals[terminal.index()].node = Some(node);
        Ok(())
    }

    /// Wire two terminals together, reusing the node of either one if it
    /// has one. Returns the shared node.
    pub fn connect_terminals(&mut self, a: TerminalId, b: TerminalId) -> Result<NodeId, NetworkError> {
        let node_a = self.terminal(a)?.node;
        let node_b = self.terminal(b)?.node;
        match (node_a, node_b) {
            (Some(na), Some(nb)) if na == nb => Ok(na),
            (Some(na), _) => {
                self.connect(b, na)?;
                Ok(na)
            }
            (None, Some(nb)) => {
                self.connect(a, nb)?;
                Ok(nb)
            }
            (None, None) => {
                let node = self.add_node();
                self.connect(a, node)?;
                self.connect(b, node)?;
                Ok(node)
            }
        }
    }

    /// Remove `terminal` from its connectivity node, if any.
    pub fn disconnect(&mut self, terminal: TerminalId) -> Result<(), NetworkError> {
        let t = self
            .terminals
            .get_mut(terminal.index())
            .ok_or(NetworkError::UnknownTerminal(terminal))?;
        if let Some(node) = t.node.take() {
            self.nodes[node.index()].terminals.retain(|&id| id != terminal);
        }
        Ok(())
    }

    /// Set the nominal base voltage of `equipment`.
    pub fn set_base_voltage(&mut self, equipment: EquipmentId, volts: u32) -> Result<(), NetworkError> {
        self.equipment_mut(equipment)?.base_voltage = Some(volts);
        Ok(())
    }

    /// Open or close a switch in `state`, for one phase or (`None`) all.
    pub fn set_open(
        &mut self,
        equipment: EquipmentId,
        state: NetworkState,
        phase: Option<SinglePhaseKind>,
        open: bool,
    ) -> Result<(), NetworkError> {
        let eq = self.equipment_mut(equipment)?;
        if !eq.kind.is_switch() {
            return Err(NetworkError::NotASwitch(equipment));
        }
        eq.set_open(state, phase, open);
        Ok(())
    }

    /// Add a feeder energised from `head_terminal`.
    pub fn add_feeder(
        &mut self,
        mrid: impl Into<String>,
        head_terminal: Option<TerminalId>,
    ) -> Result<FeederId, NetworkError> {
        if let Some(head) = head_terminal {
            self.terminal(head)?;
        }
        let id = FeederId(self.feeders.len() as u32);
        self.feeders.push(Feeder {
            id,
            mrid: mrid.into(),
            head_terminal,
            equipment: IndexSet::new(),
        });
        Ok(id)
    }

    /// Record `equipment` as part of `feeder`. Returns `false` if it
    /// already was.
    pub fn assign_to_feeder(&mut self, feeder: FeederId, equipment: EquipmentId) -> Result<bool, NetworkError> {
        self.equipment(equipment)?;
        let f = self
            .feeders
            .get_mut(feeder.index())
            .ok_or(NetworkError::UnknownFeeder(feeder))?;
        if !f.equipment.insert(equipment) {
            return Ok(false);
        }
        self.equipment[equipment.index()].feeders.push(feeder);
        Ok(true)
    }

    /// Drop every equipment assignment of `feeder`.
    pub fn clear_feeder(&mut self, feeder: FeederId) -> Result<(), NetworkError> {
        let f = self
            .feeders
            .get_mut(feeder.index())
            .ok_or(NetworkError::UnknownFeeder(feeder))?;
        for eq in f.equipment.drain(..) {
            self.equipment[eq.index()].feeders.retain(|id| *id != feeder);
        }
        Ok(())
    }

    // ── Lookup ──────────────────────────────────────────────────

    /// Terminal by ID.
    pub fn terminal(&self, id: TerminalId) -> Result<&Terminal, NetworkError> {
        self.terminals
            .get(id.index())
            .ok_or(NetworkError::UnknownTerminal(id))
    }

    /// Equipment by ID.
    pub fn equipment(&self, id: EquipmentId) -> Result<&Equipment, NetworkError> {
        self.equipment
            .get(id.index())
            .ok_or(NetworkError::UnknownEquipment(id))
    }

    /// Connectivity node by ID.
    pub fn node(&self, id: NodeId) -> Result<&ConnectivityNode, NetworkError> {
        self.nodes.get(id.index()).ok_or(NetworkError::UnknownNode(id))
    }

    /// Feeder by ID.
    pub fn feeder(&self, id: FeederId) -> Result<&Feeder, NetworkError> {
        self.feeders
            .get(id.index())
            .ok_or(NetworkError::UnknownFeeder(id))
    }

    /// Equipment by mRID.
    pub fn find_equipment(&self, mrid: &str) -> Option<EquipmentId> {
        self.by_mrid.get(mrid).copied()
    }

    /// All terminals.
    pub fn terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.terminals.iter()
    }

    /// All equipment.
    pub fn equipment_iter(&self) -> impl Iterator<Item = &Equipment> {
        self.equipment.iter()
    }

    /// All feeders.
    pub fn feeders(&self) -> impl Iterator<Item = &Feeder> {
        self.feeders.iter()
    }

    /// Number of terminals.
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    /// Number of equipment items.
    pub fn equipment_count(&self) -> usize {
        self.equipment.len()
    }

    /// Owning equipment of `terminal`.
    pub fn conducting_equipment(&self, terminal: TerminalId) -> Result<EquipmentId, NetworkError> {
        self.terminal(terminal)?.equipment()
    }

    // ── Connectivity ────────────────────────────────────────────

    /// Terminals sharing a connectivity node with `terminal`, excluding
    /// `terminal` itself and any other terminal of the same equipment.
    pub fn connected_terminals(&self, terminal: TerminalId) -> Result<TerminalList, NetworkError> {
        let t = self.terminal(terminal)?;
        let Some(node) = t.node else {
            return Ok(TerminalList::new());
        };
        let owner = t.equipment;
        Ok(self
            .node(node)?
            .terminals
            .iter()
            .copied()
            .filter(|&other| other != terminal)
            .filter(|&other| {
                owner.is_none() || self.terminals[other.index()].equipment != owner
            })
            .collect())
    }

    /// The other terminals of the equipment that owns `terminal`.
    pub fn other_terminals(&self, terminal: TerminalId) -> Result<TerminalList, NetworkError> {
        let owner = self.conducting_equipment(terminal)?;
        Ok(self
            .equipment(owner)?
            .terminals
            .iter()
            .copied()
            .filter(|&other| other != terminal)
            .collect())
    }

    /// Phase connectivity from `from` to `to`.
    pub fn connectivity(&self, from: TerminalId, to: TerminalId) -> Result<ConnectivityResult, NetworkError> {
        let from_phases = self.terminal(from)?.phases;
        let to_phases = self.terminal(to)?.phases;
        Ok(ConnectivityResult {
            from_terminal: from,
            to_terminal: to,
            nominal_phase_paths: nominal_phase_paths(from_phases, to_phases),
        })
    }

    /// Connectivity results for every terminal connected to `terminal`.
    pub fn connected_results(&self, terminal: TerminalId) -> Result<Vec<ConnectivityResult>, NetworkError> {
        self.connected_terminals(terminal)?
            .into_iter()
            .map(|other| self.connectivity(terminal, other))
            .collect()
    }

    /// Equipment reachable across one connectivity node from any terminal
    /// of `equipment`, in terminal order without duplicates.
    pub fn connected_equipment(&self, equipment: EquipmentId) -> Result<Vec<EquipmentId>, NetworkError> {
        let mut seen = IndexSet::new();
        for &terminal in self.equipment(equipment)?.terminals() {
            for other in self.connected_terminals(terminal)? {
                seen.insert(self.conducting_equipment(other)?);
            }
        }
        Ok(seen.into_iter().collect())
    }

    fn equipment_mut(&mut self, id: EquipmentId) -> Result<&mut Equipment, NetworkError> {
        self.equipment
            .get_mut(id.index())
            .ok_or(NetworkError::UnknownEquipment(id))
    }
}
