//! Conducting equipment and its open/closed state.

use gridwalk_core::{EquipmentId, FeederId, NetworkState, PhaseCode, SinglePhaseKind, TerminalId};
use smallvec::SmallVec;
use std::fmt;

/// Kind of conducting equipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EquipmentType {
    /// Overhead line or underground cable section.
    AcLineSegment,
    /// Circuit breaker.
    Breaker,
    /// Manually operated isolator.
    Disconnector,
    /// Fuse.
    Fuse,
    /// Automatic reclosing switch.
    Recloser,
    /// Short conductor bridging two points.
    Jumper,
    /// Zero-impedance junction point.
    Junction,
    /// Busbar.
    BusbarSection,
    /// Source of energy, usually a zone substation feed.
    EnergySource,
    /// Load.
    EnergyConsumer,
    /// Transformer.
    PowerTransformer,
}

impl EquipmentType {
    /// Returns `true` for equipment that can be opened.
    pub fn is_switch(self) -> bool {
        matches!(
            self,
            EquipmentType::Breaker
                | EquipmentType::Disconnector
                | EquipmentType::Fuse
                | EquipmentType::Recloser
                | EquipmentType::Jumper
        )
    }

    /// Stable type name used in context keys and log output.
    pub fn name(self) -> &'static str {
        match self {
            EquipmentType::AcLineSegment => "AcLineSegment",
            EquipmentType::Breaker => "Breaker",
            EquipmentType::Disconnector => "Disconnector",
            EquipmentType::Fuse => "Fuse",
            EquipmentType::Recloser => "Recloser",
            EquipmentType::Jumper => "Jumper",
            EquipmentType::Junction => "Junction",
            EquipmentType::BusbarSection => "BusbarSection",
            EquipmentType::EnergySource => "EnergySource",
            EquipmentType::EnergyConsumer => "EnergyConsumer",
            EquipmentType::PowerTransformer => "PowerTransformer",
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A piece of conducting equipment.
///
/// Owns an ordered list of terminals. Switch-like equipment additionally
/// carries a per-phase open mask for each [`NetworkState`].
#[derive(Debug)]
pub struct Equipment {
    pub(crate) id: EquipmentId,
    pub(crate) mrid: String,
    pub(crate) kind: EquipmentType,
    pub(crate) terminals: SmallVec<[TerminalId; 2]>,
    pub(crate) base_voltage: Option<u32>,
    pub(crate) normal_open: PhaseCode,
    pub(crate) current_open: PhaseCode,
    pub(crate) feeders: SmallVec<[FeederId; 1]>,
}

impl Equipment {
    pub(crate) fn new(id: EquipmentId, mrid: String, kind: EquipmentType) -> Self {
        Self {
            id,
            mrid,
            kind,
            terminals: SmallVec::new(),
            base_voltage: None,
            normal_open: PhaseCode::NONE,
            current_open: PhaseCode::NONE,
            feeders: SmallVec::new(),
        }
    }

    /// Arena ID.
    pub fn id(&self) -> EquipmentId {
        self.id
    }

    /// Master resource identifier.
    pub fn mrid(&self) -> &str {
        &self.mrid
    }

    /// Equipment kind.
    pub fn kind(&self) -> EquipmentType {
        self.kind
    }

    /// Terminals in sequence order.
    pub fn terminals(&self) -> &[TerminalId] {
        &self.terminals
    }

    /// Nominal base voltage in volts, if known.
    pub fn base_voltage(&self) -> Option<u32> {
        self.base_voltage
    }

    /// Feeders this equipment has been assigned to.
    pub fn feeders(&self) -> &[FeederId] {
        &self.feeders
    }

    /// Whether the equipment is open in `state`.
    ///
    /// With `phase = None` the equipment counts as open if any phase is
    /// open. Non-switch equipment is never open.
    pub fn is_open(&self, state: NetworkState, phase: Option<SinglePhaseKind>) -> bool {
        if !self.kind.is_switch() {
            return false;
        }
        let mask = self.open_mask(state);
        match phase {
            None => !mask.is_empty(),
            Some(p) => mask.contains(p),
        }
    }

    /// The phases currently open in `state`.
    pub fn open_mask(&self, state: NetworkState) -> PhaseCode {
        match state {
            NetworkState::Normal => self.normal_open,
            NetworkState::Current => self.current_open,
        }
    }

    pub(crate) fn set_open(&mut self, state: NetworkState, phase: Option<SinglePhaseKind>, open: bool) {
        let affected = match phase {
            None => PhaseCode::from_single_phases(SinglePhaseKind::REAL),
            Some(p) => PhaseCode::from(p),
        };
        let mask = match state {
            NetworkState::Normal => &mut self.normal_open,
            NetworkState::Current => &mut self.current_open,
        };
        *mask = if open {
            mask.union(affected)
        } else {
            mask.difference(affected)
        };
    }
}
