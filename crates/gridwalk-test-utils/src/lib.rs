//! Network fixtures for gridwalk tests.
//!
//! [`chain`], [`line_chain`], [`switch_chain`] and [`ring`] build simple
//! topologies of two-terminal equipment. [`fixtures`] holds the larger
//! feeder and SWER networks used by the analysis tests.
//!
//! Fixture construction panics on network errors; a fixture that cannot be
//! built is a broken test.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use gridwalk_core::{EquipmentId, PhaseCode, TerminalId};
use gridwalk_network::{EquipmentType, Network};

/// A network of equipment `e0..eN` plus their IDs in build order.
#[derive(Debug)]
pub struct Chain {
    pub network: Network,
    pub equipment: Vec<EquipmentId>,
}

impl Chain {
    /// The `i`th equipment.
    pub fn id(&self, i: usize) -> EquipmentId {
        self.equipment[i]
    }

    /// Terminal `n` (zero-based) of the `i`th equipment.
    pub fn terminal(&self, i: usize, n: usize) -> TerminalId {
        self.network
            .equipment(self.equipment[i])
            .expect("fixture equipment")
            .terminals()[n]
    }
}

/// Two-terminal ABC equipment of the given kinds, each wired from its
/// second terminal to the next one's first.
pub fn chain(kinds: &[EquipmentType]) -> Chain {
    let mut network = Network::new();
    let mut equipment = Vec::with_capacity(kinds.len());
    for (i, &kind) in kinds.iter().enumerate() {
        let id = network
            .add_equipment(format!("e{i}"), kind, &[PhaseCode::ABC, PhaseCode::ABC])
            .expect("unique mrid");
        equipment.push(id);
    }
    for pair in equipment.windows(2) {
        link(&mut network, pair[0], 1, pair[1], 0);
    }
    Chain { network, equipment }
}

/// `n` AC line segments in a row.
pub fn line_chain(n: usize) -> Chain {
    chain(&vec![EquipmentType::AcLineSegment; n])
}

/// Breaker, line, line, breaker, line.
pub fn switch_chain() -> Chain {
    chain(&[
        EquipmentType::Breaker,
        EquipmentType::AcLineSegment,
        EquipmentType::AcLineSegment,
        EquipmentType::Breaker,
        EquipmentType::AcLineSegment,
    ])
}

/// `n` AC line segments in a closed loop.
pub fn ring(n: usize) -> Chain {
    let mut ring = line_chain(n);
    if n > 1 {
        let (first, last) = (ring.id(0), ring.id(n - 1));
        link(&mut ring.network, last, 1, first, 0);
    }
    ring
}

/// Wire terminal `ta` of `a` to terminal `tb` of `b`.
pub fn link(network: &mut Network, a: EquipmentId, ta: usize, b: EquipmentId, tb: usize) {
    let from = network.equipment(a).expect("fixture equipment").terminals()[ta];
    let to = network.equipment(b).expect("fixture equipment").terminals()[tb];
    network.connect_terminals(from, to).expect("fixture terminals");
}
