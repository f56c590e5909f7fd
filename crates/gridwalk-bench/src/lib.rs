//! Benchmark networks for gridwalk.
//!
//! - [`radial_network`]: a seeded random radial feeder of AC line segments
//!   with switches sprinkled in.
//! - [`REFERENCE_SIZE`] and [`STRESS_SIZE`]: the equipment counts the
//!   benches use.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gridwalk_core::{EquipmentId, FeederId, NetworkState, PhaseCode, TerminalId};
use gridwalk_network::{EquipmentType, Network};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Equipment count of the reference profile.
pub const REFERENCE_SIZE: usize = 1_000;

/// Equipment count of the stress profile.
pub const STRESS_SIZE: usize = 20_000;

/// A generated feeder.
pub struct BenchNetwork {
    /// The network.
    pub network: Network,
    /// The single feeder, headed at the first equipment.
    pub feeder: FeederId,
    /// Head terminal of `feeder`.
    pub head: TerminalId,
    /// Every equipment item in build order.
    pub equipment: Vec<EquipmentId>,
}

/// Build a radial network of `size` equipment items from `seed`.
///
/// Item `i > 0` hangs off a uniformly chosen earlier item, so depth grows
/// roughly logarithmically. About one item in ten is a breaker, and one
/// breaker in five of those is normally open. The same seed always yields
/// the same network.
pub fn radial_network(size: usize, seed: u64) -> BenchNetwork {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut network = Network::new();
    let mut equipment = Vec::with_capacity(size);
    let phases = [PhaseCode::ABCN, PhaseCode::ABCN];

    for i in 0..size.max(1) {
        let roll = rng.next_u32() % 50;
        let kind = if i > 0 && roll < 5 {
            EquipmentType::Breaker
        } else {
            EquipmentType::AcLineSegment
        };
        let id = network
            .add_equipment(format!("eq{i}"), kind, &phases)
            .unwrap();
        if kind == EquipmentType::Breaker && roll == 0 {
            network.set_open(id, NetworkState::Normal, None, true).unwrap();
        }
        if i > 0 {
            let parent = equipment[(rng.next_u64() % i as u64) as usize];
            let from = network.equipment(parent).unwrap().terminals()[1];
            let to = network.equipment(id).unwrap().terminals()[0];
            network.connect_terminals(from, to).unwrap();
        }
        equipment.push(id);
    }

    let head = network.equipment(equipment[0]).unwrap().terminals()[1];
    let feeder = network.add_feeder("bench", Some(head)).unwrap();
    BenchNetwork {
        network,
        feeder,
        head,
        equipment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_network() {
        let a = radial_network(200, 7);
        let b = radial_network(200, 7);
        for (&x, &y) in a.equipment.iter().zip(&b.equipment) {
            assert_eq!(
                a.network.connected_equipment(x).unwrap(),
                b.network.connected_equipment(y).unwrap()
            );
            assert_eq!(
                a.network.equipment(x).unwrap().kind(),
                b.network.equipment(y).unwrap().kind()
            );
        }
    }

    #[test]
    fn every_item_but_the_root_has_a_parent() {
        let bench = radial_network(100, 1);
        assert_eq!(bench.equipment.len(), 100);
        for &id in &bench.equipment[1..] {
            let first = bench.network.equipment(id).unwrap().terminals()[0];
            assert!(bench.network.terminal(first).unwrap().is_connected());
        }
    }
}
