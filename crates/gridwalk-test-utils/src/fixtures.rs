//! Feeder and SWER networks for analysis tests.
//!
//! - [`feeder_network`]: a radial feeder with a branch behind a normally
//!   open disconnector.
//! - [`swer_network`]: a feeder with a SWER spur feeding an LV network,
//!   next to an ordinary three-phase transformer.

use crate::link;
use gridwalk_core::{EquipmentId, FeederId, NetworkState, PhaseCode, TerminalId};
use gridwalk_network::{EquipmentType, Network};

const ABC: [PhaseCode; 2] = [PhaseCode::ABC, PhaseCode::ABC];

fn add(network: &mut Network, mrid: &str, kind: EquipmentType, phases: &[PhaseCode]) -> EquipmentId {
    network.add_equipment(mrid, kind, phases).expect("unique mrid")
}

fn volts(network: &mut Network, equipment: EquipmentId, v: u32) {
    network.set_base_voltage(equipment, v).expect("fixture equipment");
}

/// ```text
/// source ── breaker ══ line0 ── junction ── line1 ── consumer
///                                  │
///                               open_switch (normally open) ── line2
/// ```
///
/// `head` is the breaker terminal facing `line0`. No equipment is assigned
/// to the feeder.
#[derive(Debug)]
pub struct FeederNetwork {
    pub network: Network,
    pub feeder: FeederId,
    pub head: TerminalId,
    pub source: EquipmentId,
    pub breaker: EquipmentId,
    pub line0: EquipmentId,
    pub junction: EquipmentId,
    pub line1: EquipmentId,
    pub consumer: EquipmentId,
    pub open_switch: EquipmentId,
    pub line2: EquipmentId,
}

pub fn feeder_network() -> FeederNetwork {
    let mut network = Network::new();
    let source = add(&mut network, "source", EquipmentType::EnergySource, &[PhaseCode::ABC]);
    let breaker = add(&mut network, "breaker", EquipmentType::Breaker, &ABC);
    let line0 = add(&mut network, "line0", EquipmentType::AcLineSegment, &ABC);
    let junction = add(&mut network, "junction", EquipmentType::Junction, &[PhaseCode::ABC; 3]);
    let line1 = add(&mut network, "line1", EquipmentType::AcLineSegment, &ABC);
    let consumer = add(&mut network, "consumer", EquipmentType::EnergyConsumer, &[PhaseCode::ABC]);
    let open_switch = add(&mut network, "open_switch", EquipmentType::Disconnector, &ABC);
    let line2 = add(&mut network, "line2", EquipmentType::AcLineSegment, &ABC);

    link(&mut network, source, 0, breaker, 0);
    link(&mut network, breaker, 1, line0, 0);
    link(&mut network, line0, 1, junction, 0);
    link(&mut network, junction, 1, line1, 0);
    link(&mut network, line1, 1, consumer, 0);
    link(&mut network, junction, 2, open_switch, 0);
    link(&mut network, open_switch, 1, line2, 0);
    network
        .set_open(open_switch, NetworkState::Normal, None, true)
        .expect("switch");

    let head = network.equipment(breaker).expect("breaker").terminals()[1];
    let feeder = network.add_feeder("feeder", Some(head)).expect("head terminal");

    FeederNetwork {
        network,
        feeder,
        head,
        source,
        breaker,
        line0,
        junction,
        line1,
        consumer,
        open_switch,
        line2,
    }
}

/// ```text
/// source ── hv_line ─┬─ isolating (ABC/A) ─ swer0 ─ fuse ─ swer1 ─ distribution (A/XYN) ─ lv_line ─ lv_consumer
///                    └─ three_phase (ABC/ABCN) ─ other_lv_line
/// ```
///
/// HV equipment is at 22 kV, SWER equipment at 12.7 kV and LV equipment at
/// 415 V. Transformers carry no base voltage. Every item is assigned to
/// `feeder`.
#[derive(Debug)]
pub struct SwerNetwork {
    pub network: Network,
    pub feeder: FeederId,
    pub source: EquipmentId,
    pub hv_line: EquipmentId,
    pub isolating: EquipmentId,
    pub swer0: EquipmentId,
    pub fuse: EquipmentId,
    pub swer1: EquipmentId,
    pub distribution: EquipmentId,
    pub lv_line: EquipmentId,
    pub lv_consumer: EquipmentId,
    pub three_phase: EquipmentId,
    pub other_lv_line: EquipmentId,
}

impl SwerNetwork {
    /// Equipment expected from SWER discovery, in no particular order.
    pub fn expected_swer(&self) -> Vec<EquipmentId> {
        vec![
            self.isolating,
            self.swer0,
            self.fuse,
            self.swer1,
            self.distribution,
            self.lv_line,
            self.lv_consumer,
        ]
    }
}

pub fn swer_network() -> SwerNetwork {
    let mut network = Network::new();
    let swer = [PhaseCode::A, PhaseCode::A];
    let lv = [PhaseCode::XYN, PhaseCode::XYN];

    let source = add(&mut network, "source", EquipmentType::EnergySource, &[PhaseCode::ABC]);
    let hv_line = add(&mut network, "hv_line", EquipmentType::AcLineSegment, &ABC);
    let isolating = add(
        &mut network,
        "isolating",
        EquipmentType::PowerTransformer,
        &[PhaseCode::ABC, PhaseCode::A],
    );
    let swer0 = add(&mut network, "swer0", EquipmentType::AcLineSegment, &swer);
    let fuse = add(&mut network, "fuse", EquipmentType::Fuse, &swer);
    let swer1 = add(&mut network, "swer1", EquipmentType::AcLineSegment, &swer);
    let distribution = add(
        &mut network,
        "distribution",
        EquipmentType::PowerTransformer,
        &[PhaseCode::A, PhaseCode::XYN],
    );
    let lv_line = add(&mut network, "lv_line", EquipmentType::AcLineSegment, &lv);
    let lv_consumer = add(&mut network, "lv_consumer", EquipmentType::EnergyConsumer, &[PhaseCode::XYN]);
    let three_phase = add(
        &mut network,
        "three_phase",
        EquipmentType::PowerTransformer,
        &[PhaseCode::ABC, PhaseCode::ABCN],
    );
    let other_lv_line = add(
        &mut network,
        "other_lv_line",
        EquipmentType::AcLineSegment,
        &[PhaseCode::ABCN, PhaseCode::ABCN],
    );

    link(&mut network, source, 0, hv_line, 0);
    link(&mut network, hv_line, 1, isolating, 0);
    link(&mut network, isolating, 1, swer0, 0);
    link(&mut network, swer0, 1, fuse, 0);
    link(&mut network, fuse, 1, swer1, 0);
    link(&mut network, swer1, 1, distribution, 0);
    link(&mut network, distribution, 1, lv_line, 0);
    link(&mut network, lv_line, 1, lv_consumer, 0);
    link(&mut network, hv_line, 1, three_phase, 0);
    link(&mut network, three_phase, 1, other_lv_line, 0);

    for eq in [source, hv_line] {
        volts(&mut network, eq, 22_000);
    }
    for eq in [swer0, fuse, swer1] {
        volts(&mut network, eq, 12_700);
    }
    for eq in [lv_line, lv_consumer, other_lv_line] {
        volts(&mut network, eq, 415);
    }

    let head = network.equipment(source).expect("source").terminals()[0];
    let feeder = network.add_feeder("swer_feeder", Some(head)).expect("head terminal");
    let all: Vec<EquipmentId> = network.equipment_iter().map(|e| e.id()).collect();
    for eq in all {
        network.assign_to_feeder(feeder, eq).expect("fixture feeder");
    }

    SwerNetwork {
        network,
        feeder,
        source,
        hv_line,
        isolating,
        swer0,
        fuse,
        swer1,
        distribution,
        lv_line,
        lv_consumer,
        three_phase,
        other_lv_line,
    }
}
