//! SWER (single wire earth return) equipment discovery.

use crate::config::{ConfigError, SwerConfig};
use gridwalk_core::{EquipmentId, FeederId, TerminalId, TraversalError};
use gridwalk_network::{Equipment, EquipmentType, Network};
use gridwalk_trace::{connected_equipment_trace, NetworkTrace, OpenCondition};
use indexmap::IndexSet;
use std::cell::RefCell;
use tracing::debug;

type Found = RefCell<IndexSet<EquipmentId>>;

/// Finds equipment on SWER spurs, plus the LV networks they supply.
///
/// A SWER transformer is a power transformer with at least one
/// single-phase terminal and at least one multi-phase terminal. From each
/// one found on a feeder:
///
/// 1. the transformer itself is recorded,
/// 2. an equipment trace from its single-phase side records everything
///    that still has a single-phase terminal, plus any switch it stops at,
/// 3. an equipment trace from its multi-phase side records everything in
///    the configured LV band.
///
/// Both traces stop at equipment already recorded and at switches open in
/// the configured state.
#[derive(Clone, Debug, Default)]
pub struct FindSwerEquipment {
    config: SwerConfig,
}

impl FindSwerEquipment {
    /// Discovery with a validated `config`.
    pub fn new(config: SwerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &SwerConfig {
        &self.config
    }

    /// SWER equipment on every feeder of `network`, without duplicates.
    pub fn find(&self, network: &Network) -> Result<Vec<EquipmentId>, TraversalError> {
        let mut found = IndexSet::new();
        for feeder in network.feeders() {
            found.extend(self.find_on_feeder(network, feeder.id())?);
        }
        Ok(found.into_iter().collect())
    }

    /// SWER equipment reachable from the SWER transformers of `feeder`.
    pub fn find_on_feeder(&self, network: &Network, feeder: FeederId) -> Result<Vec<EquipmentId>, TraversalError> {
        let found = Found::default();
        for &id in network.feeder(feeder)?.equipment() {
            let equipment = network.equipment(id)?;
            if is_swer_transformer(network, equipment) {
                debug!(transformer = %equipment.mrid(), %feeder, "tracing from SWER transformer");
                self.trace_from(network, equipment, &found)?;
            }
        }
        let found = found.into_inner();
        debug!(%feeder, found = found.len(), "SWER discovery complete");
        Ok(found.into_iter().collect())
    }

    fn trace_from(&self, network: &Network, transformer: &Equipment, found: &Found) -> Result<(), TraversalError> {
        found.borrow_mut().insert(transformer.id());
        self.trace_swer(network, transformer, found)?;
        self.trace_lv(network, transformer, found)
    }

    fn trace_swer(&self, network: &Network, transformer: &Equipment, found: &Found) -> Result<(), TraversalError> {
        let starts = neighbours(network, transformer, |phases| phases == 1)?;
        let mut trace = self.trace(network, found);
        trace
            .add_stop_condition(move |step, _| {
                network
                    .equipment(step.to_equipment())
                    .map_or(true, |e| !has_swer_terminal(network, e))
            })
            .add_step_action(move |step, ctx| {
                let is_switch = network
                    .equipment(step.to_equipment())
                    .is_ok_and(|e| e.kind().is_switch());
                if !ctx.is_stopping() || is_switch {
                    found.borrow_mut().insert(step.to_equipment());
                }
            });
        run_each(&mut trace, starts)
    }

    fn trace_lv(&self, network: &Network, transformer: &Equipment, found: &Found) -> Result<(), TraversalError> {
        let config = self.config;
        let mut starts = neighbours(network, transformer, |phases| phases > 1)?;
        starts.retain(|&id| network.equipment(id).is_ok_and(|e| config.is_lv(e.base_voltage())));

        let mut trace = self.trace(network, found);
        trace.add_step_action(move |step, _| {
            if network
                .equipment(step.to_equipment())
                .is_ok_and(|e| config.is_lv(e.base_voltage()))
            {
                found.borrow_mut().insert(step.to_equipment());
            }
        });
        run_each(&mut trace, starts)
    }

    /// Equipment trace stopping at recorded equipment and open switches.
    fn trace<'a>(&self, network: &'a Network, found: &'a Found) -> NetworkTrace<'a> {
        let mut trace = connected_equipment_trace(network);
        trace
            .add_stop_condition(move |step, _| found.borrow().contains(&step.to_equipment()))
            .add_condition(OpenCondition::new(self.config.state, None));
        trace
    }
}

fn run_each(trace: &mut NetworkTrace<'_>, starts: Vec<EquipmentId>) -> Result<(), TraversalError> {
    for start in starts {
        trace.reset()?;
        trace.run_from_equipment(start, true)?;
    }
    Ok(())
}

/// Equipment connected to the terminals of `equipment` whose phase count
/// passes `keep`.
fn neighbours(
    network: &Network,
    equipment: &Equipment,
    keep: impl Fn(usize) -> bool,
) -> Result<Vec<EquipmentId>, TraversalError> {
    let mut out = IndexSet::new();
    for &terminal in equipment.terminals() {
        if !keep(network.terminal(terminal)?.phases().num_phases()) {
            continue;
        }
        for other in network.connected_terminals(terminal)? {
            out.insert(network.conducting_equipment(other)?);
        }
    }
    Ok(out.into_iter().collect())
}

fn phase_counts<'n>(network: &'n Network, equipment: &'n Equipment) -> impl Iterator<Item = usize> + 'n {
    equipment
        .terminals()
        .iter()
        .filter_map(|&t: &TerminalId| network.terminal(t).ok())
        .map(|t| t.phases().num_phases())
}

fn has_swer_terminal(network: &Network, equipment: &Equipment) -> bool {
    phase_counts(network, equipment).any(|n| n == 1)
}

fn is_swer_transformer(network: &Network, equipment: &Equipment) -> bool {
    equipment.kind() == EquipmentType::PowerTransformer
        && has_swer_terminal(network, equipment)
        && phase_counts(network, equipment).any(|n| n > 1)
}
