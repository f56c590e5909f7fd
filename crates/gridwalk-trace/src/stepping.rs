//! Successor enumeration for network traces.

use crate::step::NetworkTraceStep;
use gridwalk_core::{NetworkError, TerminalId, TraversalError};
use gridwalk_network::Network;
use gridwalk_traversal::{QueueNext, StepContext};
use smallvec::SmallVec;
use std::fmt;

/// How a network trace moves from one step to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stepping {
    /// Jump from equipment to connected equipment. Every successor crosses
    /// a connectivity node. Visits are tracked per equipment.
    #[default]
    Equipment,
    /// Alternate between internal hops through equipment and crossing hops
    /// over connectivity nodes. Visits are tracked per terminal.
    Terminal,
}

impl fmt::Display for Stepping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equipment => f.write_str("equipment"),
            Self::Terminal => f.write_str("terminal"),
        }
    }
}

/// Computes the payload of a successor from its parent step, the terminal
/// it arrives at and the parent's context.
pub type ComputeData<'a, D> = Box<dyn Fn(&NetworkTraceStep<D>, TerminalId, &StepContext) -> D + 'a>;

type Hops = SmallVec<[(TerminalId, TerminalId); 8]>;

/// [`QueueNext`] strategy that walks a [`Network`].
pub struct NetworkStepper<'a, D> {
    network: &'a Network,
    stepping: Stepping,
    compute_data: Option<ComputeData<'a, D>>,
}

impl<'a, D> NetworkStepper<'a, D> {
    /// Stepper over `network` without payload computation.
    pub fn new(network: &'a Network, stepping: Stepping) -> Self {
        Self {
            network,
            stepping,
            compute_data: None,
        }
    }

    /// The network walked.
    pub fn network(&self) -> &'a Network {
        self.network
    }

    /// Active stepping strategy.
    pub fn stepping(&self) -> Stepping {
        self.stepping
    }

    /// Install the payload function, replacing any previous one.
    pub fn set_compute_data<F>(&mut self, f: F)
    where
        F: Fn(&NetworkTraceStep<D>, TerminalId, &StepContext) -> D + 'a,
    {
        self.compute_data = Some(Box::new(f));
    }

    /// The terminal hops leaving `step`, as `(from, to)` pairs.
    ///
    /// Equipment stepping leaves through the other terminals of the
    /// arrival terminal's equipment, or through all of them for a step
    /// seeded at a whole equipment.
    fn hops(&self, step: &NetworkTraceStep<D>) -> Result<Hops, NetworkError> {
        let here = step.to_terminal();
        let mut hops = Hops::new();
        match self.stepping {
            Stepping::Equipment => {
                let exits: SmallVec<[TerminalId; 4]> = if step.leaves_all_terminals() {
                    SmallVec::from_slice(self.network.equipment(step.to_equipment())?.terminals())
                } else {
                    self.network.other_terminals(here)?
                };
                for exit in exits {
                    // Never yields a terminal of `exit`'s own equipment, so
                    // every successor counts an equipment step.
                    for to in self.network.connected_terminals(exit)? {
                        hops.push((exit, to));
                    }
                }
            }
            Stepping::Terminal if step.stepped_internally() => {
                for to in self.network.connected_terminals(here)? {
                    hops.push((here, to));
                }
            }
            Stepping::Terminal => {
                for to in self.network.other_terminals(here)? {
                    hops.push((here, to));
                }
            }
        }
        Ok(hops)
    }
}

impl<D> QueueNext<NetworkTraceStep<D>> for NetworkStepper<'_, D> {
    fn next_items(
        &mut self,
        step: &NetworkTraceStep<D>,
        context: &StepContext,
    ) -> Result<Vec<NetworkTraceStep<D>>, TraversalError> {
        self.hops(step)?
            .into_iter()
            .map(|(from, to)| {
                let data = self.compute_data.as_ref().map(|f| f(step, to, context));
                step.successor(self.network, from, to, data)
                    .map_err(TraversalError::from)
            })
            .collect()
    }
}

impl<D> fmt::Debug for NetworkStepper<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkStepper")
            .field("stepping", &self.stepping)
            .field("compute_data", &self.compute_data.is_some())
            .finish_non_exhaustive()
    }
}
