//! Ready-made traces.

use crate::config::TraceConfig;
use crate::trace::NetworkTrace;
use gridwalk_network::Network;

/// Depth-first trace over connected equipment. Each equipment item is
/// visited at most once.
pub fn connected_equipment_trace(network: &Network) -> NetworkTrace<'_> {
    NetworkTrace::new(network, TraceConfig::equipment())
}

/// Depth-first trace over connected terminals. Each terminal is visited at
/// most once.
pub fn connected_terminal_trace(network: &Network) -> NetworkTrace<'_> {
    NetworkTrace::new(network, TraceConfig::terminal())
}
