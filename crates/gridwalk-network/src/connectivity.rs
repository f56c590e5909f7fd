//! Zero-impedance connectivity between terminals and their phase mapping.

use gridwalk_core::{PhaseCode, SinglePhaseKind, TerminalId};
use smallvec::SmallVec;

/// One nominal phase of a source terminal and the nominal phase it lands
/// on at a connected terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NominalPhasePath {
    /// Nominal phase on the source terminal.
    pub from: SinglePhaseKind,
    /// Nominal phase on the connected terminal.
    pub to: SinglePhaseKind,
}

/// A terminal reachable from another through a connectivity node, with
/// the nominal phase paths between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectivityResult {
    /// Where the connection starts.
    pub from_terminal: TerminalId,
    /// Where the connection ends.
    pub to_terminal: TerminalId,
    /// Phase paths from `from_terminal` to `to_terminal`.
    pub nominal_phase_paths: SmallVec<[NominalPhasePath; 4]>,
}

impl ConnectivityResult {
    /// Nominal phases on `to_terminal` reached by the paths.
    pub fn to_nominal_phases(&self) -> PhaseCode {
        self.nominal_phase_paths.iter().map(|p| p.to).collect()
    }

    /// Nominal phases on `to_terminal` reached from any phase in `from`.
    pub fn mapped_phases(&self, from: PhaseCode) -> PhaseCode {
        self.nominal_phase_paths
            .iter()
            .filter(|p| from.contains(p.from))
            .map(|p| p.to)
            .collect()
    }
}

/// Pair up the nominal phases of two connected terminals.
///
/// Phases present on both sides connect by name. Each remaining live phase
/// of `from` then connects to the phase in the same position of `to`, if
/// that phase is live and not already used. Neutral never maps to a live
/// phase or the other way round.
pub fn nominal_phase_paths(from: PhaseCode, to: PhaseCode) -> SmallVec<[NominalPhasePath; 4]> {
    let from_phases = from.single_phases();
    let to_phases = to.single_phases();

    let mut paths: SmallVec<[NominalPhasePath; 4]> = SmallVec::new();
    let mut used = PhaseCode::NONE;
    let mut unmatched: SmallVec<[(usize, SinglePhaseKind); 4]> = SmallVec::new();

    for (position, &phase) in from_phases.iter().enumerate() {
        if to.contains(phase) {
            paths.push(NominalPhasePath { from: phase, to: phase });
            used = used.with(phase);
        } else {
            unmatched.push((position, phase));
        }
    }

    for (position, phase) in unmatched {
        if phase == SinglePhaseKind::N {
            continue;
        }
        if let Some(&candidate) = to_phases.get(position) {
            if candidate != SinglePhaseKind::N && !used.contains(candidate) {
                paths.push(NominalPhasePath {
                    from: phase,
                    to: candidate,
                });
                used = used.with(candidate);
            }
        }
    }

    paths
}
