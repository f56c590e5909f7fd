//! Per-terminal traced phase state for the normal and current network.
//!
//! Each [`TracedPhases`] holds two independent tables, one per
//! [`NetworkState`]. A table has four slots, one per nominal phase position
//! (`A`/`X`, `B`/`Y`, `C`, `N`). Every slot records which physical phase
//! energises that position and the [`PhaseDirection`] it flows in.
//!
//! A table is packed into a single `u32`, eight bits per slot: the low
//! nibble is the physical phase code and bits 4..6 are the direction.
//!
//! Slot transitions:
//!
//! - empty → energised(p, d) for any p, d
//! - energised(p, d) → energised(p, d') for the same p
//! - energised(p, d) → empty
//!
//! Moving a slot from p to a different p' requires clearing it first;
//! [`PhaseTable::add`] reports [`PhaseError::CrossPhaseConflict`] instead.
//!
//! Tables use interior mutability so traversal step actions can update
//! terminals through a shared network borrow. They are not `Sync`.

use crate::direction::PhaseDirection;
use crate::error::PhaseError;
use crate::phase::SinglePhaseKind;
use std::cell::Cell;
use std::fmt;

const SLOT_BITS: u32 = 8;
const PHASE_MASK: u32 = 0x0F;
const DIRECTION_SHIFT: u32 = 4;
const DIRECTION_MASK: u32 = 0b11;

/// Which network state a trace reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NetworkState {
    /// Switch positions as designed.
    #[default]
    Normal,
    /// Switch positions as currently operated.
    Current,
}

impl fmt::Display for NetworkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkState::Normal => f.write_str("normal"),
            NetworkState::Current => f.write_str("current"),
        }
    }
}

/// Traced phases of one terminal, for both network states.
///
/// # Examples
///
/// ```
/// use gridwalk_core::{PhaseDirection, SinglePhaseKind as P, TracedPhases};
///
/// let traced = TracedPhases::new();
/// let normal = traced.normal();
/// assert!(normal.add(P::A, PhaseDirection::OUT, P::A).unwrap());
/// assert!(normal.add(P::A, PhaseDirection::OUT, P::B).is_err());
/// assert_eq!(normal.phase(P::A).unwrap(), P::A);
/// assert_eq!(traced.current().phase(P::A).unwrap(), P::None);
/// ```
#[derive(Default)]
pub struct TracedPhases {
    normal: Cell<u32>,
    current: Cell<u32>,
}

impl TracedPhases {
    /// Create a record with every slot empty in both states.
    pub fn new() -> Self {
        Self::default()
    }

    /// View of the table for `state`.
    pub fn table(&self, state: NetworkState) -> PhaseTable<'_> {
        match state {
            NetworkState::Normal => self.normal(),
            NetworkState::Current => self.current(),
        }
    }

    /// View of the normal-state table.
    pub fn normal(&self) -> PhaseTable<'_> {
        PhaseTable {
            bits: &self.normal,
        }
    }

    /// View of the current-state table.
    pub fn current(&self) -> PhaseTable<'_> {
        PhaseTable {
            bits: &self.current,
        }
    }
}

impl Clone for TracedPhases {
    fn clone(&self) -> Self {
        Self {
            normal: Cell::new(self.normal.get()),
            current: Cell::new(self.current.get()),
        }
    }
}

impl fmt::Debug for TracedPhases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedPhases")
            .field("normal", &self.normal())
            .field("current", &self.current())
            .finish()
    }
}

/// Borrowed view of one phase table.
#[derive(Clone, Copy)]
pub struct PhaseTable<'a> {
    bits: &'a Cell<u32>,
}

impl PhaseTable<'_> {
    /// Physical phase energising `nominal`, or `SinglePhaseKind::None` if
    /// the slot is empty.
    pub fn phase(&self, nominal: SinglePhaseKind) -> Result<SinglePhaseKind, PhaseError> {
        let (phase, _) = self.slot(nominal)?;
        Ok(phase)
    }

    /// Direction recorded for `nominal`.
    pub fn direction(&self, nominal: SinglePhaseKind) -> Result<PhaseDirection, PhaseError> {
        let (_, direction) = self.slot(nominal)?;
        Ok(direction)
    }

    /// Overwrite the slot for `nominal`.
    ///
    /// A `NONE` direction or a `None` physical phase clears the slot.
    /// Returns whether anything changed.
    pub fn set(
        &self,
        nominal: SinglePhaseKind,
        direction: PhaseDirection,
        phase: SinglePhaseKind,
    ) -> Result<bool, PhaseError> {
        let index = nominal.slot()?;
        let (existing_phase, existing_direction) = self.slot(nominal)?;

        if direction.is_none() || !phase.is_real() {
            if existing_phase == SinglePhaseKind::None && existing_direction.is_none() {
                return Ok(false);
            }
            self.write(index, SinglePhaseKind::None, PhaseDirection::NONE);
            return Ok(true);
        }

        if existing_phase == phase && existing_direction == direction {
            return Ok(false);
        }
        self.write(index, phase, direction);
        Ok(true)
    }

    /// Merge `direction` into the slot for `nominal`.
    ///
    /// An empty slot takes `phase`. A slot already holding `phase` gains the
    /// union of the two directions. A slot holding a different phase is
    /// left untouched and [`PhaseError::CrossPhaseConflict`] is returned.
    /// Returns whether anything changed.
    pub fn add(
        &self,
        nominal: SinglePhaseKind,
        direction: PhaseDirection,
        phase: SinglePhaseKind,
    ) -> Result<bool, PhaseError> {
        let index = nominal.slot()?;
        if direction.is_none() || !phase.is_real() {
            return Ok(false);
        }

        let (existing_phase, existing_direction) = self.slot(nominal)?;
        if existing_phase == SinglePhaseKind::None {
            self.write(index, phase, direction);
            return Ok(true);
        }
        if existing_phase != phase {
            return Err(PhaseError::CrossPhaseConflict {
                nominal,
                existing: existing_phase,
                attempted: phase,
            });
        }

        let merged = existing_direction.union(direction);
        if merged == existing_direction {
            return Ok(false);
        }
        self.write(index, phase, merged);
        Ok(true)
    }

    /// Strip `direction` from the slot for `nominal` if it currently holds
    /// `phase`. A slot left with no direction is cleared.
    ///
    /// Returns `false` without changing anything when the slot holds a
    /// different phase or does not carry `direction`.
    pub fn remove(
        &self,
        nominal: SinglePhaseKind,
        direction: PhaseDirection,
        phase: SinglePhaseKind,
    ) -> Result<bool, PhaseError> {
        let index = nominal.slot()?;
        let (existing_phase, existing_direction) = self.slot(nominal)?;
        if existing_phase != phase || existing_phase == SinglePhaseKind::None {
            return Ok(false);
        }

        let remaining = existing_direction.difference(direction);
        if remaining == existing_direction {
            return Ok(false);
        }
        if remaining.is_none() {
            self.write(index, SinglePhaseKind::None, PhaseDirection::NONE);
        } else {
            self.write(index, phase, remaining);
        }
        Ok(true)
    }

    /// Clear the slot for `nominal` if it holds `phase`, whatever its
    /// direction.
    pub fn remove_phase(
        &self,
        nominal: SinglePhaseKind,
        phase: SinglePhaseKind,
    ) -> Result<bool, PhaseError> {
        let index = nominal.slot()?;
        let (existing_phase, _) = self.slot(nominal)?;
        if existing_phase != phase || existing_phase == SinglePhaseKind::None {
            return Ok(false);
        }
        self.write(index, SinglePhaseKind::None, PhaseDirection::NONE);
        Ok(true)
    }

    /// Returns `true` if every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.get() == 0
    }

    /// Clear every slot. Returns whether anything changed.
    pub fn clear(&self) -> bool {
        let changed = self.bits.get() != 0;
        self.bits.set(0);
        changed
    }

    fn slot(&self, nominal: SinglePhaseKind) -> Result<(SinglePhaseKind, PhaseDirection), PhaseError> {
        let shift = nominal.slot()? as u32 * SLOT_BITS;
        let raw = self.bits.get() >> shift;
        let phase = SinglePhaseKind::from_code((raw & PHASE_MASK) as u8);
        let direction = PhaseDirection::from_bits(((raw >> DIRECTION_SHIFT) & DIRECTION_MASK) as u8);
        Ok((phase, direction))
    }

    fn write(&self, index: usize, phase: SinglePhaseKind, direction: PhaseDirection) {
        let shift = index as u32 * SLOT_BITS;
        let packed = u32::from(phase.code()) | (u32::from(direction.bits()) << DIRECTION_SHIFT);
        let cleared = self.bits.get() & !(0xFF << shift);
        self.bits.set(cleared | (packed << shift));
    }
}

impl fmt::Debug for PhaseTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for nominal in [
            SinglePhaseKind::A,
            SinglePhaseKind::B,
            SinglePhaseKind::C,
            SinglePhaseKind::N,
        ] {
            if let Ok((phase, direction)) = self.slot(nominal) {
                list.entry(&format_args!("{nominal}:{phase}/{direction}"));
            }
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::PhaseDirection as D;
    use crate::phase::SinglePhaseKind as P;
    use proptest::prelude::*;

    fn seeded() -> TracedPhases {
        let traced = TracedPhases::new();
        let n = traced.normal();
        n.set(P::A, D::IN, P::A).unwrap();
        n.set(P::B, D::OUT, P::B).unwrap();
        n.set(P::C, D::BOTH, P::C).unwrap();
        n.set(P::N, D::BOTH, P::N).unwrap();
        let c = traced.current();
        c.set(P::A, D::BOTH, P::N).unwrap();
        c.set(P::B, D::BOTH, P::C).unwrap();
        c.set(P::C, D::OUT, P::B).unwrap();
        c.set(P::N, D::IN, P::A).unwrap();
        traced
    }

    #[test]
    fn tables_are_independent() {
        let traced = seeded();
        assert_eq!(traced.normal().phase(P::A).unwrap(), P::A);
        assert_eq!(traced.current().phase(P::A).unwrap(), P::N);
        assert_eq!(traced.normal().direction(P::C).unwrap(), D::BOTH);
        assert_eq!(traced.current().direction(P::C).unwrap(), D::OUT);
        assert_eq!(
            traced.table(NetworkState::Current).phase(P::N).unwrap(),
            P::A
        );
    }

    #[test]
    fn x_and_y_share_slots_with_a_and_b() {
        let traced = seeded();
        assert_eq!(traced.normal().phase(P::X).unwrap(), P::A);
        assert_eq!(traced.normal().phase(P::Y).unwrap(), P::B);
    }

    #[test]
    fn sentinel_nominal_phase_is_rejected() {
        let traced = seeded();
        assert_eq!(
            traced.normal().phase(P::None),
            Err(PhaseError::InvalidPhase { phase: P::None })
        );
        assert!(traced.normal().direction(P::Invalid).is_err());
        assert!(traced.normal().set(P::None, D::IN, P::A).is_err());
    }

    #[test]
    fn set_reports_changes() {
        let traced = seeded();
        let n = traced.normal();
        assert!(!n.set(P::A, D::IN, P::A).unwrap());
        assert!(n.set(P::A, D::BOTH, P::A).unwrap());
        assert!(n.set(P::A, D::BOTH, P::C).unwrap());
        assert_eq!(n.phase(P::A).unwrap(), P::C);
    }

    #[test]
    fn set_none_clears_slot() {
        let traced = seeded();
        let n = traced.normal();
        assert!(n.set(P::A, D::NONE, P::A).unwrap());
        assert_eq!(n.phase(P::A).unwrap(), P::None);
        assert_eq!(n.direction(P::A).unwrap(), D::NONE);

        assert!(n.set(P::B, D::OUT, P::None).unwrap());
        assert_eq!(n.phase(P::B).unwrap(), P::None);
        assert_eq!(n.direction(P::B).unwrap(), D::NONE);
        assert!(!n.set(P::B, D::NONE, P::None).unwrap());
    }

    #[test]
    fn set_then_clear_allows_new_phase() {
        let traced = TracedPhases::new();
        let n = traced.normal();
        n.set(P::A, D::BOTH, P::B).unwrap();
        n.set(P::A, D::NONE, P::B).unwrap();
        assert_eq!(n.direction(P::A).unwrap(), D::NONE);
        assert_eq!(n.phase(P::A).unwrap(), P::None);
        assert!(n.add(P::A, D::OUT, P::C).unwrap());
        assert_eq!(n.phase(P::A).unwrap(), P::C);
    }

    #[test]
    fn add_merges_directions() {
        let traced = TracedPhases::new();
        let n = traced.normal();
        assert!(n.add(P::B, D::OUT, P::C).unwrap());
        assert!(!n.add(P::B, D::OUT, P::C).unwrap());
        assert!(n.add(P::B, D::IN, P::C).unwrap());
        assert_eq!(n.direction(P::B).unwrap(), D::BOTH);
        assert!(!n.add(P::B, D::IN, P::C).unwrap());
        assert!(!n.add(P::B, D::NONE, P::C).unwrap());
    }

    #[test]
    fn add_conflicting_phase_fails_and_keeps_slot() {
        let traced = TracedPhases::new();
        let n = traced.normal();
        n.add(P::A, D::OUT, P::A).unwrap();
        let err = n.add(P::A, D::OUT, P::B).unwrap_err();
        assert_eq!(
            err,
            PhaseError::CrossPhaseConflict {
                nominal: P::A,
                existing: P::A,
                attempted: P::B,
            }
        );
        assert_eq!(n.phase(P::A).unwrap(), P::A);
        assert_eq!(n.direction(P::A).unwrap(), D::OUT);
    }

    #[test]
    fn remove_direction_only_on_matching_phase() {
        let traced = seeded();
        let n = traced.normal();
        n.add(P::A, D::OUT, P::A).unwrap();
        assert!(n.remove(P::A, D::IN, P::A).unwrap());
        assert_eq!(n.direction(P::A).unwrap(), D::OUT);

        assert!(!n.remove(P::B, D::OUT, P::A).unwrap());
        assert_eq!(n.direction(P::B).unwrap(), D::OUT);

        assert!(n.remove(P::C, D::BOTH, P::C).unwrap());
        assert_eq!(n.phase(P::C).unwrap(), P::None);
        assert_eq!(n.direction(P::C).unwrap(), D::NONE);
    }

    #[test]
    fn remove_phase_ignores_direction() {
        let traced = seeded();
        let c = traced.current();
        assert!(!c.remove_phase(P::A, P::A).unwrap());
        assert!(c.remove_phase(P::A, P::N).unwrap());
        assert_eq!(c.phase(P::A).unwrap(), P::None);
        assert!(!c.remove_phase(P::A, P::N).unwrap());
    }

    #[test]
    fn clear_empties_only_one_table() {
        let traced = seeded();
        assert!(traced.normal().clear());
        assert!(traced.normal().is_empty());
        assert!(!traced.current().is_empty());
        assert!(!traced.normal().clear());
    }

    fn arb_nominal() -> impl Strategy<Value = P> {
        prop::sample::select(vec![P::A, P::B, P::C, P::N])
    }

    fn arb_physical() -> impl Strategy<Value = P> {
        prop::sample::select(vec![P::A, P::B, P::C, P::N, P::X, P::Y])
    }

    fn arb_direction() -> impl Strategy<Value = D> {
        (1u8..4).prop_map(D::from_bits)
    }

    proptest! {
        #[test]
        fn add_never_overwrites_a_different_phase(
            nominal in arb_nominal(),
            first in arb_physical(),
            second in arb_physical(),
            d1 in arb_direction(),
            d2 in arb_direction(),
        ) {
            let traced = TracedPhases::new();
            let n = traced.normal();
            n.add(nominal, d1, first).unwrap();
            let result = n.add(nominal, d2, second);
            if first == second {
                prop_assert!(result.is_ok());
                prop_assert_eq!(n.direction(nominal).unwrap(), d1 + d2);
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!(n.direction(nominal).unwrap(), d1);
            }
            prop_assert_eq!(n.phase(nominal).unwrap(), first);
        }

        #[test]
        fn slots_do_not_bleed_into_each_other(
            writes in prop::collection::vec((arb_nominal(), arb_direction(), arb_physical()), 1..16),
        ) {
            let traced = TracedPhases::new();
            let n = traced.normal();
            let mut expected = std::collections::HashMap::new();
            for (nominal, direction, phase) in writes {
                n.set(nominal, direction, phase).unwrap();
                expected.insert(nominal, (phase, direction));
            }
            for (nominal, (phase, direction)) in expected {
                prop_assert_eq!(n.phase(nominal).unwrap(), phase);
                prop_assert_eq!(n.direction(nominal).unwrap(), direction);
            }
            prop_assert!(traced.current().is_empty());
        }

        #[test]
        fn remove_of_added_direction_restores_empty(
            nominal in arb_nominal(),
            phase in arb_physical(),
            direction in arb_direction(),
        ) {
            let traced = TracedPhases::new();
            let n = traced.normal();
            n.add(nominal, direction, phase).unwrap();
            prop_assert!(n.remove(nominal, direction, phase).unwrap());
            prop_assert!(n.is_empty());
        }
    }
}
