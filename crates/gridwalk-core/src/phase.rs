//! Single phases and the [`PhaseCode`] nominal phase descriptor.

use crate::error::PhaseError;
use smallvec::SmallVec;
use std::fmt;

/// One physical or nominal phase conductor.
///
/// `None` is the "no phase" sentinel. `Invalid` marks a slot whose stored
/// phase could not be decoded and is never produced by a valid trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SinglePhaseKind {
    /// No phase.
    None = 0,
    /// Phase A.
    A = 1,
    /// Phase B.
    B = 2,
    /// Phase C.
    C = 3,
    /// Neutral.
    N = 4,
    /// Unknown first phase of a two-phase or single-phase line.
    X = 5,
    /// Unknown second phase of a two-phase line.
    Y = 6,
    /// Undecodable phase.
    Invalid = 7,
}

impl SinglePhaseKind {
    /// Every real phase, in the canonical iteration order used by [`PhaseCode`].
    pub const REAL: [SinglePhaseKind; 6] = [
        SinglePhaseKind::A,
        SinglePhaseKind::B,
        SinglePhaseKind::C,
        SinglePhaseKind::X,
        SinglePhaseKind::Y,
        SinglePhaseKind::N,
    ];

    /// Numeric code used when packing phases into traced phase tables.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a packed phase code. Unknown codes decode to `Invalid`.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => SinglePhaseKind::None,
            1 => SinglePhaseKind::A,
            2 => SinglePhaseKind::B,
            3 => SinglePhaseKind::C,
            4 => SinglePhaseKind::N,
            5 => SinglePhaseKind::X,
            6 => SinglePhaseKind::Y,
            _ => SinglePhaseKind::Invalid,
        }
    }

    /// Slot index of this phase when used as a nominal phase position.
    ///
    /// `A`/`X` share slot 0 and `B`/`Y` share slot 1, since a terminal never
    /// carries both members of a pair. Returns [`PhaseError::InvalidPhase`]
    /// for `None` and `Invalid`.
    pub fn slot(self) -> Result<usize, PhaseError> {
        match self {
            SinglePhaseKind::A | SinglePhaseKind::X => Ok(0),
            SinglePhaseKind::B | SinglePhaseKind::Y => Ok(1),
            SinglePhaseKind::C => Ok(2),
            SinglePhaseKind::N => Ok(3),
            SinglePhaseKind::None | SinglePhaseKind::Invalid => {
                Err(PhaseError::InvalidPhase { phase: self })
            }
        }
    }

    /// Returns `true` for `A` through `Y`.
    pub fn is_real(self) -> bool {
        !matches!(self, SinglePhaseKind::None | SinglePhaseKind::Invalid)
    }

    fn mask(self) -> u8 {
        match self {
            SinglePhaseKind::A => 1 << 0,
            SinglePhaseKind::B => 1 << 1,
            SinglePhaseKind::C => 1 << 2,
            SinglePhaseKind::N => 1 << 3,
            SinglePhaseKind::X => 1 << 4,
            SinglePhaseKind::Y => 1 << 5,
            SinglePhaseKind::None | SinglePhaseKind::Invalid => 0,
        }
    }
}

impl fmt::Display for SinglePhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SinglePhaseKind::None => "NONE",
            SinglePhaseKind::A => "A",
            SinglePhaseKind::B => "B",
            SinglePhaseKind::C => "C",
            SinglePhaseKind::N => "N",
            SinglePhaseKind::X => "X",
            SinglePhaseKind::Y => "Y",
            SinglePhaseKind::Invalid => "INVALID",
        };
        f.write_str(name)
    }
}

/// The nominal phases a terminal is wired for, as a set of single phases.
///
/// Stored as a 6-bit set. Iteration yields phases in the order
/// `A, B, C, X, Y, N` so positional phase mapping lines up between, for
/// example, `ABN` and `XYN`.
///
/// # Examples
///
/// ```
/// use gridwalk_core::{PhaseCode, SinglePhaseKind};
///
/// let abcn = PhaseCode::ABCN;
/// assert_eq!(abcn.num_phases(), 4);
/// assert_eq!(abcn.without_neutral(), PhaseCode::ABC);
/// assert!(abcn.contains(SinglePhaseKind::N));
/// assert_eq!(PhaseCode::AB.intersection(PhaseCode::BC), PhaseCode::B);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PhaseCode(u8);

impl PhaseCode {
    /// No phases.
    pub const NONE: PhaseCode = PhaseCode(0);
    /// `A`.
    pub const A: PhaseCode = PhaseCode(0b00_0001);
    /// `B`.
    pub const B: PhaseCode = PhaseCode(0b00_0010);
    /// `C`.
    pub const C: PhaseCode = PhaseCode(0b00_0100);
    /// `N`.
    pub const N: PhaseCode = PhaseCode(0b00_1000);
    /// `X`.
    pub const X: PhaseCode = PhaseCode(0b01_0000);
    /// `Y`.
    pub const Y: PhaseCode = PhaseCode(0b10_0000);
    /// `AB`.
    pub const AB: PhaseCode = PhaseCode(0b00_0011);
    /// `AC`.
    pub const AC: PhaseCode = PhaseCode(0b00_0101);
    /// `AN`.
    pub const AN: PhaseCode = PhaseCode(0b00_1001);
    /// `BC`.
    pub const BC: PhaseCode = PhaseCode(0b00_0110);
    /// `BN`.
    pub const BN: PhaseCode = PhaseCode(0b00_1010);
    /// `CN`.
    pub const CN: PhaseCode = PhaseCode(0b00_1100);
    /// `ABC`.
    pub const ABC: PhaseCode = PhaseCode(0b00_0111);
    /// `ABN`.
    pub const ABN: PhaseCode = PhaseCode(0b00_1011);
    /// `ACN`.
    pub const ACN: PhaseCode = PhaseCode(0b00_1101);
    /// `BCN`.
    pub const BCN: PhaseCode = PhaseCode(0b00_1110);
    /// `ABCN`.
    pub const ABCN: PhaseCode = PhaseCode(0b00_1111);
    /// `XN`.
    pub const XN: PhaseCode = PhaseCode(0b01_1000);
    /// `XY`.
    pub const XY: PhaseCode = PhaseCode(0b11_0000);
    /// `XYN`.
    pub const XYN: PhaseCode = PhaseCode(0b11_1000);
    /// `YN`.
    pub const YN: PhaseCode = PhaseCode(0b10_1000);

    /// Build a code from any collection of single phases. `None` and
    /// `Invalid` entries are ignored.
    pub fn from_single_phases<I: IntoIterator<Item = SinglePhaseKind>>(phases: I) -> Self {
        PhaseCode(phases.into_iter().fold(0, |bits, p| bits | p.mask()))
    }

    /// The single phases in this code, in canonical order.
    pub fn single_phases(self) -> SmallVec<[SinglePhaseKind; 4]> {
        SinglePhaseKind::REAL
            .iter()
            .copied()
            .filter(|p| self.contains(*p))
            .collect()
    }

    /// Number of phases in the code.
    pub fn num_phases(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the code has no phases.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check whether `phase` is part of this code.
    pub fn contains(self, phase: SinglePhaseKind) -> bool {
        let mask = phase.mask();
        mask != 0 && self.0 & mask != 0
    }

    /// This code with the neutral removed.
    pub fn without_neutral(self) -> Self {
        PhaseCode(self.0 & !SinglePhaseKind::N.mask())
    }

    /// Set union.
    pub fn union(self, other: Self) -> Self {
        PhaseCode(self.0 | other.0)
    }

    /// Set intersection.
    pub fn intersection(self, other: Self) -> Self {
        PhaseCode(self.0 & other.0)
    }

    /// Phases in `self` but not in `other`.
    pub fn difference(self, other: Self) -> Self {
        PhaseCode(self.0 & !other.0)
    }

    /// Add a single phase.
    pub fn with(self, phase: SinglePhaseKind) -> Self {
        PhaseCode(self.0 | phase.mask())
    }
}

impl fmt::Debug for PhaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhaseCode({self})")
    }
}

impl fmt::Display for PhaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        for phase in self.single_phases() {
            write!(f, "{phase}")?;
        }
        Ok(())
    }
}

impl From<SinglePhaseKind> for PhaseCode {
    fn from(phase: SinglePhaseKind) -> Self {
        PhaseCode(phase.mask())
    }
}

impl FromIterator<SinglePhaseKind> for PhaseCode {
    fn from_iter<I: IntoIterator<Item = SinglePhaseKind>>(iter: I) -> Self {
        Self::from_single_phases(iter)
    }
}
