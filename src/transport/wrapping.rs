//! 32-bit wrapping sequence numbers
//!
//! TCP carries sequence numbers as 32-bit values offset by a random initial
//! sequence number. Internally the stack counts in absolute 64-bit indices;
//! [`Wrap32`] converts between the two.

use std::fmt;
use std::ops::Add;

const MODULO: u64 = 1 << 32;
const HALF: u64 = 1 << 31;

/// A sequence number modulo 2^32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Wrap32(u32);

impl Wrap32 {
    pub const fn new(raw_value: u32) -> Self {
        Wrap32(raw_value)
    }

    pub const fn raw_value(self) -> u32 {
        self.0
    }

    /// Wrap absolute value `n` relative to `zero_point`.
    pub fn wrap(n: u64, zero_point: Wrap32) -> Wrap32 {
        Wrap32((n as u32).wrapping_add(zero_point.0))
    }

    /// The absolute value that wraps to `self` and lies closest to `checkpoint`.
    ///
    /// Candidates are 2^32 apart. A candidate exactly 2^31 away on either side
    /// of the checkpoint resolves to the smaller one.
    pub fn unwrap(self, zero_point: Wrap32, checkpoint: u64) -> u64 {
        let diff = self.0.wrapping_sub(zero_point.0) as u64;
        let quotient = checkpoint / MODULO;
        let remainder = checkpoint % MODULO;

        let quotient = if diff >= remainder + HALF {
            // Candidate in the checkpoint's period is at least half a period
            // above it: the one below is at least as close.
            quotient.saturating_sub(1)
        } else if diff + HALF < remainder {
            // Candidate is more than half a period below: step up, unless
            // that would leave u64.
            if quotient + 1 < MODULO {
                quotient + 1
            } else {
                quotient
            }
        } else {
            quotient
        };

        diff + quotient * MODULO
    }
}

impl Add<u32> for Wrap32 {
    type Output = Wrap32;

    fn add(self, rhs: u32) -> Wrap32 {
        Wrap32(self.0.wrapping_add(rhs))
    }
}

impl fmt::Display for Wrap32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        assert_eq!(Wrap32::wrap(5, Wrap32::new(0)).raw_value(), 5);
        assert_eq!(Wrap32::wrap(3 * MODULO + 17, Wrap32::new(0)).raw_value(), 17);
        assert_eq!(Wrap32::wrap(10, Wrap32::new(u32::MAX)).raw_value(), 9);
    }

    #[test]
    fn test_unwrap_crosses_period_boundary() {
        let zero = Wrap32::new(0);
        assert_eq!(Wrap32::new(0).unwrap(zero, MODULO - 1), MODULO);
        assert_eq!(Wrap32::new(u32::MAX).unwrap(zero, MODULO), MODULO - 1);
        assert_eq!(Wrap32::new(u32::MAX).unwrap(zero, 0), u32::MAX as u64);
    }

    #[test]
    fn test_unwrap_near_zero_does_not_underflow() {
        let zero = Wrap32::new(1 << 31);
        // diff is 2^32 - 1, far above checkpoint 0, but nothing below 0 exists
        assert_eq!(Wrap32::new((1 << 31) - 1).unwrap(zero, 0), MODULO - 1);
    }

    #[test]
    fn test_unwrap_near_max_does_not_overflow() {
        let zero = Wrap32::new(0);
        let checkpoint = u64::MAX;
        let v = Wrap32::new(5).unwrap(zero, checkpoint);
        assert_eq!(v, u64::MAX - u32::MAX as u64 + 5);
        assert_eq!(Wrap32::wrap(v, zero).raw_value(), 5);
    }

    #[test]
    fn test_unwrap_ties_resolve_downwards() {
        let zero = Wrap32::new(0);
        // Checkpoint sits exactly between HALF and HALF + MODULO
        let checkpoint = MODULO;
        assert_eq!(Wrap32::new(HALF as u32).unwrap(zero, checkpoint), HALF);
        // Checkpoint at HALF: candidates 0 and MODULO are equidistant
        assert_eq!(Wrap32::new(0).unwrap(zero, HALF), 0);
    }

    #[test]
    fn test_round_trip_with_offsets() {
        let zero_points = [0u32, 1, 0x7FFF_FFFF, 0x8000_0000, u32::MAX, 0xDEAD_BEEF];
        let values = [
            0u64,
            1,
            HALF - 1,
            HALF,
            MODULO - 1,
            MODULO,
            MODULO * 7 + 12345,
            u64::MAX - 3,
        ];
        for &zp in &zero_points {
            for &n in &values {
                let zero_point = Wrap32::new(zp);
                let wrapped = Wrap32::wrap(n, zero_point);
                assert_eq!(wrapped.unwrap(zero_point, n), n, "zp={zp} n={n}");
            }
        }
    }

    #[test]
    fn test_add_wraps() {
        assert_eq!(Wrap32::new(u32::MAX) + 2, Wrap32::new(1));
    }
}
