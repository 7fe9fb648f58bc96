//! Arithmetic in ℤ_q and coefficient-wise operations on ring elements.
//!
//! Every routine here handles secret material, so none of them branch on their inputs.

use crate::params::N;

/// The ML-KEM modulus.
pub(crate) const Q: u16 = 3329;

/// FieldElement is an integer modulo q, an element of ℤ_q. It is always reduced.
pub(crate) type FieldElement = u16;

// RingElement is a polynomial, an element of R_q, represented as an array according to FIPS 203,
// Section 2.4. NTT-domain elements share the representation.
pub(crate) type RingElement = [FieldElement; N];

/// Reduce a value `a < 2q`.
pub(crate) fn fe_reduce_once(a: u16) -> FieldElement {
    let x = a.wrapping_sub(Q);
    x.wrapping_add((x >> 15).wrapping_mul(Q))
}

pub(crate) fn fe_add(a: FieldElement, b: FieldElement) -> FieldElement {
    fe_reduce_once(a.wrapping_add(b))
}

pub(crate) fn fe_sub(a: FieldElement, b: FieldElement) -> FieldElement {
    fe_reduce_once(a.wrapping_sub(b).wrapping_add(Q))
}

const BARRETT_MULTIPLIER: u64 = 5039; // 4¹² / q
const BARRETT_SHIFT: usize = 24; // log₂(4¹²)

/// Reduce a value `a < q²` using Barrett reduction, to avoid potentially variable-time division.
pub(crate) fn fe_reduce(a: u32) -> FieldElement {
    let quotient = ((a as u64).wrapping_mul(BARRETT_MULTIPLIER) >> BARRETT_SHIFT) as u32;
    fe_reduce_once(a.wrapping_sub(quotient.wrapping_mul(Q as u32)) as u16)
}

pub(crate) fn fe_mul(a: FieldElement, b: FieldElement) -> FieldElement {
    fe_reduce((a as u32).wrapping_mul(b as u32))
}

/// Maps a field element uniformly to the range 0 to 2ᵈ-1, according to FIPS 203, Section 4.2.1.
///
/// Valid for every `d` up to 11, the widest compression any parameter set uses.
pub(crate) fn compress(x: FieldElement, d: usize) -> u16 {
    // round(x·2ᵈ / q) with ties rounding up, via a Barrett quotient whose remainder lies in
    // [0, 2q). The remainder then selects one of three rounding spans:
    //
    //     [0, q/2)       -> quotient
    //     [q/2, 3q/2)    -> quotient + 1
    //     [3q/2, 2q)     -> quotient + 2
    //
    // Each span boundary is tested by the sign bit of a wrapping subtraction.
    let dividend = (x as u32) << d;
    let quotient = ((dividend as u64).wrapping_mul(BARRETT_MULTIPLIER) >> BARRETT_SHIFT) as u32;
    let remainder = dividend.wrapping_sub(quotient.wrapping_mul(Q as u32));

    let half_q = Q as u32 / 2;
    let round_up = (half_q.wrapping_sub(remainder) >> 31) & 1;
    let round_up_twice = ((Q as u32 + half_q).wrapping_sub(remainder) >> 31) & 1;

    // x = q - 1 rounds to 2ᵈ, which wraps to zero.
    let mask = (1u32 << d) - 1;
    (quotient.wrapping_add(round_up).wrapping_add(round_up_twice) & mask) as u16
}

/// Maps `y` in [0, 2ᵈ) back to a field element, computing round(y·q / 2ᵈ) with ties rounding
/// up, according to FIPS 203, Section 4.2.1.
pub(crate) fn decompress(y: u16, d: usize) -> FieldElement {
    let dividend = (y as u32).wrapping_mul(Q as u32);
    // Bit d-1 of the dividend is the top bit of the remainder, i.e. the rounding bit. The result
    // is at most 3328.
    ((dividend >> d) + ((dividend >> (d - 1)) & 1)) as u16
}

/// Adds two RingElements or NTT-domain elements.
pub(crate) fn poly_add(a: &RingElement, b: &RingElement) -> RingElement {
    let mut out = [0; N];
    for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
        *o = fe_add(*a, *b);
    }
    out
}

/// Subtracts two RingElements or NTT-domain elements.
pub(crate) fn poly_sub(a: &RingElement, b: &RingElement) -> RingElement {
    let mut out = [0; N];
    for ((o, a), b) in out.iter_mut().zip(a).zip(b) {
        *o = fe_sub(*a, *b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add() {
        for a in 0..Q {
            for b in 0..Q {
                assert_eq!(fe_add(a, b), (a.wrapping_add(b) % Q));
            }
        }
    }

    #[test]
    fn sub() {
        for a in 0..Q {
            for b in 0..Q {
                assert_eq!(fe_sub(a, b), (a.wrapping_sub(b).wrapping_add(Q) % Q));
            }
        }
    }

    #[test]
    fn mul() {
        for a in 0..Q {
            for b in 0..Q {
                let c = ((a as u32).wrapping_mul(b as u32)) % Q as u32;
                assert_eq!(fe_mul(a, b), c as u16);
            }
        }
    }

    #[test]
    fn reduce_once_below_2q() {
        for a in 0..2 * Q {
            assert_eq!(fe_reduce_once(a), a % Q);
        }
    }

    #[test]
    fn compress_decompress() {
        for bits in [1usize, 4, 5, 10, 11] {
            for a in 0..(1u16 << bits) {
                let f = decompress(a, bits);
                assert!(f < Q);
                let b = compress(f, bits);
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn compress_matches_rounding_definition() {
        // round(2ᵈ/q · x) mod 2ᵈ, with halves rounding up.
        for bits in [1usize, 4, 5, 10, 11] {
            for x in 0..Q {
                let expected = ((((x as u32) << bits) * 2 + Q as u32) / (2 * Q as u32))
                    % (1u32 << bits);
                assert_eq!(compress(x, bits) as u32, expected, "x={x} d={bits}");
            }
        }
    }

    #[test]
    fn compression_error_is_bounded() {
        for bits in [1usize, 4, 5, 10, 11] {
            let bound = (Q as u32).div_ceil(1 << (bits + 1));
            for x in 0..Q {
                let y = decompress(compress(x, bits), bits);
                let diff = fe_sub(x, y).min(fe_sub(y, x));
                assert!(diff as u32 <= bound, "x={x} d={bits} y={y}");
            }
        }
    }
}
