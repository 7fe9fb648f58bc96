//! Constant-time comparison and selection of byte strings.
//!
//! Use these for every equality check or choice that depends on secret-derived data. Both walk the
//! full length of their inputs whatever the contents. Lengths are public: `ct_eq` treats a length
//! mismatch as inequality, while the crate-internal `ct_select` requires equal lengths.

use cmov::{Cmov, CmovEq, Condition};

/// Returns 1 if `a` and `b` are equal, 0 otherwise.
///
/// Every byte is compared, so the running time does not depend on the position of the first
/// difference. Lengths are treated as public.
pub fn ct_eq(a: &[u8], b: &[u8]) -> Condition {
    if a.len() != b.len() {
        return 0;
    }
    let mut eq = 1;
    for (x, y) in a.iter().zip(b) {
        x.cmovne(y, 0, &mut eq);
    }
    eq
}

/// Overwrites `dst` with `src` if `condition` is non-zero, leaving it untouched otherwise.
///
/// # Panics
///
/// Panics if the two slices differ in length.
pub(crate) fn ct_select(dst: &mut [u8], src: &[u8], condition: Condition) {
    assert_eq!(dst.len(), src.len(), "ct_select operands must have the same length");
    for (x, y) in dst.iter_mut().zip(src) {
        x.cmovnz(y, condition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal() {
        let a = [0x5Au8; 1088];
        assert_eq!(ct_eq(&a, &a.clone()), 1);
        assert_eq!(ct_eq(&[], &[]), 1);
    }

    #[test]
    fn mismatch_anywhere() {
        let a = [0x5Au8; 1088];
        for i in [0, 1, 543, 1086, 1087] {
            let mut b = a;
            b[i] ^= 0x01;
            assert_eq!(ct_eq(&a, &b), 0, "difference at {i}");
        }
    }

    #[test]
    fn length_mismatch() {
        assert_eq!(ct_eq(&[1, 2, 3], &[1, 2]), 0);
    }

    #[test]
    fn select() {
        let mut out = [1u8; 32];
        ct_select(&mut out, &[2u8; 32], 0);
        assert_eq!(out, [1u8; 32]);
        ct_select(&mut out, &[2u8; 32], 1);
        assert_eq!(out, [2u8; 32]);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn select_length_mismatch() {
        ct_select(&mut [0u8; 32], &[1u8; 31], 1);
    }
}
