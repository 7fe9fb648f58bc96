//! The symmetric primitives of FIPS 203, Section 4.1, all instantiated with SHA-3.

use sha3::digest::{ExtendableOutput, FixedOutput, Update, XofReader};
use sha3::{Sha3_256, Sha3_512, Shake128, Shake256};
use zeroize::Zeroize;

/// Number of bytes SHAKE128 produces per permutation.
pub(crate) const XOF_BLOCK_LEN: usize = 168;

/// H: the 32-byte hash of an encapsulation key.
pub(crate) fn h(input: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    Sha3_256::default().chain(input).finalize_into((&mut out).into());
    out
}

/// G: derives two 32-byte values from the concatenation `a ‖ b`.
pub(crate) fn g(a: &[u8], b: &[u8]) -> ([u8; 32], [u8; 32]) {
    let mut out = [0u8; 64];
    Sha3_512::default().chain(a).chain(b).finalize_into((&mut out).into());
    let (mut first, mut second) = ([0u8; 32], [0u8; 32]);
    first.copy_from_slice(&out[..32]);
    second.copy_from_slice(&out[32..]);
    out.zeroize();
    (first, second)
}

/// J: the implicit-rejection key derived from `z ‖ ct`.
pub(crate) fn j(z: &[u8], ct: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    Shake256::default().chain(z).chain(ct).finalize_xof_into(&mut out);
    out
}

/// PRF_η: fills `out` (64·η bytes) from the seed `s` and the domain-separation byte `b`.
pub(crate) fn prf(s: &[u8; 32], b: u8, out: &mut [u8]) {
    Shake256::default().chain(s).chain([b]).finalize_xof_into(out);
}

/// XOF: the unbounded byte stream used to sample matrix entry `(ii, jj)` from `ρ`.
pub(crate) fn xof(rho: &[u8; 32], ii: u8, jj: u8) -> impl XofReader {
    Shake128::default().chain(rho).chain([ii, jj]).finalize_xof()
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn empty_input_digests() {
        assert_eq!(
            h(b""),
            hex!("a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a")
        );
        let mut stream = [0u8; 8];
        xof_empty().read(&mut stream);
        assert_eq!(stream, hex!("7f9c2ba4e88f827d"));
    }

    fn xof_empty() -> impl XofReader {
        Shake128::default().finalize_xof()
    }

    #[test]
    fn g_splits_sha3_512() {
        let (a, b) = g(b"ab", b"c");
        let (c, d) = g(b"abc", b"");
        assert_eq!((a, b), (c, d));
        assert_ne!(a, b);
    }

    #[test]
    fn prf_lengths_are_prefixes() {
        let s = [7u8; 32];
        let (mut short, mut long) = ([0u8; 128], [0u8; 192]);
        prf(&s, 1, &mut short);
        prf(&s, 1, &mut long);
        assert_eq!(short[..], long[..128]);

        let mut other = [0u8; 128];
        prf(&s, 2, &mut other);
        assert_ne!(short, other);
    }
}
