//! Fixed-width packing of ring elements, with and without lossy compression.
//!
//! Coefficients are packed little-endian: bit `j` of coefficient `i` is bit `i·d + j` of the
//! output, according to FIPS 203, Algorithms 5 and 6.

use crate::field::{compress, decompress, fe_reduce_once, FieldElement, RingElement, Q};
use crate::params::N;

/// Returns the 384-byte encoding of the ring element.
///
/// It implements ByteEncode₁₂, according to FIPS 203, Algorithm 5.
pub(crate) fn byte_encode12(f: &RingElement) -> [u8; 384] {
    let mut out = [0u8; 384];
    for (p, o) in f.chunks_exact(2).zip(out.chunks_exact_mut(3)) {
        let x = (p[0] as u32) | (p[1] as u32) << 12;
        o[0] = x as u8;
        o[1] = (x >> 8) as u8;
        o[2] = (x >> 16) as u8;
    }
    out
}

/// Decodes the 384-byte encoding of a polynomial, reducing every coefficient modulo q.
///
/// It implements ByteDecode₁₂, according to FIPS 203, Algorithm 6. Keys produced by this crate
/// never need the reduction; encapsulation keys from elsewhere are checked with
/// [`byte_decode12_checked`] first.
pub(crate) fn byte_decode12(b: &[u8; 384]) -> RingElement {
    let mut out = [0; N];
    for (o, p) in out.chunks_exact_mut(2).zip(b.chunks_exact(3)) {
        let d = (p[0] as u32) | (p[1] as u32) << 8 | (p[2] as u32) << 16;
        const MASK_12: u32 = 0b1111_1111_1111;
        o[0] = fe_reduce_once((d & MASK_12) as u16);
        o[1] = fe_reduce_once((d >> 12) as u16);
    }
    out
}

/// Checks that a value `a` is `< q`.
fn fe_check_reduced(a: u16) -> Option<FieldElement> {
    (a < Q).then_some(a)
}

/// Decodes the 384-byte encoding of a polynomial, checking that all the coefficients are properly
/// reduced. This achieves the "Modulus check" step of ML-KEM Encapsulation Input Validation: an
/// encoding accepted here re-encodes to exactly the same bytes.
pub(crate) fn byte_decode12_checked(b: &[u8; 384]) -> Option<RingElement> {
    let mut out = [0; N];
    for (o, p) in out.chunks_exact_mut(2).zip(b.chunks_exact(3)) {
        let d = (p[0] as u32) | (p[1] as u32) << 8 | (p[2] as u32) << 16;
        const MASK_12: u32 = 0b1111_1111_1111;
        o[0] = fe_check_reduced((d & MASK_12) as u16)?;
        o[1] = fe_check_reduced((d >> 12) as u16)?;
    }
    Some(out)
}

/// Packs `d` bits of every coefficient into `out`, which must be `32·d` bytes long.
///
/// Coefficients must already be below 2ᵈ. It implements ByteEncode_d for any `d ≤ 12`.
pub(crate) fn byte_encode(f: &[u16; N], d: usize, out: &mut [u8]) {
    debug_assert_eq!(out.len(), 32 * d);
    let mut acc = 0u32;
    let mut bits = 0;
    let mut out = out.iter_mut();
    for &c in f {
        acc |= (c as u32) << bits;
        bits += d;
        while bits >= 8 {
            if let Some(o) = out.next() {
                *o = acc as u8;
            }
            acc >>= 8;
            bits -= 8;
        }
    }
}

/// Unpacks 256 `d`-bit values from `b`, which must be `32·d` bytes long.
///
/// It implements ByteDecode_d for any `d < 12`; 12-bit values are not reduced here.
pub(crate) fn byte_decode(b: &[u8], d: usize) -> [u16; N] {
    debug_assert_eq!(b.len(), 32 * d);
    let mask = (1u32 << d) - 1;
    let mut f = [0; N];
    let mut acc = 0u32;
    let mut bits = 0;
    let mut b = b.iter();
    for f in f.iter_mut() {
        while bits < d {
            if let Some(&byte) = b.next() {
                acc |= (byte as u32) << bits;
            }
            bits += 8;
        }
        *f = (acc & mask) as u16;
        acc >>= d;
        bits -= d;
    }
    f
}

/// Writes the `32·d`-byte encoding of a ring element compressed to `d` bits per coefficient.
///
/// It implements Compress_d, according to FIPS 203, Section 4.2.1, followed by ByteEncode_d.
pub(crate) fn ring_compress_and_encode(f: &RingElement, d: usize, out: &mut [u8]) {
    let compressed = f.map(|x| compress(x, d));
    byte_encode(&compressed, d, out);
}

/// Decodes a `32·d`-byte encoding of a ring element where each `d` bits are mapped to an
/// equidistant distribution.
///
/// It implements ByteDecode_d followed by Decompress_d, according to FIPS 203, Section 4.2.1.
pub(crate) fn ring_decode_and_decompress(b: &[u8], d: usize) -> RingElement {
    byte_decode(b, d).map(|y| decompress(y, d))
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaChaRng;
    use rand_core::{RngCore, SeedableRng};

    use super::*;

    #[test]
    fn encode12_round_trip() {
        let mut rng = ChaChaRng::seed_from_u64(0xDEADBEEF);
        let f: RingElement = core::array::from_fn(|_| (rng.next_u32() % Q as u32) as u16);
        let b = byte_encode12(&f);
        assert_eq!(byte_decode12(&b), f);
        assert_eq!(byte_decode12_checked(&b), Some(f));
    }

    #[test]
    fn checked_decode_rejects_unreduced() {
        for (i, value) in [(0usize, Q), (1, Q), (200, 4095), (255, Q + 1)] {
            let mut f = [0u16; N];
            f[i] = value;
            let b = byte_encode12(&f);
            assert_eq!(byte_decode12_checked(&b), None, "coefficient {i} = {value}");

            // The lenient decoder reduces instead, so the encoding does not round-trip.
            let g = byte_decode12(&b);
            assert_eq!(g[i], value % Q);
            assert_ne!(byte_encode12(&g), b);
        }

        let mut f = [0u16; N];
        f[17] = Q - 1;
        assert!(byte_decode12_checked(&byte_encode12(&f)).is_some());
    }

    #[test]
    fn generic_encoding_matches_encode12_layout() {
        // For d = 12 the generic packer must agree with the specialised one.
        let mut rng = ChaChaRng::seed_from_u64(12);
        let f: RingElement = core::array::from_fn(|_| (rng.next_u32() % Q as u32) as u16);
        let mut b = [0u8; 384];
        byte_encode(&f, 12, &mut b);
        assert_eq!(b, byte_encode12(&f));
        assert_eq!(byte_decode(&b, 12), f);
    }

    #[test]
    fn generic_round_trip() {
        let mut rng = ChaChaRng::seed_from_u64(0xC0FFEE);
        for d in [1usize, 4, 5, 10, 11] {
            let f: [u16; N] = core::array::from_fn(|_| (rng.next_u32() & ((1 << d) - 1)) as u16);
            let mut b = [0u8; 32 * 11];
            byte_encode(&f, d, &mut b[..32 * d]);
            assert_eq!(byte_decode(&b[..32 * d], d), f, "d={d}");
        }
    }

    #[test]
    fn bit_order() {
        // The first coefficient occupies the least-significant bits of the first byte.
        let mut f = [0u16; N];
        f[0] = 0b1;
        f[1] = 0b1010;
        let mut b = [0u8; 128];
        byte_encode(&f, 4, &mut b);
        assert_eq!(b[0], 0b1010_0001);
        assert!(b[1..].iter().all(|&x| x == 0));

        let mut b = [0u8; 32];
        let mut m = [0u16; N];
        m[9] = 1;
        byte_encode(&m, 1, &mut b);
        assert_eq!(b[1], 0b10);
    }

    #[test]
    fn message_decompression() {
        let mut m = [0u8; 32];
        m[0] = 0b0000_0101;
        let f = ring_decode_and_decompress(&m, 1);
        assert_eq!(&f[..4], &[1665, 0, 1665, 0]);

        let mut out = [0u8; 32];
        ring_compress_and_encode(&f, 1, &mut out);
        assert_eq!(out, m);
    }
}
