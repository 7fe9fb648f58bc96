//! Sampling of uniform NTT-domain elements and of small noise polynomials.

use sha3::digest::XofReader;
use zeroize::Zeroize;

use crate::field::{fe_sub, RingElement, Q};
use crate::hash::{self, XOF_BLOCK_LEN};
use crate::params::{MAX_ETA, N};

/// Draw a uniformly random NTT-domain element from a stream of uniformly random bytes generated by
/// the XOF function, according to FIPS 203, Algorithm 7.
///
/// The stream is consumed one SHAKE128 block at a time, for as many blocks as it takes to accept
/// all 256 coefficients. There is no upper bound on the number of blocks.
pub(crate) fn sample_ntt(rho: &[u8; 32], ii: u8, jj: u8) -> RingElement {
    let mut xof = hash::xof(rho, ii, jj);

    // Every three bytes b₀ b₁ b₂ form two little-endian 12-bit candidates:
    // d₁ = b₀ + 256·(b₁ mod 16) and d₂ = ⌊b₁/16⌋ + 16·b₂. Candidates ≥ q are discarded, roughly
    // one in five.
    let mut a = [0; N];
    let mut block = [0u8; XOF_BLOCK_LEN];
    let mut j = 0;
    while j < N {
        xof.read(&mut block);
        for b in block.chunks_exact(3) {
            let d = (b[0] as u32) | (b[1] as u32) << 8 | (b[2] as u32) << 16;
            const MASK12: u32 = 0b1111_1111_1111;

            let d1 = d & MASK12;
            if d1 < Q as u32 && j < N {
                a[j] = d1 as u16;
                j += 1;
            }

            let d2 = d >> 12;
            if d2 < Q as u32 && j < N {
                a[j] = d2 as u16;
                j += 1;
            }
        }
    }
    a
}

/// Draws a RingElement from the centered binomial distribution Dη, using 64·η bytes of PRF output
/// keyed by `s` and the counter `b`, according to FIPS 203, Algorithm 8.
pub(crate) fn sample_poly_cbd(s: &[u8; 32], b: u8, eta: usize) -> RingElement {
    let mut buf = [0u8; 64 * MAX_ETA];
    let prf = &mut buf[..64 * eta];
    hash::prf(s, b, prf);
    let f = cbd(prf, eta);
    buf.zeroize();
    f
}

/// Maps 64·η bytes to a polynomial with coefficients in [-η, η].
///
/// Each coefficient consumes 2η bits: the sum of the first η minus the sum of the last η. Four
/// coefficients take exactly η bytes, so the input is processed in η-byte chunks.
fn cbd(bytes: &[u8], eta: usize) -> RingElement {
    let mut f = [0; N];
    for (chunk, f) in bytes.chunks_exact(eta).zip(f.chunks_exact_mut(4)) {
        let mut bits = 0u32;
        for (i, byte) in chunk.iter().enumerate() {
            bits |= (*byte as u32) << (8 * i);
        }

        for (i, f) in f.iter_mut().enumerate() {
            let x = bits >> (2 * eta * i);
            let (mut pos, mut neg) = (0u16, 0u16);
            for k in 0..eta {
                pos += (x >> k & 1) as u16;
                neg += (x >> (eta + k) & 1) as u16;
            }
            *f = fe_sub(pos, neg);
        }
        bits.zeroize();
    }
    f
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use sha3::digest::{ExtendableOutput, FixedOutput, Update};
    use sha3::{Sha3_256, Shake128};

    use super::*;
    use crate::encode::byte_encode12;

    /// Needs four SHAKE128 blocks, one more than almost every other seed.
    const UNLUCKY_RHO: [u8; 32] =
        hex!("d2d27d69fc0a2c6cc0aabec462ce665aa8a92766844f081b672588acdf8a2c71");

    /// Every 12-bit candidate of a stream, accepted or not.
    fn candidates(stream: &[u8]) -> impl Iterator<Item = u16> + '_ {
        stream.chunks_exact(3).flat_map(|b| {
            let d = (b[0] as u16) | (b[1] as u16) << 8;
            let e = (b[1] as u16) >> 4 | (b[2] as u16) << 4;
            [d & 0xFFF, e]
        })
    }

    #[test]
    fn sample_ntt_keeps_reading_past_average() {
        let mut stream = [0u8; 16 * XOF_BLOCK_LEN];
        Shake128::default().chain(UNLUCKY_RHO).chain([0, 0]).finalize_xof_into(&mut stream);

        // Three blocks do not suffice for this seed.
        assert!(candidates(&stream[..3 * XOF_BLOCK_LEN]).filter(|&c| c < Q).count() < N);

        // The result is the first 256 accepted candidates of the unbounded stream.
        let expected: Vec<u16> = candidates(&stream).filter(|&c| c < Q).take(N).collect();
        let a = sample_ntt(&UNLUCKY_RHO, 0, 0);
        assert_eq!(a.to_vec(), expected);

        let digest = Sha3_256::default().chain(byte_encode12(&a)).finalize_fixed();
        assert_eq!(
            digest[..],
            hex!("fdb6e2fb9c74df46477d7801d0dbeb5382b312ec7c0004c07adce7a37e951e4a")
        );
    }

    #[test]
    fn sample_ntt_is_reduced_and_index_sensitive() {
        let rho = [0x42; 32];
        let a = sample_ntt(&rho, 0, 1);
        let b = sample_ntt(&rho, 1, 0);
        assert!(a.iter().chain(&b).all(|&c| c < Q));
        assert_ne!(a, b);
    }

    #[test]
    fn cbd_bounds() {
        for eta in [2usize, 3] {
            for b in 0..8 {
                let f = sample_poly_cbd(&[b; 32], b, eta);
                for c in f {
                    assert!(c <= eta as u16 || c >= Q - eta as u16, "eta={eta} c={c}");
                }
            }
        }
    }

    #[test]
    fn cbd_bit_layout() {
        // η = 2: one byte yields two coefficients, (b₀+b₁)-(b₂+b₃) and (b₄+b₅)-(b₆+b₇).
        let mut bytes = [0u8; 128];
        bytes[0] = 0b0000_0011;
        bytes[1] = 0b1100_0000;
        let f = cbd(&bytes, 2);
        assert_eq!(&f[..4], &[2, 0, 0, Q - 2]);

        // η = 3: three bytes yield four coefficients of six bits each.
        let mut bytes = [0u8; 192];
        bytes[0] = 0b0011_1111;
        bytes[1] = 0b0000_1111;
        let f = cbd(&bytes, 3);
        assert_eq!(f[0], 0); // 3 - 3
        assert_eq!(f[1], Q - 2); // 1 - 3
    }

    #[test]
    fn cbd_is_deterministic_in_counter() {
        let seed = [9u8; 32];
        assert_eq!(sample_poly_cbd(&seed, 4, 2), sample_poly_cbd(&seed, 4, 2));
        assert_ne!(sample_poly_cbd(&seed, 4, 2), sample_poly_cbd(&seed, 5, 2));
    }
}
