//! The Number-Theoretic Transform over R_q and multiplication in its image T_q.

use crate::field::{fe_add, fe_mul, fe_sub, poly_add, RingElement};
use crate::params::N;

/// GAMMAS are the values ζ^2BitRev7(i)+1 mod q for each index i.
const GAMMAS: [u16; 128] = [
    17, 3312, 2761, 568, 583, 2746, 2649, 680, 1637, 1692, 723, 2606, 2288, 1041, 1100, 2229, 1409,
    1920, 2662, 667, 3281, 48, 233, 3096, 756, 2573, 2156, 1173, 3015, 314, 3050, 279, 1703, 1626,
    1651, 1678, 2789, 540, 1789, 1540, 1847, 1482, 952, 2377, 1461, 1868, 2687, 642, 939, 2390,
    2308, 1021, 2437, 892, 2388, 941, 733, 2596, 2337, 992, 268, 3061, 641, 2688, 1584, 1745, 2298,
    1031, 2037, 1292, 3220, 109, 375, 2954, 2549, 780, 2090, 1239, 1645, 1684, 1063, 2266, 319,
    3010, 2773, 556, 757, 2572, 2099, 1230, 561, 2768, 2466, 863, 2594, 735, 2804, 525, 1092, 2237,
    403, 2926, 1026, 2303, 1143, 2186, 2150, 1179, 2775, 554, 886, 2443, 1722, 1607, 1212, 2117,
    1874, 1455, 1029, 2300, 2110, 1219, 2935, 394, 885, 2444, 2154, 1175,
];

/// ZETAS are the values ζ^BitRev7(k) mod q for each index k.
const ZETAS: [u16; 128] = [
    1, 1729, 2580, 3289, 2642, 630, 1897, 848, 1062, 1919, 193, 797, 2786, 3260, 569, 1746, 296,
    2447, 1339, 1476, 3046, 56, 2240, 1333, 1426, 2094, 535, 2882, 2393, 2879, 1974, 821, 289, 331,
    3253, 1756, 1197, 2304, 2277, 2055, 650, 1977, 2513, 632, 2865, 33, 1320, 1915, 2319, 1435,
    807, 452, 1438, 2868, 1534, 2402, 2647, 2617, 1481, 648, 2474, 3110, 1227, 910, 17, 2761, 583,
    2649, 1637, 723, 2288, 1100, 1409, 2662, 3281, 233, 756, 2156, 3015, 3050, 1703, 1651, 2789,
    1789, 1847, 952, 1461, 2687, 939, 2308, 2437, 2388, 733, 2337, 268, 641, 1584, 2298, 2037,
    3220, 375, 2549, 2090, 1645, 1063, 319, 2773, 757, 2099, 561, 2466, 2594, 2804, 1092, 403,
    1026, 1143, 2150, 2775, 886, 1722, 1212, 1874, 1029, 2110, 2935, 885, 2154,
];

/// 128⁻¹ mod q, the scaling applied at the end of the inverse transform.
const INV_128: u16 = 3303;

/// Multiply two NTT-domain elements.
///
/// Each pair of coefficients is an element of ℤ_q[X]/(X² - γᵢ), so this is 128 independent
/// degree-one products. It implements MultiplyNTTs, according to FIPS 203, Algorithm 11.
pub(crate) fn ntt_mul(f: &RingElement, g: &RingElement) -> RingElement {
    let mut h = [0; N];
    for i in 0..128 {
        let (a0, a1) = (f[2 * i], f[2 * i + 1]);
        let (b0, b1) = (g[2 * i], g[2 * i + 1]);
        h[2 * i] = fe_add(fe_mul(a0, b0), fe_mul(fe_mul(a1, b1), GAMMAS[i]));
        h[2 * i + 1] = fe_add(fe_mul(a0, b1), fe_mul(a1, b0));
    }
    h
}

/// Computes the inner product `Σ a[i] ◦ b[i]` of two vectors of NTT-domain elements.
pub(crate) fn ntt_inner_product(a: &[RingElement], b: &[RingElement]) -> RingElement {
    let mut acc = [0; N];
    for (a, b) in a.iter().zip(b) {
        acc = poly_add(&acc, &ntt_mul(a, b));
    }
    acc
}

/// Map a RingElement to its NTT-domain representation.
///
/// It implements NTT, according to FIPS 203, Algorithm 9.
pub(crate) fn ntt(mut f: RingElement) -> RingElement {
    let mut k = 1;
    let mut len = 128;
    while len >= 2 {
        for start in (0..N).step_by(2 * len) {
            let zeta = ZETAS[k];
            k += 1;
            for j in start..(start + len) {
                let t = fe_mul(zeta, f[j + len]);
                f[j + len] = fe_sub(f[j], t);
                f[j] = fe_add(f[j], t);
            }
        }
        len /= 2;
    }
    f
}

/// Map an NTT-domain element back to the RingElement it represents.
///
/// It implements NTT⁻¹, according to FIPS 203, Algorithm 10.
pub(crate) fn inverse_ntt(mut f: RingElement) -> RingElement {
    let mut k = 127;
    let mut len = 2;
    while len <= 128 {
        for start in (0..N).step_by(2 * len) {
            let zeta = ZETAS[k];
            k -= 1;
            for j in start..(start + len) {
                let t = f[j];
                f[j] = fe_add(t, f[j + len]);
                f[j + len] = fe_mul(zeta, fe_sub(f[j + len], t));
            }
        }
        len *= 2;
    }

    for f in f.iter_mut() {
        *f = fe_mul(*f, INV_128);
    }

    f
}
