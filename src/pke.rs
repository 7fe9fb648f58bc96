//! K-PKE, the IND-CPA public-key encryption scheme underneath ML-KEM.
//!
//! Inputs are trusted to have the lengths of `params`: the public entry points in the crate root
//! check them before calling in here.

use alloc::vec::Vec;

use zeroize::Zeroize;

use crate::encode::{
    byte_decode12, byte_encode12, ring_compress_and_encode, ring_decode_and_decompress,
};
use crate::field::{poly_add, poly_sub, RingElement};
use crate::hash;
use crate::ntt::{inverse_ntt, ntt, ntt_inner_product};
use crate::params::{ParameterSet, MAX_K, N};
use crate::sample::{sample_ntt, sample_poly_cbd};

/// A vector of up to `MAX_K` ring elements; only the first `k` are meaningful.
type Vector = [RingElement; MAX_K];

/// A k×k matrix of NTT-domain elements, stored row by row.
type Matrix = [Vector; MAX_K];

/// Expands `ρ` into the matrix Â, or its transpose.
///
/// Entry (i, j) of Â is sampled from XOF(ρ ‖ j ‖ i).
fn sample_matrix(rho: &[u8; 32], k: usize, transpose: bool) -> Matrix {
    let mut a = [[[0; N]; MAX_K]; MAX_K];
    for (i, row) in a.iter_mut().enumerate().take(k) {
        for (j, entry) in row.iter_mut().enumerate().take(k) {
            *entry = if transpose {
                sample_ntt(rho, i as u8, j as u8)
            } else {
                sample_ntt(rho, j as u8, i as u8)
            };
        }
    }
    a
}

/// Decodes the 12-bit encoded vector of `k` polynomials at the start of `bytes`.
fn decode_vector(bytes: &[u8], k: usize) -> Vector {
    let mut v = [[0; N]; MAX_K];
    for (v, b) in v.iter_mut().zip(bytes.chunks_exact(384)).take(k) {
        let mut chunk = [0u8; 384];
        chunk.copy_from_slice(b);
        *v = byte_decode12(&chunk);
        chunk.zeroize();
    }
    v
}

/// Generates a key pair for the underlying PKE from a 32-byte random seed.
///
/// Returns the encapsulation key `t ‖ ρ` and the decryption key `s`, both 12-bit encoded. It
/// implements K-PKE.KeyGen according to FIPS 203, Algorithm 13.
pub(crate) fn keygen(params: &ParameterSet, d: &[u8; 32]) -> (Vec<u8>, Vec<u8>) {
    let k = params.k();
    let (rho, mut sigma) = hash::g(d, &[k as u8]);

    let a = sample_matrix(&rho, k, false);

    let mut n = 0u8;
    let (mut s, mut e) = ([[0; N]; MAX_K], [[0; N]; MAX_K]);
    for s in s.iter_mut().take(k) {
        *s = ntt(sample_poly_cbd(&sigma, n, params.eta1()));
        n += 1;
    }
    for e in e.iter_mut().take(k) {
        *e = ntt(sample_poly_cbd(&sigma, n, params.eta1()));
        n += 1;
    }
    sigma.zeroize();

    let mut ek = Vec::with_capacity(params.encapsulation_key_len());
    for i in 0..k {
        let t = poly_add(&ntt_inner_product(&a[i][..k], &s[..k]), &e[i]); // Â ◦ s + e
        ek.extend_from_slice(&byte_encode12(&t));
    }
    ek.extend_from_slice(&rho);

    let mut dk = Vec::with_capacity(params.pke_decryption_key_len());
    for s in &s[..k] {
        dk.extend_from_slice(&byte_encode12(s));
    }

    s.zeroize();
    e.zeroize();
    (ek, dk)
}

/// Encrypts a plaintext message. Encryption is deterministic in `rnd`.
///
/// The coefficients of `t` are reduced while decoding; callers that accept encapsulation keys from
/// elsewhere must run the modulus check first. It implements K-PKE.Encrypt according to FIPS 203,
/// Algorithm 14.
pub(crate) fn encrypt(params: &ParameterSet, ek: &[u8], m: &[u8; 32], rnd: &[u8; 32]) -> Vec<u8> {
    let k = params.k();
    let (t_bytes, rho_bytes) = ek.split_at(params.encoded_vector_len());
    let t = decode_vector(t_bytes, k);
    let mut rho = [0u8; 32];
    rho.copy_from_slice(rho_bytes);

    let at = sample_matrix(&rho, k, true);

    let mut n = 0u8;
    let (mut y, mut e1) = ([[0; N]; MAX_K], [[0; N]; MAX_K]);
    for y in y.iter_mut().take(k) {
        *y = ntt(sample_poly_cbd(rnd, n, params.eta1()));
        n += 1;
    }
    for e1 in e1.iter_mut().take(k) {
        *e1 = sample_poly_cbd(rnd, n, params.eta2());
        n += 1;
    }
    let mut e2 = sample_poly_cbd(rnd, n, params.eta2());

    let mut c = Vec::with_capacity(params.ciphertext_len());
    let mut buf = [0u8; 32 * 11];
    for i in 0..k {
        // NTT⁻¹(Âᵀ ◦ y) + e1
        let u = poly_add(&inverse_ntt(ntt_inner_product(&at[i][..k], &y[..k])), &e1[i]);
        let buf = &mut buf[..32 * params.du()];
        ring_compress_and_encode(&u, params.du(), buf);
        c.extend_from_slice(buf);
    }

    let mut mu = ring_decode_and_decompress(m, 1);
    // NTT⁻¹(t ◦ y) + e2 + μ
    let mut v = inverse_ntt(ntt_inner_product(&t[..k], &y[..k]));
    v = poly_add(&poly_add(&v, &e2), &mu);
    let buf = &mut buf[..32 * params.dv()];
    ring_compress_and_encode(&v, params.dv(), buf);
    c.extend_from_slice(buf);

    y.zeroize();
    e1.zeroize();
    e2.zeroize();
    mu.zeroize();
    v.zeroize();
    c
}

/// Decrypts a ciphertext. It never fails: every ciphertext of the right length decrypts to some
/// message.
///
/// It implements K-PKE.Decrypt according to FIPS 203, Algorithm 15.
pub(crate) fn decrypt(params: &ParameterSet, dk: &[u8], c: &[u8]) -> [u8; 32] {
    let k = params.k();
    let (c1, c2) = c.split_at(params.ciphertext_u_len());

    let mut u = [[0; N]; MAX_K];
    for (u, c) in u.iter_mut().zip(c1.chunks_exact(32 * params.du())).take(k) {
        *u = ntt(ring_decode_and_decompress(c, params.du()));
    }
    let v = ring_decode_and_decompress(c2, params.dv());

    let mut s = decode_vector(dk, k);
    // v - NTT⁻¹(s ◦ u)
    let mut w = poly_sub(&v, &inverse_ntt(ntt_inner_product(&s[..k], &u[..k])));

    let mut m = [0u8; 32];
    ring_compress_and_encode(&w, 1, &mut m);

    s.zeroize();
    w.zeroize();
    m
}
