//! An implementation of the `ML-KEM` post-quantum key encapsulation mechanism (FIPS 203) at all
//! three security levels.
//!
//! A receiver generates an encapsulation key and a decapsulation key; a sender turns the
//! encapsulation key into a ciphertext and a shared secret; the receiver recovers the same shared
//! secret from the ciphertext.
//!
//! ```
//! use mlkem::{decapsulate, encapsulate, generate_key_pair, OsRng, ML_KEM_768};
//!
//! let (ek, dk) = generate_key_pair(&ML_KEM_768, OsRng);
//! let (ct, k_send) = encapsulate(&ML_KEM_768, &ek, OsRng)?;
//! let k_recv = decapsulate(&ML_KEM_768, &dk, &ct)?;
//! assert_eq!(k_send, k_recv);
//! # Ok::<(), mlkem::Error>(())
//! ```
//!
//! Every security level runs through the same code, configured by a [`ParameterSet`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;

use rand_core::CryptoRngCore;
use tracing::instrument;
use zeroize::Zeroize;

pub use error::{Error, Result};
pub use params::{
    ParameterSet, MESSAGE_LEN, ML_KEM_1024, ML_KEM_512, ML_KEM_768, SEED_LEN, SHARED_SECRET_LEN,
};
#[cfg(feature = "std")]
pub use rand_core::OsRng;
pub use rng::SeededRng;

#[cfg(feature = "kem")]
pub use typed::*;

pub mod ct;
mod encode;
mod error;
mod field;
mod hash;
mod ntt;
mod params;
mod pke;
mod rng;
mod sample;

#[cfg(feature = "kem")]
mod typed;

/// A 32-byte shared secret.
pub type SharedSecret = [u8; SHARED_SECRET_LEN];

/// Generates an encapsulation key and a corresponding decapsulation key using the given RNG.
///
/// The decapsulation key must be kept secret.
#[instrument(level = "debug", skip_all, fields(params = %params))]
pub fn generate_key_pair(params: &ParameterSet, mut rng: impl CryptoRngCore) -> (Vec<u8>, Vec<u8>) {
    let (mut d, mut z) = ([0u8; 32], [0u8; 32]);
    rng.fill_bytes(&mut d);
    rng.fill_bytes(&mut z);
    let keys = kem_key_gen(params, &d, &z);
    d.zeroize();
    z.zeroize();
    keys
}

/// Deterministically derives a key pair from a 64-byte seed `d ‖ z`.
///
/// The same seed always yields byte-identical keys. Returns [`Error::InputLength`] if the seed is
/// not [`SEED_LEN`] bytes.
#[instrument(level = "debug", skip_all, fields(params = %params, seed_len = seed.len()))]
pub fn derive_key_pair(params: &ParameterSet, seed: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    error::check_len("seed", seed, SEED_LEN)?;
    let (mut d, mut z) = ([0u8; 32], [0u8; 32]);
    d.copy_from_slice(&seed[..32]);
    z.copy_from_slice(&seed[32..]);
    let keys = kem_key_gen(params, &d, &z);
    d.zeroize();
    z.zeroize();
    Ok(keys)
}

/// Generates an encapsulation key and a corresponding decapsulation key.
///
/// It implements ML-KEM.KeyGen_internal according to FIPS 203, Algorithm 16.
fn kem_key_gen(params: &ParameterSet, d: &[u8; 32], z: &[u8; 32]) -> (Vec<u8>, Vec<u8>) {
    let (ek, mut dk_pke) = pke::keygen(params, d);

    let mut dk = Vec::with_capacity(params.decapsulation_key_len());
    dk.extend_from_slice(&dk_pke);
    dk.extend_from_slice(&ek);
    dk.extend_from_slice(&hash::h(&ek));
    dk.extend_from_slice(z);
    dk_pke.zeroize();

    (ek, dk)
}

/// Checks that `ek` has the right length and that every coefficient it encodes is reduced modulo
/// q, i.e. that decoding and re-encoding it yields the same bytes.
///
/// It implements the encapsulation key check of FIPS 203, Section 7.2.
#[instrument(level = "debug", skip_all, fields(params = %params, ek_len = ek.len()))]
pub fn validate_encapsulation_key(params: &ParameterSet, ek: &[u8]) -> Result<()> {
    error::check_len("encapsulation key", ek, params.encapsulation_key_len())?;
    for chunk in ek[..params.encoded_vector_len()].chunks_exact(384) {
        let mut b = [0u8; 384];
        b.copy_from_slice(chunk);
        if encode::byte_decode12_checked(&b).is_none() {
            tracing::debug!(params = %params, "rejecting non-canonical encapsulation key");
            return Err(Error::InvalidKey);
        }
    }
    Ok(())
}

/// Generates a ciphertext and an associated shared secret from an encapsulation key and an RNG.
///
/// Returns [`Error::InputLength`] or [`Error::InvalidKey`] if the encapsulation key is not valid;
/// no randomness is drawn in that case. The shared secret must be kept secret.
#[instrument(level = "debug", skip_all, fields(params = %params, ek_len = ek.len()))]
pub fn encapsulate(
    params: &ParameterSet,
    ek: &[u8],
    mut rng: impl CryptoRngCore,
) -> Result<(Vec<u8>, SharedSecret)> {
    validate_encapsulation_key(params, ek)?;
    let mut m = [0u8; MESSAGE_LEN];
    rng.fill_bytes(&mut m);
    let out = kem_encapsulate(params, ek, &m);
    m.zeroize();
    Ok(out)
}

/// Generates a ciphertext and an associated shared secret from an encapsulation key and a
/// caller-chosen message `m`.
///
/// This is the deterministic core of [`encapsulate`], for known-answer tests. Using anything but
/// fresh uniform randomness for `m` forfeits the security of the shared secret.
#[instrument(level = "debug", skip_all, fields(params = %params, ek_len = ek.len()))]
pub fn encapsulate_with(
    params: &ParameterSet,
    ek: &[u8],
    m: &[u8; MESSAGE_LEN],
) -> Result<(Vec<u8>, SharedSecret)> {
    validate_encapsulation_key(params, ek)?;
    Ok(kem_encapsulate(params, ek, m))
}

/// Generate a ciphertext and associated shared key from a validated encapsulation key.
///
/// It implements ML-KEM.Encaps_internal according to FIPS 203, Algorithm 17.
fn kem_encapsulate(params: &ParameterSet, ek: &[u8], m: &[u8; 32]) -> (Vec<u8>, SharedSecret) {
    let (k, mut r) = hash::g(m, &hash::h(ek));
    let c = pke::encrypt(params, ek, m, &r);
    r.zeroize();
    (c, k)
}

/// Generate a shared secret from a decapsulation key and a ciphertext.
///
/// Only inputs of the wrong length are refused, with [`Error::InputLength`]. Any ciphertext of
/// the right length yields 32 bytes: if it is not a valid encapsulation, those are a pseudorandom
/// function of the ciphertext and the secret rejection value `z`, computed and selected in
/// constant time so that invalid ciphertexts cannot be told apart.
///
/// The shared secret must be kept secret. The decapsulation key is trusted to have been produced
/// by key generation; its embedded encapsulation key is not re-validated. It implements
/// ML-KEM.Decaps_internal according to FIPS 203, Algorithm 18.
#[instrument(level = "debug", skip_all, fields(params = %params, ct_len = ct.len()))]
pub fn decapsulate(params: &ParameterSet, dk: &[u8], ct: &[u8]) -> Result<SharedSecret> {
    error::check_len("decapsulation key", dk, params.decapsulation_key_len())?;
    error::check_len("ciphertext", ct, params.ciphertext_len())?;

    let (dk_pke, ek_pke) = dk.split_at(params.pke_decryption_key_len());
    let (ek_pke, h) = ek_pke.split_at(params.encapsulation_key_len());
    let (h, z) = h.split_at(32);

    let mut m = pke::decrypt(params, dk_pke, ct);
    let (mut k_p, mut r) = hash::g(&m, h);
    let mut k_out = hash::j(z, ct);
    let c1 = pke::encrypt(params, ek_pke, &m, &r);

    // Return k_p iff ct == c1, k_out otherwise.
    let eq = ct::ct_eq(ct, &c1);
    ct::ct_select(&mut k_out, &k_p, eq);

    m.zeroize();
    k_p.zeroize();
    r.zeroize();
    Ok(k_out)
}
