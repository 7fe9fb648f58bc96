//! The three ML-KEM parameter sets, according to FIPS 203, Section 8.

use core::fmt;

/// Number of coefficients in a ring element.
pub(crate) const N: usize = 256;

/// The largest module rank of any parameter set.
pub(crate) const MAX_K: usize = 4;

/// The largest noise width of any parameter set.
pub(crate) const MAX_ETA: usize = 3;

/// Length in bytes of a shared secret.
pub const SHARED_SECRET_LEN: usize = 32;

/// Length in bytes of the seed accepted by [`derive_key_pair`](crate::derive_key_pair).
pub const SEED_LEN: usize = 64;

/// Length in bytes of the message sampled during encapsulation.
pub const MESSAGE_LEN: usize = 32;

/// The constants of one ML-KEM security level.
///
/// Every operation in this crate takes a `ParameterSet` instead of hardcoding values, so the three
/// levels share a single implementation. The only values are [`ML_KEM_512`], [`ML_KEM_768`] and
/// [`ML_KEM_1024`]; the fields are private so no other combination can be built.
///
/// ```compile_fail
/// let params = mlkem::ParameterSet { k: 5, ..mlkem::ML_KEM_768 };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterSet {
    name: &'static str,
    k: usize,
    eta1: usize,
    eta2: usize,
    du: usize,
    dv: usize,
}

/// ML-KEM-512 (security category 1).
pub const ML_KEM_512: ParameterSet =
    ParameterSet { name: "ML-KEM-512", k: 2, eta1: 3, eta2: 2, du: 10, dv: 4 };

/// ML-KEM-768 (security category 3).
pub const ML_KEM_768: ParameterSet =
    ParameterSet { name: "ML-KEM-768", k: 3, eta1: 2, eta2: 2, du: 10, dv: 4 };

/// ML-KEM-1024 (security category 5).
pub const ML_KEM_1024: ParameterSet =
    ParameterSet { name: "ML-KEM-1024", k: 4, eta1: 2, eta2: 2, du: 11, dv: 5 };

impl ParameterSet {
    /// All supported parameter sets, from the smallest to the largest.
    pub const ALL: [ParameterSet; 3] = [ML_KEM_512, ML_KEM_768, ML_KEM_1024];

    /// Looks a parameter set up by its name, e.g. `ML-KEM-1024`.
    pub fn from_name(name: &str) -> Option<ParameterSet> {
        Self::ALL.into_iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Looks a parameter set up by its level number (512, 768 or 1024).
    pub fn from_level(level: u16) -> Option<ParameterSet> {
        match level {
            512 => Some(ML_KEM_512),
            768 => Some(ML_KEM_768),
            1024 => Some(ML_KEM_1024),
            _ => None,
        }
    }

    /// Human-readable name, e.g. `ML-KEM-768`.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Module rank.
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Noise width for the secret and the key generation error.
    pub const fn eta1(&self) -> usize {
        self.eta1
    }

    /// Noise width for the encryption errors.
    pub const fn eta2(&self) -> usize {
        self.eta2
    }

    /// Compression width of the `u` vector.
    pub const fn du(&self) -> usize {
        self.du
    }

    /// Compression width of the `v` polynomial.
    pub const fn dv(&self) -> usize {
        self.dv
    }

    /// Length of a 12-bit encoded vector of `k` polynomials.
    pub const fn encoded_vector_len(&self) -> usize {
        384 * self.k
    }

    /// Length of the K-PKE decryption key embedded in the decapsulation key.
    pub const fn pke_decryption_key_len(&self) -> usize {
        self.encoded_vector_len()
    }

    /// Length of an encapsulation key: `t` followed by `ρ`.
    pub const fn encapsulation_key_len(&self) -> usize {
        self.encoded_vector_len() + 32
    }

    /// Length of a decapsulation key: `s ‖ ek ‖ H(ek) ‖ z`.
    pub const fn decapsulation_key_len(&self) -> usize {
        self.pke_decryption_key_len() + self.encapsulation_key_len() + 32 + 32
    }

    /// Length of the compressed `u` vector inside a ciphertext.
    pub const fn ciphertext_u_len(&self) -> usize {
        32 * self.du * self.k
    }

    /// Length of a ciphertext.
    pub const fn ciphertext_len(&self) -> usize {
        self.ciphertext_u_len() + 32 * self.dv
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
