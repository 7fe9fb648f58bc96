//! Random sources.
//!
//! Randomized operations take any [`CryptoRngCore`](rand_core::CryptoRngCore). Production callers
//! pass `OsRng`; tests that need reproducible output pass a [`SeededRng`].

use core::fmt;

use rand_core::{impls, CryptoRng, RngCore};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake256, Shake256Reader};

/// A deterministic generator which expands a seed of any length with SHAKE256.
///
/// The output is one continuous stream: identical seeds yield identical bytes however the reads
/// are split. It is meant for tests and known-answer reproduction, not for production keys.
#[derive(Clone)]
pub struct SeededRng {
    reader: Shake256Reader,
}

impl SeededRng {
    /// Creates a generator whose stream is SHAKE256(`seed`).
    pub fn new(seed: &[u8]) -> Self {
        SeededRng { reader: Shake256::default().chain(seed).finalize_xof() }
    }
}

impl fmt::Debug for SeededRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededRng").finish_non_exhaustive()
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.reader.read(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for SeededRng {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_does_not_matter() {
        let mut whole = [0u8; 100];
        SeededRng::new(b"seed").fill_bytes(&mut whole);

        let mut rng = SeededRng::new(b"seed");
        let mut parts = [0u8; 100];
        let (a, rest) = parts.split_at_mut(3);
        let (b, c) = rest.split_at_mut(64);
        rng.fill_bytes(a);
        rng.fill_bytes(b);
        rng.fill_bytes(c);
        assert_eq!(whole, parts);
    }

    #[test]
    fn seeds_are_separated() {
        let (mut a, mut b) = (SeededRng::new(b"one"), SeededRng::new(b"two"));
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn clone_replays_stream() {
        let mut a = SeededRng::new(&[0u8; 48]);
        a.next_u32();
        let mut b = a.clone();
        assert_eq!(a.next_u64(), b.next_u64());
    }
}
