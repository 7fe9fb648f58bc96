//! Fixed-level key types implementing the [`kem`] crate's traits.
//!
//! Each level is a marker type ([`MlKem512`], [`MlKem768`], [`MlKem1024`]) and the key types are
//! generic over it, so keys of one level cannot be handed to another.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use kem::generic_array::typenum::{UInt, UTerm, B0, B1, U32, U768};
use kem::generic_array::{ArrayLength, GenericArray};
use kem::{Decapsulator, EncappedKey, Encapsulator};
use rand_core::{CryptoRng, CryptoRngCore, RngCore};
use zeroize::Zeroize;

use crate::{Error, ParameterSet, Result, ML_KEM_1024, ML_KEM_512, ML_KEM_768};

#[rustfmt::skip]
pub type U1088 = UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UTerm, B1>, B0>, B0>, B0>, B1>, B0>, B0>, B0>, B0>, B0>, B0>;

#[rustfmt::skip]
pub type U1568 = UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UInt<UTerm, B1>, B1>, B0>, B0>, B0>, B1>, B0>, B0>, B0>, B0>, B0>;

/// An ML-KEM security level, fixed at compile time.
pub trait Level: Copy + Default + fmt::Debug + 'static {
    /// The parameter set of this level.
    const PARAMS: ParameterSet;

    /// The ciphertext length as a type-level number.
    type CiphertextSize: ArrayLength<u8>;
}

/// An encapsulation key of level `L`, checked for canonical encoding when parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncapsulatingKey<L: Level> {
    ek: Vec<u8>,
    _level: PhantomData<L>,
}

impl<L: Level> AsRef<[u8]> for EncapsulatingKey<L> {
    fn as_ref(&self) -> &[u8] {
        &self.ek
    }
}

impl<L: Level> TryFrom<&[u8]> for EncapsulatingKey<L> {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        crate::validate_encapsulation_key(&L::PARAMS, bytes)?;
        Ok(EncapsulatingKey { ek: bytes.to_vec(), _level: PhantomData })
    }
}

/// A decapsulation key of level `L`. It is wiped from memory when dropped.
#[derive(Clone)]
pub struct DecapsulatingKey<L: Level> {
    dk: Vec<u8>,
    _level: PhantomData<L>,
}

impl<L: Level> DecapsulatingKey<L> {
    /// Returns the encoded key. Keep it secret.
    pub fn as_bytes(&self) -> &[u8] {
        &self.dk
    }

    /// Returns the encapsulation key embedded in this decapsulation key.
    pub fn encapsulating_key(&self) -> EncapsulatingKey<L> {
        let start = L::PARAMS.pke_decryption_key_len();
        let end = start + L::PARAMS.encapsulation_key_len();
        EncapsulatingKey { ek: self.dk[start..end].to_vec(), _level: PhantomData }
    }
}

impl<L: Level> fmt::Debug for DecapsulatingKey<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecapsulatingKey").field("level", &L::PARAMS.name()).finish_non_exhaustive()
    }
}

impl<L: Level> Drop for DecapsulatingKey<L> {
    fn drop(&mut self) {
        self.dk.zeroize();
    }
}

impl<L: Level> TryFrom<&[u8]> for DecapsulatingKey<L> {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        crate::error::check_len("decapsulation key", bytes, L::PARAMS.decapsulation_key_len())?;
        Ok(DecapsulatingKey { dk: bytes.to_vec(), _level: PhantomData })
    }
}

impl<L: Level> Decapsulator<EncapsulatedKey<L>> for DecapsulatingKey<L> {
    fn try_decap(
        &self,
        encapped_key: &EncapsulatedKey<L>,
    ) -> core::result::Result<kem::SharedSecret<EncapsulatedKey<L>>, kem::Error> {
        crate::decapsulate(&L::PARAMS, &self.dk, &encapped_key.ciphertext)
            .map(|ss| kem::SharedSecret::new(ss.into()))
            .map_err(|_| kem::Error)
    }
}

/// A ciphertext of level `L`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncapsulatedKey<L: Level> {
    ciphertext: Vec<u8>,
    _level: PhantomData<L>,
}

impl<L: Level> AsRef<[u8]> for EncapsulatedKey<L> {
    fn as_ref(&self) -> &[u8] {
        &self.ciphertext
    }
}

impl<L: Level> TryFrom<&[u8]> for EncapsulatedKey<L> {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        crate::error::check_len("ciphertext", bytes, L::PARAMS.ciphertext_len())?;
        Ok(EncapsulatedKey { ciphertext: bytes.to_vec(), _level: PhantomData })
    }
}

impl<L: Level> EncappedKey for EncapsulatedKey<L> {
    type EncappedKeySize = L::CiphertextSize;

    type SharedSecretSize = U32;

    type SenderPublicKey = EncapsulatingKey<L>;

    type RecipientPublicKey = EncapsulatingKey<L>;

    fn from_bytes(
        bytes: &GenericArray<u8, Self::EncappedKeySize>,
    ) -> core::result::Result<Self, kem::Error> {
        Ok(EncapsulatedKey { ciphertext: bytes.to_vec(), _level: PhantomData })
    }
}

macro_rules! level {
    ($(#[$doc:meta])* $name:ident, $params:expr, $ct_size:ty) => {
        $(#[$doc])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl Level for $name {
            const PARAMS: ParameterSet = $params;

            type CiphertextSize = $ct_size;
        }

        impl $name {
            /// Generates a key pair using the given RNG.
            pub fn key_gen(
                rng: impl CryptoRngCore,
            ) -> (EncapsulatingKey<Self>, DecapsulatingKey<Self>) {
                let (ek, dk) = crate::generate_key_pair(&$params, rng);
                (
                    EncapsulatingKey { ek, _level: PhantomData },
                    DecapsulatingKey { dk, _level: PhantomData },
                )
            }

            /// Deterministically derives a key pair from a 64-byte seed.
            pub fn derive_key_pair(
                seed: &[u8],
            ) -> Result<(EncapsulatingKey<Self>, DecapsulatingKey<Self>)> {
                let (ek, dk) = crate::derive_key_pair(&$params, seed)?;
                Ok((
                    EncapsulatingKey { ek, _level: PhantomData },
                    DecapsulatingKey { dk, _level: PhantomData },
                ))
            }
        }

        impl Encapsulator<EncapsulatedKey<$name>> for $name {
            fn try_encap<R: CryptoRng + RngCore>(
                &self,
                csprng: &mut R,
                recip_pubkey: &EncapsulatingKey<$name>,
            ) -> core::result::Result<
                (EncapsulatedKey<$name>, kem::SharedSecret<EncapsulatedKey<$name>>),
                kem::Error,
            > {
                crate::encapsulate(&$params, &recip_pubkey.ek, csprng)
                    .map(|(ciphertext, ss)| {
                        (
                            EncapsulatedKey { ciphertext, _level: PhantomData },
                            kem::SharedSecret::new(ss.into()),
                        )
                    })
                    .map_err(|_| kem::Error)
            }
        }
    };
}

level!(
    /// ML-KEM-512.
    MlKem512,
    ML_KEM_512,
    U768
);

level!(
    /// ML-KEM-768.
    MlKem768,
    ML_KEM_768,
    U1088
);

level!(
    /// ML-KEM-1024.
    MlKem1024,
    ML_KEM_1024,
    U1568
);
