/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// The conditions under which an ML-KEM operation refuses its inputs.
///
/// Both are detected before any cryptographic computation. Decapsulation of a well-sized but
/// invalid ciphertext is not an error: it yields the implicit-rejection secret instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A key, ciphertext or seed does not have the fixed length of the parameter set.
    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InputLength {
        /// What was being parsed.
        what: &'static str,
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// The encapsulation key contains a coefficient which is not reduced modulo q.
    #[error("encapsulation key is not canonically encoded")]
    InvalidKey,
}

/// Checks that `bytes` has exactly `expected` bytes.
pub(crate) fn check_len(what: &'static str, bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() == expected {
        Ok(())
    } else {
        tracing::debug!(what, expected, actual = bytes.len(), "rejecting input of wrong length");
        Err(Error::InputLength { what, expected, actual: bytes.len() })
    }
}
