use thiserror::Error;

/// Result type used across this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
///
/// Per-packet failures (short byte ranges, signature mismatches) are not
/// represented here: `verify` reports them as `false`, so a bad packet
/// rejects the packet rather than the session.
#[derive(Debug, Error)]
pub enum Error {
    /// The session integrity key was empty or otherwise unusable.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(&'static str),

    /// Cryptographic failure (HMAC primitive rejected its input).
    #[error("crypto error: {0}")]
    Crypto(&'static str),

    /// The negotiated integrity algorithm is not implemented.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}
