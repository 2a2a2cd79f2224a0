use core::fmt;

use zeroize::Zeroize;

use crate::crypto::{SecretBytes, ct_eq, hmac_md5, hmac_sha1, hmac_sha256};
use crate::error::{Error, Result};

/// Additional keying-material constant ("Const 1", IPMI v2.0 section 13.32).
///
/// All keying material for the RMCP+ integrity algorithms is generated by
/// processing pre-defined constants with HMAC keyed by the SIK. The constants
/// are a single octet value repeated, starting with 01h; processing Const 1
/// yields K1, the per-session signing key.
const CONST1: [u8; 20] = [0x01; 20];

/// Integrity algorithm numbers (IPMI v2.0 Table 13-18).
///
/// Negotiated during the RMCP+ Open Session exchange and used to select the
/// concrete algorithm for the session. `None` means the AuthCode field is not
/// present in the packet at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Algorithm {
    /// No integrity; authenticated packets carry no AuthCode field.
    None = 0x00,
    /// HMAC-SHA1-96 (mandatory).
    HmacSha1_96 = 0x01,
    /// HMAC-MD5-128 (optional).
    HmacMd5_128 = 0x02,
    /// MD5-128 (optional, legacy non-HMAC scheme).
    Md5_128 = 0x03,
    /// HMAC-SHA256-128 (optional).
    HmacSha256_128 = 0x04,
}

impl Algorithm {
    /// Decode a wire algorithm number.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::None),
            0x01 => Some(Self::HmacSha1_96),
            0x02 => Some(Self::HmacMd5_128),
            0x03 => Some(Self::Md5_128),
            0x04 => Some(Self::HmacSha256_128),
            _ => None,
        }
    }

    /// The wire algorithm number.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// AuthCode field length in bytes, or `None` for the no-integrity case.
    pub fn auth_code_len(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::HmacSha1_96 => Some(HmacSha1_96::AUTH_CODE_LEN),
            Self::HmacMd5_128 => Some(HmacMd5_128::AUTH_CODE_LEN),
            Self::Md5_128 => Some(16),
            Self::HmacSha256_128 => Some(HmacSha256_128::AUTH_CODE_LEN),
        }
    }
}

/// Capability set every concrete integrity algorithm exposes.
///
/// The algorithm is applied to the packet data starting with the
/// AuthType/Format field up to and including the field that immediately
/// precedes the AuthCode field itself. Implementations are immutable after
/// construction, so a shared instance may sign and verify packets from
/// multiple threads concurrently.
pub trait IntegrityAlgorithm {
    /// Length in bytes of the AuthCode this algorithm produces.
    fn auth_code_len(&self) -> usize;

    /// Generate the AuthCode for an outgoing packet.
    ///
    /// Returns the first `auth_code_len` bytes of `HMAC(K1, packet)`.
    fn generate(&self, packet: &[u8]) -> Result<Vec<u8>>;

    /// Verify the AuthCode of an incoming packet.
    ///
    /// Recomputes the signature over `packet[..packet_len]` and compares it
    /// in constant time against the first `auth_code_len` bytes of
    /// `auth_code`. A byte range too short for either read is a verification
    /// failure, never an out-of-bounds access.
    fn verify(&self, packet: &[u8], packet_len: usize, auth_code: &[u8]) -> bool {
        let want = self.auth_code_len();
        if packet_len > packet.len() || auth_code.len() < want {
            return false;
        }
        match self.generate(&packet[..packet_len]) {
            Ok(expected) => ct_eq(&expected, &auth_code[..want]),
            Err(_) => false,
        }
    }
}

macro_rules! redacted_debug {
    ($ty:ty, $name:literal) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!($name, " { k1: <secret> }"))
            }
        }
    };
}

/// HMAC-SHA1-96 integrity algorithm (mandatory-to-implement).
///
/// K1 is derived from the SIK once at construction and used as the HMAC key
/// for every packet of the session. The resulting AuthCode field is 12 bytes
/// (96 bits).
pub struct HmacSha1_96 {
    k1: [u8; 20],
}

impl HmacSha1_96 {
    /// AuthCode field length for HMAC-SHA1-96.
    pub const AUTH_CODE_LEN: usize = 12;

    /// Derive K1 from the session integrity key.
    pub fn new(sik: &[u8]) -> Result<Self> {
        Ok(Self {
            k1: derive_k1(sik, hmac_sha1)?,
        })
    }
}

impl IntegrityAlgorithm for HmacSha1_96 {
    fn auth_code_len(&self) -> usize {
        Self::AUTH_CODE_LEN
    }

    fn generate(&self, packet: &[u8]) -> Result<Vec<u8>> {
        let digest = hmac_sha1(&self.k1, packet)?;
        Ok(digest[..Self::AUTH_CODE_LEN].to_vec())
    }
}

impl Drop for HmacSha1_96 {
    fn drop(&mut self) {
        self.k1.zeroize();
    }
}

redacted_debug!(HmacSha1_96, "HmacSha1_96");

/// HMAC-MD5-128 integrity algorithm (optional).
///
/// Same K1 derivation as the SHA1 variant with MD5 as the HMAC hash; the
/// 16-byte digest is used in full as the AuthCode field.
pub struct HmacMd5_128 {
    k1: [u8; 16],
}

impl HmacMd5_128 {
    /// AuthCode field length for HMAC-MD5-128.
    pub const AUTH_CODE_LEN: usize = 16;

    /// Derive K1 from the session integrity key.
    pub fn new(sik: &[u8]) -> Result<Self> {
        Ok(Self {
            k1: derive_k1(sik, hmac_md5)?,
        })
    }
}

impl IntegrityAlgorithm for HmacMd5_128 {
    fn auth_code_len(&self) -> usize {
        Self::AUTH_CODE_LEN
    }

    fn generate(&self, packet: &[u8]) -> Result<Vec<u8>> {
        let digest = hmac_md5(&self.k1, packet)?;
        Ok(digest[..Self::AUTH_CODE_LEN].to_vec())
    }
}

impl Drop for HmacMd5_128 {
    fn drop(&mut self) {
        self.k1.zeroize();
    }
}

redacted_debug!(HmacMd5_128, "HmacMd5_128");

/// HMAC-SHA256-128 integrity algorithm (optional).
///
/// The 32-byte HMAC-SHA256 digest is truncated to a 16-byte AuthCode field.
pub struct HmacSha256_128 {
    k1: [u8; 32],
}

impl HmacSha256_128 {
    /// AuthCode field length for HMAC-SHA256-128.
    pub const AUTH_CODE_LEN: usize = 16;

    /// Derive K1 from the session integrity key.
    pub fn new(sik: &[u8]) -> Result<Self> {
        Ok(Self {
            k1: derive_k1(sik, hmac_sha256)?,
        })
    }
}

impl IntegrityAlgorithm for HmacSha256_128 {
    fn auth_code_len(&self) -> usize {
        Self::AUTH_CODE_LEN
    }

    fn generate(&self, packet: &[u8]) -> Result<Vec<u8>> {
        let digest = hmac_sha256(&self.k1, packet)?;
        Ok(digest[..Self::AUTH_CODE_LEN].to_vec())
    }
}

impl Drop for HmacSha256_128 {
    fn drop(&mut self) {
        self.k1.zeroize();
    }
}

redacted_debug!(HmacSha256_128, "HmacSha256_128");

/// Shared K1 derivation: `K1 = HMAC(key = SIK, message = Const 1)`.
///
/// The derivation runs exactly once per algorithm instance; variants differ
/// only in the HMAC hash function supplied here.
fn derive_k1<const N: usize>(
    sik: &[u8],
    hmac: fn(&[u8], &[u8]) -> Result<[u8; N]>,
) -> Result<[u8; N]> {
    if sik.is_empty() {
        return Err(Error::InvalidKeyMaterial("empty session integrity key"));
    }
    hmac(sik, &CONST1)
}

/// The integrity context for one established session.
///
/// Resolved once from the negotiated [`Algorithm`] number; the concrete
/// variant is then reused for every packet of the session. The no-integrity
/// case is a distinct variant, never a zero-length HMAC call, because an
/// unauthenticated packet carries no AuthCode field at all.
#[derive(Debug)]
pub enum SessionIntegrity {
    /// No per-packet integrity; packets carry no AuthCode field.
    None,
    /// HMAC-SHA1-96.
    HmacSha1_96(HmacSha1_96),
    /// HMAC-MD5-128.
    HmacMd5_128(HmacMd5_128),
    /// HMAC-SHA256-128.
    HmacSha256_128(HmacSha256_128),
}

impl SessionIntegrity {
    /// Instantiate the integrity context for a negotiated algorithm.
    ///
    /// Fails with [`Error::InvalidKeyMaterial`] if the SIK is empty, and with
    /// [`Error::Unsupported`] for the legacy MD5-128 scheme, which uses a
    /// different (non-HMAC) construction this crate does not implement.
    pub fn negotiate(kind: Algorithm, sik: &SecretBytes) -> Result<Self> {
        match kind {
            Algorithm::None => Ok(Self::None),
            Algorithm::HmacSha1_96 => Ok(Self::HmacSha1_96(HmacSha1_96::new(sik.expose())?)),
            Algorithm::HmacMd5_128 => Ok(Self::HmacMd5_128(HmacMd5_128::new(sik.expose())?)),
            Algorithm::Md5_128 => Err(Error::Unsupported("MD5-128 integrity is not implemented")),
            Algorithm::HmacSha256_128 => {
                Ok(Self::HmacSha256_128(HmacSha256_128::new(sik.expose())?))
            }
        }
    }

    /// The algorithm number this context was negotiated with.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::None => Algorithm::None,
            Self::HmacSha1_96(_) => Algorithm::HmacSha1_96,
            Self::HmacMd5_128(_) => Algorithm::HmacMd5_128,
            Self::HmacSha256_128(_) => Algorithm::HmacSha256_128,
        }
    }

    /// The concrete algorithm, or `None` for an unauthenticated session.
    pub fn as_algorithm(&self) -> Option<&dyn IntegrityAlgorithm> {
        match self {
            Self::None => None,
            Self::HmacSha1_96(algo) => Some(algo),
            Self::HmacMd5_128(algo) => Some(algo),
            Self::HmacSha256_128(algo) => Some(algo),
        }
    }

    /// AuthCode field length, or `None` when no AuthCode field exists.
    pub fn auth_code_len(&self) -> Option<usize> {
        self.as_algorithm().map(IntegrityAlgorithm::auth_code_len)
    }

    /// Generate the AuthCode for an outgoing packet.
    ///
    /// Returns `Ok(None)` for an unauthenticated session: the caller emits
    /// the packet without an AuthCode field.
    pub fn generate(&self, packet: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some(algo) = self.as_algorithm() else {
            return Ok(None);
        };
        let auth_code = algo.generate(packet)?;
        crate::debug::dump_hex("generated auth code", &auth_code);
        Ok(Some(auth_code))
    }

    /// Verify the AuthCode of an incoming packet.
    ///
    /// For an unauthenticated session the packet is accepted iff the caller
    /// parsed no AuthCode bytes.
    pub fn verify(&self, packet: &[u8], packet_len: usize, auth_code: &[u8]) -> bool {
        match self.as_algorithm() {
            Some(algo) => algo.verify(packet, packet_len, auth_code),
            None => auth_code.is_empty(),
        }
    }
}
