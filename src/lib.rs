#![deny(unsafe_code)]
#![warn(missing_docs)]

//! RMCP+/IPMI v2.0 session integrity algorithms.
//!
//! The crate implements:
//! - K1 key derivation from the Session Integrity Key (IPMI v2.0 13.32)
//! - Integrity AuthCode generation and verification (HMAC-SHA1-96 mandatory,
//!   HMAC-MD5-128 and HMAC-SHA256-128 optional)
//!
//! Session establishment, cipher-suite negotiation, confidentiality, and
//! transport are deliberately out of scope: the caller hands over the SIK it
//! negotiated and, per packet, the exact byte range the protocol defines as
//! authenticated (AuthType/Format field through the byte immediately
//! preceding the AuthCode field).

mod crypto;
mod debug;
mod error;
mod integrity;

pub use crate::crypto::SecretBytes;
pub use crate::error::{Error, Result};
pub use crate::integrity::{
    Algorithm, HmacMd5_128, HmacSha1_96, HmacSha256_128, IntegrityAlgorithm, SessionIntegrity,
};
