//! Node identity generation.
//!
//! Every launch gets a fresh 16-character lowercase hex UID built from
//! 8 bytes of OS randomness. Collisions are possible in principle (64-bit
//! space) and are not detected.

use std::fmt;

use poridhi_core::error::{ProvisionError, Result};
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Random bytes per UID; the hex form is twice as long.
pub const UID_BYTES: usize = 8;
pub const UID_LEN: usize = UID_BYTES * 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeIdentity(String);

impl NodeIdentity {
    /// Draw a new identity from the operating system's random source.
    pub fn generate() -> Result<Self> {
        Self::generate_from(&mut OsRng)
    }

    pub fn generate_from<R: TryRngCore>(source: &mut R) -> Result<Self> {
        let mut bytes = [0u8; UID_BYTES];
        source
            .try_fill_bytes(&mut bytes)
            .map_err(|e| ProvisionError::EntropyUnavailable(e.to_string()))?;
        Ok(Self(hex::encode(bytes)))
    }

    /// Accept an externally supplied UID, e.g. one recorded from an earlier run.
    pub fn parse(uid: &str) -> Result<Self> {
        let well_formed = uid.len() == UID_LEN
            && uid
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(ProvisionError::InvalidConfig {
                field: "uid",
                message: format!("expected {UID_LEN} lowercase hex characters, got '{uid}'"),
            });
        }
        Ok(Self(uid.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
