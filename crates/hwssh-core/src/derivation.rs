// ABOUTME: Deterministic hardened derivation paths for identities.
// ABOUTME: Hashes index || canonical label with SHA-256 into a 5-element path under purpose 13.

use crate::error::{HwsshError, Result};
use crate::identity::Identity;
use sha2::{Digest, Sha256};
use std::fmt;

/// Top bit marking a derivation index as hardened.
pub const HARDENED: u32 = 0x8000_0000;

/// First path element, separating identity keys from other uses of the device.
pub const IDENTITY_PURPOSE: u32 = 13;

/// Number of elements in every derived path.
pub const PATH_LEN: usize = 5;

/// A hardened derivation path handed to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedPath([u32; PATH_LEN]);

impl DerivedPath {
    /// The path elements, each with the hardened bit set.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Copy out the path elements.
    pub fn to_vec(&self) -> Vec<u32> {
        self.0.to_vec()
    }
}

impl AsRef<[u32]> for DerivedPath {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

/// Renders as `m/13'/...'` with the hardened bit stripped from each element.
impl fmt::Display for DerivedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for n in self.0 {
            write!(f, "/{}'", n & !HARDENED)?;
        }
        Ok(())
    }
}

/// Derive the device key path for `identity` at `index`.
///
/// The address seed is the little-endian `index` followed by the ASCII
/// canonical label. The first 16 bytes of its SHA-256 digest are read as four
/// little-endian words and appended to [`IDENTITY_PURPOSE`]; every element is
/// then hardened.
///
/// # Errors
/// Returns `HwsshError::InvalidIdentity` if the canonical label is not ASCII.
pub fn derive_path(identity: &Identity, index: u32) -> Result<DerivedPath> {
    let label = identity.canonical();
    if !label.is_ascii() {
        return Err(HwsshError::InvalidIdentity {
            label,
            reason: "label must be ASCII".to_string(),
        });
    }

    let mut seed = Vec::with_capacity(4 + label.len());
    seed.extend_from_slice(&index.to_le_bytes());
    seed.extend_from_slice(label.as_bytes());
    tracing::debug!(seed = %String::from_utf8_lossy(&seed[4..]), index, "address seed");

    let digest = Sha256::digest(&seed);
    let mut path = [IDENTITY_PURPOSE; PATH_LEN];
    for (slot, word) in path[1..].iter_mut().zip(digest.chunks_exact(4)) {
        *slot = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
    }
    for n in path.iter_mut() {
        *n |= HARDENED;
    }

    Ok(DerivedPath(path))
}

impl Identity {
    /// Derive the device key path for this identity at its own `index`.
    pub fn derived_path(&self) -> Result<DerivedPath> {
        derive_path(self, self.index)
    }
}
