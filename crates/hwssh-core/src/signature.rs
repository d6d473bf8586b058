// ABOUTME: Validation of raw device signatures and conversion into SSH signature payloads.
// ABOUTME: Checks length, prefix byte and that the device signed with the requested key.

use crate::error::{HwsshError, Result};
use crate::frame::{put_frame, put_mpint};
use crate::pubkey::{fingerprint, ED25519_KEY_TYPE};

/// Length of the raw signature returned by the device.
pub const RAW_SIGNATURE_LEN: usize = 65;

/// Length of the bare `r || s` signature.
pub const SIGNATURE_LEN: usize = 64;

/// Prefix byte of a plain, non-recoverable signature.
const PLAIN_SIGNATURE_PREFIX: u8 = 0x00;

/// Validate a device signature and strip it to the bare `r || s` bytes.
///
/// The returned key blob and key type are compared with the ones parsed from
/// the request, not with a key re-derived from the identity.
///
/// # Errors
/// Returns `HwsshError::InvalidSignatureLength` or
/// `HwsshError::InvalidSignaturePrefix` for a malformed signature (checked
/// first), then `HwsshError::PublicKeyMismatch` or
/// `HwsshError::KeyTypeMismatch` if the device used a different key.
pub fn finalize(
    raw_signature: &[u8],
    returned_blob: &[u8],
    expected_blob: &[u8],
    expected_key_type: &str,
    returned_key_type: &str,
) -> Result<[u8; SIGNATURE_LEN]> {
    if raw_signature.len() != RAW_SIGNATURE_LEN {
        return Err(HwsshError::InvalidSignatureLength {
            expected: RAW_SIGNATURE_LEN,
            got: raw_signature.len(),
        });
    }
    if raw_signature[0] != PLAIN_SIGNATURE_PREFIX {
        return Err(HwsshError::InvalidSignaturePrefix(raw_signature[0]));
    }
    if returned_blob != expected_blob {
        return Err(HwsshError::PublicKeyMismatch {
            expected: fingerprint(expected_blob),
            got: fingerprint(returned_blob),
        });
    }
    if returned_key_type != expected_key_type {
        return Err(HwsshError::KeyTypeMismatch {
            expected: expected_key_type.to_string(),
            got: returned_key_type.to_string(),
        });
    }

    let mut signature = [0u8; SIGNATURE_LEN];
    signature.copy_from_slice(&raw_signature[1..]);
    Ok(signature)
}

/// Wrap a bare signature into the SSH signature blob for `key_type`.
///
/// Ed25519 signatures are carried as-is; ECDSA signatures are split into
/// `r` and `s` and encoded as two mpints.
pub fn encode_ssh_signature(key_type: &str, signature: &[u8; SIGNATURE_LEN]) -> Vec<u8> {
    let mut out = Vec::new();
    put_frame(&mut out, key_type.as_bytes());
    if key_type == ED25519_KEY_TYPE {
        put_frame(&mut out, signature);
    } else {
        let (r, s) = signature.split_at(SIGNATURE_LEN / 2);
        let mut inner = Vec::new();
        put_mpint(&mut inner, r);
        put_mpint(&mut inner, s);
        put_frame(&mut out, &inner);
    }
    out
}
