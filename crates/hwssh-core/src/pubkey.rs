// ABOUTME: Public key codec for device keys: point decompression, SSH blobs and fingerprints.
// ABOUTME: Supports NIST P-256 (ecdsa-sha2-nistp256) and Ed25519 (ssh-ed25519).

use crate::error::{HwsshError, Result};
use crate::frame::{put_frame, Cursor};
use base64::Engine;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// SSH algorithm name for NIST P-256 keys.
pub const NISTP256_KEY_TYPE: &str = "ecdsa-sha2-nistp256";

/// SSH curve identifier embedded in NIST P-256 blobs.
pub const NISTP256_CURVE_ID: &str = "nistp256";

/// SSH algorithm name for Ed25519 keys.
pub const ED25519_KEY_TYPE: &str = "ssh-ed25519";

/// Curves the device can derive keys on, named as the device names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    #[default]
    Nist256p1,
    Ed25519,
}

impl Curve {
    /// Device-facing curve name.
    pub fn name(self) -> &'static str {
        match self {
            Curve::Nist256p1 => "nist256p1",
            Curve::Ed25519 => "ed25519",
        }
    }

    /// SSH algorithm name for keys on this curve.
    pub fn key_type(self) -> &'static str {
        match self {
            Curve::Nist256p1 => NISTP256_KEY_TYPE,
            Curve::Ed25519 => ED25519_KEY_TYPE,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Curve {
    type Err = HwsshError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "nist256p1" => Ok(Curve::Nist256p1),
            "ed25519" => Ok(Curve::Ed25519),
            other => Err(HwsshError::UnsupportedCurve(other.to_string())),
        }
    }
}

/// Public half of a device key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyingKey {
    NistP256(p256::PublicKey),
    Ed25519(ed25519_dalek::VerifyingKey),
}

impl VerifyingKey {
    pub fn curve(&self) -> Curve {
        match self {
            VerifyingKey::NistP256(_) => Curve::Nist256p1,
            VerifyingKey::Ed25519(_) => Curve::Ed25519,
        }
    }

    pub fn key_type(&self) -> &'static str {
        self.curve().key_type()
    }
}

/// Recover a full public key from the compressed form the device returns.
///
/// P-256 keys arrive as 33-byte SEC1 compressed points (prefix `0x02` or
/// `0x03`); Ed25519 keys as `0x00` followed by the 32-byte key.
///
/// # Errors
/// Returns `HwsshError::InvalidPublicKey` for a wrong length, an unknown
/// prefix byte, or a point that is not on the curve.
pub fn decompress(compressed: &[u8], curve: Curve) -> Result<VerifyingKey> {
    match curve {
        Curve::Nist256p1 => {
            match compressed {
                [0x02 | 0x03, ..] if compressed.len() == 33 => {}
                [prefix, ..] if compressed.len() == 33 => {
                    return Err(HwsshError::InvalidPublicKey(format!(
                        "unrecognized P-256 point prefix {prefix:#04x}"
                    )));
                }
                _ => {
                    return Err(HwsshError::InvalidPublicKey(format!(
                        "expected 33-byte compressed P-256 point, got {} bytes",
                        compressed.len()
                    )));
                }
            }
            p256::PublicKey::from_sec1_bytes(compressed)
                .map(VerifyingKey::NistP256)
                .map_err(|_| HwsshError::InvalidPublicKey("point is not on P-256".to_string()))
        }
        Curve::Ed25519 => {
            let key = match compressed {
                [0x00, key @ ..] => key,
                [prefix, ..] => {
                    return Err(HwsshError::InvalidPublicKey(format!(
                        "unrecognized ed25519 key prefix {prefix:#04x}"
                    )));
                }
                [] => {
                    return Err(HwsshError::InvalidPublicKey(
                        "empty ed25519 key".to_string(),
                    ));
                }
            };
            ed25519_from_slice(key)
        }
    }
}

fn ed25519_from_slice(key: &[u8]) -> Result<VerifyingKey> {
    let bytes: [u8; 32] = key.try_into().map_err(|_| {
        HwsshError::InvalidPublicKey(format!(
            "expected 32-byte ed25519 key, got {} bytes",
            key.len()
        ))
    })?;
    ed25519_dalek::VerifyingKey::from_bytes(&bytes)
        .map(VerifyingKey::Ed25519)
        .map_err(|_| HwsshError::InvalidPublicKey("point is not on ed25519".to_string()))
}

/// Serialize a key into its SSH algorithm name and public-key blob.
///
/// P-256: `string "ecdsa-sha2-nistp256" || string "nistp256" || string Q`
/// with Q the uncompressed SEC1 point. Ed25519: `string "ssh-ed25519" ||
/// string key`.
pub fn serialize_verifying_key(key: &VerifyingKey) -> (&'static str, Vec<u8>) {
    let mut blob = Vec::new();
    put_frame(&mut blob, key.key_type().as_bytes());
    match key {
        VerifyingKey::NistP256(pk) => {
            put_frame(&mut blob, NISTP256_CURVE_ID.as_bytes());
            put_frame(&mut blob, pk.to_encoded_point(false).as_bytes());
        }
        VerifyingKey::Ed25519(vk) => {
            put_frame(&mut blob, vk.as_bytes());
        }
    }
    (key.key_type(), blob)
}

/// OpenSSH-style fingerprint of a key blob: `SHA256:` and unpadded base64.
pub fn fingerprint(blob: &[u8]) -> String {
    let digest = Sha256::digest(blob);
    format!(
        "SHA256:{}",
        base64::engine::general_purpose::STANDARD_NO_PAD.encode(digest)
    )
}

/// A decoded SSH public key together with its blob and fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyRecord {
    pub curve: Curve,
    pub key: VerifyingKey,
    pub key_type: String,
    pub blob: Vec<u8>,
    pub fingerprint: String,
}

impl PublicKeyRecord {
    /// Build the record for a key, serializing its blob.
    pub fn from_verifying_key(key: VerifyingKey) -> Self {
        let (key_type, blob) = serialize_verifying_key(&key);
        Self {
            curve: key.curve(),
            key_type: key_type.to_string(),
            fingerprint: fingerprint(&blob),
            blob,
            key,
        }
    }

    /// Parse an SSH public-key blob.
    ///
    /// The blob must be fully consumed and the key must lie on its curve.
    /// P-256 points must be uncompressed, as SSH sends them.
    ///
    /// # Errors
    /// Returns a format error for truncated, trailing or off-curve input and
    /// `HwsshError::UnsupportedKeyType`/`UnsupportedCurve` for other
    /// algorithms.
    pub fn parse(blob: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(blob);
        let key_type = cursor.read_string("key type")?;
        let key = match key_type {
            NISTP256_KEY_TYPE => {
                let curve_id = cursor.read_string("curve")?;
                if curve_id != NISTP256_CURVE_ID {
                    return Err(HwsshError::UnsupportedCurve(curve_id.to_string()));
                }
                let point = cursor.read_frame()?;
                if point.len() != 65 || point[0] != 0x04 {
                    return Err(HwsshError::InvalidPublicKey(format!(
                        "expected 65-byte uncompressed P-256 point, got {} bytes",
                        point.len()
                    )));
                }
                p256::PublicKey::from_sec1_bytes(point)
                    .map(VerifyingKey::NistP256)
                    .map_err(|_| {
                        HwsshError::InvalidPublicKey("point is not on P-256".to_string())
                    })?
            }
            ED25519_KEY_TYPE => ed25519_from_slice(cursor.read_frame()?)?,
            other => return Err(HwsshError::UnsupportedKeyType(other.to_string())),
        };
        cursor.finish()?;

        Ok(Self {
            curve: key.curve(),
            key_type: key_type.to_string(),
            blob: blob.to_vec(),
            fingerprint: fingerprint(blob),
            key,
        })
    }

    /// Render as an OpenSSH `authorized_keys` line with `comment`.
    ///
    /// # Errors
    /// Returns `HwsshError::SerializeKey` if the blob cannot be encoded.
    pub fn to_openssh(&self, comment: &str) -> Result<String> {
        let mut key =
            ssh_key::PublicKey::from_bytes(&self.blob).map_err(HwsshError::SerializeKey)?;
        key.set_comment(comment);
        key.to_openssh().map_err(HwsshError::SerializeKey)
    }
}

/// Render `key` as an OpenSSH public-key line labelled with `label`.
///
/// # Errors
/// Returns `HwsshError::SerializeKey` if the key cannot be encoded.
pub fn export_public_key(key: &VerifyingKey, label: &str) -> Result<String> {
    let record = PublicKeyRecord::from_verifying_key(key.clone());
    tracing::debug!(fingerprint = %record.fingerprint, "exporting public key");
    record.to_openssh(label)
}
