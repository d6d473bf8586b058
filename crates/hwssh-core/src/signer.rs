// ABOUTME: SSH signer that drives a hardware device for public keys and login signatures.
// ABOUTME: Turns labels into paths, decodes device keys and checks every returned signature.

use crate::challenge::ChallengeBlob;
use crate::device::Device;
use crate::error::{HwsshError, Result};
use crate::identity::Identity;
use crate::pubkey::{decompress, serialize_verifying_key, Curve, PublicKeyRecord};
use crate::signature::{finalize, SIGNATURE_LEN};

/// Protocol component forced onto every SSH identity.
pub const SSH_PROTO: &str = "ssh";

fn device_error<E>(err: E) -> HwsshError
where
    E: std::error::Error + Send + Sync + 'static,
{
    HwsshError::Device(Box::new(err))
}

/// Issues SSH public keys and signatures from a hardware [`Device`].
///
/// Holds no state besides the device handle and key selection; every call
/// re-derives the key path from the label.
#[derive(Debug)]
pub struct SshSigner<D> {
    device: D,
    curve: Curve,
    index: u32,
}

impl<D: Device> SshSigner<D> {
    /// Wrap `device`, logging what it reports about itself.
    ///
    /// # Errors
    /// Returns `HwsshError::Device` if the device cannot describe itself.
    pub fn new(device: D, curve: Curve) -> Result<Self> {
        let info = device.describe().map_err(device_error)?;
        tracing::debug!(device_id = %info.device_id, "connected to device");
        tracing::debug!(label = %info.label, vendor = %info.vendor, "device info");
        tracing::debug!(version = ?info.version, "device firmware");
        Ok(Self {
            device,
            curve,
            index: 0,
        })
    }

    /// Select which of several keys per label to use.
    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }

    /// Parse `label` as an SSH identity.
    pub fn identity(&self, label: &str) -> Result<Identity> {
        Ok(Identity::parse(label)?
            .with_proto(SSH_PROTO)
            .with_index(self.index))
    }

    /// Fetch and decode the device key for `label`.
    pub fn public_key_record(&self, label: &str) -> Result<PublicKeyRecord> {
        self.fetch_record(&self.identity(label)?)
    }

    /// OpenSSH public-key line for `label`, commented with the canonical label.
    pub fn public_key(&self, label: &str) -> Result<String> {
        let identity = self.identity(label)?;
        let record = self.fetch_record(&identity)?;
        tracing::debug!(fingerprint = %record.fingerprint, "device public key");
        record.to_openssh(&identity.canonical())
    }

    fn fetch_record(&self, identity: &Identity) -> Result<PublicKeyRecord> {
        let path = identity.derived_path()?;
        tracing::info!(label = %identity, curve = %self.curve, "getting public key from device");

        let compressed = self
            .device
            .get_public_key(&path, self.curve)
            .map_err(device_error)?;
        let key = decompress(&compressed, self.curve)?;
        Ok(PublicKeyRecord::from_verifying_key(key))
    }

    /// Sign an SSH authentication challenge with the device key for `label`.
    ///
    /// The device's returned key must match the key named in the challenge.
    ///
    /// # Errors
    /// Returns a format error for a malformed or empty challenge or a
    /// malformed signature, `HwsshError::Device` if the device fails, and a
    /// protocol mismatch if the device signs with another key.
    pub fn sign_ssh_challenge(&self, label: &str, blob: &[u8]) -> Result<[u8; SIGNATURE_LEN]> {
        let identity = self.identity(label)?;
        let challenge = ChallengeBlob::parse(blob)?.ok_or(HwsshError::EmptyChallenge)?;
        let path = identity.derived_path()?;

        tracing::info!(
            user = %challenge.user,
            label = %identity,
            "please confirm login on the device"
        );

        let visual = identity.path.as_deref().unwrap_or_default();
        let response = self
            .device
            .sign(&path, self.curve, blob, visual)
            .map_err(device_error)?;

        let returned = decompress(&response.public_key, self.curve)?;
        let (returned_key_type, returned_blob) = serialize_verifying_key(&returned);
        finalize(
            &response.signature,
            &returned_blob,
            challenge.public_key_blob(),
            &challenge.key_type,
            returned_key_type,
        )
    }
}
