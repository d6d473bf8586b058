// ABOUTME: Capability trait for the hardware signing device.
// ABOUTME: Transport, pairing and PIN entry live behind implementations of this trait.

use crate::derivation::DerivedPath;
use crate::pubkey::Curve;
use std::fmt;

/// Identity and firmware details reported by a device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub vendor: String,
    pub label: String,
    pub device_id: String,
    /// Firmware version as `[major, minor, patch]`.
    pub version: [u32; 3],
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch] = self.version;
        write!(
            f,
            "{} {:?} ({}) v{major}.{minor}.{patch}",
            self.vendor, self.label, self.device_id
        )
    }
}

/// What the device returns for a signing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignResponse {
    /// Raw signature: one format byte followed by `r || s`.
    pub signature: Vec<u8>,
    /// Compressed form of the key that produced the signature.
    pub public_key: Vec<u8>,
}

/// A hardware signer that holds private keys and never reveals them.
///
/// Calls may block for as long as the device waits on the user; timeouts and
/// cancellation are up to the implementation and its caller.
pub trait Device {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Report vendor, label and firmware version.
    fn describe(&self) -> Result<DeviceInfo, Self::Error>;

    /// Fetch the compressed public key at `path` on `curve`.
    fn get_public_key(&self, path: &DerivedPath, curve: Curve) -> Result<Vec<u8>, Self::Error>;

    /// Sign `challenge` with the key at `path` on `curve`.
    ///
    /// `visual` is shown on the device screen and is not part of the signed
    /// data.
    fn sign(
        &self,
        path: &DerivedPath,
        curve: Curve,
        challenge: &[u8],
        visual: &str,
    ) -> Result<SignResponse, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_display() {
        let info = DeviceInfo {
            vendor: "signer.example".to_string(),
            label: "Work key".to_string(),
            device_id: "ABCDEF".to_string(),
            version: [1, 3, 4],
        };
        assert_eq!(
            info.to_string(),
            "signer.example \"Work key\" (ABCDEF) v1.3.4"
        );
    }
}
