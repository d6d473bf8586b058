// ABOUTME: Core of hwssh: SSH authentication with keys held on a hardware signing device.
// ABOUTME: Derives key paths from labels, decodes device keys and validates device signatures.

//! # hwssh-core
//!
//! SSH keys that live on a detached hardware signer. The device never reveals
//! its private keys; this crate does everything around it:
//!
//! - **Identities**: parse `[proto://][user@]host[:port][/path]` labels and
//!   render their canonical form
//! - **Derivation**: turn an identity into a deterministic hardened path, so
//!   the same label always selects the same device key with nothing stored
//! - **Public keys**: decompress device points, build SSH key blobs and
//!   fingerprints
//! - **Challenges**: parse the SSH userauth request an agent is asked to sign
//! - **Signatures**: validate the raw device signature and check the device
//!   used the requested key
//!
//! The device itself is reached through the [`Device`] trait.
//!
//! ## Example
//!
//! ```no_run
//! use hwssh_core::{Curve, Device, SshSigner};
//!
//! fn login<D: Device>(device: D, challenge: &[u8]) -> hwssh_core::Result<()> {
//!     let signer = SshSigner::new(device, Curve::Nist256p1)?;
//!     println!("{}", signer.public_key("git@github.com")?);
//!     let signature = signer.sign_ssh_challenge("git@github.com", challenge)?;
//!     println!("{} byte signature", signature.len());
//!     Ok(())
//! }
//! ```

mod challenge;
mod derivation;
mod device;
mod error;
pub mod frame;
mod identity;
mod pubkey;
mod signature;
mod signer;

pub use challenge::ChallengeBlob;
pub use derivation::{derive_path, DerivedPath, HARDENED, IDENTITY_PURPOSE, PATH_LEN};
pub use device::{Device, DeviceInfo, SignResponse};
pub use error::{ErrorKind, HwsshError, Result};
pub use identity::Identity;
pub use pubkey::{
    decompress, export_public_key, fingerprint, serialize_verifying_key, Curve, PublicKeyRecord,
    VerifyingKey, ED25519_KEY_TYPE, NISTP256_CURVE_ID, NISTP256_KEY_TYPE,
};
pub use signature::{encode_ssh_signature, finalize, RAW_SIGNATURE_LEN, SIGNATURE_LEN};
pub use signer::{SshSigner, SSH_PROTO};
