// ABOUTME: Error types for identity, key, challenge and signature handling using thiserror.
// ABOUTME: Every variant maps onto one of four inspectable kinds via HwsshError::kind().

use thiserror::Error;

/// Coarse classification of [`HwsshError`] values.
///
/// Callers that only care whether a failure came from bad input, a device
/// that answered with the wrong key, or an unsupported algorithm can match on
/// this instead of the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed identity, blob, point, or byte count.
    Format,
    /// The device returned a different key or key type than requested.
    ProtocolMismatch,
    /// The requested curve or key algorithm is not implemented.
    UnsupportedCurve,
    /// The device capability itself failed.
    Device,
}

/// Errors produced by the hwssh core.
#[derive(Error, Debug)]
pub enum HwsshError {
    /// The identity label does not fit `[proto://][user@]host[:port][/path]`.
    #[error("invalid identity {label:?}: {reason}")]
    InvalidIdentity { label: String, reason: String },

    /// A read ran past the end of the input.
    #[error("truncated input: needed {needed} bytes but only {remaining} remain")]
    Truncated { needed: usize, remaining: usize },

    /// Bytes were left over after all fields were consumed.
    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),

    /// A string frame did not hold valid UTF-8.
    #[error("invalid UTF-8 in {field} field")]
    InvalidString { field: &'static str },

    /// A public key point or blob could not be decoded.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The device signature has the wrong size.
    #[error("invalid signature length: expected {expected}, got {got}")]
    InvalidSignatureLength { expected: usize, got: usize },

    /// The device signature does not start with the plain ECDSA marker.
    #[error("invalid signature prefix byte: {0:#04x}")]
    InvalidSignaturePrefix(u8),

    /// A signature was requested over an empty challenge.
    #[error("empty challenge: nothing to sign")]
    EmptyChallenge,

    /// The device signed with a different public key than the one requested.
    #[error("device public key does not match requested key (expected {expected}, got {got})")]
    PublicKeyMismatch { expected: String, got: String },

    /// The device returned a different key type than the one requested.
    #[error("device key type {got:?} does not match requested key type {expected:?}")]
    KeyTypeMismatch { expected: String, got: String },

    /// The curve name is not one of the supported curves.
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),

    /// The SSH key algorithm is not one of the supported algorithms.
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// The device capability returned an error.
    #[error("device error: {0}")]
    Device(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Failed to render a key in OpenSSH format.
    #[error("failed to serialize key: {0}")]
    SerializeKey(#[source] ssh_key::Error),
}

impl HwsshError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HwsshError::InvalidIdentity { .. }
            | HwsshError::Truncated { .. }
            | HwsshError::TrailingBytes(_)
            | HwsshError::InvalidString { .. }
            | HwsshError::InvalidPublicKey(_)
            | HwsshError::InvalidSignatureLength { .. }
            | HwsshError::InvalidSignaturePrefix(_)
            | HwsshError::EmptyChallenge
            | HwsshError::SerializeKey(_) => ErrorKind::Format,
            HwsshError::PublicKeyMismatch { .. } | HwsshError::KeyTypeMismatch { .. } => {
                ErrorKind::ProtocolMismatch
            }
            HwsshError::UnsupportedCurve(_) | HwsshError::UnsupportedKeyType(_) => {
                ErrorKind::UnsupportedCurve
            }
            HwsshError::Device(_) => ErrorKind::Device,
        }
    }
}

/// Result type alias using HwsshError.
pub type Result<T> = std::result::Result<T, HwsshError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn test_invalid_identity_error_display() {
        let err = HwsshError::InvalidIdentity {
            label: "".to_string(),
            reason: "missing host".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("invalid identity"));
        assert!(display.contains("missing host"));
    }

    #[test]
    fn test_truncated_error_display() {
        let err = HwsshError::Truncated {
            needed: 4,
            remaining: 1,
        };
        assert_eq!(
            err.to_string(),
            "truncated input: needed 4 bytes but only 1 remain"
        );
    }

    #[test]
    fn test_signature_prefix_error_display() {
        let err = HwsshError::InvalidSignaturePrefix(1);
        assert_eq!(err.to_string(), "invalid signature prefix byte: 0x01");
    }

    #[test]
    fn test_format_kinds() {
        assert_eq!(HwsshError::TrailingBytes(3).kind(), ErrorKind::Format);
        assert_eq!(HwsshError::EmptyChallenge.kind(), ErrorKind::Format);
        assert_eq!(
            HwsshError::InvalidSignatureLength {
                expected: 65,
                got: 64
            }
            .kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn test_mismatch_kinds() {
        let err = HwsshError::KeyTypeMismatch {
            expected: "ssh-ed25519".to_string(),
            got: "ecdsa-sha2-nistp256".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ProtocolMismatch);

        let err = HwsshError::PublicKeyMismatch {
            expected: "SHA256:a".to_string(),
            got: "SHA256:b".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ProtocolMismatch);
    }

    #[test]
    fn test_unsupported_kinds() {
        assert_eq!(
            HwsshError::UnsupportedCurve("secp256k1".to_string()).kind(),
            ErrorKind::UnsupportedCurve
        );
        assert_eq!(
            HwsshError::UnsupportedKeyType("ssh-rsa".to_string()).kind(),
            ErrorKind::UnsupportedCurve
        );
    }

    #[test]
    fn test_error_source_device() {
        let err = HwsshError::Device(Box::new(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "unplugged",
        )));
        assert_eq!(err.kind(), ErrorKind::Device);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("unplugged"));
    }

    #[test]
    fn test_error_no_source_mismatch() {
        let err = HwsshError::KeyTypeMismatch {
            expected: "a".to_string(),
            got: "b".to_string(),
        };
        assert!(err.source().is_none());
    }
}
