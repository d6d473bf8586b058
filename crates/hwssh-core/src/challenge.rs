// ABOUTME: Parser for the SSH public-key authentication request a client asks the agent to sign.
// ABOUTME: Reads nonce, user, service, method, key type and key blob; rejects leftover bytes.

use crate::error::Result;
use crate::frame::Cursor;
use crate::pubkey::PublicKeyRecord;

/// Fields of an SSH `publickey` userauth request, as handed to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeBlob {
    /// Session identifier chosen by the key exchange.
    pub nonce: Vec<u8>,
    pub user: String,
    /// Service being requested, normally `ssh-connection`.
    pub conn: String,
    /// Authentication method, normally `publickey`.
    pub auth: String,
    pub key_type: String,
    pub public_key: PublicKeyRecord,
}

impl ChallengeBlob {
    /// Parse a challenge blob.
    ///
    /// Layout: `frame nonce`, one reserved byte, `frame user`, `frame conn`,
    /// `frame auth`, one reserved byte, `frame key_type`, `frame key_blob`.
    /// The reserved bytes (message number and the has-signature flag) are
    /// skipped without interpretation.
    ///
    /// An empty input means "no challenge" and yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns `HwsshError::Truncated` if a field runs past the input,
    /// `HwsshError::TrailingBytes` if input is left over, and any error from
    /// parsing the embedded public key.
    pub fn parse(data: &[u8]) -> Result<Option<Self>> {
        if data.is_empty() {
            return Ok(None);
        }

        let mut cursor = Cursor::new(data);
        let nonce = cursor.read_frame()?.to_vec();
        cursor.skip(1)?;
        let user = cursor.read_string("user")?.to_string();
        let conn = cursor.read_string("conn")?.to_string();
        let auth = cursor.read_string("auth")?.to_string();
        cursor.skip(1)?;
        let key_type = cursor.read_string("key type")?.to_string();
        let public_key = PublicKeyRecord::parse(cursor.read_frame()?)?;
        cursor.finish()?;

        tracing::debug!(%conn, %user, %auth, %key_type, "parsed challenge");
        tracing::debug!(nonce = %hex::encode(&nonce), "challenge nonce");
        tracing::debug!(fingerprint = %public_key.fingerprint, "challenge key");

        Ok(Some(Self {
            nonce,
            user,
            conn,
            auth,
            key_type,
            public_key,
        }))
    }

    /// Raw SSH blob of the key the client wants a signature from.
    pub fn public_key_blob(&self) -> &[u8] {
        &self.public_key.blob
    }
}
