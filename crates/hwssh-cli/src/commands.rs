// ABOUTME: Offline hwssh commands rendering identities, challenges and device keys as text
// ABOUTME: Each command returns its report so main only has to print it

use anyhow::{Context, Result};
use hwssh_core::{decompress, ChallengeBlob, Curve, Identity, PublicKeyRecord, SSH_PROTO};

fn decode_hex(input: &str, what: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&cleaned).with_context(|| format!("{what} is not valid hex"))
}

/// Canonical SSH label and derived key path for `label`.
pub fn identity(label: &str, index: u32) -> Result<String> {
    let identity = Identity::parse(label)?
        .with_proto(SSH_PROTO)
        .with_index(index);
    let path = identity.derived_path()?;

    Ok(format!(
        "identity: {identity}\nindex:    {index}\npath:     {path}"
    ))
}

/// Fields of a hex-encoded SSH challenge blob.
pub fn challenge(blob_hex: &str) -> Result<String> {
    let blob = decode_hex(blob_hex, "challenge")?;
    let Some(challenge) = ChallengeBlob::parse(&blob).context("Failed to parse challenge")? else {
        return Ok("no challenge".to_string());
    };

    Ok(format!(
        "nonce:       {}\nuser:        {}\nconn:        {}\nauth:        {}\nkey type:    {}\nfingerprint: {}",
        hex::encode(&challenge.nonce),
        challenge.user,
        challenge.conn,
        challenge.auth,
        challenge.key_type,
        challenge.public_key.fingerprint,
    ))
}

/// OpenSSH line and fingerprint for a compressed key as returned by a device.
pub fn pubkey(compressed_hex: &str, label: &str, curve: Curve) -> Result<String> {
    let compressed = decode_hex(compressed_hex, "public key")?;
    let canonical = Identity::parse(label)?.with_proto(SSH_PROTO).canonical();
    let key = decompress(&compressed, curve).context("Failed to decode public key")?;
    let record = PublicKeyRecord::from_verifying_key(key);
    let line = record.to_openssh(&canonical)?;

    Ok(format!("{line}\nfingerprint: {}", record.fingerprint))
}
